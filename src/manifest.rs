//! The extraction manifest.
//!
//! Every exported frame gets one line in `rgb.txt`:
//! `<unix_timestamp_float> <filename>\n`, in export order. The file is
//! opened in append mode once per job, so re-running an extraction into
//! the same directory extends the manifest rather than replacing it.

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::error::ExtractError;

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILE_NAME: &str = "rgb.txt";

/// Append-only writer for the extraction manifest.
///
/// Opened once for the whole job by
/// [`FrameDirectory`](crate::FrameDirectory); each exported frame appends
/// one timestamped line, written straight to the file handle. Everything
/// recorded before an abort stays on disk. The file handle is closed when
/// the manifest is dropped.
pub struct Manifest {
    file: File,
}

impl Manifest {
    /// Open (or create) the manifest in `directory`, positioned for
    /// appending.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the file cannot be opened.
    pub fn open_in<P: AsRef<Path>>(directory: P) -> Result<Self, ExtractError> {
        let path = directory.as_ref().join(MANIFEST_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        log::debug!("Opened manifest: {}", path.display());
        Ok(Self { file })
    }

    /// Append one line pairing `filename` with the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the write fails.
    pub fn record(&mut self, filename: &str) -> Result<(), ExtractError> {
        let timestamp = unix_timestamp();
        writeln!(self.file, "{timestamp} {filename}")?;
        Ok(())
    }
}

/// Seconds since the Unix epoch as a float, `time.time()`-style.
fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}
