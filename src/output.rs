//! Output directory handling.
//!
//! [`FrameSink`] is the seam between the extraction loop and the
//! filesystem. The production implementation is [`FrameDirectory`]: a
//! directory of `<frame_number>.png` images plus the
//! [`Manifest`](crate::Manifest) recording each export.

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::DynamicImage;

use crate::{error::ExtractError, manifest::Manifest};

/// A destination for exported frames.
///
/// The extraction loop in [`extract_frames`](crate::extract_frames) is
/// written against this trait so it can be exercised without touching the
/// filesystem.
pub trait FrameSink {
    /// Persist one selected frame under its logical frame index.
    fn save_frame(&mut self, frame_number: u64, image: &DynamicImage) -> Result<(), ExtractError>;
}

/// Directory-backed [`FrameSink`].
///
/// Writes each frame as `<frame_number>.png` and appends one manifest line
/// per frame. The manifest is opened once at construction and closed on
/// drop, covering every exit path of the job.
pub struct FrameDirectory {
    directory: PathBuf,
    manifest: Manifest,
}

impl FrameDirectory {
    /// Create the output directory (including parents) if absent and open
    /// the manifest inside it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Io`] if the directory or manifest cannot be
    /// created.
    pub fn create<P: AsRef<Path>>(directory: P) -> Result<Self, ExtractError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        let manifest = Manifest::open_in(&directory)?;
        Ok(Self {
            directory,
            manifest,
        })
    }

    /// The directory frames are written into.
    pub fn path(&self) -> &Path {
        &self.directory
    }
}

impl FrameSink for FrameDirectory {
    fn save_frame(&mut self, frame_number: u64, image: &DynamicImage) -> Result<(), ExtractError> {
        let filename = format!("{frame_number}.png");
        image.save(self.directory.join(&filename))?;
        self.manifest.record(&filename)?;
        log::debug!("Saved frame {frame_number} -> {filename}");
        Ok(())
    }
}
