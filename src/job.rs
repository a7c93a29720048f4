//! Extraction job parameters and precondition checks.
//!
//! [`ExtractionJob`] is a builder describing *which* frames to export:
//! the skip interval, the start offset, and an optional end frame.
//! [`plan`](ExtractionJob::plan) validates the parameters against the
//! video's frame count and produces an immutable [`ExtractionPlan`] with
//! the precomputed export count. Validation failures happen before any
//! output is written.
//!
//! # Example
//!
//! ```
//! use framedump::ExtractionJob;
//!
//! let plan = ExtractionJob::new()
//!     .with_skip(10)
//!     .with_offset(30)
//!     .plan(330)
//!     .unwrap();
//! assert_eq!(plan.frames_to_extract, 30);
//! ```

use crate::error::ExtractError;

/// Parameters for a frame extraction job.
///
/// Defaults: skip 10, offset 0, no end frame — matching the CLI defaults.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExtractionJob {
    /// Export every Nth frame. Must be at least 1 (1 = every frame).
    pub skip: u64,
    /// Stop once this logical frame index is reached. The frame at this
    /// index is never exported. `None` means run to end of stream.
    pub end_frame: Option<u64>,
    /// Number of leading frames to discard before extraction begins.
    pub offset: u64,
}

impl Default for ExtractionJob {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionJob {
    /// Create a job with default parameters.
    pub fn new() -> Self {
        Self {
            skip: 10,
            end_frame: None,
            offset: 0,
        }
    }

    /// Set the skip interval (1 = every frame).
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    /// Set the logical frame index at which extraction stops.
    pub fn with_end_frame(mut self, end_frame: Option<u64>) -> Self {
        self.end_frame = end_frame;
        self
    }

    /// Set the number of leading frames to discard.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Validate the parameters against the video's frame count.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::InvalidSkip`] if `skip` is zero.
    /// - [`ExtractError::OffsetOutOfRange`] if `offset >= frame_count`.
    /// - [`ExtractError::NothingToExtract`] if the computed export count
    ///   `(frame_count - offset) / skip` is zero.
    pub fn plan(&self, frame_count: u64) -> Result<ExtractionPlan, ExtractError> {
        if self.skip == 0 {
            return Err(ExtractError::InvalidSkip);
        }

        if self.offset >= frame_count {
            return Err(ExtractError::OffsetOutOfRange {
                offset: self.offset,
                frame_count,
            });
        }

        let frames_to_extract = (frame_count - self.offset) / self.skip;
        if frames_to_extract == 0 {
            return Err(ExtractError::NothingToExtract {
                frame_count,
                offset: self.offset,
                skip: self.skip,
            });
        }

        Ok(ExtractionPlan {
            skip: self.skip,
            end_frame: self.end_frame,
            offset: self.offset,
            frames_to_extract,
        })
    }
}

/// A validated extraction job.
///
/// Produced by [`ExtractionJob::plan`]; immutable once the job starts.
#[derive(Debug, Clone)]
#[must_use]
pub struct ExtractionPlan {
    /// Export every Nth frame.
    pub skip: u64,
    /// Stop once this logical frame index is reached, if set.
    pub end_frame: Option<u64>,
    /// Number of leading frames to discard.
    pub offset: u64,
    /// Number of frames the selection rule will export, barring early
    /// end-of-stream or an end frame.
    pub frames_to_extract: u64,
}
