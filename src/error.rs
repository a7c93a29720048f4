//! Error types for the `framedump` crate.
//!
//! This module defines [`ExtractError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry enough context to
//! diagnose the problem without additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framedump` operations.
///
/// Every public method that can fail returns `Result<T, ExtractError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A decoded frame could not be converted to an image.
    #[error("Failed to decode video frame: {0}")]
    Decode(String),

    /// A skip interval of zero was provided.
    #[error("Skip interval must be at least 1")]
    InvalidSkip,

    /// The start offset is at or beyond the end of the video.
    #[error("Offset {offset} is out of range (video has {frame_count} frames)")]
    OffsetOutOfRange {
        /// The offset that was requested.
        offset: u64,
        /// The total number of frames in the video.
        frame_count: u64,
    },

    /// The requested parameters select no frames at all.
    #[error(
        "Nothing to extract: {frame_count} frames with offset {offset} and skip {skip} \
         selects zero frames"
    )]
    NothingToExtract {
        /// The total number of frames in the video.
        frame_count: u64,
        /// The offset that was requested.
        offset: u64,
        /// The skip interval that was requested.
        skip: u64,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An I/O error occurred while writing output files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while encoding a frame.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}

impl From<FfmpegError> for ExtractError {
    fn from(error: FfmpegError) -> Self {
        ExtractError::Ffmpeg(error.to_string())
    }
}
