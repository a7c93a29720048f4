//! Core [`VideoFile`] implementation.
//!
//! `VideoFile` is the entry point for the crate. It opens a video file,
//! locates the best video stream, caches [`VideoMetadata`], and hands out a
//! [`FrameStream`](crate::FrameStream) for sequential decoding.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, format::context::Input, media::Type};

use crate::{error::ExtractError, frames::FrameStream, metadata::VideoMetadata};

/// An opened video file.
///
/// Created via [`VideoFile::open`], this struct holds the demuxer context
/// and cached metadata. Use [`frames()`](VideoFile::frames) to decode the
/// stream sequentially from the first frame. The underlying FFmpeg
/// resources are released on drop.
///
/// # Example
///
/// ```no_run
/// use framedump::VideoFile;
///
/// let mut video = VideoFile::open("input.mp4").unwrap();
/// println!("~{} frames", video.metadata().frame_count);
/// ```
pub struct VideoFile {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Index of the best video stream.
    pub(crate) video_stream_index: usize,
    /// Cached metadata extracted at open time.
    pub(crate) metadata: VideoMetadata,
    /// Path to the opened file (kept for error messages).
    #[allow(dead_code)]
    pub(crate) file_path: PathBuf,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file for frame extraction.
    ///
    /// Initializes FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FileOpen`] if the file cannot be opened, or
    /// [`ExtractError::NoVideoStream`] if it contains no video stream.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use framedump::{ExtractError, VideoFile};
    ///
    /// let video = VideoFile::open("video.mp4")?;
    /// # Ok::<(), ExtractError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video file: {}", file_path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| ExtractError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| ExtractError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(ExtractError::NoVideoStream)?;
        let video_stream_index = stream.index();

        // Container-level duration.
        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let container = input_context.format().name().to_string();

        let codec_parameters = stream.parameters();
        let decoder_context =
            CodecContext::from_parameters(codec_parameters).map_err(|error| {
                ExtractError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let video_decoder =
            decoder_context
                .decoder()
                .video()
                .map_err(|error| ExtractError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to create video decoder: {error}"),
                })?;

        let width = video_decoder.width();
        let height = video_decoder.height();

        // Frames per second from the stream's average frame rate, with the
        // raw rate field as fallback.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        // Prefer the frame count the container records; estimate from
        // duration otherwise.
        let recorded_frames = stream.frames();
        let frame_count = if recorded_frames > 0 {
            recorded_frames as u64
        } else if frames_per_second > 0.0 {
            (duration.as_secs_f64() * frames_per_second) as u64
        } else {
            0
        };

        let codec = video_decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_count,
            codec,
            duration,
            container,
        };

        log::info!(
            "Opened video file: {} (format={}, {}x{}, {:.2} fps, codec={}, ~{} frames)",
            file_path.display(),
            metadata.container,
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.codec,
            metadata.frame_count,
        );

        Ok(Self {
            input_context,
            video_stream_index,
            metadata,
            file_path,
        })
    }

    /// Get a reference to the cached video metadata.
    ///
    /// Metadata is extracted once during [`open`](VideoFile::open) and does
    /// not require additional decoding.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Start decoding the stream sequentially from the first frame.
    ///
    /// The returned [`FrameStream`] borrows this handle mutably; no other
    /// operation can happen while it is alive. Dropping it releases the
    /// borrow.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Ffmpeg`] if the decoder or pixel-format
    /// converter cannot be constructed.
    pub fn frames(&mut self) -> Result<FrameStream<'_>, ExtractError> {
        FrameStream::new(self)
    }
}
