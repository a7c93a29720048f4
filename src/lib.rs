//! # framedump
//!
//! Dump every Nth frame of a video to numbered PNG images plus a
//! timestamped manifest.
//!
//! `framedump` decodes a video strictly sequentially (no seeking), skips a
//! configurable number of leading frames, and exports every Nth remaining
//! frame as `<frame_number>.png` into an output directory. Each export
//! appends one `<unix_timestamp> <filename>` line to an `rgb.txt` manifest
//! in the same directory. Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framedump::{
//!     ExtractOptions, ExtractionJob, FrameDirectory, VideoFile, extract_frames,
//! };
//!
//! let mut video = VideoFile::open("input.mp4")?;
//! let plan = ExtractionJob::new()
//!     .with_skip(10)
//!     .with_offset(30)
//!     .plan(video.metadata().frame_count)?;
//!
//! let mut sink = FrameDirectory::create("frames")?;
//! let mut stream = video.frames()?;
//! let summary = extract_frames(&mut stream, &mut sink, &plan, &ExtractOptions::new())?;
//! println!("Exported {} frame(s)", summary.frames_exported);
//! # Ok::<(), framedump::ExtractError>(())
//! ```
//!
//! ## Design
//!
//! The extraction loop is written against two traits — [`FrameSource`]
//! (sequential decoded frames) and [`FrameSink`] (image + manifest
//! persistence) — so the selection rule stays a pure, testable algorithm
//! independent of FFmpeg and the filesystem. The library performs a single
//! forward pass: there is no seeking, no parallelism, and no retry. A
//! decoder read failure ends the pass and keeps whatever was written.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod error;
pub mod extract;
pub mod ffmpeg;
pub mod frames;
pub mod job;
pub mod manifest;
pub mod metadata;
pub mod output;
pub mod progress;
pub mod video;

pub use error::ExtractError;
pub use extract::{ExtractOptions, ExtractionSummary, extract_frames};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use frames::{FrameSource, FrameStream};
pub use job::{ExtractionJob, ExtractionPlan};
pub use manifest::{MANIFEST_FILE_NAME, Manifest};
pub use metadata::VideoMetadata;
pub use output::{FrameDirectory, FrameSink};
pub use progress::{ProgressCallback, ProgressInfo};
pub use video::VideoFile;
