//! The frame extraction loop.
//!
//! [`extract_frames`] is the core of the crate: a single forward pass over
//! a [`FrameSource`], selecting every Nth frame and handing it to a
//! [`FrameSink`]. It is written entirely against the collaborator traits,
//! so the selection rule can be tested without FFmpeg or a filesystem.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::{
    error::ExtractError,
    frames::FrameSource,
    job::ExtractionPlan,
    output::FrameSink,
    progress::{NoOpProgress, ProgressCallback, ProgressTracker},
};

/// Operational settings for an extraction run.
///
/// Carries the progress callback and its reporting cadence. A
/// default-constructed value reports nothing.
#[derive(Clone)]
pub struct ExtractOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// How often to fire the progress callback (every N exported frames).
    pub(crate) batch_size: u64,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create options with default settings: no progress callback, batch
    /// size 1.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Attach a progress callback.
    ///
    /// The callback is invoked every
    /// [`batch_size`](ExtractOptions::with_batch_size) exported frames.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires.
    ///
    /// A value of 1 means every exported frame; 10 means every 10th.
    /// Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }
}

/// What an extraction run actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ExtractionSummary {
    /// Frames the selection rule ran over after the offset was consumed.
    /// The end frame, if hit, is not counted.
    pub frames_read: u64,
    /// Frames exported to the sink.
    pub frames_exported: u64,
}

/// Run one extraction pass.
///
/// Consumes `plan.offset` leading frames, then iterates the source with a
/// counter `frame_cnt` starting at 0. The logical index of each frame is
/// `frame_cnt + offset`, computed immediately after the read and before
/// any use. A frame is exported when `frame_cnt % skip == 0`. The loop
/// stops when the source is exhausted or when the logical index equals
/// `plan.end_frame` — that frame and everything beyond it is never
/// exported.
///
/// A source that ends early (including a decoder read failure) is normal
/// termination: whatever was exported stays, and the summary reports the
/// shortfall.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] or [`ExtractError::Image`] if the sink
/// fails to persist a frame; earlier output is left in place.
///
/// # Example
///
/// ```no_run
/// use framedump::{
///     ExtractOptions, ExtractionJob, FrameDirectory, VideoFile, extract_frames,
/// };
///
/// let mut video = VideoFile::open("input.mp4")?;
/// let plan = ExtractionJob::new()
///     .with_skip(10)
///     .plan(video.metadata().frame_count)?;
///
/// let mut sink = FrameDirectory::create("frames")?;
/// let mut stream = video.frames()?;
/// let summary = extract_frames(&mut stream, &mut sink, &plan, &ExtractOptions::new())?;
/// println!("Exported {} frame(s)", summary.frames_exported);
/// # Ok::<(), framedump::ExtractError>(())
/// ```
pub fn extract_frames<S, K>(
    source: &mut S,
    sink: &mut K,
    plan: &ExtractionPlan,
    options: &ExtractOptions,
) -> Result<ExtractionSummary, ExtractError>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        Some(plan.frames_to_extract),
        options.batch_size,
    );

    // Discard leading frames. The plan guarantees offset < frame_count,
    // but frame counts are container-reported and may overestimate, so a
    // stream that dies here is still normal termination.
    let mut skipped = 0;
    while skipped < plan.offset {
        if source.next_frame().is_none() {
            log::warn!("Stream ended after {skipped} of {} offset frames", plan.offset);
            tracker.finish();
            return Ok(ExtractionSummary {
                frames_read: 0,
                frames_exported: 0,
            });
        }
        skipped += 1;
    }

    let mut frame_cnt: u64 = 0;
    let mut exported: u64 = 0;

    while let Some(image) = source.next_frame() {
        // Logical index of the frame just read.
        let frame_no = frame_cnt + plan.offset;

        if plan.end_frame == Some(frame_no) {
            log::debug!("Reached end frame {frame_no}, stopping");
            break;
        }

        if frame_cnt % plan.skip == 0 {
            sink.save_frame(frame_no, &image)?;
            exported += 1;
            tracker.advance(frame_no);
        }

        frame_cnt += 1;
    }

    tracker.finish();
    log::info!(
        "Extraction finished: {exported} of {} planned frame(s) exported ({frame_cnt} read)",
        plan.frames_to_extract,
    );

    Ok(ExtractionSummary {
        frames_read: frame_cnt,
        frames_exported: exported,
    })
}
