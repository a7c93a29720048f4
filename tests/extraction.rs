//! Extraction loop properties, exercised through the collaborator seams
//! with synthetic sources — no FFmpeg or fixture files required.

use std::fs;
use std::sync::{Arc, Mutex};

use framedump::{
    ExtractError, ExtractOptions, ExtractionJob, FrameDirectory, FrameSink, FrameSource,
    MANIFEST_FILE_NAME, ProgressCallback, ProgressInfo, extract_frames,
};
use image::{DynamicImage, RgbImage};

/// Yields a fixed number of solid frames, then ends.
struct SyntheticSource {
    remaining: u64,
}

impl SyntheticSource {
    fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Option<DynamicImage> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(DynamicImage::ImageRgb8(RgbImage::new(2, 2)))
    }
}

/// Records saved frame numbers without touching the filesystem.
#[derive(Default)]
struct RecordingSink {
    saved: Vec<u64>,
}

impl FrameSink for RecordingSink {
    fn save_frame(
        &mut self,
        frame_number: u64,
        _image: &DynamicImage,
    ) -> Result<(), ExtractError> {
        self.saved.push(frame_number);
        Ok(())
    }
}

#[test]
fn skip_one_exports_every_frame() {
    let mut source = SyntheticSource::new(5);
    let mut sink = RecordingSink::default();
    let plan = ExtractionJob::new().with_skip(1).plan(5).unwrap();

    let summary =
        extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();

    assert_eq!(summary.frames_exported, 5);
    assert_eq!(summary.frames_read, 5);
    assert_eq!(sink.saved, vec![0, 1, 2, 3, 4]);
}

#[test]
fn selected_indices_follow_offset_and_skip() {
    let mut source = SyntheticSource::new(20);
    let mut sink = RecordingSink::default();
    let plan = ExtractionJob::new()
        .with_skip(5)
        .with_offset(3)
        .plan(20)
        .unwrap();

    extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();

    // Selected indices are offset, offset+skip, offset+2*skip, ...
    assert_eq!(sink.saved, vec![3, 8, 13, 18]);
}

#[test]
fn saved_indices_ascend_without_duplicates() {
    let mut source = SyntheticSource::new(100);
    let mut sink = RecordingSink::default();
    let plan = ExtractionJob::new().with_skip(7).plan(100).unwrap();

    extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();

    let mut sorted = sink.saved.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sink.saved, sorted, "indices must ascend with no duplicates");
}

#[test]
fn end_frame_is_never_exported() {
    let mut source = SyntheticSource::new(100);
    let mut sink = RecordingSink::default();
    let plan = ExtractionJob::new()
        .with_skip(10)
        .with_end_frame(Some(30))
        .plan(100)
        .unwrap();

    extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();

    // Stops exactly at index 30: it is reached but not exported.
    assert_eq!(sink.saved, vec![0, 10, 20]);
}

#[test]
fn nothing_beyond_end_frame_is_exported() {
    let mut source = SyntheticSource::new(100);
    let mut sink = RecordingSink::default();
    let plan = ExtractionJob::new()
        .with_skip(10)
        .with_end_frame(Some(35))
        .plan(100)
        .unwrap();

    let summary =
        extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();

    assert!(sink.saved.iter().all(|&index| index < 35));
    assert_eq!(summary.frames_read, 35);
}

#[test]
fn early_stream_end_keeps_prior_exports() {
    // The container claims 100 frames but the stream dies after 25.
    let mut source = SyntheticSource::new(25);
    let mut sink = RecordingSink::default();
    let plan = ExtractionJob::new().with_skip(10).plan(100).unwrap();

    let summary =
        extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();

    assert_eq!(sink.saved, vec![0, 10, 20]);
    assert_eq!(summary.frames_exported, 3);
    assert!(summary.frames_exported < plan.frames_to_extract);
}

#[test]
fn stream_shorter_than_offset_exports_nothing() {
    let mut source = SyntheticSource::new(3);
    let mut sink = RecordingSink::default();
    // Plan against a claimed count of 10, so the offset passes validation.
    let plan = ExtractionJob::new()
        .with_skip(1)
        .with_offset(5)
        .plan(10)
        .unwrap();

    let summary =
        extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();

    assert_eq!(summary.frames_exported, 0);
    assert!(sink.saved.is_empty());
}

#[test]
fn progress_reports_reach_exported_count() {
    struct CollectProgress {
        counts: Mutex<Vec<u64>>,
    }

    impl ProgressCallback for CollectProgress {
        fn on_progress(&self, info: &ProgressInfo) {
            self.counts.lock().unwrap().push(info.current);
        }
    }

    let callback = Arc::new(CollectProgress {
        counts: Mutex::new(Vec::new()),
    });

    let mut source = SyntheticSource::new(50);
    let mut sink = RecordingSink::default();
    let plan = ExtractionJob::new().with_skip(10).plan(50).unwrap();
    let options = ExtractOptions::new().with_progress(callback.clone());

    let summary = extract_frames(&mut source, &mut sink, &plan, &options).unwrap();

    let counts = callback.counts.lock().unwrap();
    assert_eq!(
        counts.last().copied(),
        Some(summary.frames_exported),
        "final report should carry the full export count"
    );
}

// ── Disk-backed sink ───────────────────────────────────────────────

#[test]
fn frame_directory_writes_images_and_manifest() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let out = scratch.path().join("frames");

    let mut source = SyntheticSource::new(6);
    let mut sink = FrameDirectory::create(&out).expect("Failed to create sink");
    let plan = ExtractionJob::new().with_skip(1).plan(6).unwrap();

    let summary =
        extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();
    drop(sink);

    assert_eq!(summary.frames_exported, 6);
    for index in 0..6 {
        assert!(
            out.join(format!("{index}.png")).exists(),
            "missing {index}.png"
        );
    }

    let manifest = fs::read_to_string(out.join(MANIFEST_FILE_NAME)).unwrap();
    let lines: Vec<&str> = manifest.lines().collect();
    assert_eq!(lines.len(), 6);

    // Manifest order equals ascending frame-index order.
    for (index, line) in lines.iter().enumerate() {
        let filename = line.split_whitespace().nth(1).unwrap();
        assert_eq!(filename, format!("{index}.png"));
    }
}

#[test]
fn rerun_appends_to_the_manifest() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let out = scratch.path().join("frames");
    let plan = ExtractionJob::new().with_skip(2).plan(8).unwrap();

    for _ in 0..2 {
        let mut source = SyntheticSource::new(8);
        let mut sink = FrameDirectory::create(&out).expect("Failed to create sink");
        extract_frames(&mut source, &mut sink, &plan, &ExtractOptions::new()).unwrap();
    }

    let manifest = fs::read_to_string(out.join(MANIFEST_FILE_NAME)).unwrap();
    assert_eq!(
        manifest.lines().count(),
        8,
        "second run should append, not replace"
    );
}
