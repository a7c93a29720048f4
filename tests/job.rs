//! Precondition and planning tests.

use framedump::{ExtractError, ExtractionJob};

#[test]
fn plan_computes_export_count() {
    let plan = ExtractionJob::new()
        .with_skip(10)
        .with_offset(30)
        .plan(330)
        .unwrap();
    assert_eq!(plan.frames_to_extract, 30);
    assert_eq!(plan.skip, 10);
    assert_eq!(plan.offset, 30);
}

#[test]
fn builder_defaults() {
    let job = ExtractionJob::new();
    assert_eq!(job.skip, 10);
    assert_eq!(job.offset, 0);
    assert_eq!(job.end_frame, None);
}

#[test]
fn end_frame_is_carried_into_the_plan() {
    let plan = ExtractionJob::new()
        .with_skip(1)
        .with_end_frame(Some(42))
        .plan(100)
        .unwrap();
    assert_eq!(plan.end_frame, Some(42));
}

#[test]
fn offset_at_length_is_rejected() {
    let error = ExtractionJob::new().with_offset(10).plan(10).unwrap_err();
    assert!(matches!(
        error,
        ExtractError::OffsetOutOfRange {
            offset: 10,
            frame_count: 10,
        }
    ));
}

#[test]
fn offset_beyond_length_is_rejected() {
    let error = ExtractionJob::new().with_offset(50).plan(10).unwrap_err();
    assert!(matches!(error, ExtractError::OffsetOutOfRange { .. }));
}

#[test]
fn zero_skip_is_rejected() {
    let error = ExtractionJob::new().with_skip(0).plan(100).unwrap_err();
    assert!(matches!(error, ExtractError::InvalidSkip));
}

#[test]
fn skip_larger_than_remaining_frames_is_rejected() {
    // (10 - 5) / 10 == 0 selected frames.
    let error = ExtractionJob::new()
        .with_skip(10)
        .with_offset(5)
        .plan(10)
        .unwrap_err();
    assert!(matches!(error, ExtractError::NothingToExtract { .. }));
}

#[test]
fn failed_preconditions_write_nothing() {
    let scratch = tempfile::tempdir().expect("Failed to create temp dir");
    let out = scratch.path().join("frames");

    // Planning happens before any sink exists, so a precondition failure
    // leaves the output directory uncreated.
    let result = ExtractionJob::new().with_offset(50).plan(10);
    assert!(result.is_err());
    assert!(!out.exists());
}

#[test]
fn error_messages_name_the_numbers() {
    let error = ExtractionJob::new().with_offset(50).plan(10).unwrap_err();
    let message = error.to_string();
    assert!(message.contains("50"));
    assert!(message.contains("10"));
}
