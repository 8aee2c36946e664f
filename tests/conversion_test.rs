//! Integration tests for the batch conversion flow.

mod common;

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use common::{FakeCopier, FakeTranscoder, Workspace};
use indicatif::ProgressBar;
use photoforge::conversion::{discover_jobs, run_batch, BatchConverter, JobOutcome, RunStatistics};
use photoforge_av::{ImageTranscoder, MetadataCopier};
use photoforge_common::ImageFormat;

fn hidden(_total: u64) -> ProgressBar {
    ProgressBar::hidden()
}

// ---------------------------------------------------------------------------
// Fake codec scenarios
// ---------------------------------------------------------------------------

#[test]
fn no_candidates_is_success() {
    let ws = Workspace::new();
    ws.add_file("notes.txt", b"not an image");
    let transcoder = FakeTranscoder::default();

    let stats = run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        None,
        hidden,
    )
    .unwrap();

    assert_eq!(stats, RunStatistics::new(0));
    assert_eq!(stats.exit_status(), 0);
    // Destination is still prepared
    assert!(ws.dest.is_dir());
}

#[test]
fn all_succeed() {
    let ws = Workspace::new();
    for name in ["IMG_1.HEIC", "IMG_2.heic", "IMG_3.Heic"] {
        ws.add_file(name, b"heic");
    }
    let transcoder = FakeTranscoder::default();

    let stats = run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        None,
        hidden,
    )
    .unwrap();

    assert_eq!(stats.converted, 3);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.converted, stats.total);
    assert_eq!(stats.exit_status(), 0);
    assert_eq!(ws.outputs(), vec!["IMG_1.jpg", "IMG_2.jpg", "IMG_3.jpg"]);
}

#[test]
fn mixed_batch_with_metadata_tool() {
    let ws = Workspace::new();
    ws.add_file("a.heic", b"heic");
    ws.add_file("b_corrupt.heic", b"garbage");
    ws.add_file("c.heic", b"heic");
    let transcoder = FakeTranscoder::default();
    let copier = FakeCopier::succeeding();

    let stats = run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        Some(&copier as &dyn MetadataCopier),
        hidden,
    )
    .unwrap();

    assert_eq!(stats.converted, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.metadata_preserved, 2);
    assert_eq!(stats.converted + stats.errors, stats.total);
    assert_eq!(stats.exit_status(), 1);

    let calls = copier.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, ws.source.join("a.heic"));
    assert_eq!(calls[0].1, ws.dest.join("a.jpg"));
    assert_eq!(calls[1].1, ws.dest.join("c.jpg"));
}

#[test]
fn three_consecutive_failures_abort() {
    let ws = Workspace::new();
    for name in ["1_corrupt.heic", "2_corrupt.heic", "3_corrupt.heic", "4_corrupt.heic"] {
        ws.add_file(name, b"garbage");
    }
    let transcoder = FakeTranscoder::default();

    let stats = run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        None,
        hidden,
    )
    .unwrap();

    assert_eq!(
        *transcoder.attempted.borrow(),
        vec!["1_corrupt.heic", "2_corrupt.heic", "3_corrupt.heic"]
    );
    assert_eq!(stats.total, 4);
    assert_eq!(stats.converted, 0);
    assert_eq!(stats.errors, 3);
    assert!(stats.aborted);
    assert_eq!(stats.exit_status(), 1);
}

#[test]
fn custom_threshold() {
    let ws = Workspace::new();
    for name in ["1_corrupt.heic", "2_corrupt.heic", "3.heic"] {
        ws.add_file(name, b"x");
    }
    let transcoder = FakeTranscoder::default();
    let mut config = ws.config(ImageFormat::Heic, ImageFormat::Jpeg);
    config.max_consecutive_errors = 1;

    let stats = run_batch(&config, &transcoder, None, hidden).unwrap();

    assert_eq!(stats.errors, 1);
    assert_eq!(transcoder.attempted.borrow().len(), 1);
    assert!(stats.aborted);
}

#[test]
fn metadata_tool_missing() {
    let ws = Workspace::new();
    ws.add_file("a.heic", b"heic");
    ws.add_file("b.heic", b"heic");
    let transcoder = FakeTranscoder::default();

    let stats = run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        None,
        hidden,
    )
    .unwrap();

    assert_eq!(stats.converted, 2);
    assert_eq!(stats.metadata_preserved, 0);
    assert_eq!(stats.exit_status(), 0);
}

#[test]
fn metadata_failures_only_warn() {
    let ws = Workspace::new();
    ws.add_file("a.heic", b"heic");
    let transcoder = FakeTranscoder::default();
    let copier = FakeCopier::failing();

    let stats = run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        Some(&copier as &dyn MetadataCopier),
        hidden,
    )
    .unwrap();

    assert_eq!(stats.converted, 1);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.metadata_preserved, 0);
    assert!(stats.metadata_preserved <= stats.converted);
}

#[test]
fn alias_extensions_keep_one_output_per_conversion() {
    let ws = Workspace::new();
    ws.add_file("IMG_1.heic", b"heic");
    ws.add_file("IMG_1.HEIF", b"heif");
    ws.add_file("IMG_2.heif", b"heif");
    let transcoder = FakeTranscoder::default();
    let copier = FakeCopier::succeeding();

    let stats = run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        Some(&copier as &dyn MetadataCopier),
        hidden,
    )
    .unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.converted, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.exit_status(), 1);
    assert_eq!(ws.outputs(), vec!["IMG_1.jpg", "IMG_2.jpg"]);
    assert_eq!(ws.outputs().len(), stats.converted);

    // "IMG_1.HEIF" sorts first and owns IMG_1.jpg; its dates are the ones copied
    assert_eq!(
        *transcoder.attempted.borrow(),
        vec!["IMG_1.HEIF", "IMG_2.heif"]
    );
    let calls = copier.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], (ws.source.join("IMG_1.HEIF"), ws.dest.join("IMG_1.jpg")));
}

#[test]
fn missing_source_dir_is_fatal() {
    let ws = Workspace::new();
    let mut config = ws.config(ImageFormat::Heic, ImageFormat::Jpeg);
    config.source_dir = ws.dir.path().join("does-not-exist");
    let transcoder = FakeTranscoder::default();

    let err = run_batch(&config, &transcoder, None, hidden).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
    assert!(transcoder.attempted.borrow().is_empty());
    assert!(!ws.dest.exists());
}

#[test]
fn rerun_overwrites_outputs() {
    let ws = Workspace::new();
    ws.add_file("a.heic", b"heic");
    std::fs::create_dir_all(&ws.dest).unwrap();
    std::fs::write(ws.dest.join("a.jpg"), b"stale output from an earlier run").unwrap();
    let transcoder = FakeTranscoder::default();

    let stats = run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        None,
        hidden,
    )
    .unwrap();

    assert_eq!(stats.converted, 1);
    assert_eq!(std::fs::read(ws.dest.join("a.jpg")).unwrap(), b"\xFF\xD8\xFF\xD9");
}

#[test]
fn progress_bar_sized_to_candidates() {
    let ws = Workspace::new();
    ws.add_file("a.heic", b"heic");
    ws.add_file("b.heic", b"heic");
    let transcoder = FakeTranscoder::default();
    let seen = Arc::new(Mutex::new(None));
    let seen_in = Arc::clone(&seen);

    run_batch(
        &ws.config(ImageFormat::Heic, ImageFormat::Jpeg),
        &transcoder,
        None,
        move |total| {
            *seen_in.lock().unwrap() = Some(total);
            ProgressBar::hidden()
        },
    )
    .unwrap();

    assert_eq!(*seen.lock().unwrap(), Some(2));
}

#[test]
fn process_reports_outcome_per_job() {
    let ws = Workspace::new();
    ws.add_file("a.heic", b"heic");
    ws.add_file("b_corrupt.heic", b"garbage");
    std::fs::create_dir_all(&ws.dest).unwrap();
    let jobs = discover_jobs(&ws.source, &ws.dest, ImageFormat::Heic, ImageFormat::Jpeg).unwrap();
    let transcoder = FakeTranscoder::default();
    let copier = FakeCopier::succeeding();
    let converter = BatchConverter::new(&transcoder, 3).with_metadata(Some(&copier));

    assert_matches!(
        converter.process(&jobs[0]),
        JobOutcome::Converted {
            metadata: Some(Ok(())),
            ..
        }
    );
    assert_matches!(
        converter.process(&jobs[1]),
        JobOutcome::Failed(photoforge_av::Error::InvalidInput(_))
    );
    assert_eq!(copier.calls.borrow().len(), 1);
}

// ---------------------------------------------------------------------------
// Real codec
// ---------------------------------------------------------------------------

#[test]
fn png_to_webp_real_codec() {
    let ws = Workspace::new();
    ws.add_png("avatar_1.png");
    ws.add_png("avatar_2.PNG");
    let transcoder = ImageTranscoder::new(ImageFormat::Png, ImageFormat::Webp, 90).unwrap();

    let stats = run_batch(
        &ws.config(ImageFormat::Png, ImageFormat::Webp),
        &transcoder,
        None,
        hidden,
    )
    .unwrap();

    assert_eq!(stats.converted, 2);
    assert_eq!(ws.outputs(), vec!["avatar_1.webp", "avatar_2.webp"]);

    let decoded = image::open(ws.dest.join("avatar_2.webp")).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 6));
}

#[test]
fn png_to_jpeg_with_corrupt_file() {
    let ws = Workspace::new();
    ws.add_png("a.png");
    ws.add_file("b.png", b"this is not a png");
    ws.add_png("c.png");
    let transcoder = ImageTranscoder::new(ImageFormat::Png, ImageFormat::Jpeg, 85).unwrap();

    let stats = run_batch(
        &ws.config(ImageFormat::Png, ImageFormat::Jpeg),
        &transcoder,
        None,
        hidden,
    )
    .unwrap();

    assert_eq!(stats.converted, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.exit_status(), 1);
    assert!(ws.dest.join("a.jpg").exists());
    assert!(ws.dest.join("c.jpg").exists());
}
