//! Session-level tests: building a model from mixed sources and driving it
//!
//! Covers:
//! - Building a full model from subtitle, CSV, and NPY sources together
//! - Half-open boundary behavior across a simulated playback tick stream
//! - A quick-preview run against the model's own segments, applied to a
//!   simulated playback clock

use gazeview_core::preview::{PreviewCommand, QuickPreviewController};
use gazeview_core::{SessionBuilder, ViewerConfig};

fn npy_f64(shape: &str, values: &[f64]) -> Vec<u8> {
    let header = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': {}, }}",
        shape
    );
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"\x93NUMPY\x01\x00");
    bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
    bytes.extend_from_slice(header.as_bytes());
    for v in values {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

#[test]
fn test_half_open_boundaries_across_tick_stream() {
    let model = SessionBuilder::new(ViewerConfig::default())
        .duration(20.0)
        .phases_csv("start,end,phase\n0,5,First\n5,10,Second\n")
        .build();

    assert_eq!(model.tick(4.999).phase, Some(0));
    assert_eq!(model.tick(5.0).phase, Some(1));
    assert_eq!(model.tick(9.999).phase, Some(1));
    assert_eq!(model.tick(10.0).phase, None);
    assert_eq!(model.tick(-1.0).phase, None);
}

#[test]
fn test_gaze_frame_resolution_through_model() {
    // 4 frames at 25 fps covers 0.16 s of playback
    let model = SessionBuilder::new(ViewerConfig::default())
        .gaze_npy(npy_f64(
            "(4, 2)",
            &[0.0, 0.0, 0.1, 0.1, 0.2, 0.2, 0.3, 0.3],
        ))
        .build();

    assert_eq!(model.tick(0.0).gaze_point, Some([0.0, 0.0]));
    assert_eq!(model.tick(0.05).gaze_point, Some([0.1, 0.1]));
    // Beyond the track the last frame holds
    assert_eq!(model.tick(60.0).gaze_point, Some([0.3, 0.3]));
}

#[test]
fn test_quick_preview_run_against_model_segments() {
    let model = SessionBuilder::new(ViewerConfig::default())
        .duration(20.0)
        .preview_csv("start,end\n0,2\n10,12\n")
        .build();

    let mut controller =
        QuickPreviewController::new(model.preview_segments.clone(), &model.config);

    // Simulated player: the controller's commands drive the clock
    let mut clock = 0.0f64;
    let mut rate = 1.0f64;
    let mut paused = true;
    let mut apply = |commands: Vec<PreviewCommand>, clock: &mut f64, rate: &mut f64, paused: &mut bool| {
        for command in commands {
            match command {
                PreviewCommand::Seek(t) => *clock = t,
                PreviewCommand::SetRate(r) => *rate = r,
                PreviewCommand::Pause => *paused = true,
            }
        }
    };

    apply(controller.start(), &mut clock, &mut rate, &mut paused);
    paused = false;
    assert_eq!(rate, 6.0);
    assert_eq!(clock, 0.0);

    // Advance the clock in coarse ticks and record which segments play
    let mut visited = Vec::new();
    for _ in 0..200 {
        if paused {
            break;
        }
        if let Some(idx) = controller.current_segment() {
            if visited.last() != Some(&idx) {
                visited.push(idx);
            }
        }
        clock += 0.25 * rate / 6.0;
        apply(controller.on_tick(clock), &mut clock, &mut rate, &mut paused);
    }

    assert_eq!(visited, vec![0, 1]);
    assert!(!controller.is_playing());
    assert!(paused);
    assert_eq!(rate, 1.0);
}

#[test]
fn test_streams_missing_from_disk_do_not_block_playback() {
    // Only subtitles available: every other view is empty, ticks still work
    let model = SessionBuilder::new(ViewerConfig::default())
        .subtitles("1\n00:00:00,000 --> 00:00:03,000\nonly stream\n")
        .build();

    let active = model.tick(1.0);
    assert_eq!(active.cue, Some(0));
    assert_eq!(active.phase, None);
    assert_eq!(active.category_segment, None);
    assert_eq!(active.standing, None);
    assert_eq!(active.gaze_point, None);
    assert!(model.preview_segments.is_empty());
}
