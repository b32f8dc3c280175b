//! Recording pipeline tests

use std::fs;

use tempfile::tempdir;
use uuid::Uuid;

use super::*;
use crate::logic::config::RecordingConfig;
use crate::logic::error::MotionError;
use crate::logic::landmarks::{NormalizedFrame, FORMAT_VERSION};
use crate::logic::sequence::resample;
use crate::logic::testing::{flat_frame, normalized, wave_stream};

fn config(repetitions: usize) -> RecordingConfig {
    RecordingConfig {
        countdown_ms: 3000,
        capture_ms: 3000,
        repetitions,
        min_capture_frames: 5,
    }
}

/// Feed frames every `step` ms over `[from, to)`, collecting events
fn feed(
    session: &mut RecordingSession,
    from: u64,
    to: u64,
    step: u64,
    with_hands: bool,
) -> Vec<RecordingEvent> {
    let mut events = Vec::new();
    let mut t = from;
    while t < to {
        let frame = if with_hands {
            flat_frame(t, 0.1)
        } else {
            NormalizedFrame { timestamp_ms: t, hands: Vec::new() }
        };
        events.extend(session.push_frame(frame, t));
        t += step;
    }
    events
}

fn sample_recording(label: &str, target: usize) -> RecordedGesture {
    let seq = resample(&normalized(&wave_stream(40, 0, 33)), target).unwrap();
    RecordedGesture::new(label, target, vec![seq.clone(), seq], Uuid::new_v4())
}

// ============================================================================
// SESSION STATE MACHINE
// ============================================================================

#[test]
fn test_session_happy_path() {
    let mut session = RecordingSession::new("wave", config(1), 60);
    assert_eq!(*session.state(), RecordingState::Idle);

    session.start(0).unwrap();
    assert!(matches!(session.state(), RecordingState::Countdown { repetition: 0, until_ms: 3000 }));

    // countdown: frames ignored
    feed(&mut session, 0, 3000, 100, true);
    assert_eq!(session.current_frame_count(), 0);

    // capture window 3000..6000 at 30 fps
    let events = feed(&mut session, 3000, 6000, 33, true);
    assert!(matches!(events[0], RecordingEvent::CaptureStarted { repetition: 0 }));
    assert!(matches!(session.state(), RecordingState::Capturing { .. }));
    assert_eq!(session.current_frame_count(), 91);

    let events = session.advance(6000);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], RecordingEvent::RepetitionSaved { repetition: 0, captured_frames: 91 }));
    match &events[1] {
        RecordingEvent::Completed(recording) => {
            assert_eq!(recording.gesture_name, "wave");
            assert_eq!(recording.num_sequences, 1);
            assert_eq!(recording.sequences[0].len(), 60);
            assert_eq!(recording.metadata.session_id, session.id());
            assert!(recording.validate().is_ok());
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(*session.state(), RecordingState::Saved);
    assert!(session.is_finished());
}

#[test]
fn test_no_hands_fails_with_no_hand_detected() {
    let mut session = RecordingSession::new("ghost", config(1), 60);
    session.start(0).unwrap();

    let mut events = feed(&mut session, 0, 6000, 33, false);
    events.extend(session.advance(6000));

    assert!(events.iter().any(|e| matches!(
        e,
        RecordingEvent::RepetitionFailed { error: MotionError::NoHandDetected, .. }
    )));
    assert!(matches!(events.last(), Some(RecordingEvent::Failed(MotionError::NoHandDetected))));
    assert!(!events.iter().any(|e| matches!(e, RecordingEvent::Completed(_))));
    assert_eq!(*session.state(), RecordingState::Failed);
}

#[test]
fn test_failed_repetition_keeps_prior_ones() {
    let mut session = RecordingSession::new("wave", config(3), 30);
    session.start(0).unwrap();

    let mut events = Vec::new();
    // rep 0 capture 3000..6000 with hands
    events.extend(feed(&mut session, 0, 6000, 50, true));
    // rep 1 countdown 6000..9000, capture 9000..12000 without hands
    events.extend(feed(&mut session, 6000, 12000, 50, false));
    // rep 2 countdown 12000..15000, capture 15000..18000 with hands
    events.extend(feed(&mut session, 12000, 18000, 50, true));
    events.extend(session.advance(18000));

    let saved = events.iter().filter(|e| matches!(e, RecordingEvent::RepetitionSaved { .. })).count();
    let failed = events.iter().filter(|e| matches!(e, RecordingEvent::RepetitionFailed { .. })).count();
    assert_eq!(saved, 2);
    assert_eq!(failed, 1);

    match events.last() {
        Some(RecordingEvent::Completed(recording)) => {
            assert_eq!(recording.num_sequences, 2);
            assert!(recording.sequences.iter().all(|s| s.len() == 30));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_too_few_frames() {
    let mut session = RecordingSession::new("short", config(1), 30);
    session.start(0).unwrap();
    session.advance(3000);

    for t in [3000u64, 3100, 3200] {
        session.push_frame(flat_frame(t, 0.2), t);
    }
    let events = session.advance(6000);

    assert!(matches!(
        events[0],
        RecordingEvent::RepetitionFailed {
            error: MotionError::InsufficientFrames { captured: 3, required: 5 },
            ..
        }
    ));
    assert!(matches!(
        events[1],
        RecordingEvent::Failed(MotionError::InsufficientFrames { captured: 3, .. })
    ));
}

#[test]
fn test_late_tick_runs_all_due_transitions() {
    let mut session = RecordingSession::new("late", config(2), 30);
    session.start(0).unwrap();

    // nothing arrives until long after both windows closed
    let events = session.advance(60_000);
    let names: Vec<&str> = events
        .iter()
        .map(|e| match e {
            RecordingEvent::CountdownStarted { .. } => "countdown",
            RecordingEvent::CaptureStarted { .. } => "capture",
            RecordingEvent::RepetitionSaved { .. } => "saved",
            RecordingEvent::RepetitionFailed { .. } => "rep_failed",
            RecordingEvent::Completed(_) => "completed",
            RecordingEvent::Failed(_) => "failed",
        })
        .collect();
    assert_eq!(names, vec!["capture", "rep_failed", "countdown", "capture", "rep_failed", "failed"]);
}

#[test]
fn test_cancel_from_capturing() {
    let mut session = RecordingSession::new("wave", config(2), 30);
    session.start(0).unwrap();
    feed(&mut session, 0, 4000, 33, true);
    assert!(session.current_frame_count() > 0);

    let event = session.cancel();
    assert!(matches!(event, Some(RecordingEvent::Failed(MotionError::RecordingCancelled))));
    assert_eq!(*session.state(), RecordingState::Failed);
    assert_eq!(session.current_frame_count(), 0);

    // terminal: nothing more happens
    assert!(session.cancel().is_none());
    assert!(session.advance(100_000).is_empty());
}

#[test]
fn test_cancel_keeps_saved_repetitions() {
    let mut session = RecordingSession::new("wave", config(3), 30);
    session.start(0).unwrap();

    // repetitions 1 and 2 captured, third countdown running
    let mut events = feed(&mut session, 0, 12000, 33, true);
    events.extend(session.advance(12000));
    assert_eq!(session.sequences_recorded(), 2);
    assert!(events.iter().all(|e| !matches!(e, RecordingEvent::Completed(_))));

    match session.cancel() {
        Some(RecordingEvent::Completed(recording)) => {
            assert_eq!(recording.gesture_name, "wave");
            assert_eq!(recording.num_sequences, 2);
            assert!(recording.sequences.iter().all(|s| s.len() == 30));
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(*session.state(), RecordingState::Saved);
    assert!(session.cancel().is_none());
}

#[test]
fn test_cancel_mid_capture_drops_only_current_frames() {
    let mut session = RecordingSession::new("wave", config(2), 30);
    session.start(0).unwrap();

    // first repetition saved, second one half captured
    feed(&mut session, 0, 10500, 33, true);
    assert_eq!(session.sequences_recorded(), 1);
    assert!(session.current_frame_count() > 0);

    let event = session.cancel();
    assert!(matches!(event, Some(RecordingEvent::Completed(ref r)) if r.num_sequences == 1));
    assert_eq!(session.current_frame_count(), 0);
}

#[test]
fn test_cancel_from_idle_and_double_start() {
    let mut session = RecordingSession::new("wave", config(1), 30);
    session.start(0).unwrap();
    assert!(matches!(session.start(10), Err(MotionError::RecordingInProgress)));

    let mut idle = RecordingSession::new("idle", config(1), 30);
    assert!(idle.cancel().is_some());
}

// ============================================================================
// STORE
// ============================================================================

#[test]
fn test_store_save_and_load() {
    let dir = tempdir().unwrap();
    let store = RecordingStore::new(dir.path().to_path_buf());
    let recording = sample_recording("swipe left", 30);

    let saved = store.save(&recording).unwrap();
    assert!(saved.path.file_name().unwrap().to_str().unwrap().starts_with("swipe_left_"));
    assert_eq!(saved.checksum.len(), 64);
    assert_eq!(saved.checksum, store::file_checksum(&saved.path).unwrap());

    let loaded = store.load(&saved.path).unwrap();
    assert_eq!(loaded, recording);

    // file carries the training job's header fields
    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&saved.path).unwrap()).unwrap();
    assert_eq!(raw["gesture_name"], "swipe left");
    assert_eq!(raw["target_frames"], 30);
    assert_eq!(raw["normalized"], true);
    assert_eq!(raw["metadata"]["num_landmarks_per_hand"], 21);
    assert_eq!(raw["metadata"]["format_version"], FORMAT_VERSION);
}

#[test]
fn test_store_never_overwrites() {
    let dir = tempdir().unwrap();
    let store = RecordingStore::new(dir.path().to_path_buf());
    let recording = sample_recording("wave", 10);

    let a = store.save(&recording).unwrap();
    let b = store.save(&recording).unwrap();
    assert_ne!(a.path, b.path);
    assert_eq!(store.list().unwrap().len(), 2);
}

#[test]
fn test_load_rejects_layout_mismatch() {
    let dir = tempdir().unwrap();
    let store = RecordingStore::new(dir.path().to_path_buf());
    let mut recording = sample_recording("wave", 10);
    recording.metadata.layout_hash ^= 0xFFFF;

    let saved = store.save(&recording).unwrap();
    assert!(matches!(store.load(&saved.path), Err(MotionError::LayoutMismatch { .. })));
    // load_all skips it
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn test_load_rejects_wrong_sequence_length() {
    let mut recording = sample_recording("wave", 10);
    recording.target_frames = 12;
    assert!(matches!(recording.validate(), Err(MotionError::MalformedRecording(_))));
}

#[test]
fn test_export_jsonl() {
    let dir = tempdir().unwrap();
    let store = RecordingStore::new(dir.path().join("recordings"));
    store.save(&sample_recording("wave", 10)).unwrap();
    store.save(&sample_recording("pinch", 10)).unwrap();

    let target = dir.path().join("export.jsonl");
    let count = export::to_jsonl(&store, &target).unwrap();
    assert_eq!(count, 2);

    let content = fs::read_to_string(&target).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    let first: RecordedGesture = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first.gesture_name, "pinch");
}

// ============================================================================
// PERSISTENCE WORKER
// ============================================================================

#[tokio::test]
async fn test_worker_saves_in_background() {
    let dir = tempdir().unwrap();
    let (handle, task) = worker::spawn(RecordingStore::new(dir.path().to_path_buf()));

    handle.submit(sample_recording("wave", 10)).unwrap();
    handle.submit(sample_recording("fist", 10)).unwrap();
    drop(handle);

    let saved = task.await.unwrap();
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|s| s.path.exists()));
}
