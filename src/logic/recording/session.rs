//! Recording Session - Countdown → Capturing → PostProcessing, N times
//!
//! Windows are scheduled back to back from the session start, so a late
//! `advance` call never stretches a capture window. Time comes from the
//! caller; nothing here sleeps or reads the wall clock.

use std::mem;

use uuid::Uuid;

use super::record::RecordedGesture;
use crate::logic::config::RecordingConfig;
use crate::logic::error::{MotionError, MotionResult};
use crate::logic::landmarks::NormalizedFrame;
use crate::logic::sequence::{resample, Sequence};

// ============================================================================
// STATE & EVENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Countdown { repetition: usize, until_ms: u64 },
    Capturing { repetition: usize, until_ms: u64 },
    PostProcessing { repetition: usize },
    Saved,
    Failed,
}

impl RecordingState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordingState::Saved | RecordingState::Failed)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordingState::Idle => "idle",
            RecordingState::Countdown { .. } => "countdown",
            RecordingState::Capturing { .. } => "capturing",
            RecordingState::PostProcessing { .. } => "post_processing",
            RecordingState::Saved => "saved",
            RecordingState::Failed => "failed",
        }
    }
}

#[derive(Debug)]
pub enum RecordingEvent {
    CountdownStarted { repetition: usize },
    CaptureStarted { repetition: usize },
    RepetitionSaved { repetition: usize, captured_frames: usize },
    RepetitionFailed { repetition: usize, error: MotionError },
    /// Session over (or cancelled) with at least one sequence recorded
    Completed(RecordedGesture),
    /// Session over without a usable sequence
    Failed(MotionError),
}

// ============================================================================
// SESSION
// ============================================================================

pub struct RecordingSession {
    id: Uuid,
    label: String,
    config: RecordingConfig,
    target_frames: usize,
    state: RecordingState,
    captured: Vec<NormalizedFrame>,
    sequences: Vec<Sequence>,
    max_captured: usize,
}

impl RecordingSession {
    pub fn new(label: &str, config: RecordingConfig, target_frames: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.to_string(),
            config,
            target_frames,
            state: RecordingState::Idle,
            captured: Vec::new(),
            sequences: Vec::new(),
            max_captured: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn sequences_recorded(&self) -> usize {
        self.sequences.len()
    }

    pub fn current_frame_count(&self) -> usize {
        self.captured.len()
    }

    /// Idle → Countdown for the first repetition
    pub fn start(&mut self, now_ms: u64) -> MotionResult<RecordingEvent> {
        if self.state != RecordingState::Idle {
            return Err(MotionError::RecordingInProgress);
        }

        log::info!(
            "Recording '{}' started ({} repetitions, session {})",
            self.label,
            self.config.repetitions,
            self.id
        );
        self.state = RecordingState::Countdown {
            repetition: 0,
            until_ms: now_ms + self.config.countdown_ms,
        };
        Ok(RecordingEvent::CountdownStarted { repetition: 0 })
    }

    /// Apply every time-driven transition due at `now_ms`
    pub fn advance(&mut self, now_ms: u64) -> Vec<RecordingEvent> {
        let mut events = Vec::new();

        loop {
            match self.state {
                RecordingState::Countdown { repetition, until_ms } if now_ms >= until_ms => {
                    log::debug!("Recording '{}' capture {} begins", self.label, repetition + 1);
                    self.captured.clear();
                    self.state = RecordingState::Capturing {
                        repetition,
                        until_ms: until_ms + self.config.capture_ms,
                    };
                    events.push(RecordingEvent::CaptureStarted { repetition });
                }
                RecordingState::Capturing { repetition, until_ms } if now_ms >= until_ms => {
                    self.state = RecordingState::PostProcessing { repetition };
                    events.push(self.post_process(repetition));

                    if repetition + 1 < self.config.repetitions {
                        self.state = RecordingState::Countdown {
                            repetition: repetition + 1,
                            until_ms: until_ms + self.config.countdown_ms,
                        };
                        events.push(RecordingEvent::CountdownStarted { repetition: repetition + 1 });
                    } else {
                        events.push(self.finish());
                    }
                }
                _ => break,
            }
        }

        events
    }

    /// Feed a frame. Only frames with at least one hand are kept, and only
    /// while capturing.
    pub fn push_frame(&mut self, frame: NormalizedFrame, now_ms: u64) -> Vec<RecordingEvent> {
        let events = self.advance(now_ms);

        if let RecordingState::Capturing { .. } = self.state {
            if frame.has_hands() {
                self.captured.push(frame);
            }
        }

        events
    }

    /// Abort from any state. Frames of the repetition in progress are
    /// dropped; repetitions already saved are kept and completed.
    pub fn cancel(&mut self) -> Option<RecordingEvent> {
        if self.state.is_terminal() {
            return None;
        }

        log::info!(
            "Recording '{}' cancelled in state {} ({} sequences kept)",
            self.label,
            self.state.name(),
            self.sequences.len()
        );
        self.captured.clear();

        if self.sequences.is_empty() {
            self.state = RecordingState::Failed;
            return Some(RecordingEvent::Failed(MotionError::RecordingCancelled));
        }
        Some(self.complete())
    }

    fn post_process(&mut self, repetition: usize) -> RecordingEvent {
        let frames = mem::take(&mut self.captured);
        let captured_frames = frames.len();
        self.max_captured = self.max_captured.max(captured_frames);

        let result = if frames.is_empty() {
            Err(MotionError::NoHandDetected)
        } else if captured_frames < self.config.min_capture_frames {
            Err(MotionError::InsufficientFrames {
                captured: captured_frames,
                required: self.config.min_capture_frames,
            })
        } else {
            resample(&frames, self.target_frames)
        };

        match result {
            Ok(sequence) => {
                self.sequences.push(sequence);
                log::info!(
                    "Recording '{}' repetition {}/{} saved ({} frames → {})",
                    self.label,
                    repetition + 1,
                    self.config.repetitions,
                    captured_frames,
                    self.target_frames
                );
                RecordingEvent::RepetitionSaved { repetition, captured_frames }
            }
            Err(error) => {
                log::warn!(
                    "Recording '{}' repetition {}/{} failed: {}",
                    self.label,
                    repetition + 1,
                    self.config.repetitions,
                    error
                );
                RecordingEvent::RepetitionFailed { repetition, error }
            }
        }
    }

    fn finish(&mut self) -> RecordingEvent {
        if self.sequences.is_empty() {
            self.state = RecordingState::Failed;
            let error = if self.max_captured == 0 {
                MotionError::NoHandDetected
            } else {
                MotionError::InsufficientFrames {
                    captured: self.max_captured,
                    required: self.config.min_capture_frames,
                }
            };
            log::warn!("Recording '{}' failed: {}", self.label, error);
            return RecordingEvent::Failed(error);
        }

        self.complete()
    }

    fn complete(&mut self) -> RecordingEvent {
        self.state = RecordingState::Saved;
        let sequences = mem::take(&mut self.sequences);
        log::info!("Recording '{}' complete: {} sequences", self.label, sequences.len());
        RecordingEvent::Completed(RecordedGesture::new(&self.label, self.target_frames, sequences, self.id))
    }
}
