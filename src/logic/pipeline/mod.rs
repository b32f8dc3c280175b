//! Motion Pipeline - The single per-frame processing lane
//!
//! ```text
//! Frame → normalize ─┬─ recording active → RecordingSession
//!                    └─ otherwise → RecognitionEngine → CooldownTracker → ActionMapper
//! ```
//!
//! Recording pre-empts recognition: while a session is active the engine
//! sees no frames, and its buffer is cleared on both mode switches so a
//! window never spans the two modes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::action::{ActionMapper, ActionOutcome, Profile, ProfileHandle};
use super::clock::Clock;
use super::config::{MotionConfig, RecordingConfig};
use super::debounce::{CooldownTracker, TriggerEvent};
use super::error::{MotionError, MotionResult};
use super::landmarks::{normalize_frame, Frame};
use super::model::MatchingBackend;
use super::recognition::{Candidate, EngineStatus, RecognitionEngine};
use super::recording::{PersistenceHandle, RecordingEvent, RecordingSession};


// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    Recognition,
    Recording,
}

/// Everything one frame produced
#[derive(Debug, Default)]
pub struct FrameOutcome {
    pub candidate: Option<Candidate>,
    pub trigger: Option<TriggerEvent>,
    pub action: Option<ActionOutcome>,
    /// Injection failures; the frame itself was processed
    pub action_error: Option<MotionError>,
    pub recording_events: Vec<RecordingEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub mode: PipelineMode,
    pub engine: EngineStatus,
    pub frames_processed: u64,
    pub frames_rejected: u64,
    pub triggers: u64,
    pub cooldown_ms: u64,
    pub active_profile: String,
    pub recording_state: Option<String>,
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct MotionPipeline {
    engine: RecognitionEngine,
    debounce: CooldownTracker,
    mapper: ActionMapper,
    recording: Option<RecordingSession>,
    recording_config: RecordingConfig,
    clock: Arc<dyn Clock>,
    persistence: Option<PersistenceHandle>,
    frames_processed: u64,
    frames_rejected: u64,
}

impl MotionPipeline {
    pub fn new(
        config: &MotionConfig,
        backend: Box<dyn MatchingBackend>,
        mapper: ActionMapper,
        clock: Arc<dyn Clock>,
    ) -> MotionResult<Self> {
        config.validate()?;

        Ok(Self {
            engine: RecognitionEngine::new(&config.recognition, backend)?,
            debounce: CooldownTracker::new(config.debounce.cooldown_ms),
            mapper,
            recording: None,
            recording_config: config.recording.clone(),
            clock,
            persistence: None,
            frames_processed: 0,
            frames_rejected: 0,
        })
    }

    /// Hand completed recordings to a persistence worker
    pub fn with_persistence(mut self, handle: PersistenceHandle) -> Self {
        self.persistence = Some(handle);
        self
    }

    pub fn mode(&self) -> PipelineMode {
        if self.recording.is_some() {
            PipelineMode::Recording
        } else {
            PipelineMode::Recognition
        }
    }

    /// Process one frame in arrival order. A malformed frame is rejected
    /// with an error and leaves every buffer untouched.
    pub fn process_frame(&mut self, frame: Frame) -> MotionResult<FrameOutcome> {
        let normalized = match normalize_frame(&frame) {
            Ok(nf) => nf,
            Err(e) => {
                self.frames_rejected += 1;
                log::debug!("Frame at {}ms rejected: {}", frame.timestamp_ms, e);
                return Err(e);
            }
        };
        self.frames_processed += 1;

        let mut outcome = FrameOutcome::default();

        if let Some(session) = self.recording.as_mut() {
            let now = self.clock.now_ms();
            outcome.recording_events = session.push_frame(normalized, now);
            self.settle_recording(&outcome.recording_events);
            return Ok(outcome);
        }

        let Some(candidate) = self.engine.push(normalized) else {
            return Ok(outcome);
        };

        if let Some(trigger) = self.debounce.offer(&candidate) {
            match self.mapper.handle(&trigger) {
                Ok(action) => outcome.action = Some(action),
                Err(e) => {
                    log::warn!("Action for '{}' failed: {}", trigger.label, e);
                    outcome.action_error = Some(e);
                }
            }
            outcome.trigger = Some(trigger);
        }
        outcome.candidate = Some(candidate);

        Ok(outcome)
    }

    /// Drive recording timers when no frames arrive
    pub fn tick(&mut self) -> Vec<RecordingEvent> {
        let Some(session) = self.recording.as_mut() else {
            return Vec::new();
        };

        let events = session.advance(self.clock.now_ms());
        self.settle_recording(&events);
        events
    }

    // ------------------------------------------------------------------------
    // Recording control
    // ------------------------------------------------------------------------

    pub fn start_recording(&mut self, label: &str) -> MotionResult<RecordingEvent> {
        if self.recording.is_some() {
            return Err(MotionError::RecordingInProgress);
        }

        let mut session =
            RecordingSession::new(label, self.recording_config.clone(), self.engine.target_frames());
        let event = session.start(self.clock.now_ms())?;

        self.engine.clear();
        self.recording = Some(session);
        log::info!("Pipeline → recording '{}'", label);
        Ok(event)
    }

    /// Stop the active session. Repetitions already saved are completed
    /// and persisted like a finished recording.
    pub fn cancel_recording(&mut self) -> MotionResult<RecordingEvent> {
        let mut session = self.recording.take().ok_or(MotionError::NoActiveRecording)?;
        self.engine.clear();
        log::info!("Pipeline → recognition (recording '{}' cancelled)", session.label());

        let event = session.cancel().ok_or(MotionError::NoActiveRecording)?;
        self.persist(&event);
        Ok(event)
    }

    pub fn recording_session(&self) -> Option<&RecordingSession> {
        self.recording.as_ref()
    }

    /// Persist a completed recording and end the session once terminal
    fn settle_recording(&mut self, events: &[RecordingEvent]) {
        for event in events {
            self.persist(event);
        }

        if self.recording.as_ref().map_or(false, RecordingSession::is_finished) {
            if let Some(session) = self.recording.take() {
                log::info!(
                    "Pipeline → recognition (recording '{}' {})",
                    session.label(),
                    session.state().name()
                );
            }
            self.engine.clear();
        }
    }

    fn persist(&self, event: &RecordingEvent) {
        let (Some(handle), RecordingEvent::Completed(recording)) = (&self.persistence, event) else {
            return;
        };
        if let Err(e) = handle.submit(recording.clone()) {
            log::error!("Recording '{}' not persisted: {}", recording.gesture_name, e);
        }
    }

    // ------------------------------------------------------------------------
    // Tuning & hot swaps
    // ------------------------------------------------------------------------

    pub fn set_confidence_threshold(&mut self, threshold: f32) {
        self.engine.set_confidence_threshold(threshold);
    }

    pub fn set_cooldown_ms(&mut self, cooldown_ms: u64) {
        self.debounce.set_cooldown_ms(cooldown_ms);
    }

    pub fn reset_cooldowns(&mut self) {
        self.debounce.reset();
    }

    pub fn reload_profile(&self, profile: Profile) -> Arc<Profile> {
        self.mapper.reload(profile)
    }

    pub fn profile_handle(&self) -> ProfileHandle {
        self.mapper.profile_handle()
    }

    pub fn replace_backend(&mut self, backend: Box<dyn MatchingBackend>) {
        self.engine.replace_backend(backend);
        self.engine.clear();
    }

    pub fn engine(&self) -> &RecognitionEngine {
        &self.engine
    }

    pub fn status(&self) -> PipelineStatus {
        PipelineStatus {
            mode: self.mode(),
            engine: self.engine.status(),
            frames_processed: self.frames_processed,
            frames_rejected: self.frames_rejected,
            triggers: self.debounce.stats().triggered,
            cooldown_ms: self.debounce.cooldown_ms(),
            active_profile: self.mapper.active_profile().name.clone(),
            recording_state: self.recording.as_ref().map(|s| s.state().name().to_string()),
        }
    }
}
