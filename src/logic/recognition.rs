//! Recognition Engine - Rolling buffer → best-label Candidate
//!
//! Every pushed frame that leaves at least `target_frame_count` frames in
//! the buffer triggers one evaluation of the most recent window. The
//! engine owns its buffer; the backend only ever sees resampled windows.
//!
//! ## Degraded mode
//! A backend error suspends Candidate emission until an evaluation
//! succeeds again or the backend is replaced. Errors never turn into
//! matches.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::config::RecognitionConfig;
use super::error::{MotionError, MotionResult};
use super::landmarks::NormalizedFrame;
use super::model::{best_label, MatchingBackend};
use super::sequence::{resample, RollingBuffer};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub confidence: f32,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub backend: String,
    pub degraded: bool,
    pub degraded_reason: Option<String>,
    pub evaluations: u64,
    pub candidates: u64,
    pub avg_latency_us: u64,
    pub buffered_frames: usize,
    pub target_frame_count: usize,
    pub confidence_threshold: f32,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RecognitionEngine {
    buffer: RollingBuffer,
    backend: Box<dyn MatchingBackend>,
    target_frames: usize,
    threshold: f32,
    degraded: Option<String>,
    evaluations: u64,
    candidates: u64,
    total_latency_us: u64,
}

impl RecognitionEngine {
    pub fn new(config: &RecognitionConfig, backend: Box<dyn MatchingBackend>) -> MotionResult<Self> {
        if config.target_frame_count == 0 {
            return Err(MotionError::InvalidTargetLength);
        }
        if config.buffer_capacity < config.target_frame_count {
            return Err(MotionError::InvalidConfig(format!(
                "buffer_capacity {} < target_frame_count {}",
                config.buffer_capacity, config.target_frame_count
            )));
        }

        log::info!(
            "Recognition engine ready: backend={}, T={}, threshold={}",
            backend.name(),
            config.target_frame_count,
            config.confidence_threshold
        );

        Ok(Self {
            buffer: RollingBuffer::new(config.buffer_capacity),
            backend,
            target_frames: config.target_frame_count,
            threshold: config.confidence_threshold.clamp(0.0, 1.0),
            degraded: None,
            evaluations: 0,
            candidates: 0,
            total_latency_us: 0,
        })
    }

    /// Buffer a frame and evaluate the latest window once enough frames exist
    pub fn push(&mut self, frame: NormalizedFrame) -> Option<Candidate> {
        let timestamp_ms = frame.timestamp_ms;
        self.buffer.push(frame);

        let window = self.buffer.latest(self.target_frames)?;
        let sequence = match resample(&window, self.target_frames) {
            Ok(seq) => seq,
            Err(e) => {
                log::error!("Window resample failed: {}", e);
                return None;
            }
        };

        let started = Instant::now();
        let result = self.backend.evaluate(&sequence);
        self.total_latency_us += started.elapsed().as_micros() as u64;
        self.evaluations += 1;

        let scores = match result {
            Ok(scores) => {
                if let Some(reason) = self.degraded.take() {
                    log::info!("Backend '{}' recovered (was: {})", self.backend.name(), reason);
                }
                scores
            }
            Err(e) => {
                if self.degraded.is_none() {
                    log::warn!("Backend '{}' unavailable, recognition suspended: {}", self.backend.name(), e);
                }
                self.degraded = Some(e.0);
                return None;
            }
        };

        let (label, confidence) = best_label(&scores)?;
        log::trace!("Best '{}' = {:.3} at {}ms", label, confidence, timestamp_ms);

        if confidence < self.threshold {
            return None;
        }

        self.candidates += 1;
        Some(Candidate {
            label: label.to_string(),
            confidence,
            timestamp_ms,
        })
    }

    pub fn set_confidence_threshold(&mut self, threshold: f32) {
        let clamped = if threshold.is_nan() { self.threshold } else { threshold.clamp(0.0, 1.0) };
        log::info!("Confidence threshold {} → {}", self.threshold, clamped);
        self.threshold = clamped;
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.threshold
    }

    pub fn target_frames(&self) -> usize {
        self.target_frames
    }

    /// Swap the backend; clears degraded mode
    pub fn replace_backend(&mut self, backend: Box<dyn MatchingBackend>) -> Box<dyn MatchingBackend> {
        log::info!("Backend '{}' → '{}'", self.backend.name(), backend.name());
        self.degraded = None;
        std::mem::replace(&mut self.backend, backend)
    }

    pub fn backend_labels(&self) -> Vec<String> {
        self.backend.labels()
    }

    /// Drop buffered frames (mode switches)
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    /// Degraded-mode signal as an error value
    pub fn degraded_error(&self) -> Option<MotionError> {
        self.degraded
            .as_ref()
            .map(|reason| MotionError::MatchingBackendUnavailable(reason.clone()))
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            backend: self.backend.name().to_string(),
            degraded: self.degraded.is_some(),
            degraded_reason: self.degraded.clone(),
            evaluations: self.evaluations,
            candidates: self.candidates,
            avg_latency_us: if self.evaluations > 0 {
                self.total_latency_us / self.evaluations
            } else {
                0
            },
            buffered_frames: self.buffer.len(),
            target_frame_count: self.target_frames,
            confidence_threshold: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::{BackendError, Scores};
    use crate::logic::sequence::Sequence;
    use crate::logic::testing::flat_frame;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Returns fixed scores, or fails while `fail` is set
    struct FixedBackend {
        scores: Scores,
        fail: Arc<AtomicBool>,
    }

    impl FixedBackend {
        fn new(entries: &[(&str, f32)]) -> (Self, Arc<AtomicBool>) {
            let fail = Arc::new(AtomicBool::new(false));
            let backend = Self {
                scores: entries.iter().map(|(l, s)| (l.to_string(), *s)).collect(),
                fail: Arc::clone(&fail),
            };
            (backend, fail)
        }
    }

    impl MatchingBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        fn evaluate(&mut self, sequence: &Sequence) -> Result<Scores, BackendError> {
            assert!(!sequence.is_empty());
            if self.fail.load(Ordering::SeqCst) {
                return Err(BackendError("model file missing".into()));
            }
            Ok(self.scores.clone())
        }

        fn labels(&self) -> Vec<String> {
            self.scores.keys().cloned().collect()
        }
    }

    fn config(target: usize, threshold: f32) -> RecognitionConfig {
        RecognitionConfig {
            target_frame_count: target,
            confidence_threshold: threshold,
            buffer_capacity: target * 2,
        }
    }

    fn make_engine(target: usize, threshold: f32, entries: &[(&str, f32)]) -> (RecognitionEngine, Arc<AtomicBool>) {
        let (backend, fail) = FixedBackend::new(entries);
        (RecognitionEngine::new(&config(target, threshold), Box::new(backend)).unwrap(), fail)
    }

    #[test]
    fn test_no_evaluation_until_window_full() {
        let (mut engine, _) = make_engine(5, 0.5, &[("wave", 0.9)]);
        for t in 0..4 {
            assert!(engine.push(flat_frame(t, 0.1)).is_none());
        }
        assert_eq!(engine.status().evaluations, 0);

        let candidate = engine.push(flat_frame(4, 0.1)).unwrap();
        assert_eq!(candidate.label, "wave");
        assert_eq!(candidate.timestamp_ms, 4);
        assert_eq!(engine.status().evaluations, 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let (mut engine, _) = make_engine(1, 0.7, &[("wave", 0.7)]);
        assert!(engine.push(flat_frame(0, 0.1)).is_some());

        let (mut engine, _) = make_engine(1, 0.7, &[("wave", 0.69)]);
        assert!(engine.push(flat_frame(0, 0.1)).is_none());
    }

    #[test]
    fn test_tie_breaks_lexicographically() {
        let (mut engine, _) = make_engine(1, 0.5, &[("zoom", 0.9), ("beta", 0.9), ("alpha", 0.9)]);
        assert_eq!(engine.push(flat_frame(0, 0.1)).unwrap().label, "alpha");
    }

    #[test]
    fn test_degraded_mode_and_recovery() {
        let (mut engine, fail) = make_engine(2, 0.5, &[("wave", 0.95)]);
        fail.store(true, Ordering::SeqCst);

        for t in 0..5 {
            assert!(engine.push(flat_frame(t, 0.1)).is_none());
        }
        assert!(engine.is_degraded());
        assert!(matches!(engine.degraded_error(), Some(MotionError::MatchingBackendUnavailable(_))));

        fail.store(false, Ordering::SeqCst);
        assert!(engine.push(flat_frame(5, 0.1)).is_some());
        assert!(!engine.is_degraded());
    }

    #[test]
    fn test_replace_backend_clears_degraded() {
        let (mut engine, fail) = make_engine(1, 0.5, &[("wave", 0.95)]);
        fail.store(true, Ordering::SeqCst);
        engine.push(flat_frame(0, 0.1));
        assert!(engine.is_degraded());

        let (backend, _) = FixedBackend::new(&[("pinch", 0.8)]);
        engine.replace_backend(Box::new(backend));
        assert!(!engine.is_degraded());
        assert_eq!(engine.push(flat_frame(1, 0.1)).unwrap().label, "pinch");
    }

    #[test]
    fn test_threshold_setter_clamps() {
        let (mut engine, _) = make_engine(1, 0.5, &[("wave", 0.95)]);
        engine.set_confidence_threshold(1.7);
        assert_eq!(engine.confidence_threshold(), 1.0);
        engine.set_confidence_threshold(-0.2);
        assert_eq!(engine.confidence_threshold(), 0.0);
        engine.set_confidence_threshold(f32::NAN);
        assert_eq!(engine.confidence_threshold(), 0.0);
    }

    #[test]
    fn test_window_is_latest_frames() {
        let (mut engine, _) = make_engine(3, 0.5, &[("wave", 0.95)]);
        for t in 0..10 {
            engine.push(flat_frame(t * 33, 0.1));
        }
        let status = engine.status();
        assert_eq!(status.buffered_frames, 6);
        assert_eq!(status.evaluations, 8);
        assert_eq!(status.candidates, 8);
        assert_eq!(status.backend, "fixed");
    }

    #[test]
    fn test_rejects_small_buffer() {
        let (backend, _) = FixedBackend::new(&[]);
        let bad = RecognitionConfig {
            target_frame_count: 10,
            confidence_threshold: 0.7,
            buffer_capacity: 5,
        };
        assert!(RecognitionEngine::new(&bad, Box::new(backend)).is_err());
    }
}
