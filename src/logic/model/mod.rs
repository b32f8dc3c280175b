//! Model Module - Matching backends
//!
//! The recognition engine only needs one capability from a backend:
//! given a Sequence, return a score per motion label.
//!
//! - `template` - Nearest-template distance over recorded sequences
//! - `onnx` - Trained classifier artifact (ONNX Runtime)
//! - `features` - Tensor layout shared with the offline training job

pub mod features;
pub mod template;

#[cfg(feature = "onnx")]
pub mod onnx;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::logic::sequence::Sequence;

pub use template::TemplateMatcher;

#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

/// Label → confidence in [0, 1]. Ordered by label.
pub type Scores = BTreeMap<String, f32>;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, Error)]
#[error("BackendError: {0}")]
pub struct BackendError(pub String);

// ============================================================================
// MATCHING BACKEND TRAIT
// ============================================================================

/// Capability consumed by the recognition engine
pub trait MatchingBackend: Send {
    /// Short identifier for status/logging
    fn name(&self) -> &str;

    /// Score a sequence against every known label
    fn evaluate(&mut self, sequence: &Sequence) -> Result<Scores, BackendError>;

    /// Labels this backend can produce
    fn labels(&self) -> Vec<String>;
}

/// Stand-in for a backend that failed to load. Every evaluation fails,
/// keeping the engine in degraded mode until a reload succeeds.
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl MatchingBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn evaluate(&mut self, _sequence: &Sequence) -> Result<Scores, BackendError> {
        Err(BackendError(self.reason.clone()))
    }

    fn labels(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Label with the highest score. Ties go to the lexicographically
/// smaller label; NaN scores are ignored.
pub fn best_label(scores: &Scores) -> Option<(&str, f32)> {
    let mut best: Option<(&str, f32)> = None;
    for (label, &score) in scores {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((label.as_str(), score)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(&str, f32)]) -> Scores {
        entries.iter().map(|(l, s)| (l.to_string(), *s)).collect()
    }

    #[test]
    fn test_best_label_max() {
        let s = scores(&[("wave", 0.4), ("pinch", 0.9), ("fist", 0.2)]);
        assert_eq!(best_label(&s), Some(("pinch", 0.9)));
    }

    #[test]
    fn test_best_label_tie_prefers_smaller_label() {
        let s = scores(&[("zoom", 0.8), ("alpha", 0.8), ("mid", 0.8)]);
        assert_eq!(best_label(&s), Some(("alpha", 0.8)));
    }

    #[test]
    fn test_best_label_ignores_nan() {
        let s = scores(&[("a", f32::NAN), ("b", 0.1)]);
        assert_eq!(best_label(&s), Some(("b", 0.1)));
        assert_eq!(best_label(&Scores::new()), None);
    }
}
