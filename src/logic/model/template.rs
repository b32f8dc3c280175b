//! Template Matcher - Nearest recorded sequence per label
//!
//! Distance between two sequences is the mean per-landmark Euclidean
//! distance over aligned frames, hands matched by handedness. A hand seen
//! on one side only costs `MISSING_HAND_PENALTY`. Frames where neither side
//! has a hand are skipped; a pair with nothing to compare never matches.
//!
//! Confidence = `exp(-distance / distance_scale)`, best template per label.

use std::collections::BTreeMap;

use super::{BackendError, MatchingBackend, Scores};
use crate::logic::error::MotionResult;
use crate::logic::landmarks::{Handedness, NormalizedFrame, NormalizedHand};
use crate::logic::recording::RecordedGesture;
use crate::logic::sequence::{resample, Sequence};

/// Distance charged for a hand present in only one of the two frames
pub const MISSING_HAND_PENALTY: f32 = 1.0;

/// Default distance scale (image-relative units)
pub const DEFAULT_DISTANCE_SCALE: f32 = 0.05;

pub struct TemplateMatcher {
    templates: BTreeMap<String, Vec<Sequence>>,
    target_frames: usize,
    distance_scale: f32,
}

impl TemplateMatcher {
    pub fn new(target_frames: usize, distance_scale: f32) -> Self {
        Self {
            templates: BTreeMap::new(),
            target_frames: target_frames.max(1),
            distance_scale: if distance_scale > 0.0 { distance_scale } else { DEFAULT_DISTANCE_SCALE },
        }
    }

    /// Build from recorded gestures, one template per recorded sequence
    pub fn from_recordings(
        recordings: &[RecordedGesture],
        target_frames: usize,
        distance_scale: f32,
    ) -> MotionResult<Self> {
        let mut matcher = Self::new(target_frames, distance_scale);
        for recording in recordings {
            for sequence in &recording.sequences {
                matcher.add_template(&recording.gesture_name, sequence.clone())?;
            }
        }
        log::info!(
            "Template matcher loaded {} templates for {} labels",
            matcher.template_count(),
            matcher.templates.len()
        );
        Ok(matcher)
    }

    /// Add a template, resampling it to the matcher's frame count if needed
    pub fn add_template(&mut self, label: &str, sequence: Sequence) -> MotionResult<()> {
        let sequence = if sequence.len() == self.target_frames {
            sequence
        } else {
            resample(sequence.frames(), self.target_frames)?
        };
        self.templates.entry(label.to_string()).or_default().push(sequence);
        Ok(())
    }

    pub fn template_count(&self) -> usize {
        self.templates.values().map(Vec::len).sum()
    }

    fn confidence(&self, distance: f32) -> f32 {
        (-distance / self.distance_scale).exp()
    }
}

impl MatchingBackend for TemplateMatcher {
    fn name(&self) -> &str {
        "template"
    }

    fn evaluate(&mut self, sequence: &Sequence) -> Result<Scores, BackendError> {
        if self.templates.is_empty() {
            return Err(BackendError("no templates loaded".to_string()));
        }

        let resampled;
        let input = if sequence.len() == self.target_frames {
            sequence
        } else {
            resampled = resample(sequence.frames(), self.target_frames)
                .map_err(|e| BackendError(e.to_string()))?;
            &resampled
        };

        let scores = self
            .templates
            .iter()
            .map(|(label, templates)| {
                let best = templates
                    .iter()
                    .filter_map(|t| sequence_distance(input, t))
                    .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |a| a.min(d))));
                let confidence = best.map_or(0.0, |d| self.confidence(d));
                (label.clone(), confidence)
            })
            .collect();

        Ok(scores)
    }

    fn labels(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }
}

// ============================================================================
// DISTANCE
// ============================================================================

/// Mean aligned distance, `None` when no frame pair has a hand to compare
pub fn sequence_distance(a: &Sequence, b: &Sequence) -> Option<f32> {
    let mut total = 0.0f32;
    let mut count = 0usize;

    for (fa, fb) in a.frames().iter().zip(b.frames()) {
        if let Some(d) = frame_distance(fa, fb) {
            total += d;
            count += 1;
        }
    }

    if count > 0 {
        Some(total / count as f32)
    } else {
        None
    }
}

fn frame_distance(a: &NormalizedFrame, b: &NormalizedFrame) -> Option<f32> {
    let mut total = 0.0f32;
    let mut hands = 0usize;

    for tag in Handedness::ALL {
        match (a.hand(tag), b.hand(tag)) {
            (Some(ha), Some(hb)) => {
                total += hand_distance(ha, hb);
                hands += 1;
            }
            (Some(_), None) | (None, Some(_)) => {
                total += MISSING_HAND_PENALTY;
                hands += 1;
            }
            (None, None) => {}
        }
    }

    if hands > 0 {
        Some(total / hands as f32)
    } else {
        None
    }
}

fn hand_distance(a: &NormalizedHand, b: &NormalizedHand) -> f32 {
    let sum: f32 = a
        .landmarks
        .iter()
        .zip(b.landmarks.iter())
        .map(|(la, lb)| la.distance(lb))
        .sum();
    sum / a.landmarks.len() as f32
}
