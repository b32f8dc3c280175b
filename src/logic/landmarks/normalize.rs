//! Frame Normalizer
//!
//! Translates every hand so that its wrist (landmark 0) is the origin.
//! Scale is untouched. Each hand uses its own wrist.

use super::layout::{LANDMARK_COUNT, WRIST_INDEX};
use super::types::{Frame, Hand, Landmark, NormalizedFrame, NormalizedHand};
use crate::logic::error::{MotionError, MotionResult};

/// Normalize a single hand
pub fn normalize_hand(hand: &Hand) -> MotionResult<NormalizedHand> {
    if hand.landmarks.len() != LANDMARK_COUNT {
        return Err(MotionError::InvalidLandmarkCount {
            expected: LANDMARK_COUNT,
            actual: hand.landmarks.len(),
        });
    }

    let wrist = hand.landmarks[WRIST_INDEX];
    let mut landmarks = [Landmark::ORIGIN; LANDMARK_COUNT];
    for (slot, landmark) in landmarks.iter_mut().zip(hand.landmarks.iter()) {
        *slot = landmark.relative_to(&wrist);
    }

    Ok(NormalizedHand {
        handedness: hand.handedness,
        landmarks,
        score: hand.score,
    })
}

/// Normalize every hand of a frame.
/// The whole frame is rejected if any hand is malformed.
pub fn normalize_frame(frame: &Frame) -> MotionResult<NormalizedFrame> {
    frame.validate_handedness()?;

    let mut hands = frame
        .hands
        .iter()
        .map(normalize_hand)
        .collect::<MotionResult<Vec<_>>>()?;
    hands.sort_by_key(|h| h.handedness);

    Ok(NormalizedFrame {
        timestamp_ms: frame.timestamp_ms,
        hands,
    })
}
