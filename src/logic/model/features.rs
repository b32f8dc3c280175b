//! Classifier Tensor Layout
//!
//! Per frame: Left hand slot then Right hand slot, each 21 landmarks of
//! (x, y, z). An absent hand is a zero-filled slot.
//! Must match the layout the offline training job flattens recordings to.

use crate::logic::landmarks::{Handedness, LANDMARK_COUNT};
use crate::logic::sequence::Sequence;

/// Floats per hand slot
pub const HAND_FEATURE_COUNT: usize = LANDMARK_COUNT * 3;

/// Floats per frame
pub const FRAME_FEATURE_COUNT: usize = HAND_FEATURE_COUNT * 2;

/// Flatten a sequence to `len * FRAME_FEATURE_COUNT` floats
pub fn flatten_sequence(sequence: &Sequence) -> Vec<f32> {
    let mut data = Vec::with_capacity(sequence.len() * FRAME_FEATURE_COUNT);

    for frame in sequence.frames() {
        for tag in Handedness::ALL {
            match frame.hand(tag) {
                Some(hand) => {
                    for lm in &hand.landmarks {
                        data.extend_from_slice(&[lm.x, lm.y, lm.z]);
                    }
                }
                None => data.extend(std::iter::repeat(0.0).take(HAND_FEATURE_COUNT)),
            }
        }
    }

    data
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|e| e / sum).collect()
    } else {
        vec![0.0; logits.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::sequence::resample;
    use crate::logic::testing::flat_frame;

    #[test]
    fn test_flatten_layout() {
        let seq = resample(&[flat_frame(0, 0.5)], 2).unwrap();
        let data = flatten_sequence(&seq);

        assert_eq!(data.len(), 2 * FRAME_FEATURE_COUNT);
        // Left slot absent
        assert!(data[..HAND_FEATURE_COUNT].iter().all(|v| *v == 0.0));
        // Right slot: wrist then 0.5s
        assert_eq!(&data[HAND_FEATURE_COUNT..HAND_FEATURE_COUNT + 3], &[0.0, 0.0, 0.0]);
        assert_eq!(data[HAND_FEATURE_COUNT + 3], 0.5);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }
}
