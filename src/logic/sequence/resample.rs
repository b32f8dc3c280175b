//! Sequence Resampler
//!
//! Maps an arbitrary-length list of normalized frames onto exactly `T`
//! frames by linear index mapping `i_src = i * (L - 1) / (T - 1)`.
//!
//! The mapping is computed with integer arithmetic (quotient + remainder),
//! so integral source positions are copied verbatim and the output is
//! reproducible bit-for-bit for identical input.
//!
//! A hand present in only one bracketing frame comes from the nearer
//! frame; the midpoint counts as nearer to the earlier frame.

use super::Sequence;
use crate::logic::error::{MotionError, MotionResult};
use crate::logic::landmarks::{Handedness, Landmark, NormalizedFrame, NormalizedHand, LANDMARK_COUNT};

/// Resample `frames` to exactly `target` frames
pub fn resample(frames: &[NormalizedFrame], target: usize) -> MotionResult<Sequence> {
    if frames.is_empty() {
        return Err(MotionError::EmptyInputSequence);
    }
    if target == 0 {
        return Err(MotionError::InvalidTargetLength);
    }

    if target == 1 {
        return Ok(Sequence::from_resampled(vec![frames[0].clone()]));
    }

    let last = frames.len() - 1;
    let denom = target - 1;

    let resampled = (0..target)
        .map(|i| {
            let numer = i * last;
            let lo = numer / denom;
            let rem = numer % denom;

            if rem == 0 {
                frames[lo].clone()
            } else {
                let t = rem as f32 / denom as f32;
                let nearer_lo = rem * 2 <= denom;
                interpolate_frame(&frames[lo], &frames[lo + 1], t, nearer_lo)
            }
        })
        .collect();

    Ok(Sequence::from_resampled(resampled))
}

/// Interpolate between two bracketing frames, `0 < t < 1`
fn interpolate_frame(a: &NormalizedFrame, b: &NormalizedFrame, t: f32, nearer_a: bool) -> NormalizedFrame {
    let span = b.timestamp_ms.saturating_sub(a.timestamp_ms);
    let timestamp_ms = a.timestamp_ms + (span as f64 * t as f64).round() as u64;

    let hands = Handedness::ALL
        .iter()
        .filter_map(|&tag| match (a.hand(tag), b.hand(tag)) {
            (Some(ha), Some(hb)) => Some(interpolate_hand(ha, hb, t)),
            // one side only: taken unmodified, if that side is the nearer one
            (Some(h), None) if nearer_a => Some(h.clone()),
            (None, Some(h)) if !nearer_a => Some(h.clone()),
            _ => None,
        })
        .collect();

    NormalizedFrame { timestamp_ms, hands }
}

fn interpolate_hand(a: &NormalizedHand, b: &NormalizedHand, t: f32) -> NormalizedHand {
    let mut landmarks = [Landmark::ORIGIN; LANDMARK_COUNT];
    for (i, slot) in landmarks.iter_mut().enumerate() {
        *slot = a.landmarks[i].lerp(&b.landmarks[i], t);
    }

    NormalizedHand {
        handedness: a.handedness,
        landmarks,
        score: a.score + (b.score - a.score) * t,
    }
}
