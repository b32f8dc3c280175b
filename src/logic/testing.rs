//! Shared fixtures for unit tests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::landmarks::{
    normalize_frame, Frame, Hand, Handedness, Landmark, NormalizedFrame, LANDMARK_COUNT,
};

/// A plausible open hand around `(cx, cy)`, fingers bent by `phase`
pub fn synthetic_hand(handedness: Handedness, cx: f32, cy: f32, phase: f32) -> Hand {
    let landmarks = (0..LANDMARK_COUNT)
        .map(|i| {
            if i == 0 {
                return Landmark::new(cx, cy, 0.0);
            }
            let finger = ((i - 1) / 4) as f32;
            let joint = ((i - 1) % 4 + 1) as f32;
            let spread = (finger - 2.0) * 0.03;
            Landmark::new(
                cx + spread + phase * 0.01 * joint,
                cy - 0.04 * joint * (1.0 - 0.5 * phase),
                -0.002 * joint,
            )
        })
        .collect();
    Hand::new(handedness, landmarks, 0.95)
}

/// Right hand waving from side to side over `len` frames
pub fn wave_stream(len: usize, start_ms: u64, step_ms: u64) -> Vec<Frame> {
    (0..len)
        .map(|i| {
            let t = i as f32 / len.max(1) as f32;
            let phase = (t * std::f32::consts::TAU).sin();
            Frame::new(
                start_ms + i as u64 * step_ms,
                vec![synthetic_hand(Handedness::Right, 0.5 + 0.1 * phase, 0.6, phase.abs())],
            )
        })
        .collect()
}

/// Hands with uniformly random landmarks
pub fn random_stream(len: usize, start_ms: u64, step_ms: u64, seed: u64) -> Vec<Frame> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|i| {
            let landmarks = (0..LANDMARK_COUNT)
                .map(|_| Landmark::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen_range(-0.1..0.1)))
                .collect();
            Frame::new(
                start_ms + i as u64 * step_ms,
                vec![Hand::new(Handedness::Right, landmarks, 0.9)],
            )
        })
        .collect()
}

pub fn normalized(frames: &[Frame]) -> Vec<NormalizedFrame> {
    frames
        .iter()
        .map(|f| normalize_frame(f).expect("fixture frames are valid"))
        .collect()
}

/// Normalized frame with one right hand whose every landmark is `(v, v, v)`
/// relative to the wrist (wrist stays at origin)
pub fn flat_frame(timestamp_ms: u64, v: f32) -> NormalizedFrame {
    let mut landmarks = [Landmark::ORIGIN; LANDMARK_COUNT];
    for lm in landmarks.iter_mut().skip(1) {
        *lm = Landmark::new(v, v, v);
    }
    NormalizedFrame {
        timestamp_ms,
        hands: vec![super::landmarks::NormalizedHand {
            handedness: Handedness::Right,
            landmarks,
            score: 1.0,
        }],
    }
}
