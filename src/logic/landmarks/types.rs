//! Landmark Data Types
//!
//! Raw observations as delivered by the landmark source, and their
//! wrist-relative normalized counterparts.

use serde::{Deserialize, Serialize};

use super::layout::LANDMARK_COUNT;
use crate::logic::error::{MotionError, MotionResult};

// ============================================================================
// LANDMARK
// ============================================================================

/// One 3D anatomical point, image-relative coordinates.
/// Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const ORIGIN: Landmark = Landmark { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Per-coordinate difference `self - origin`
    pub fn relative_to(&self, origin: &Landmark) -> Landmark {
        Landmark {
            x: self.x - origin.x,
            y: self.y - origin.y,
            z: self.z - origin.z,
        }
    }

    /// Linear interpolation, `t = 0` yields `self` exactly
    pub fn lerp(&self, other: &Landmark, t: f32) -> Landmark {
        Landmark {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from(v: [f32; 3]) -> Self {
        Landmark { x: v[0], y: v[1], z: v[2] }
    }
}

impl From<Landmark> for [f32; 3] {
    fn from(l: Landmark) -> Self {
        [l.x, l.y, l.z]
    }
}

// ============================================================================
// HAND
// ============================================================================

/// Handedness tag reported by the landmark detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

/// A detected hand as delivered by the landmark source.
/// Landmark count is not trusted until normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub handedness: Handedness,
    pub landmarks: Vec<Landmark>,
    pub score: f32,
}

impl Hand {
    pub fn new(handedness: Handedness, landmarks: Vec<Landmark>, score: f32) -> Self {
        Self { handedness, landmarks, score }
    }
}

/// A hand translated so that the wrist is the origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedHand {
    pub handedness: Handedness,
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub score: f32,
}

// ============================================================================
// FRAME
// ============================================================================

/// One time-stamped observation with zero, one or two hands
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp_ms: u64,
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl Frame {
    pub fn new(timestamp_ms: u64, hands: Vec<Hand>) -> Self {
        Self { timestamp_ms, hands }
    }

    /// A frame where the detector found nothing
    pub fn empty(timestamp_ms: u64) -> Self {
        Self { timestamp_ms, hands: Vec::new() }
    }

    /// At most one hand per handedness
    pub fn validate_handedness(&self) -> MotionResult<()> {
        for tag in Handedness::ALL {
            if self.hands.iter().filter(|h| h.handedness == tag).count() > 1 {
                return Err(MotionError::DuplicateHandedness(tag));
            }
        }
        Ok(())
    }
}

/// A frame whose every hand is wrist-relative.
/// Hands are kept sorted by handedness (Left before Right).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedFrame {
    pub timestamp_ms: u64,
    pub hands: Vec<NormalizedHand>,
}

impl NormalizedFrame {
    pub fn hand(&self, handedness: Handedness) -> Option<&NormalizedHand> {
        self.hands.iter().find(|h| h.handedness == handedness)
    }

    pub fn has_hands(&self) -> bool {
        !self.hands.is_empty()
    }
}
