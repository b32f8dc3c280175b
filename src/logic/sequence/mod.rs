//! Sequence Module - Fixed-length frame sequences
//!
//! - `resample` - Variable-length buffers to exactly `T` frames
//! - `buffer` - Bounded FIFO of recent normalized frames

pub mod buffer;
pub mod resample;

pub use buffer::{BufferStatus, RollingBuffer};
pub use resample::resample;

use serde::{Deserialize, Serialize};

use crate::logic::landmarks::NormalizedFrame;

/// A resampled, fixed-length list of normalized frames.
/// Only the resampler builds one, so `len()` is always the target length
/// it was resampled to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    frames: Vec<NormalizedFrame>,
}

impl Sequence {
    pub(crate) fn from_resampled(frames: Vec<NormalizedFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[NormalizedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<NormalizedFrame> {
        self.frames
    }

    /// Whether any frame contains at least one hand
    pub fn has_hands(&self) -> bool {
        self.frames.iter().any(|f| f.has_hands())
    }
}
