//! Rolling Buffer - Recent normalized frames for recognition
//!
//! Strict recency: once full, every push evicts the oldest frame.
//! Insert and evict are both O(1).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::logic::landmarks::NormalizedFrame;

// ============================================================================
// BUFFER
// ============================================================================

pub struct RollingBuffer {
    frames: VecDeque<NormalizedFrame>,
    capacity: usize,
}

impl RollingBuffer {
    /// `capacity` is clamped to at least 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a frame, returning the evicted one if the buffer was full
    pub fn push(&mut self, frame: NormalizedFrame) -> Option<NormalizedFrame> {
        let evicted = if self.frames.len() == self.capacity {
            self.frames.pop_front()
        } else {
            None
        };
        self.frames.push_back(frame);
        evicted
    }

    /// The most recent `n` frames in arrival order, if that many are buffered
    pub fn latest(&self, n: usize) -> Option<Vec<NormalizedFrame>> {
        if n == 0 || self.frames.len() < n {
            return None;
        }
        let start = self.frames.len() - n;
        Some(self.frames.range(start..).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedFrame> {
        self.frames.iter()
    }

    pub fn status(&self, required: usize) -> BufferStatus {
        BufferStatus {
            current_size: self.frames.len(),
            required_size: required,
            is_ready: self.frames.len() >= required,
            fill_percent: if required > 0 {
                (self.frames.len() as f32 / required as f32 * 100.0).min(100.0)
            } else {
                0.0
            },
        }
    }
}

/// Buffer status information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferStatus {
    pub current_size: usize,
    pub required_size: usize,
    pub is_ready: bool,
    pub fill_percent: f32,
}
