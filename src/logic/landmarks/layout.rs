//! Hand Landmark Layout - Centralized Landmark Definition
//!
//! **This file controls the recorded sequence schema**
//!
//! ## Rules:
//! 1. Add landmark → increment FORMAT_VERSION
//! 2. Change order → increment FORMAT_VERSION
//! 3. Remove landmark → increment FORMAT_VERSION
//!
//! Recorded files carry the version and layout hash; the offline training
//! job and the template backend refuse files recorded under another layout.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FORMAT VERSION
// ============================================================================

/// Current recorded sequence format version
pub const FORMAT_VERSION: u8 = 1;

// ============================================================================
// LANDMARK LAYOUT (Authoritative source)
// ============================================================================

/// Anatomical landmark names, index = landmark id
pub const HAND_LANDMARK_LAYOUT: &[&str] = &[
    "wrist",             // 0: origin after normalization
    "thumb_cmc",         // 1
    "thumb_mcp",         // 2
    "thumb_ip",          // 3
    "thumb_tip",         // 4
    "index_finger_mcp",  // 5
    "index_finger_pip",  // 6
    "index_finger_dip",  // 7
    "index_finger_tip",  // 8
    "middle_finger_mcp", // 9
    "middle_finger_pip", // 10
    "middle_finger_dip", // 11
    "middle_finger_tip", // 12
    "ring_finger_mcp",   // 13
    "ring_finger_pip",   // 14
    "ring_finger_dip",   // 15
    "ring_finger_tip",   // 16
    "pinky_mcp",         // 17
    "pinky_pip",         // 18
    "pinky_dip",         // 19
    "pinky_tip",         // 20
];

/// Landmarks per hand
/// IMPORTANT: Must match HAND_LANDMARK_LAYOUT.len()!
pub const LANDMARK_COUNT: usize = 21;

/// Wrist landmark index
pub const WRIST_INDEX: usize = 0;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the landmark layout
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FORMAT_VERSION]);

    for name in HAND_LANDMARK_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Layout hash of the running build
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

/// Layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub landmark_count: usize,
    pub landmark_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FORMAT_VERSION,
            hash: layout_hash(),
            landmark_count: LANDMARK_COUNT,
            landmark_names: HAND_LANDMARK_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Check a stamped (version, hash) pair against the running layout
    pub fn matches(&self, version: u8, hash: u32) -> bool {
        self.version == version && self.hash == hash
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_count_matches() {
        assert_eq!(HAND_LANDMARK_LAYOUT.len(), LANDMARK_COUNT);
        assert_eq!(HAND_LANDMARK_LAYOUT[WRIST_INDEX], "wrist");
    }

    #[test]
    fn test_layout_hash_stable() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert!(info.matches(FORMAT_VERSION, layout_hash()));
        assert!(!info.matches(FORMAT_VERSION + 1, layout_hash()));
        assert_eq!(info.landmark_names.len(), LANDMARK_COUNT);
    }
}
