//! Recorded Sequence File
//!
//! The boundary consumed by the offline training job. One file per
//! gesture label and recording session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::error::{MotionError, MotionResult};
use crate::logic::landmarks::{layout, LayoutInfo, FORMAT_VERSION, LANDMARK_COUNT};
use crate::logic::sequence::Sequence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub recorded_at: DateTime<Utc>,
    pub num_landmarks_per_hand: usize,
    pub format_version: u8,
    pub layout_hash: u32,
    pub session_id: Uuid,
}

impl RecordingMetadata {
    pub fn current(session_id: Uuid) -> Self {
        Self {
            recorded_at: Utc::now(),
            num_landmarks_per_hand: LANDMARK_COUNT,
            format_version: FORMAT_VERSION,
            layout_hash: layout::layout_hash(),
            session_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedGesture {
    pub gesture_name: String,
    pub num_sequences: usize,
    pub target_frames: usize,
    pub normalized: bool,
    pub sequences: Vec<Sequence>,
    pub metadata: RecordingMetadata,
}

impl RecordedGesture {
    pub fn new(gesture_name: &str, target_frames: usize, sequences: Vec<Sequence>, session_id: Uuid) -> Self {
        Self {
            gesture_name: gesture_name.to_string(),
            num_sequences: sequences.len(),
            target_frames,
            normalized: true,
            sequences,
            metadata: RecordingMetadata::current(session_id),
        }
    }

    /// Check a loaded file against the running layout and its own header
    pub fn validate(&self) -> MotionResult<()> {
        let layout = LayoutInfo::current();
        if !layout.matches(self.metadata.format_version, self.metadata.layout_hash) {
            return Err(MotionError::LayoutMismatch {
                expected_version: layout.version,
                expected_hash: layout.hash,
                actual_version: self.metadata.format_version,
                actual_hash: self.metadata.layout_hash,
            });
        }

        if self.metadata.num_landmarks_per_hand != LANDMARK_COUNT {
            return Err(MotionError::MalformedRecording(format!(
                "{} landmarks per hand",
                self.metadata.num_landmarks_per_hand
            )));
        }

        if self.num_sequences != self.sequences.len() {
            return Err(MotionError::MalformedRecording(format!(
                "header says {} sequences, found {}",
                self.num_sequences,
                self.sequences.len()
            )));
        }

        if let Some((i, seq)) = self
            .sequences
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != self.target_frames)
        {
            return Err(MotionError::MalformedRecording(format!(
                "sequence {} has {} frames, expected {}",
                i,
                seq.len(),
                self.target_frames
            )));
        }

        Ok(())
    }
}
