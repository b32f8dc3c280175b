//! Error Taxonomy
//!
//! One error type for the whole motion core. Lookup misses on the active
//! profile are not represented here: they are a defined no-op.

use std::path::PathBuf;
use thiserror::Error;

use super::landmarks::Handedness;

pub type MotionResult<T> = Result<T, MotionError>;

#[derive(Debug, Error)]
pub enum MotionError {
    // Input errors
    #[error("invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("frame contains more than one {0:?} hand")]
    DuplicateHandedness(Handedness),

    // Resampling errors
    #[error("cannot resample an empty frame sequence")]
    EmptyInputSequence,

    #[error("target frame count must be at least 1")]
    InvalidTargetLength,

    // Recording errors
    #[error("no hand detected during capture")]
    NoHandDetected,

    #[error("too few usable frames captured: {captured} < {required}")]
    InsufficientFrames { captured: usize, required: usize },

    #[error("recording cancelled")]
    RecordingCancelled,

    #[error("a recording session is already in progress")]
    RecordingInProgress,

    #[error("no recording session is active")]
    NoActiveRecording,

    // Recognition errors
    #[error("matching backend unavailable: {0}")]
    MatchingBackendUnavailable(String),

    // Action errors
    #[error("input injection failed: {0}")]
    InjectionFailed(String),

    #[error("invalid action descriptor: {0:?}")]
    InvalidAction(String),

    #[error("profile not found: {0}")]
    ProfileNotFound(PathBuf),

    // Storage errors
    #[error("recording layout mismatch: expected v{expected_version} ({expected_hash:08x}), got v{actual_version} ({actual_hash:08x})")]
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },

    #[error("malformed recording: {0}")]
    MalformedRecording(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("profile format error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl MotionError {
    /// Whether the error only invalidates the current frame
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            MotionError::InvalidLandmarkCount { .. } | MotionError::DuplicateHandedness(_)
        )
    }
}
