//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

use std::path::PathBuf;

/// Frames per resampled Sequence
pub const DEFAULT_TARGET_FRAME_COUNT: usize = 60;

/// Minimum confidence for a Candidate (inclusive)
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Minimum time between two triggers of the same label
pub const DEFAULT_COOLDOWN_MS: u64 = 500;

/// Recording countdown before each capture
pub const DEFAULT_COUNTDOWN_MS: u64 = 3000;

/// Capture window per repetition
pub const DEFAULT_CAPTURE_MS: u64 = 3000;

/// Repetitions per recorded gesture
pub const DEFAULT_REPETITIONS: usize = 5;

/// Minimum usable frames per capture window
pub const DEFAULT_MIN_CAPTURE_FRAMES: usize = 15;

/// Profile loaded at startup
pub const DEFAULT_PROFILE: &str = "default";

pub const PROFILES_DIR: &str = "profiles";
pub const RECORDINGS_DIR: &str = "recordings";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "MotionPlay";

/// Default data directory: `<local data dir>/motionplay`
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("motionplay")
}
