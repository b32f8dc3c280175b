//! Motion Configuration
//!
//! Defaults → optional JSON file → environment overrides.
//! Default values live in `constants.rs`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::error::{MotionError, MotionResult};
use crate::logic::model::template::DEFAULT_DISTANCE_SCALE;

// ============================================================================
// SECTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Frames per Sequence
    pub target_frame_count: usize,
    /// Inclusive minimum confidence for a Candidate
    pub confidence_threshold: f32,
    /// Rolling buffer capacity, at least `target_frame_count`
    pub buffer_capacity: usize,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            target_frame_count: constants::DEFAULT_TARGET_FRAME_COUNT,
            confidence_threshold: constants::DEFAULT_CONFIDENCE_THRESHOLD,
            buffer_capacity: constants::DEFAULT_TARGET_FRAME_COUNT * 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub cooldown_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: constants::DEFAULT_COOLDOWN_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    pub countdown_ms: u64,
    pub capture_ms: u64,
    pub repetitions: usize,
    /// Fewer usable frames than this fails the repetition
    pub min_capture_frames: usize,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            countdown_ms: constants::DEFAULT_COUNTDOWN_MS,
            capture_ms: constants::DEFAULT_CAPTURE_MS,
            repetitions: constants::DEFAULT_REPETITIONS,
            min_capture_frames: constants::DEFAULT_MIN_CAPTURE_FRAMES,
        }
    }
}

/// Matching backend selection. Exactly one is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Nearest-template over recordings in `templates_dir`
    /// (defaults to the recordings directory)
    Template {
        #[serde(default)]
        templates_dir: Option<PathBuf>,
        #[serde(default = "default_distance_scale")]
        distance_scale: f32,
    },
    /// Trained classifier artifact
    Onnx {
        model_path: PathBuf,
        labels: Vec<String>,
        #[serde(default)]
        apply_softmax: bool,
    },
}

fn default_distance_scale() -> f32 {
    DEFAULT_DISTANCE_SCALE
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Template {
            templates_dir: None,
            distance_scale: DEFAULT_DISTANCE_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/profiles`
    pub profiles_dir: Option<PathBuf>,
    /// Defaults to `<data_dir>/recordings`
    pub recordings_dir: Option<PathBuf>,
    pub active_profile: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: constants::default_data_dir(),
            profiles_dir: None,
            recordings_dir: None,
            active_profile: constants::DEFAULT_PROFILE.to_string(),
        }
    }
}

impl PathsConfig {
    pub fn profiles_dir(&self) -> PathBuf {
        self.profiles_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(constants::PROFILES_DIR))
    }

    pub fn recordings_dir(&self) -> PathBuf {
        self.recordings_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(constants::RECORDINGS_DIR))
    }
}

// ============================================================================
// MOTION CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub recognition: RecognitionConfig,
    pub debounce: DebounceConfig,
    pub recording: RecordingConfig,
    pub backend: BackendConfig,
    pub paths: PathsConfig,
}

impl MotionConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> MotionResult<Self> {
        let data = fs::read(path)?;
        let config: MotionConfig = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MOTIONPLAY_*` environment overrides
    pub fn apply_env(mut self) -> Self {
        if let Some(v) = env_parse("MOTIONPLAY_TARGET_FRAMES") {
            self.recognition.target_frame_count = v;
            self.recognition.buffer_capacity = self.recognition.buffer_capacity.max(v);
        }
        if let Some(v) = env_parse("MOTIONPLAY_CONFIDENCE_THRESHOLD") {
            self.recognition.confidence_threshold = v;
        }
        if let Some(v) = env_parse("MOTIONPLAY_COOLDOWN_MS") {
            self.debounce.cooldown_ms = v;
        }
        if let Some(v) = env_parse("MOTIONPLAY_REPETITIONS") {
            self.recording.repetitions = v;
        }
        if let Ok(v) = env::var("MOTIONPLAY_DATA_DIR") {
            self.paths.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("MOTIONPLAY_PROFILE") {
            self.paths.active_profile = v;
        }
        self
    }

    pub fn validate(&self) -> MotionResult<()> {
        let r = &self.recognition;
        if r.target_frame_count == 0 {
            return Err(MotionError::InvalidConfig("target_frame_count must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&r.confidence_threshold) {
            return Err(MotionError::InvalidConfig(format!(
                "confidence_threshold {} outside [0, 1]",
                r.confidence_threshold
            )));
        }
        if r.buffer_capacity < r.target_frame_count {
            return Err(MotionError::InvalidConfig(format!(
                "buffer_capacity {} < target_frame_count {}",
                r.buffer_capacity, r.target_frame_count
            )));
        }
        if self.recording.repetitions == 0 {
            return Err(MotionError::InvalidConfig("repetitions must be >= 1".into()));
        }
        if self.recording.capture_ms == 0 {
            return Err(MotionError::InvalidConfig("capture_ms must be > 0".into()));
        }
        if let BackendConfig::Onnx { labels, .. } = &self.backend {
            if labels.is_empty() {
                return Err(MotionError::InvalidConfig("onnx backend needs labels".into()));
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
