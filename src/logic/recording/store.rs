//! Recording Store - Recorded sequence files on disk
//!
//! One pretty-printed JSON file per completed session, named
//! `<label>_<YYYYmmdd_HHMMSS>.json`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::record::RecordedGesture;
use crate::logic::error::MotionResult;

const RECORDING_EXT: &str = "json";

/// Result of a successful save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedRecording {
    pub path: PathBuf,
    pub gesture_name: String,
    pub num_sequences: usize,
    pub size_bytes: u64,
    /// SHA-256 of the file contents, hex encoded
    pub checksum: String,
}

pub struct RecordingStore {
    base_dir: PathBuf,
}

impl RecordingStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Write a recording, never overwriting an existing file
    pub fn save(&self, recording: &RecordedGesture) -> MotionResult<SavedRecording> {
        fs::create_dir_all(&self.base_dir)?;

        let stem = format!(
            "{}_{}",
            sanitize_label(&recording.gesture_name),
            Utc::now().format("%Y%m%d_%H%M%S")
        );
        let mut path = self.base_dir.join(format!("{}.{}", stem, RECORDING_EXT));
        let mut n = 1;
        while path.exists() {
            path = self.base_dir.join(format!("{}_{}.{}", stem, n, RECORDING_EXT));
            n += 1;
        }

        let json = serde_json::to_vec_pretty(recording)?;
        fs::write(&path, &json)?;

        let checksum = hex::encode(Sha256::digest(&json));
        log::info!(
            "Recording saved: {:?} ({} sequences, sha256 {})",
            path,
            recording.num_sequences,
            checksum
        );

        Ok(SavedRecording {
            path,
            gesture_name: recording.gesture_name.clone(),
            num_sequences: recording.num_sequences,
            size_bytes: json.len() as u64,
            checksum,
        })
    }

    /// Load and validate one recording
    pub fn load(&self, path: &Path) -> MotionResult<RecordedGesture> {
        let data = fs::read(path)?;
        let recording: RecordedGesture = serde_json::from_slice(&data)?;
        recording.validate()?;
        Ok(recording)
    }

    /// Recording files, sorted by name (chronological per label)
    pub fn list(&self) -> MotionResult<Vec<PathBuf>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_dir)?
            .filter_map(|r| r.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |e| e == RECORDING_EXT))
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Every loadable recording; invalid files are skipped with a warning
    pub fn load_all(&self) -> MotionResult<Vec<RecordedGesture>> {
        let mut recordings = Vec::new();
        for path in self.list()? {
            match self.load(&path) {
                Ok(r) => recordings.push(r),
                Err(e) => log::warn!("Skipping recording {:?}: {}", path, e),
            }
        }
        Ok(recordings)
    }
}

/// SHA-256 of a file on disk, hex encoded
pub fn file_checksum(path: &Path) -> MotionResult<String> {
    let data = fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&data)))
}

fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
