//! Profiles - Motion label → action mappings
//!
//! The active profile sits behind a `ProfileHandle`. Readers take an
//! `Arc<Profile>` snapshot; a reload swaps the whole `Arc`. A profile is
//! never mutated once published.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::descriptor::ActionDescriptor;
use crate::logic::error::{MotionError, MotionResult};

const PROFILE_EXT: &str = "yaml";

// ============================================================================
// PROFILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Defaults to the file stem when the file leaves it out
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mappings: BTreeMap<String, ActionDescriptor>,
}

impl Profile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mappings: BTreeMap::new(),
        }
    }

    pub fn with_mapping(mut self, label: &str, action: ActionDescriptor) -> Self {
        self.mappings.insert(label.to_string(), action);
        self
    }

    /// Case-insensitive lookup
    pub fn action_for(&self, label: &str) -> Option<&ActionDescriptor> {
        if let Some(action) = self.mappings.get(label) {
            return Some(action);
        }
        let wanted = label.to_lowercase();
        self.mappings
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

// ============================================================================
// HANDLE
// ============================================================================

/// Shared, atomically swappable reference to the active profile
#[derive(Clone)]
pub struct ProfileHandle {
    inner: Arc<RwLock<Arc<Profile>>>,
}

impl ProfileHandle {
    pub fn new(profile: Profile) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(profile))),
        }
    }

    /// Snapshot of the active profile
    pub fn current(&self) -> Arc<Profile> {
        Arc::clone(&self.inner.read())
    }

    /// Publish a new profile, returning the previous one
    pub fn replace(&self, profile: Profile) -> Arc<Profile> {
        let next = Arc::new(profile);
        let previous = std::mem::replace(&mut *self.inner.write(), Arc::clone(&next));
        log::info!(
            "Profile swapped: {} → {} ({} mappings)",
            previous.name,
            next.name,
            next.len()
        );
        previous
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Profile files `<dir>/<name>.yaml`
pub struct ProfileStore {
    base_dir: PathBuf,
}

impl ProfileStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", name, PROFILE_EXT))
    }

    pub fn load(&self, name: &str) -> MotionResult<Profile> {
        load_profile_file(&self.path_for(name))
    }

    pub fn save(&self, profile: &Profile) -> MotionResult<PathBuf> {
        fs::create_dir_all(&self.base_dir)?;
        let path = self.path_for(&profile.name);
        fs::write(&path, serde_yaml::to_string(profile)?)?;
        log::info!("Profile saved: {:?}", path);
        Ok(path)
    }

    /// Profile names, sorted
    pub fn list(&self) -> MotionResult<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&self.base_dir)?
            .filter_map(|r| r.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |e| e == PROFILE_EXT))
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Read a profile file
pub fn load_profile_file(path: &Path) -> MotionResult<Profile> {
    if !path.exists() {
        return Err(MotionError::ProfileNotFound(path.to_path_buf()));
    }

    let data = fs::read_to_string(path)?;
    let mut profile: Profile = serde_yaml::from_str(&data)?;
    if profile.name.is_empty() {
        if let Some(stem) = path.file_stem() {
            profile.name = stem.to_string_lossy().into_owned();
        }
    }
    log::info!("Profile loaded: {} ({} mappings)", profile.name, profile.len());
    Ok(profile)
}
