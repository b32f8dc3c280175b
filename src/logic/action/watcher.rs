//! Profile Watcher - Hot-reload on file change
//!
//! Watches the directory holding the active profile (editors often
//! replace files instead of writing in place) and swaps the handle when
//! that file changes. A file that fails to parse leaves the current
//! profile active.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::profile::{load_profile_file, ProfileHandle};
use crate::logic::error::{MotionError, MotionResult};

pub struct ProfileWatcher {
    path: PathBuf,
    // dropping the watcher stops the notification thread
    _watcher: RecommendedWatcher,
}

impl ProfileWatcher {
    pub fn start(path: PathBuf, handle: ProfileHandle) -> MotionResult<Self> {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| MotionError::ProfileNotFound(path.clone()))?;

        let target = path.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if is_relevant(&event, &target) {
                    reload_from_disk(&target, &handle);
                }
            }
            Err(e) => log::warn!("Profile watch error: {}", e),
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching profile {:?}", path);

        Ok(Self { path, _watcher: watcher })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_relevant(event: &Event, target: &Path) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == target.file_name())
}

/// Load `path` and publish it. Returns whether a swap happened.
pub fn reload_from_disk(path: &Path, handle: &ProfileHandle) -> bool {
    match load_profile_file(path) {
        Ok(profile) => {
            handle.replace(profile);
            true
        }
        Err(e) => {
            log::warn!("Profile reload skipped for {:?}: {}", path, e);
            false
        }
    }
}
