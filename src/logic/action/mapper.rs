//! Action Mapper - TriggerEvent → injected input
//!
//! Each event resolves against one profile snapshot, so a concurrent
//! reload is observed either wholly or not at all.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::descriptor::ActionDescriptor;
use super::profile::{Profile, ProfileHandle};
use crate::logic::debounce::TriggerEvent;
use crate::logic::error::{MotionError, MotionResult};

// ============================================================================
// INJECTION COLLABORATOR
// ============================================================================

/// Key/mouse simulation. Implemented outside the core.
pub trait InputInjector: Send + Sync {
    fn inject(&self, action: &ActionDescriptor) -> Result<(), String>;
}

/// Injector that only logs what it would press
#[derive(Default)]
pub struct LoggingInjector;

impl InputInjector for LoggingInjector {
    fn inject(&self, action: &ActionDescriptor) -> Result<(), String> {
        log::info!("[Input] {:?}", action);
        Ok(())
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Executed {
        label: String,
        action: ActionDescriptor,
        profile: String,
    },
    /// No mapping for the label in the active profile
    Unmapped { label: String, profile: String },
}

// ============================================================================
// MAPPER
// ============================================================================

pub struct ActionMapper {
    profile: ProfileHandle,
    injector: Arc<dyn InputInjector>,
}

impl ActionMapper {
    pub fn new(profile: ProfileHandle, injector: Arc<dyn InputInjector>) -> Self {
        Self { profile, injector }
    }

    /// Handle for control paths (watcher, reload requests)
    pub fn profile_handle(&self) -> ProfileHandle {
        self.profile.clone()
    }

    pub fn active_profile(&self) -> Arc<Profile> {
        self.profile.current()
    }

    /// Atomically replace the active profile
    pub fn reload(&self, profile: Profile) -> Arc<Profile> {
        self.profile.replace(profile)
    }

    pub fn handle(&self, event: &TriggerEvent) -> MotionResult<ActionOutcome> {
        let profile = self.profile.current();

        let Some(action) = profile.action_for(&event.label) else {
            log::debug!("No mapping for '{}' in profile '{}'", event.label, profile.name);
            return Ok(ActionOutcome::Unmapped {
                label: event.label.clone(),
                profile: profile.name.clone(),
            });
        };

        self.injector
            .inject(action)
            .map_err(MotionError::InjectionFailed)?;

        log::debug!("'{}' → {} at {}ms", event.label, action, event.timestamp_ms);
        Ok(ActionOutcome::Executed {
            label: event.label.clone(),
            action: action.clone(),
            profile: profile.name.clone(),
        })
    }
}
