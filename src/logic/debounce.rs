//! Debounce - Candidate stream → discrete TriggerEvents
//!
//! Cooldown is tracked per label. A suppressed candidate changes nothing,
//! so holding a gesture yields one trigger per cooldown window.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::recognition::Candidate;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub label: String,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DebounceStats {
    pub triggered: u64,
    pub suppressed: u64,
}

// ============================================================================
// COOLDOWN TRACKER
// ============================================================================

pub struct CooldownTracker {
    cooldown_ms: u64,
    last_trigger: HashMap<String, u64>,
    stats: DebounceStats,
}

impl CooldownTracker {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_trigger: HashMap::new(),
            stats: DebounceStats::default(),
        }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn set_cooldown_ms(&mut self, cooldown_ms: u64) {
        log::info!("Cooldown {}ms → {}ms", self.cooldown_ms, cooldown_ms);
        self.cooldown_ms = cooldown_ms;
    }

    /// Forget every label's last trigger
    pub fn reset(&mut self) {
        self.last_trigger.clear();
    }

    pub fn last_trigger(&self, label: &str) -> Option<u64> {
        self.last_trigger.get(label).copied()
    }

    pub fn stats(&self) -> &DebounceStats {
        &self.stats
    }

    pub fn offer(&mut self, candidate: &Candidate) -> Option<TriggerEvent> {
        let now = candidate.timestamp_ms;

        if let Some(&last) = self.last_trigger.get(&candidate.label) {
            // saturating: a timestamp older than the last trigger stays in cooldown
            if now.saturating_sub(last) < self.cooldown_ms || now < last {
                self.stats.suppressed += 1;
                log::trace!("Suppressed '{}' at {}ms (last {}ms)", candidate.label, now, last);
                return None;
            }
        }

        self.last_trigger.insert(candidate.label.clone(), now);
        self.stats.triggered += 1;
        log::debug!(
            "Trigger '{}' at {}ms (confidence {:.3})",
            candidate.label,
            now,
            candidate.confidence
        );

        Some(TriggerEvent {
            label: candidate.label.clone(),
            timestamp_ms: now,
        })
    }
}
