//! Logic Module - Motion recognition core
//!
//! Leaves first:
//! - `landmarks/` - Frame types, layout, wrist normalization
//! - `sequence/` - Fixed-length resampling, rolling buffer
//! - `model/` - Matching backends (templates, ONNX classifier)
//! - `recording/` - Countdown/capture sessions, store, export
//! - `recognition` - Rolling window → Candidate
//! - `debounce` - Per-label cooldown → TriggerEvent
//! - `action/` - Profiles, action mapping, hot-reload
//! - `pipeline/` - The per-frame lane tying it together
//! - `context` - Process-wide owner with load/reload/shutdown

pub mod clock;
pub mod config;
pub mod error;

pub mod landmarks;
pub mod sequence;
pub mod model;
pub mod recording;

pub mod recognition;
pub mod debounce;
pub mod action;

pub mod pipeline;
pub mod context;

#[cfg(test)]
pub mod testing;
