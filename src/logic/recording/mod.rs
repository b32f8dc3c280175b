//! Recording Module - Labeled training sequences
//!
//! Countdown → capture → normalize → resample → persist, repeated per
//! gesture. Produces the files the offline training job consumes.

pub mod export;
pub mod record;
pub mod session;
pub mod store;
pub mod worker;

#[cfg(test)]
mod tests;

pub use record::{RecordedGesture, RecordingMetadata};
pub use session::{RecordingEvent, RecordingSession, RecordingState};
pub use store::{RecordingStore, SavedRecording};
pub use worker::PersistenceHandle;
