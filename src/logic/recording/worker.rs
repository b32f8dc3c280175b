//! Persistence Worker
//!
//! Completed recordings are handed over a channel and written on the
//! blocking pool, so the frame lane never waits on disk.

use std::io;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::record::RecordedGesture;
use super::store::{RecordingStore, SavedRecording};
use crate::logic::error::{MotionError, MotionResult};

/// Sending side, cheap to clone
#[derive(Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<RecordedGesture>,
}

impl PersistenceHandle {
    /// Queue a recording for saving. Never blocks.
    pub fn submit(&self, recording: RecordedGesture) -> MotionResult<()> {
        self.tx.send(recording).map_err(|_| {
            MotionError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "persistence worker stopped"))
        })
    }
}

/// Start the worker on the current tokio runtime.
/// The task ends once every handle is dropped and returns what it saved.
pub fn spawn(store: RecordingStore) -> (PersistenceHandle, JoinHandle<Vec<SavedRecording>>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<RecordedGesture>();
    let store = Arc::new(store);

    let task = tokio::spawn(async move {
        let mut saved = Vec::new();

        while let Some(recording) = rx.recv().await {
            let store = Arc::clone(&store);
            let label = recording.gesture_name.clone();

            match tokio::task::spawn_blocking(move || store.save(&recording)).await {
                Ok(Ok(result)) => saved.push(result),
                Ok(Err(e)) => log::error!("Failed to save recording '{}': {}", label, e),
                Err(e) => log::error!("Persistence task for '{}' panicked: {}", label, e),
            }
        }

        log::debug!("Persistence worker stopped ({} recordings saved)", saved.len());
        saved
    });

    (PersistenceHandle { tx }, task)
}
