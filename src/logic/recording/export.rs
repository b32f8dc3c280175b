//! Training Export
//!
//! Merges every valid recording into a single JSONL file (one recording
//! per line) for the offline training job.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::store::RecordingStore;
use crate::logic::error::MotionResult;

/// Export all recordings to `target_path`, returning how many were merged
pub fn to_jsonl(store: &RecordingStore, target_path: &Path) -> MotionResult<usize> {
    let recordings = store.load_all()?;

    let mut output = BufWriter::new(File::create(target_path)?);
    for recording in &recordings {
        serde_json::to_writer(&mut output, recording)?;
        output.write_all(b"\n")?;
    }
    output.flush()?;

    log::info!("Exported {} recordings to {:?}", recordings.len(), target_path);
    Ok(recordings.len())
}
