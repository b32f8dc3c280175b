//! ONNX Classifier - Trained model artifact as a matching backend
//!
//! Input tensor `[1, T, FRAME_FEATURE_COUNT]`, output one score per label
//! in the order given at load time.

use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array3;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;

use super::features::{flatten_sequence, softmax, FRAME_FEATURE_COUNT};
use super::{BackendError, MatchingBackend, Scores};
use crate::logic::sequence::Sequence;

pub struct OnnxClassifier {
    session: Session,
    labels: Vec<String>,
    apply_softmax: bool,
    model_path: String,
    loaded_at: DateTime<Utc>,
}

impl OnnxClassifier {
    /// Load a model from file
    pub fn load(model_path: &Path, labels: Vec<String>, apply_softmax: bool) -> Result<Self, BackendError> {
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(BackendError(format!("Model not found: {}", model_path.display())));
        }
        if labels.is_empty() {
            return Err(BackendError("Classifier needs at least one label".to_string()));
        }

        let session = Session::builder()
            .map_err(|e| BackendError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| BackendError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| BackendError(format!("Failed to load model: {}", e)))?;

        log::info!("ONNX model loaded successfully ({} labels)", labels.len());

        Ok(Self {
            session,
            labels,
            apply_softmax,
            model_path: model_path.display().to_string(),
            loaded_at: Utc::now(),
        })
    }

    /// Load a model from bytes
    pub fn from_bytes(model_bytes: &[u8], labels: Vec<String>, apply_softmax: bool) -> Result<Self, BackendError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| BackendError(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| BackendError(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| BackendError(format!("Load from memory error: {}", e)))?;

        Ok(Self {
            session,
            labels,
            apply_softmax,
            model_path: "<memory>".to_string(),
            loaded_at: Utc::now(),
        })
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl MatchingBackend for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn evaluate(&mut self, sequence: &Sequence) -> Result<Scores, BackendError> {
        let seq_len = sequence.len();
        let input_data = flatten_sequence(sequence);

        let input_array = Array3::<f32>::from_shape_vec((1, seq_len, FRAME_FEATURE_COUNT), input_data)
            .map_err(|e| BackendError(format!("Array error: {}", e)))?;

        let output_name = self
            .session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| BackendError("No output defined".to_string()))?;

        let input_tensor =
            Value::from_array(input_array).map_err(|e| BackendError(format!("Tensor error: {}", e)))?;

        let outputs = self
            .session
            .run(ort::inputs![input_tensor])
            .map_err(|e| BackendError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| BackendError("No output".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| BackendError(format!("Extract error: {}", e)))?;

        let data = output_tensor.1;
        if data.len() < self.labels.len() {
            return Err(BackendError(format!(
                "Model produced {} scores for {} labels",
                data.len(),
                self.labels.len()
            )));
        }

        let raw = &data[..self.labels.len()];
        let probs = if self.apply_softmax { softmax(raw) } else { raw.to_vec() };

        Ok(self
            .labels
            .iter()
            .cloned()
            .zip(probs.into_iter().map(|p| p.clamp(0.0, 1.0)))
            .collect())
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }
}
