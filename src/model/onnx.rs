//! ONNX Runtime classifier backend (feature `onnx`)

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::classifier::{resolve_input_width, Classifier};
use crate::error::{ArtifactError, InferenceError};

/// `Session::run` needs `&mut`, so the session sits behind a mutex.
pub struct OnnxClassifier {
    name: String,
    width: usize,
    output_name: String,
    session: Mutex<Session>,
}

impl OnnxClassifier {
    pub fn load(path: &Path, schema_width: usize) -> Result<Self, ArtifactError> {
        tracing::info!("Loading ONNX model from: {}", path.display());

        let invalid = |reason: String| ArtifactError::invalid(path.display().to_string(), reason);

        if !path.exists() {
            return Err(ArtifactError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "Model not found"),
            });
        }

        let session = Session::builder()
            .map_err(|e| invalid(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| invalid(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| invalid(format!("Failed to load model: {}", e)))?;

        // [batch, features]; the feature axis may be dynamic
        let declared = session.inputs.first()
            .ok_or_else(|| invalid("No input defined".to_string()))?
            .input_type
            .tensor_shape()
            .and_then(|shape| shape.last().copied());
        let width = resolve_input_width(declared, schema_width, &path.display().to_string())?;

        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| invalid("No output defined".to_string()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        Ok(Self {
            name,
            width,
            output_name,
            session: Mutex::new(session),
        })
    }
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }

    fn input_width(&self) -> usize {
        self.width
    }

    fn predict(&self, features: &[f32]) -> Result<f32, InferenceError> {
        if features.len() != self.width {
            return Err(InferenceError(format!(
                "model expects {} features, got {}",
                self.width,
                features.len()
            )));
        }

        let input_array = Array2::<f32>::from_shape_vec((1, self.width), features.to_vec())
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs.get(self.output_name.as_str())
            .ok_or_else(|| InferenceError("No output".to_string()))?;

        let (_, data) = output.try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;

        data.first()
            .copied()
            .ok_or_else(|| InferenceError("Empty output tensor".to_string()))
    }
}
