//! Classifier trait and backend selection

use std::fmt::Debug;
use std::path::Path;

use super::dense::DenseNetwork;
use crate::error::{ArtifactError, InferenceError};

/// Trait for classifier backends (dense JSON network, ONNX, ...)
pub trait Classifier: Debug + Send + Sync {
    /// Human-readable model name for logs and status
    fn name(&self) -> &str;

    /// Backend identifier ("dense", "onnx")
    fn backend(&self) -> &'static str;

    /// Number of input columns the model was trained on
    fn input_width(&self) -> usize;

    fn output_width(&self) -> usize {
        1
    }

    /// Score one feature row, returning the positive-class probability
    fn predict(&self, features: &[f32]) -> Result<f32, InferenceError>;
}

/// Load a classifier, choosing the backend from the file extension.
///
/// `width` is the schema width. Backends report the width the model itself
/// declares; only a dynamic ONNX input axis adopts `width`.
pub fn load_classifier(path: &Path, width: usize) -> Result<Box<dyn Classifier>, ArtifactError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "json" => Ok(Box::new(DenseNetwork::load(path)?)),
        #[cfg(feature = "onnx")]
        "onnx" => Ok(Box::new(super::onnx::OnnxClassifier::load(path, width)?)),
        #[cfg(not(feature = "onnx"))]
        "onnx" => {
            let _ = width;
            Err(ArtifactError::invalid(
                path.display().to_string(),
                "built without the `onnx` feature",
            ))
        }
        other => Err(ArtifactError::invalid(
            path.display().to_string(),
            format!("unsupported model format {:?}", other),
        )),
    }
}

/// Resolve a backend's input width from the model's last declared input
/// dimension. Negative (dynamic) or missing dimensions take the schema width.
#[cfg(any(test, feature = "onnx"))]
pub(crate) fn resolve_input_width(
    declared: Option<i64>,
    schema_width: usize,
    source: &str,
) -> Result<usize, ArtifactError> {
    match declared {
        Some(dim) if dim > 0 => {
            let dim = dim as usize;
            if dim != schema_width {
                return Err(ArtifactError::SchemaMismatch(format!(
                    "{} declares {} inputs, schema has {} columns",
                    source, dim, schema_width
                )));
            }
            Ok(dim)
        }
        _ => Ok(schema_width),
    }
}
