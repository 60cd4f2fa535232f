//! Dense Network - feed-forward classifier exported as JSON
//!
//! Each layer computes `activation(x · W + b)` with `W` stored input-major
//! (`in × out`), the same layout Keras uses for `Dense` kernels.

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::classifier::Classifier;
use crate::artifacts::store::read_json;
use crate::error::{ArtifactError, InferenceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
        }
    }
}

// ============================================================================
// ON-DISK FORMAT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default = "default_name")]
    pub name: String,
    pub layers: Vec<LayerSpec>,
}

fn default_name() -> String {
    "dense".to_string()
}

// ============================================================================
// NETWORK
// ============================================================================

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
}

#[derive(Debug, Clone)]
pub struct DenseNetwork {
    name: String,
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let spec: NetworkSpec = read_json(path)?;
        Self::from_spec(spec)
    }

    pub fn from_spec(spec: NetworkSpec) -> Result<Self, ArtifactError> {
        let invalid = |reason: String| ArtifactError::invalid(format!("model {}", spec.name), reason);

        if spec.layers.is_empty() {
            return Err(invalid("no layers".to_string()));
        }

        let mut layers = Vec::with_capacity(spec.layers.len());
        let mut previous_out: Option<usize> = None;

        for (i, layer) in spec.layers.iter().enumerate() {
            let rows = layer.weights.len();
            let cols = layer.bias.len();

            if rows == 0 || cols == 0 {
                return Err(invalid(format!("layer {} is empty", i)));
            }
            if let Some(row) = layer.weights.iter().position(|r| r.len() != cols) {
                return Err(invalid(format!(
                    "layer {} row {} has {} weights, bias has {}",
                    i,
                    row,
                    layer.weights[row].len(),
                    cols
                )));
            }
            if let Some(prev) = previous_out {
                if prev != rows {
                    return Err(invalid(format!(
                        "layer {} expects {} inputs, previous layer outputs {}",
                        i, rows, prev
                    )));
                }
            }

            let flat: Vec<f32> = layer.weights.iter().flatten().copied().collect();
            let weights = Array2::from_shape_vec((rows, cols), flat)
                .map_err(|e| invalid(format!("layer {}: {}", i, e)))?;

            layers.push(DenseLayer {
                weights,
                bias: Array1::from_vec(layer.bias.clone()),
                activation: layer.activation,
            });
            previous_out = Some(cols);
        }

        Ok(Self {
            name: spec.name,
            layers,
        })
    }
}

impl Classifier for DenseNetwork {
    fn name(&self) -> &str {
        &self.name
    }

    fn backend(&self) -> &'static str {
        "dense"
    }

    fn input_width(&self) -> usize {
        self.layers.first().map(|l| l.weights.nrows()).unwrap_or(0)
    }

    fn output_width(&self) -> usize {
        self.layers.last().map(|l| l.weights.ncols()).unwrap_or(0)
    }

    fn predict(&self, features: &[f32]) -> Result<f32, InferenceError> {
        if features.len() != self.input_width() {
            return Err(InferenceError(format!(
                "model expects {} features, got {}",
                self.input_width(),
                features.len()
            )));
        }

        let mut x = Array1::from_vec(features.to_vec());
        for layer in &self.layers {
            x = x.dot(&layer.weights) + &layer.bias;
            x.mapv_inplace(|v| layer.activation.apply(v));
        }

        x.first()
            .copied()
            .ok_or_else(|| InferenceError("No output".to_string()))
    }
}
