//! Standard scaler
//!
//! `(x - mean) / scale` per column. A zero scale means the column was
//! constant during fitting and is left unscaled.

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, InferenceError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column names seen at fit time, in order
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn transform(&self, row: &[f32]) -> Result<Vec<f32>, InferenceError> {
        if row.len() != self.n_features() {
            return Err(InferenceError(format!(
                "scaler expects {} columns, got {}",
                self.n_features(),
                row.len()
            )));
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                ((x as f64 - mean) / scale) as f32
            })
            .collect())
    }

    pub(crate) fn check(&self) -> Result<(), ArtifactError> {
        let n = self.n_features();
        if n == 0 {
            return Err(ArtifactError::invalid("scaler", "no feature names"));
        }
        if self.mean.len() != n || self.scale.len() != n {
            return Err(ArtifactError::invalid(
                "scaler",
                format!(
                    "{} feature names but {} means and {} scales",
                    n,
                    self.mean.len(),
                    self.scale.len()
                ),
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(ArtifactError::invalid("scaler", "non-finite statistics"));
        }
        if self.scale.iter().any(|&s| s < 0.0) {
            return Err(ArtifactError::invalid("scaler", "negative scale"));
        }
        Ok(())
    }
}
