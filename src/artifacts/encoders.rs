//! Categorical encoders
//!
//! Fitted state of the one-hot encoder (Geography) and the label encoder
//! (Gender). Both reject values outside their fitted vocabulary.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ArtifactError};

/// One-hot encoder over a single nominal feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Input feature name, used as the output column prefix
    pub feature: String,
    /// Known categories in fitted order
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn new(feature: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            feature: feature.into(),
            categories,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Output column names, `<feature>_<category>` in category order
    pub fn feature_names_out(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", self.feature, c))
            .collect()
    }

    /// Encode one value as an indicator row
    pub fn transform(&self, value: &str) -> AppResult<Vec<f32>> {
        let index = self.categories
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| AppError::unknown_category(&self.feature, value))?;

        let mut row = vec![0.0; self.categories.len()];
        row[index] = 1.0;
        Ok(row)
    }

    pub(crate) fn check(&self) -> Result<(), ArtifactError> {
        check_vocabulary("one-hot encoder", &self.feature, &self.categories)
    }
}

/// Label encoder: category -> position in `classes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub feature: String,
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(feature: impl Into<String>, classes: Vec<String>) -> Self {
        Self {
            feature: feature.into(),
            classes,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, value: &str) -> AppResult<usize> {
        self.classes
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| AppError::unknown_category(&self.feature, value))
    }

    pub(crate) fn check(&self) -> Result<(), ArtifactError> {
        check_vocabulary("label encoder", &self.feature, &self.classes)
    }
}

fn check_vocabulary(kind: &str, feature: &str, labels: &[String]) -> Result<(), ArtifactError> {
    let artifact = format!("{} ({})", kind, feature);

    if feature.is_empty() {
        return Err(ArtifactError::invalid(artifact, "feature name is empty"));
    }
    if labels.is_empty() {
        return Err(ArtifactError::invalid(artifact, "no categories"));
    }

    let mut seen = HashSet::new();
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(ArtifactError::invalid(artifact, format!("duplicate category {:?}", label)));
        }
    }

    Ok(())
}
