//! Feature Schema - Explicit Column Contract
//!
//! **This file controls the feature layout the scaler and classifier were
//! fitted on.**
//!
//! ## Rules:
//! 1. Add a base column → increment SCHEMA_VERSION
//! 2. Change column order → increment SCHEMA_VERSION
//! 3. One-hot columns follow the base columns, in encoder category order
//!
//! The schema is derived from the loaded encoders and then checked against
//! `feature_schema.json`, the scaler's fitted column names and the
//! classifier's input width before the service accepts any request.

use std::collections::BTreeMap;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::encoders::OneHotEncoder;
use crate::constants::SCHEMA_FILE;
use crate::error::ArtifactError;

// ============================================================================
// SCHEMA VERSION
// ============================================================================

/// Current feature schema version
/// MUST be incremented when BASE_COLUMNS changes
pub const SCHEMA_VERSION: u8 = 1;

// ============================================================================
// BASE COLUMNS
// ============================================================================

/// Non-categorical columns in the exact order they precede the one-hot block
pub const BASE_COLUMNS: &[&str] = &[
    "CreditScore",      // 0
    "Gender",           // 1: label-encoded
    "Age",              // 2
    "Tenure",           // 3
    "Balance",          // 4
    "NumOfProducts",    // 5
    "HasCrCard",        // 6: 0/1
    "IsActiveMember",   // 7: 0/1
    "EstimatedSalary",  // 8
];

/// IMPORTANT: Must match BASE_COLUMNS.len()!
pub const BASE_COLUMN_COUNT: usize = 9;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the schema version and the ordered column names
pub fn compute_layout_hash(version: u8, columns: &[String]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[version]);

    for name in columns {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// SCHEMA MANIFEST (feature_schema.json)
// ============================================================================

/// On-disk contract shipped next to the fitted artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaManifest {
    pub version: u8,
    pub columns: Vec<String>,
    /// Optional SHA-256 (hex) per artifact file name
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
}

// ============================================================================
// FEATURE SCHEMA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u8,
    pub hash: u32,
    pub columns: Vec<String>,
}

impl FeatureSchema {
    /// Base columns followed by the encoder's one-hot columns
    pub fn derive(geography: &OneHotEncoder) -> Self {
        let columns: Vec<String> = BASE_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(geography.feature_names_out())
            .collect();

        Self {
            version: SCHEMA_VERSION,
            hash: compute_layout_hash(SCHEMA_VERSION, &columns),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of one-hot columns after the base block
    pub fn one_hot_width(&self) -> usize {
        self.len() - BASE_COLUMN_COUNT
    }

    /// Get column index by name (O(n) but columns are few)
    #[cfg(test)]
    pub fn index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Compare against the shipped manifest, version first
    pub fn check_manifest(&self, manifest: &SchemaManifest) -> Result<(), ArtifactError> {
        if manifest.version != self.version {
            return Err(ArtifactError::SchemaMismatch(format!(
                "manifest is v{}, service supports v{}",
                manifest.version, self.version
            )));
        }
        self.check_columns(SCHEMA_FILE, &manifest.columns)
    }

    /// Exact name-and-order comparison
    pub fn check_columns(&self, source: &str, columns: &[String]) -> Result<(), ArtifactError> {
        if columns.len() != self.len() {
            return Err(ArtifactError::SchemaMismatch(format!(
                "{} lists {} columns, encoders produce {}",
                source,
                columns.len(),
                self.len()
            )));
        }

        if let Some((i, (expected, actual))) = self.columns
            .iter()
            .zip(columns)
            .enumerate()
            .find(|(_, (e, a))| e != a)
        {
            return Err(ArtifactError::SchemaMismatch(format!(
                "{} column {} is {:?}, expected {:?}",
                source, i, actual, expected
            )));
        }

        Ok(())
    }

    pub fn check_width(&self, source: &str, width: usize) -> Result<(), ArtifactError> {
        if width != self.len() {
            return Err(ArtifactError::SchemaMismatch(format!(
                "{} expects {} inputs, schema has {} columns",
                source,
                width,
                self.len()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
