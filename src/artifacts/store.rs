//! Artifact Store
//!
//! Loads the fitted encoders, scaler, classifier and schema manifest once at
//! startup and cross-checks them. The resulting store is immutable and is
//! shared by reference with every request.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};

use super::encoders::{LabelEncoder, OneHotEncoder};
use super::scaler::StandardScaler;
use super::schema::{FeatureSchema, SchemaManifest};
use crate::constants::{
    DEFAULT_MODEL_FILE, LABEL_ENCODER_FILE, ONEHOT_ENCODER_FILE, SCALER_FILE, SCHEMA_FILE,
};
use crate::error::ArtifactError;
use crate::model::{load_classifier, Classifier};

// ============================================================================
// PATHS
// ============================================================================

/// Locations of the artifact files
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub onehot_encoder: PathBuf,
    pub label_encoder: PathBuf,
    pub scaler: PathBuf,
    pub model: PathBuf,
    pub schema: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            onehot_encoder: dir.join(ONEHOT_ENCODER_FILE),
            label_encoder: dir.join(LABEL_ENCODER_FILE),
            scaler: dir.join(SCALER_FILE),
            model: dir.join(DEFAULT_MODEL_FILE),
            schema: dir.join(SCHEMA_FILE),
            dir,
        }
    }

    pub fn with_model_file(mut self, file: &str) -> Self {
        self.model = self.dir.join(file);
        self
    }
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug)]
pub struct ArtifactStore {
    geography: OneHotEncoder,
    gender: LabelEncoder,
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    schema: FeatureSchema,
    loaded_at: DateTime<Utc>,
}

impl ArtifactStore {
    /// Load every artifact and verify the schema contract.
    /// Any failure is fatal: there is no degraded mode.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        tracing::info!("Loading artifacts from {}", paths.dir.display());

        let manifest: SchemaManifest = read_json(&paths.schema)?;
        verify_checksums(&paths.dir, &manifest)?;

        let geography: OneHotEncoder = read_json(&paths.onehot_encoder)?;
        let gender: LabelEncoder = read_json(&paths.label_encoder)?;
        let scaler: StandardScaler = read_json(&paths.scaler)?;
        let classifier = load_classifier(&paths.model, manifest.columns.len())?;

        let store = Self::from_parts(geography, gender, scaler, classifier, &manifest)?;

        tracing::info!(
            model = store.classifier.name(),
            backend = store.classifier.backend(),
            columns = store.schema.len(),
            one_hot = store.schema.one_hot_width(),
            schema_version = store.schema.version,
            layout_hash = %format!("{:08x}", store.schema.hash),
            "Artifacts loaded"
        );

        Ok(store)
    }

    /// Assemble a store from already-deserialized parts, running the same
    /// contract checks as `load`.
    pub fn from_parts(
        geography: OneHotEncoder,
        gender: LabelEncoder,
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
        manifest: &SchemaManifest,
    ) -> Result<Self, ArtifactError> {
        geography.check()?;
        gender.check()?;
        scaler.check()?;

        let schema = FeatureSchema::derive(&geography);
        schema.check_manifest(manifest)?;
        schema.check_columns("scaler", &scaler.feature_names)?;
        schema.check_width(classifier.name(), classifier.input_width())?;

        if classifier.output_width() != 1 {
            return Err(ArtifactError::invalid(
                classifier.name(),
                format!("expected a single output, model has {}", classifier.output_width()),
            ));
        }

        Ok(Self {
            geography,
            gender,
            scaler,
            classifier,
            schema,
            loaded_at: Utc::now(),
        })
    }

    pub fn geography_encoder(&self) -> &OneHotEncoder {
        &self.geography
    }

    pub fn gender_encoder(&self) -> &LabelEncoder {
        &self.gender
    }

    pub fn geography_categories(&self) -> &[String] {
        self.geography.categories()
    }

    pub fn gender_classes(&self) -> &[String] {
        self.gender.classes()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

// ============================================================================
// HELPERS
// ============================================================================

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let data = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 of a byte slice, lowercase hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn verify_checksums(dir: &Path, manifest: &SchemaManifest) -> Result<(), ArtifactError> {
    for (file, expected) in &manifest.checksums {
        let path = dir.join(file);
        let data = fs::read(&path).map_err(|source| ArtifactError::Io { path, source })?;
        let actual = sha256_hex(&data);

        if !actual.eq_ignore_ascii_case(expected) {
            return Err(ArtifactError::Checksum {
                file: file.clone(),
                expected: expected.clone(),
                actual,
            });
        }
        tracing::debug!("Checksum ok: {}", file);
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
