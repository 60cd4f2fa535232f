//! Shared test fixtures

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::artifacts::encoders::{LabelEncoder, OneHotEncoder};
use crate::artifacts::scaler::StandardScaler;
use crate::artifacts::schema::SchemaManifest;
use crate::artifacts::store::read_json;
use crate::artifacts::{ArtifactPaths, ArtifactStore};
use crate::constants::{
    DEFAULT_MODEL_FILE, LABEL_ENCODER_FILE, ONEHOT_ENCODER_FILE, SCALER_FILE, SCHEMA_FILE,
};
use crate::error::InferenceError;
use crate::features::input::{RawInput, YesNo};
use crate::model::Classifier;

/// Copy of the shipped artifacts in a temp dir, checksums stripped so tests
/// can edit individual files.
pub fn fixture_dir() -> TempDir {
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts");
    let dir = tempfile::tempdir().unwrap();

    for file in [ONEHOT_ENCODER_FILE, LABEL_ENCODER_FILE, SCALER_FILE, DEFAULT_MODEL_FILE, SCHEMA_FILE] {
        fs::copy(source.join(file), dir.path().join(file)).unwrap();
    }

    let mut manifest: SchemaManifest = read_json(&dir.path().join(SCHEMA_FILE)).unwrap();
    manifest.checksums.clear();
    write_manifest(dir.path(), &manifest);

    dir
}

pub fn write_manifest(dir: &Path, manifest: &SchemaManifest) {
    fs::write(dir.join(SCHEMA_FILE), serde_json::to_vec_pretty(manifest).unwrap()).unwrap();
}

pub fn fixture_store() -> (TempDir, ArtifactStore) {
    let dir = fixture_dir();
    let store = ArtifactStore::load(&ArtifactPaths::new(dir.path())).unwrap();
    (dir, store)
}

/// Fixture encoders and scaler with a classifier that always returns `probability`
pub fn stub_store(probability: f32) -> (TempDir, ArtifactStore) {
    let dir = fixture_dir();
    let path = |file: &str| dir.path().join(file);

    let manifest: SchemaManifest = read_json(&path(SCHEMA_FILE)).unwrap();
    let geography: OneHotEncoder = read_json(&path(ONEHOT_ENCODER_FILE)).unwrap();
    let gender: LabelEncoder = read_json(&path(LABEL_ENCODER_FILE)).unwrap();
    let scaler: StandardScaler = read_json(&path(SCALER_FILE)).unwrap();
    let width = manifest.columns.len();

    let store = ArtifactStore::from_parts(
        geography,
        gender,
        scaler,
        Box::new(StubClassifier::new(probability, width)),
        &manifest,
    )
    .unwrap();

    (dir, store)
}

#[derive(Debug)]
pub struct StubClassifier {
    probability: f32,
    width: usize,
}

impl StubClassifier {
    pub fn new(probability: f32, width: usize) -> Self {
        Self { probability, width }
    }
}

impl Classifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    fn backend(&self) -> &'static str {
        "stub"
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
        Ok(self.probability)
    }
}

/// 650 / France / Female / 40 / 3 / 50000 / 2 / Yes / Yes / 60000
pub fn scenario_input() -> RawInput {
    RawInput {
        credit_score: 650,
        geography: "France".into(),
        gender: "Female".into(),
        age: 40,
        tenure: 3,
        balance: 50000.0,
        num_of_products: 2,
        has_cr_card: YesNo::Yes,
        is_active_member: YesNo::Yes,
        estimated_salary: 60000.0,
    }
}
