//! Predictor - one classifier call per feature vector
//!
//! Stateless with respect to prior calls. The process-wide counters only
//! feed the status endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactStore;
use crate::error::InferenceError;
use crate::features::FeatureVector;

/// Probabilities strictly above this are a churn verdict. Not configurable.
pub const CHURN_THRESHOLD: f32 = 0.5;

// ============================================================================
// STATE
// ============================================================================

/// Latency stats
static LATENCY_SUM: AtomicU64 = AtomicU64::new(0);
static INFERENCE_COUNT: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub probability: f32,        // 0.0 - 1.0
    pub churn: bool,
    pub model: String,
    pub inference_time_us: u64,  // Microseconds
}

/// Inference counters for the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceStats {
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

// ============================================================================
// PREDICTION
// ============================================================================

pub fn is_churn(probability: f32) -> bool {
    probability > CHURN_THRESHOLD
}

/// Score one assembled vector
pub fn predict(vector: &FeatureVector, artifacts: &ArtifactStore) -> Result<PredictionResult, InferenceError> {
    let start_time = Instant::now();

    vector.check_layout(artifacts.schema())?;

    let classifier = artifacts.classifier();
    let probability = classifier.predict(vector.as_slice())?;

    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(InferenceError(format!(
            "{} returned {} which is not a probability",
            classifier.name(),
            probability
        )));
    }

    let inference_time = start_time.elapsed().as_micros() as u64;

    LATENCY_SUM.fetch_add(inference_time, Ordering::Relaxed);
    INFERENCE_COUNT.fetch_add(1, Ordering::Relaxed);

    Ok(PredictionResult {
        probability,
        churn: is_churn(probability),
        model: classifier.name().to_string(),
        inference_time_us: inference_time,
    })
}

pub fn stats() -> InferenceStats {
    let sum = LATENCY_SUM.load(Ordering::Relaxed);
    let count = INFERENCE_COUNT.load(Ordering::Relaxed);
    let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

    InferenceStats {
        inference_count: count,
        avg_latency_ms: avg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{fixture_store, stub_store};

    #[test]
    fn test_threshold_is_strict() {
        assert!(!is_churn(0.5));
        assert!(is_churn(0.500_001));
        assert!(!is_churn(0.0));
        assert!(is_churn(1.0));
    }

    #[test]
    fn test_predict_with_stub() {
        let (_dir, store) = stub_store(0.73);
        let vector = FeatureVector::new(store.schema(), vec![0.0; store.schema().len()]);

        let result = predict(&vector, &store).unwrap();
        assert_eq!(result.probability, 0.73);
        assert!(result.churn);
        assert_eq!(result.model, "stub");
    }

    #[test]
    fn test_exact_threshold_is_not_churn() {
        let (_dir, store) = stub_store(0.5);
        let vector = FeatureVector::new(store.schema(), vec![0.0; store.schema().len()]);
        assert!(!predict(&vector, &store).unwrap().churn);
    }

    #[test]
    fn test_out_of_range_output_rejected() {
        let (_dir, store) = stub_store(1.5);
        let vector = FeatureVector::new(store.schema(), vec![0.0; store.schema().len()]);
        assert!(predict(&vector, &store).is_err());

        let (_dir, store) = stub_store(f32::NAN);
        let vector = FeatureVector::new(store.schema(), vec![0.0; store.schema().len()]);
        assert!(predict(&vector, &store).is_err());
    }

    #[test]
    fn test_wrong_width_is_inference_error() {
        let (_dir, store) = fixture_store();
        let vector = FeatureVector::new(store.schema(), vec![0.0; 10]);

        let err = predict(&vector, &store).unwrap_err();
        assert!(err.0.contains("expects 12"), "got {}", err);
    }

    #[test]
    fn test_stats_count_predictions() {
        let (_dir, store) = fixture_store();
        let vector = FeatureVector::new(store.schema(), vec![0.0; store.schema().len()]);

        let before = stats().inference_count;
        predict(&vector, &store).unwrap();
        assert!(stats().inference_count > before);
    }
}
