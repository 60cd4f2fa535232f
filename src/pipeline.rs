//! Request pipeline: validate -> assemble -> predict

use crate::artifacts::ArtifactStore;
use crate::error::AppResult;
use crate::features::{assemble, RawInput};
use crate::model::{predict, PredictionResult};

/// One full prediction for a submitted form or API call
pub fn predict_churn(input: &RawInput, artifacts: &ArtifactStore) -> AppResult<PredictionResult> {
    input.check()?;

    let vector = assemble(input, artifacts)?;
    tracing::debug!(features = %vector.to_log_entry(artifacts.schema()), "Feature vector assembled");

    let result = predict(&vector, artifacts)?;
    tracing::info!(
        probability = result.probability,
        churn = result.churn,
        latency_us = result.inference_time_us,
        "Prediction complete"
    );

    Ok(result)
}
