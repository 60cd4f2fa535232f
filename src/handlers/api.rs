//! JSON API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::artifacts::FeatureSchema;
use crate::features::input::{AGE_RANGE, CREDIT_SCORE_RANGE, NUM_OF_PRODUCTS_RANGE, TENURE_RANGE};
use crate::features::RawInput;
use crate::model::predictor::{self, InferenceStats};
use crate::pipeline::predict_churn;
use crate::presenter::PresentedResult;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(flatten)]
    pub result: PresentedResult,
    pub model: String,
    pub inference_time_us: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Range {
    pub min: i32,
    pub max: i32,
}

impl From<&std::ops::RangeInclusive<i32>> for Range {
    fn from(range: &std::ops::RangeInclusive<i32>) -> Self {
        Self {
            min: *range.start(),
            max: *range.end(),
        }
    }
}

/// Valid labels and ranges for building a client-side form
#[derive(Debug, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub geography: Vec<String>,
    pub gender: Vec<String>,
    pub credit_score: Range,
    pub age: Range,
    pub tenure: Range,
    pub num_of_products: Range,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub model: String,
    pub backend: String,
    pub input_width: usize,
    pub schema: FeatureSchema,
    pub loaded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: InferenceStats,
}

/// Score one customer
///
/// Body rejections (bad JSON, unknown Yes/No label, wrong types) come back as
/// `Validation` so every error shares the `{error, status}` body.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(input) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let result = predict_churn(&input, &state.artifacts)?;

    Ok(Json(PredictResponse {
        result: PresentedResult::from(&result),
        model: result.model,
        inference_time_us: result.inference_time_us,
    }))
}

pub async fn options(State(state): State<AppState>) -> Json<OptionsResponse> {
    Json(OptionsResponse {
        geography: state.artifacts.geography_categories().to_vec(),
        gender: state.artifacts.gender_classes().to_vec(),
        credit_score: Range::from(&CREDIT_SCORE_RANGE),
        age: Range::from(&AGE_RANGE),
        tenure: Range::from(&TENURE_RANGE),
        num_of_products: Range::from(&NUM_OF_PRODUCTS_RANGE),
    })
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let classifier = state.artifacts.classifier();

    Json(StatusResponse {
        model: classifier.name().to_string(),
        backend: classifier.backend().to_string(),
        input_width: classifier.input_width(),
        schema: state.artifacts.schema().clone(),
        loaded_at: state.artifacts.loaded_at(),
        stats: predictor::stats(),
    })
}
