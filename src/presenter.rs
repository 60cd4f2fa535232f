//! Result Presenter
//!
//! Turns a probability into the displayed percentage and verdict.

use serde::{Deserialize, Serialize};

use crate::model::predictor::is_churn;
use crate::model::PredictionResult;

/// `0.73` -> `"73.00%"`
pub fn format_percentage(probability: f32) -> String {
    format!("{:.2}%", probability as f64 * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelyToChurn,
    NotLikelyToChurn,
}

impl Verdict {
    pub fn from_probability(probability: f32) -> Self {
        if is_churn(probability) {
            Verdict::LikelyToChurn
        } else {
            Verdict::NotLikelyToChurn
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Verdict::LikelyToChurn => "likely to churn",
            Verdict::NotLikelyToChurn => "not likely to churn",
        }
    }

    /// Banner style: error for churn, success otherwise
    pub fn banner_class(self) -> &'static str {
        match self {
            Verdict::LikelyToChurn => "error",
            Verdict::NotLikelyToChurn => "success",
        }
    }
}

/// What the form and the JSON API show for one prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentedResult {
    pub probability: f32,
    pub percentage: String,
    pub churn: bool,
    pub verdict: Verdict,
    pub message: String,
}

impl PresentedResult {
    pub fn from_probability(probability: f32) -> Self {
        let verdict = Verdict::from_probability(probability);
        Self {
            probability,
            percentage: format_percentage(probability),
            churn: verdict == Verdict::LikelyToChurn,
            verdict,
            message: format!("The customer is {}.", verdict.text()),
        }
    }
}

impl From<&PredictionResult> for PresentedResult {
    fn from(result: &PredictionResult) -> Self {
        Self::from_probability(result.probability)
    }
}
