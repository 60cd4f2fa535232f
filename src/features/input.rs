//! Raw form input
//!
//! Field names follow the training columns (`CreditScore`, `NumOfProducts`,
//! ...) for both the HTML form and the JSON API.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::artifacts::ArtifactStore;
use crate::error::{AppError, AppResult};

// ============================================================================
// WIDGET RANGES
// ============================================================================

pub const CREDIT_SCORE_RANGE: RangeInclusive<i32> = 300..=900;
pub const AGE_RANGE: RangeInclusive<i32> = 18..=92;
pub const TENURE_RANGE: RangeInclusive<i32> = 0..=10;
pub const NUM_OF_PRODUCTS_RANGE: RangeInclusive<i32> = 1..=4;

// ============================================================================
// YES / NO
// ============================================================================

/// Two-way choice mapped to 0/1 before leaving the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YesNo {
    #[default]
    No,
    Yes,
}

impl YesNo {
    pub const CHOICES: [YesNo; 2] = [YesNo::No, YesNo::Yes];

    pub fn as_flag(self) -> f32 {
        match self {
            YesNo::Yes => 1.0,
            YesNo::No => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

// ============================================================================
// RAW INPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct RawInput {
    #[validate(range(min = 300, max = 900))]
    pub credit_score: i32,
    pub geography: String,
    pub gender: String,
    #[validate(range(min = 18, max = 92))]
    pub age: i32,
    #[validate(range(min = 0, max = 10))]
    pub tenure: i32,
    pub balance: f64,
    #[validate(range(min = 1, max = 4))]
    pub num_of_products: i32,
    pub has_cr_card: YesNo,
    pub is_active_member: YesNo,
    pub estimated_salary: f64,
}

impl RawInput {
    /// Initial widget values: first label of each vocabulary, range minimums
    pub fn initial(artifacts: &ArtifactStore) -> Self {
        Self {
            credit_score: *CREDIT_SCORE_RANGE.start(),
            geography: artifacts.geography_categories().first().cloned().unwrap_or_default(),
            gender: artifacts.gender_classes().first().cloned().unwrap_or_default(),
            age: *AGE_RANGE.start(),
            tenure: *TENURE_RANGE.start(),
            balance: 0.0,
            num_of_products: *NUM_OF_PRODUCTS_RANGE.start(),
            has_cr_card: YesNo::No,
            is_active_member: YesNo::No,
            estimated_salary: 0.0,
        }
    }

    /// Range checks the widgets would otherwise enforce
    pub fn check(&self) -> AppResult<()> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        for (name, value) in [("Balance", self.balance), ("EstimatedSalary", self.estimated_salary)] {
            if !value.is_finite() {
                return Err(AppError::Validation(format!("{}: must be a finite number", name)));
            }
        }

        Ok(())
    }
}
