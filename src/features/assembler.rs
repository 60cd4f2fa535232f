//! Feature Assembler
//!
//! RawInput -> label-encoded base record + one-hot Geography -> scaled
//! FeatureVector, in schema column order.

use super::input::RawInput;
use super::vector::FeatureVector;
use crate::artifacts::{ArtifactStore, BASE_COLUMN_COUNT};
use crate::error::{AppResult, InferenceError};

/// Unscaled row: base columns then one-hot columns
pub fn encode(input: &RawInput, artifacts: &ArtifactStore) -> AppResult<Vec<f32>> {
    let gender = artifacts.gender_encoder().transform(&input.gender)?;

    let base: [f32; BASE_COLUMN_COUNT] = [
        input.credit_score as f32,
        gender as f32,
        input.age as f32,
        input.tenure as f32,
        input.balance as f32,
        input.num_of_products as f32,
        input.has_cr_card.as_flag(),
        input.is_active_member.as_flag(),
        input.estimated_salary as f32,
    ];

    let geography = artifacts.geography_encoder().transform(&input.geography)?;

    let schema = artifacts.schema();
    let mut row = Vec::with_capacity(schema.len());
    row.extend_from_slice(&base);
    row.extend(geography);

    if row.len() != schema.len() {
        return Err(InferenceError(format!(
            "assembled {} columns, schema has {}",
            row.len(),
            schema.len()
        ))
        .into());
    }

    Ok(row)
}

/// Encode and scale one input
pub fn assemble(input: &RawInput, artifacts: &ArtifactStore) -> AppResult<FeatureVector> {
    let row = encode(input, artifacts)?;
    let scaled = artifacts.scaler().transform(&row)?;
    Ok(FeatureVector::new(artifacts.schema(), scaled))
}
