//! Feature Vector - classifier input
//!
//! **Versioned feature vector with layout validation**
//!
//! Carries the schema version and layout hash it was assembled against so a
//! vector built for one artifact set is never scored by another.

use serde::{Deserialize, Serialize};

use crate::artifacts::FeatureSchema;
use crate::error::InferenceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature schema version
    pub version: u8,
    /// CRC32 hash of the column layout (for mismatch detection)
    pub layout_hash: u32,
    /// Scaled values in schema column order
    pub values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(schema: &FeatureSchema, values: Vec<f32>) -> Self {
        Self {
            version: schema.version,
            layout_hash: schema.hash,
            values,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Get feature by column name
    #[cfg(test)]
    pub fn get_by_name(&self, schema: &FeatureSchema, name: &str) -> Option<f32> {
        schema.index(name).and_then(|i| self.values.get(i).copied())
    }

    /// Reject vectors built against a different layout
    pub fn check_layout(&self, schema: &FeatureSchema) -> Result<(), InferenceError> {
        if self.version != schema.version || self.layout_hash != schema.hash {
            return Err(InferenceError(format!(
                "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
                schema.version, schema.hash, self.version, self.layout_hash
            )));
        }
        Ok(())
    }

    /// JSON form for debug logging
    pub fn to_log_entry(&self, schema: &FeatureSchema) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": schema.columns()
                .iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.clone(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::encoders::OneHotEncoder;

    fn schema() -> FeatureSchema {
        FeatureSchema::derive(&OneHotEncoder::new(
            "Geography",
            vec!["France".into(), "Germany".into()],
        ))
    }

    #[test]
    fn test_get_by_name() {
        let schema = schema();
        let mut values = vec![0.0; schema.len()];
        values[2] = 40.0;
        let vector = FeatureVector::new(&schema, values);

        assert_eq!(vector.get_by_name(&schema, "Age"), Some(40.0));
        assert_eq!(vector.get_by_name(&schema, "Geography_Germany"), Some(0.0));
        assert_eq!(vector.get_by_name(&schema, "Surname"), None);
    }

    #[test]
    fn test_check_layout() {
        let schema = schema();
        let mut vector = FeatureVector::new(&schema, vec![0.0; schema.len()]);
        assert!(vector.check_layout(&schema).is_ok());

        vector.layout_hash = !schema.hash;
        assert!(vector.check_layout(&schema).is_err());
    }

    #[test]
    fn test_to_log_entry() {
        let schema = schema();
        let vector = FeatureVector::new(&schema, vec![1.0; schema.len()]);

        let log = vector.to_log_entry(&schema);
        assert_eq!(log["feature_version"], schema.version);
        assert_eq!(log["named_values"]["CreditScore"], 1.0);
    }
}
