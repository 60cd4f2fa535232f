//! Artifacts Module - Fitted Preprocessors and Schema Contract
//!
//! Everything loaded from disk at startup lives here. Nothing in this module
//! is mutated after `ArtifactStore::load` returns.

pub mod encoders;
pub mod scaler;
pub mod schema;
pub mod store;

// Re-export common types
pub use schema::{FeatureSchema, BASE_COLUMN_COUNT};
pub use store::{ArtifactPaths, ArtifactStore};
