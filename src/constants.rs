//! Central Configuration Constants
//!
//! Single source of truth for artifact file names and server defaults.
//! To point the service at a different artifact set, set `ARTIFACT_DIR`.

/// App name (page title)
pub const APP_NAME: &str = "Customer Churn Prediction";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Default artifact directory (relative to the working directory)
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

// ============================================
// Artifact file names
// ============================================

/// One-hot encoder fitted on Geography
pub const ONEHOT_ENCODER_FILE: &str = "onehot_encoder_geo.json";

/// Label encoder fitted on Gender
pub const LABEL_ENCODER_FILE: &str = "label_encoder_gender.json";

/// Standard scaler fitted on the assembled feature row
pub const SCALER_FILE: &str = "scaler.json";

/// Trained classifier (dense network JSON, or `.onnx` with the `onnx` feature)
pub const DEFAULT_MODEL_FILE: &str = "model.json";

/// Feature schema contract
pub const SCHEMA_FILE: &str = "feature_schema.json";
