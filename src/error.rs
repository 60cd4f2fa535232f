//! Error handling

use std::path::PathBuf;

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Errors surfaced to a single request. None of them outlive the request,
/// except `ArtifactLoad`, which only occurs at startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    ArtifactLoad(#[from] ArtifactError),

    #[error("{value:?} is not a known {field} category")]
    UnknownCategory { field: String, value: String },

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl AppError {
    pub fn unknown_category(field: impl Into<String>, value: impl Into<String>) -> Self {
        AppError::UnknownCategory {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ArtifactLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UnknownCategory { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::ArtifactLoad(err) => {
                tracing::error!("Artifact error: {}", err);
                "Model artifacts unavailable".to_string()
            }
            AppError::Inference(err) => {
                tracing::error!("Inference error: {}", err);
                "Prediction failed".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

/// Startup failure while reading or cross-checking the artifact set
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact}: {reason}")]
    Invalid { artifact: String, reason: String },

    #[error("feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("checksum mismatch for {file}: expected {expected}, got {actual}")]
    Checksum {
        file: String,
        expected: String,
        actual: String,
    },
}

impl ArtifactError {
    pub fn invalid(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);
