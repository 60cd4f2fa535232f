//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::artifacts::ArtifactPaths;
use crate::constants::{DEFAULT_ARTIFACT_DIR, DEFAULT_BIND_ADDR, DEFAULT_MODEL_FILE, DEFAULT_PORT};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Bind address
    pub bind_addr: String,

    /// Directory holding the encoder, scaler, model and schema files
    pub artifact_dir: PathBuf,

    /// Classifier file name inside `artifact_dir`
    pub model_file: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),

            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),

            artifact_dir: env::var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ARTIFACT_DIR)),

            model_file: env::var("MODEL_FILE")
                .unwrap_or_else(|_| DEFAULT_MODEL_FILE.to_string()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Artifact locations derived from this configuration
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::new(&self.artifact_dir).with_model_file(&self.model_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            environment: "development".to_string(),
        }
    }
}
