//! Model Module - Classifier Inference
//!
//! The classifier sits behind a trait so the dense JSON network and the
//! ONNX backend are interchangeable.

pub mod classifier;
pub mod dense;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod predictor;

// Re-export common types
pub use classifier::{load_classifier, Classifier};
pub use predictor::{predict, PredictionResult};
