//! Features Module - Input Collection and Feature Assembly

pub mod assembler;
pub mod input;
pub mod vector;

// Re-export common types
pub use assembler::assemble;
pub use input::RawInput;
pub use vector::FeatureVector;
