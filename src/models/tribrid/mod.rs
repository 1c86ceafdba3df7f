//! A tribrid sentence classifier: word embeddings, character embeddings and the sentence's
//! position in the abstract, combined to predict its rhetorical role

/// The model configuration
pub mod config;

/// The model
pub mod model;

/// Turns feature batches into tensors
pub mod batcher;

/// Artifact loading and inference
pub mod inference;

pub use batcher::{Batcher, Infer};
pub use config::Config;
pub use inference::{ArtifactError, Tribrid};
pub use model::{Model, ModelRecord};

/// The base model type
pub static MODEL_TYPE: &str = "tribrid";
