//! Label the sentences of a scientific abstract with their rhetorical roles

/// Rhetorical role labels
pub mod label;

/// Sentence segmentation
pub mod segmenter;

/// Per-sentence features for the classifier
pub mod features;

/// The classifier capability
pub mod classifier;

/// Grouped output
pub mod formatter;

/// Runtime settings
pub mod config;

/// Inference
pub mod inference;

pub use classifier::{Classifier, ClassifierError};
pub use config::Settings;
pub use features::{FeatureBatch, FeatureConfig, FeatureError};
pub use formatter::{Formatted, Section, Style};
pub use inference::{classify, skim, Classified};
pub use label::Label;
pub use segmenter::{Sentence, SENTENCE_TERMINATOR};

/// The unique string token that identifies this pipeline
pub static PIPELINE: &str = "abstract-classification";
