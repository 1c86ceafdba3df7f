use std::path::{Path, PathBuf};

use burn::{
    config::Config as _,
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::Backend,
};
use tokenizers::Tokenizer;

use crate::pipelines::abstract_classification::{Classifier, FeatureBatch, FeatureConfig, Label};

use super::{Batcher, Config, Model};

/// Model config file name
pub static CONFIG_FILE: &str = "config.json";

/// Model weights file name, without the recorder's extension
pub static WEIGHTS_FILE: &str = "model";

/// Word tokenizer file name
pub static TOKENIZER_FILE: &str = "tokenizer.json";

/// Character tokenizer file name
pub static CHAR_TOKENIZER_FILE: &str = "char_tokenizer.json";

/// A loaded tribrid model, ready to classify abstracts
pub struct Tribrid<B: Backend> {
    config: Config,
    model: Model<B>,
    batcher: Batcher<B>,
}

impl<B: Backend> Tribrid<B> {
    /// Assemble a classifier from its parts, checking that they agree with each other
    pub fn new(
        config: Config,
        model: Model<B>,
        tokenizer: Tokenizer,
        char_tokenizer: Tokenizer,
        device: B::Device,
    ) -> Result<Self, ArtifactError> {
        if config.labels.is_empty() {
            return Err(ArtifactError::NoLabels);
        }

        check_vocab(TOKENIZER_FILE, &tokenizer, config.token_vocab_size)?;
        check_vocab(CHAR_TOKENIZER_FILE, &char_tokenizer, config.char_vocab_size)?;

        check_pad(TOKENIZER_FILE, &tokenizer, &config)?;
        check_pad(CHAR_TOKENIZER_FILE, &char_tokenizer, &config)?;

        let batcher = Batcher::new(tokenizer, char_tokenizer, &config, device);

        Ok(Self {
            config,
            model,
            batcher,
        })
    }

    /// Load the config, weights and tokenizers from an artifact directory
    pub fn load(artifact_dir: impl AsRef<Path>, device: B::Device) -> Result<Self, ArtifactError> {
        let artifact_dir = artifact_dir.as_ref();

        log::info!("Loading model from {}...", artifact_dir.display());

        let config_path = artifact_dir.join(CONFIG_FILE);
        let config = Config::load(&config_path).map_err(|e| ArtifactError::Config {
            path: config_path.clone(),
            message: e.to_string(),
        })?;

        let tokenizer = load_tokenizer(artifact_dir.join(TOKENIZER_FILE))?;
        let char_tokenizer = load_tokenizer(artifact_dir.join(CHAR_TOKENIZER_FILE))?;

        // Load pre-trained model weights
        log::info!("Loading weights...");

        let weights_path = artifact_dir.join(WEIGHTS_FILE);
        let record = CompactRecorder::new()
            .load(weights_path.clone(), &device)
            .map_err(|e| ArtifactError::Weights {
                path: weights_path,
                message: e.to_string(),
            })?;

        // Create model using loaded weights
        log::info!("Creating model...");

        let model = config.init::<B>(&device).load_record(record);

        Self::new(config, model, tokenizer, char_tokenizer, device)
    }

    /// Write the config, weights and tokenizers to an artifact directory
    pub fn save(&self, artifact_dir: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let artifact_dir = artifact_dir.as_ref();

        std::fs::create_dir_all(artifact_dir).map_err(|e| ArtifactError::Write {
            path: artifact_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        let config_path = artifact_dir.join(CONFIG_FILE);
        self.config
            .save(&config_path)
            .map_err(|e| ArtifactError::Write {
                path: config_path,
                message: e.to_string(),
            })?;

        let weights_path = artifact_dir.join(WEIGHTS_FILE);
        CompactRecorder::new()
            .record(self.model.clone().into_record(), weights_path.clone())
            .map_err(|e| ArtifactError::Write {
                path: weights_path,
                message: e.to_string(),
            })?;

        save_tokenizer(&self.batcher.tokenizer, artifact_dir.join(TOKENIZER_FILE))?;
        save_tokenizer(
            &self.batcher.char_tokenizer,
            artifact_dir.join(CHAR_TOKENIZER_FILE),
        )?;

        Ok(())
    }

    /// The model configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<B: Backend> Classifier for Tribrid<B> {
    fn labels(&self) -> &[Label] {
        &self.config.labels
    }

    fn feature_config(&self) -> FeatureConfig {
        self.config.feature_config()
    }

    fn predict_proba(&self, features: &FeatureBatch) -> anyhow::Result<Vec<Vec<f32>>> {
        let n_classes = self.config.labels.len();

        let item = self.batcher.batch(features)?;
        let output = self.model.infer(item);

        let probabilities = output.into_data().convert::<f32>().value;

        Ok(probabilities
            .chunks(n_classes)
            .map(<[f32]>::to_vec)
            .collect())
    }
}

fn load_tokenizer(path: PathBuf) -> Result<Tokenizer, ArtifactError> {
    Tokenizer::from_file(&path).map_err(|e| ArtifactError::Tokenizer {
        path,
        message: e.to_string(),
    })
}

fn save_tokenizer(tokenizer: &Tokenizer, path: PathBuf) -> Result<(), ArtifactError> {
    tokenizer
        .save(&path, false)
        .map_err(|e| ArtifactError::Write {
            path,
            message: e.to_string(),
        })
}

fn check_vocab(
    name: &'static str,
    tokenizer: &Tokenizer,
    vocab_size: usize,
) -> Result<(), ArtifactError> {
    let tokenizer_size = tokenizer.get_vocab_size(true);

    if tokenizer_size > vocab_size {
        return Err(ArtifactError::VocabMismatch {
            name,
            tokenizer: tokenizer_size,
            model: vocab_size,
        });
    }

    Ok(())
}

/// Every ID equal to the padding ID is masked out, so it must belong to the padding token
fn check_pad(
    name: &'static str,
    tokenizer: &Tokenizer,
    config: &Config,
) -> Result<(), ArtifactError> {
    let found = tokenizer.id_to_token(config.pad_token_id as u32);

    if found.as_deref() != Some(config.pad_token.as_str()) {
        return Err(ArtifactError::PadToken {
            name,
            id: config.pad_token_id,
            expected: config.pad_token.clone(),
            found,
        });
    }

    Ok(())
}

/// Artifact Error
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    /// The config file is missing or invalid
    #[error("unable to load config file {path}: {message}")]
    Config {
        /// The config file path
        path: PathBuf,

        /// What went wrong
        message: String,
    },

    /// The weights are missing or don't match the config
    #[error("unable to load trained model weights {path}: {message}")]
    Weights {
        /// The weights file path, without extension
        path: PathBuf,

        /// What went wrong
        message: String,
    },

    /// A tokenizer file is missing or invalid
    #[error("unable to load tokenizer {path}: {message}")]
    Tokenizer {
        /// The tokenizer file path
        path: PathBuf,

        /// What went wrong
        message: String,
    },

    /// A tokenizer produces IDs the embeddings can't look up
    #[error("{name} has {tokenizer} entries but the model only embeds {model}")]
    VocabMismatch {
        /// The tokenizer file name
        name: &'static str,

        /// The tokenizer's vocabulary size
        tokenizer: usize,

        /// The model's vocabulary size
        model: usize,
    },

    /// The padding ID belongs to some other token, which would be masked out of every sentence
    #[error("{name} maps padding ID {id} to {found:?} instead of {expected:?}")]
    PadToken {
        /// The tokenizer file name
        name: &'static str,

        /// The padding ID from the model config
        id: usize,

        /// The padding token from the model config
        expected: String,

        /// The token the tokenizer has at the padding ID
        found: Option<String>,
    },

    /// The config doesn't name any classes
    #[error("classes are not defined in the model configuration")]
    NoLabels,

    /// Part of the artifact couldn't be written
    #[error("unable to write {path}: {message}")]
    Write {
        /// The path being written
        path: PathBuf,

        /// What went wrong
        message: String,
    },
}
