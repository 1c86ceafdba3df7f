use burn::{
    nn::{DropoutConfig, EmbeddingConfig, LinearConfig},
    tensor::backend::Backend,
};

use crate::pipelines::abstract_classification::{
    features::{LINE_NUMBER_DEPTH, TOTAL_LINES_DEPTH},
    FeatureConfig, Label,
};

use super::Model;

/// The Model Configuration
#[derive(burn::config::Config)]
pub struct Config {
    /// Number of entries in the word tokenizer's vocabulary
    pub token_vocab_size: usize,

    /// Number of entries in the character tokenizer's vocabulary
    pub char_vocab_size: usize,

    /// Class labels in the order of the output columns
    #[config(default = "Label::ALPHABETICAL.to_vec()")]
    pub labels: Vec<Label>,

    /// One-hot width of the line number input
    #[config(default = "LINE_NUMBER_DEPTH")]
    pub line_number_depth: usize,

    /// One-hot width of the total lines input
    #[config(default = "TOTAL_LINES_DEPTH")]
    pub total_lines_depth: usize,

    /// Maximum number of word tokens per sentence
    #[config(default = 55)]
    pub max_seq_len: usize,

    /// Maximum number of characters per sentence
    #[config(default = 290)]
    pub max_char_len: usize,

    /// The padding token, shared by both tokenizers
    #[config(default = "\"[PAD]\".to_string()")]
    pub pad_token: String,

    /// The padding token ID, shared by both tokenizers
    #[config(default = 0)]
    pub pad_token_id: usize,

    /// Size of the word embeddings
    #[config(default = 128)]
    pub token_embedding_size: usize,

    /// Size of the character embeddings
    #[config(default = 25)]
    pub char_embedding_size: usize,

    /// Output size of the word branch
    #[config(default = 128)]
    pub token_hidden_size: usize,

    /// Output size of the character branch
    #[config(default = 32)]
    pub char_hidden_size: usize,

    /// Output size of the combined word and character layer
    #[config(default = 256)]
    pub hybrid_hidden_size: usize,

    /// Output size of each positional branch
    #[config(default = 32)]
    pub position_hidden_size: usize,

    /// Dropout rate
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl Config {
    /// The one-hot widths used to build features for this model
    pub fn feature_config(&self) -> FeatureConfig {
        FeatureConfig {
            line_number_depth: self.line_number_depth,
            total_lines_depth: self.total_lines_depth,
        }
    }

    /// Initializes a tribrid model with default weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let n_classes = self.labels.len();

        let hybrid_input = self.token_hidden_size + self.char_hidden_size;
        let tribrid_input = self.hybrid_hidden_size + 2 * self.position_hidden_size;

        Model {
            token_embedding: EmbeddingConfig::new(
                self.token_vocab_size,
                self.token_embedding_size,
            )
            .init(device),
            token_dense: LinearConfig::new(self.token_embedding_size, self.token_hidden_size)
                .init(device),
            char_embedding: EmbeddingConfig::new(self.char_vocab_size, self.char_embedding_size)
                .init(device),
            char_dense: LinearConfig::new(self.char_embedding_size, self.char_hidden_size)
                .init(device),
            hybrid_dense: LinearConfig::new(hybrid_input, self.hybrid_hidden_size).init(device),
            line_number_dense: LinearConfig::new(
                self.line_number_depth,
                self.position_hidden_size,
            )
            .init(device),
            total_lines_dense: LinearConfig::new(
                self.total_lines_depth,
                self.position_hidden_size,
            )
            .init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
            output: LinearConfig::new(tribrid_input, n_classes).init(device),
        }
    }
}
