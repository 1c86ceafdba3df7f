use burn::{
    nn::attention::generate_padding_mask,
    tensor::{backend::Backend, Bool, Int, Tensor},
};
use derive_new::new;
use tokenizers::Tokenizer;

use crate::{pipelines::abstract_classification::FeatureBatch, utils::tensors};

use super::Config;

/// An inference batch for the tribrid model
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// One-hot line numbers: [batch_size, line_number_depth]
    pub line_numbers: Tensor<B, 2>,

    /// One-hot total lines: [batch_size, total_lines_depth]
    pub total_lines: Tensor<B, 2>,

    /// Tokenized words as 2D tensor: [batch_size, max_seq_length]
    pub tokens: Tensor<B, 2, Int>,

    /// Padding mask for the tokenized words
    pub tokens_mask_pad: Tensor<B, 2, Bool>,

    /// Tokenized characters as 2D tensor: [batch_size, max_char_length]
    pub chars: Tensor<B, 2, Int>,

    /// Padding mask for the tokenized characters
    pub chars_mask_pad: Tensor<B, 2, Bool>,
}

/// Struct for turning feature batches into model input
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Tokenizer for converting sentence text to word IDs
    pub tokenizer: Tokenizer,

    /// Tokenizer for converting space-separated characters to character IDs
    pub char_tokenizer: Tokenizer,

    /// Maximum number of word tokens per sentence
    pub max_seq_length: usize,

    /// Maximum number of characters per sentence
    pub max_char_length: usize,

    /// ID of the padding token
    pub pad_token_id: usize,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(
        tokenizer: Tokenizer,
        char_tokenizer: Tokenizer,
        config: &Config,
        device: B::Device,
    ) -> Self {
        Self {
            tokenizer,
            char_tokenizer,
            max_seq_length: config.max_seq_len,
            max_char_length: config.max_char_len,
            pad_token_id: config.pad_token_id,
            device,
        }
    }

    /// Collects the features of an abstract into an inference batch
    pub fn batch(&self, features: &FeatureBatch) -> anyhow::Result<Infer<B>> {
        let tokens = generate_padding_mask(
            self.pad_token_id,
            self.encode(&self.tokenizer, &features.texts)?,
            Some(self.max_seq_length),
            &self.device,
        );

        let chars = generate_padding_mask(
            self.pad_token_id,
            self.encode(&self.char_tokenizer, &features.chars)?,
            Some(self.max_char_length),
            &self.device,
        );

        let line_numbers = tensors::matrix(
            features.line_numbers.values(),
            features.line_numbers.len(),
            features.line_numbers.depth(),
            &self.device,
        );

        let total_lines = tensors::matrix(
            features.total_lines.values(),
            features.total_lines.len(),
            features.total_lines.depth(),
            &self.device,
        );

        Ok(Infer {
            line_numbers,
            total_lines,
            tokens: tokens.tensor,
            tokens_mask_pad: tokens.mask,
            chars: chars.tensor,
            chars_mask_pad: chars.mask,
        })
    }

    /// Tokenize each text. Texts with no tokens get a single padding token so every row has a
    /// length.
    fn encode(&self, tokenizer: &Tokenizer, texts: &[String]) -> anyhow::Result<Vec<Vec<usize>>> {
        texts
            .iter()
            .map(|text| {
                let encoding = tokenizer
                    .encode(text.as_str(), false)
                    .map_err(|e| anyhow!("Unable to encode {:?}: {}", text, e))?;

                let mut token_ids: Vec<_> =
                    encoding.get_ids().iter().map(|t| *t as usize).collect();

                if token_ids.is_empty() {
                    token_ids.push(self.pad_token_id);
                }

                Ok(token_ids)
            })
            .collect()
    }
}
