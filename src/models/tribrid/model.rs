use burn::{
    module::Module,
    nn::{Dropout, Embedding, Linear},
    tensor::{
        activation::{relu, softmax},
        backend::Backend,
        Tensor,
    },
};

use crate::utils::tensors::masked_mean;

use super::batcher::Infer;

/// Token, character and positional embeddings combined into one sentence classifier
#[derive(Module, Debug)]
pub struct Model<B: Backend> {
    /// Word embeddings
    pub token_embedding: Embedding<B>,

    /// Projection of the pooled word embeddings
    pub token_dense: Linear<B>,

    /// Character embeddings
    pub char_embedding: Embedding<B>,

    /// Projection of the pooled character embeddings
    pub char_dense: Linear<B>,

    /// Mixes the word and character branches
    pub hybrid_dense: Linear<B>,

    /// Projection of the one-hot line number
    pub line_number_dense: Linear<B>,

    /// Projection of the one-hot total lines
    pub total_lines_dense: Linear<B>,

    /// Dropout, only active when training
    pub dropout: Dropout,

    /// Linear layer for sentence classification
    pub output: Linear<B>,
}

impl<B: Backend> Model<B> {
    /// Defines forward pass for inference, returning class probabilities: [batch_size, n_classes]
    pub fn infer(&self, input: Infer<B>) -> Tensor<B, 2> {
        let tokens = self.token_embedding.forward(input.tokens);
        let tokens = relu(self.token_dense.forward(masked_mean(tokens, input.tokens_mask_pad)));

        let chars = self.char_embedding.forward(input.chars);
        let chars = relu(self.char_dense.forward(masked_mean(chars, input.chars_mask_pad)));

        let hybrid = relu(self.hybrid_dense.forward(Tensor::cat(vec![tokens, chars], 1)));
        let hybrid = self.dropout.forward(hybrid);

        let line_numbers = relu(self.line_number_dense.forward(input.line_numbers));
        let total_lines = relu(self.total_lines_dense.forward(input.total_lines));

        let tribrid = Tensor::cat(vec![line_numbers, total_lines, hybrid], 1);
        let tribrid = self.dropout.forward(tribrid);

        softmax(self.output.forward(tribrid), 1)
    }
}
