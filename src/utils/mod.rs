/// Tensor Utilities
pub mod tensors;
