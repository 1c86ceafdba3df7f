/// Token, character and positional embeddings for abstract sentence classification
pub mod tribrid;
