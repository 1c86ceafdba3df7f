use std::{fmt::Display, slice::ChunksExact};

use super::Sentence;

/// Feature Config
/// --------------

/// The default one-hot depth for a sentence's position in the abstract
pub const LINE_NUMBER_DEPTH: usize = 15;

/// The default one-hot depth for the number of sentences in the abstract
pub const TOTAL_LINES_DEPTH: usize = 20;

/// The one-hot widths a classifier was trained with
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeatureConfig {
    /// Width of the line number encoding
    pub line_number_depth: usize,

    /// Width of the total lines encoding
    pub total_lines_depth: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            line_number_depth: LINE_NUMBER_DEPTH,
            total_lines_depth: TOTAL_LINES_DEPTH,
        }
    }
}

/// The positional features derived for every sentence
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Feature {
    /// The 0-based position of the sentence
    LineNumber,

    /// The number of sentences in the abstract
    TotalLines,
}

impl Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Feature::LineNumber => "line_number",
            Feature::TotalLines => "total_lines",
        };

        write!(f, "{}", name)
    }
}

/// A row-major one-hot matrix of shape `[rows, depth]`
#[derive(Clone, Debug, PartialEq)]
pub struct OneHot {
    depth: usize,
    rows: usize,
    values: Vec<f32>,
}

impl OneHot {
    /// Encode each index as a row with a single 1 at that index. Indices that don't fit within
    /// `depth` are rejected rather than encoded as an all-zero row.
    pub fn encode<I>(indices: I, depth: usize, feature: Feature) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut values = Vec::new();
        let mut rows = 0;

        for index in indices {
            if index >= depth {
                return Err(FeatureError::OutOfRange {
                    feature,
                    index,
                    depth,
                });
            }

            let start = values.len();
            values.resize(start + depth, 0.0);
            values[start + index] = 1.0;

            rows += 1;
        }

        Ok(Self {
            depth,
            rows,
            values,
        })
    }

    /// The width of each row
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The number of rows
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Whether the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The flattened row-major values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Iterate over the rows
    pub fn rows(&self) -> ChunksExact<'_, f32> {
        self.values.chunks_exact(self.depth.max(1))
    }
}

/// Everything a classifier needs to know about the sentences of one abstract, aligned row for row
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureBatch {
    /// One-hot sentence positions: [n, line_number_depth]
    pub line_numbers: OneHot,

    /// One-hot sentence counts: [n, total_lines_depth]
    pub total_lines: OneHot,

    /// The raw sentence texts
    pub texts: Vec<String>,

    /// The sentence texts with every character separated by a space
    pub chars: Vec<String>,
}

impl FeatureBatch {
    /// Derive the features for the given sentences
    pub fn new(sentences: &[Sentence], config: &FeatureConfig) -> Result<Self, FeatureError> {
        let line_numbers = OneHot::encode(
            sentences.iter().map(|s| s.line_number),
            config.line_number_depth,
            Feature::LineNumber,
        )?;

        let total_lines = OneHot::encode(
            sentences.iter().map(|s| s.total_lines),
            config.total_lines_depth,
            Feature::TotalLines,
        )?;

        let texts = sentences.iter().map(|s| s.text.clone()).collect();
        let chars = sentences.iter().map(|s| split_chars(&s.text)).collect();

        Ok(Self {
            line_numbers,
            total_lines,
            texts,
            chars,
        })
    }

    /// The number of sentences in the batch
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the batch has no sentences
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Separate every character of the text with a single space, so a whitespace tokenizer sees one
/// token per character
pub fn split_chars(text: &str) -> String {
    let mut chars = String::with_capacity(text.len() * 2);

    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            chars.push(' ');
        }
        chars.push(c);
    }

    chars
}

/// Feature Error
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FeatureError {
    /// The index can't be represented at the configured one-hot depth
    #[error("{feature} {index} is out of range for a one-hot depth of {depth}")]
    OutOfRange {
        /// The feature being encoded
        feature: Feature,

        /// The offending value
        index: usize,

        /// The configured width
        depth: usize,
    },
}
