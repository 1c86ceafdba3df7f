use std::borrow::Cow;

use derive_new::new;

/// The character that ends a sentence
pub const SENTENCE_TERMINATOR: char = '.';

/// A single sentence of an abstract, along with where it sits in the abstract
#[derive(Clone, Debug, Eq, PartialEq, new)]
pub struct Sentence {
    /// The trimmed sentence text, without its terminating period
    pub text: String,

    /// The 0-based position of the sentence within the abstract
    pub line_number: usize,

    /// The total number of sentences in the abstract
    pub total_lines: usize,
}

/// Make sure the abstract ends with a terminator so the final sentence isn't dropped by the split
pub fn normalize(text: &str) -> Cow<'_, str> {
    let trimmed = text.trim_end();

    if trimmed.is_empty() || trimmed.ends_with(SENTENCE_TERMINATOR) {
        Cow::Borrowed(text)
    } else {
        log::debug!("Abstract does not end with a period, appending one");

        Cow::Owned(format!("{trimmed}{SENTENCE_TERMINATOR}"))
    }
}

/// Split an abstract into trimmed, non-empty sentence strings
pub fn split(text: &str) -> Vec<String> {
    let text = normalize(text);

    let mut segments: Vec<&str> = text.split(SENTENCE_TERMINATOR).collect();

    // Everything after the final period
    segments.pop();

    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split an abstract into sentence records, numbered in order of appearance
pub fn segment(text: &str) -> Vec<Sentence> {
    let sentences = split(text);
    let total_lines = sentences.len();

    log::debug!("Segmented abstract into {total_lines} sentences");

    sentences
        .into_iter()
        .enumerate()
        .map(|(line_number, text)| Sentence::new(text, line_number, total_lines))
        .collect()
}
