use std::fmt::Display;

use super::{Classified, Label, SENTENCE_TERMINATOR};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// How section headers are emphasised
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Style {
    /// Bold headers using ANSI escape codes
    #[default]
    Ansi,

    /// No escape codes
    Plain,
}

/// A maximal run of consecutive sentences sharing a label
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    /// The label shared by every sentence in the run
    pub label: Label,

    /// The sentence texts, in order
    pub sentences: Vec<String>,
}

/// Group classified sentences into sections, starting a new one whenever the label changes
pub fn sections(classified: &[Classified]) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for item in classified {
        match sections.last_mut() {
            Some(section) if section.label == item.label => {
                section.sentences.push(item.sentence.text.clone());
            }
            _ => sections.push(Section {
                label: item.label,
                sentences: vec![item.sentence.text.clone()],
            }),
        }
    }

    sections
}

/// An abstract laid out with one header per section
#[derive(Clone, Debug)]
pub struct Formatted {
    sections: Vec<Section>,
    style: Style,
}

impl Formatted {
    /// Lay out the classified sentences of an abstract
    pub fn new(classified: &[Classified], style: Style) -> Self {
        Self {
            sections: sections(classified),
            style,
        }
    }

    /// The grouped sections
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

impl Display for Formatted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                write!(f, "\n\n")?;
            }

            match self.style {
                Style::Ansi => write!(f, "{BOLD}{}: {RESET}", section.label)?,
                Style::Plain => write!(f, "{}: ", section.label)?,
            }

            for sentence in &section.sentences {
                write!(f, "{sentence}{SENTENCE_TERMINATOR} ")?;
            }
        }

        Ok(())
    }
}
