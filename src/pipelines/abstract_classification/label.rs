use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The rhetorical role of a sentence within an abstract
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Label {
    /// Context the study builds on
    Background,

    /// What the study set out to do
    Objective,

    /// How the study was carried out
    Methods,

    /// What the study found
    Results,

    /// What the authors take away
    Conclusions,
}

impl Label {
    /// Number of rhetorical roles
    pub const COUNT: usize = 5;

    /// All roles in the order they usually appear in an abstract
    pub const ALL: [Label; Label::COUNT] = [
        Label::Background,
        Label::Objective,
        Label::Methods,
        Label::Results,
        Label::Conclusions,
    ];

    /// All roles sorted by name, which is how a label encoder numbers the classes at training
    /// time
    pub const ALPHABETICAL: [Label; Label::COUNT] = [
        Label::Background,
        Label::Conclusions,
        Label::Methods,
        Label::Objective,
        Label::Results,
    ];

    /// Get the unique string token for this label
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Background => "BACKGROUND",
            Label::Objective => "OBJECTIVE",
            Label::Methods => "METHODS",
            Label::Results => "RESULTS",
            Label::Conclusions => "CONCLUSIONS",
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| LabelError::Unknown(value.to_string()))
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Label Error
#[derive(thiserror::Error, Debug)]
pub enum LabelError {
    /// No label found for the given string
    #[error("no label found for {0}")]
    Unknown(String),
}
