//! Shared parse/serialize contract for the two editor dialects.
//!
//! A transcoder turns editor text into a config value and back. Parsing is the
//! only fallible direction; serializing is total over any config value.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The textual grammar a transcoder understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// JSON object with `//` line comments.
    Quiz,
    /// Fixed-shape story generator snippet.
    Story,
}

impl Dialect {
    /// The one sentence shown in the editor when text does not parse.
    pub fn hint(self) -> &'static str {
        match self {
            Dialect::Quiz => "Hmm, that doesn't look quite right. Check your JSON and try again!",
            Dialect::Story => "Hmm, that doesn't look quite right. Check your code and try again!",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Quiz => f.write_str("quiz"),
            Dialect::Story => f.write_str("story"),
        }
    }
}

/// Malformed editor text. Displays as the dialect hint; `detail` says what
/// actually went wrong and is for tests and debugging only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .dialect.hint())]
pub struct ParseError {
    pub dialect: Dialect,
    pub detail: String,
}

impl ParseError {
    pub fn new(dialect: Dialect, detail: impl Into<String>) -> Self {
        Self { dialect, detail: detail.into() }
    }
}

pub trait Transcoder {
    type Config: Clone + PartialEq + fmt::Debug;

    const DIALECT: Dialect;

    /// Pure function of `text`: same input, same config or same failure.
    fn parse(text: &str) -> Result<Self::Config, ParseError>;

    /// Pure function of `config`: byte-identical output for equal configs.
    fn serialize(config: &Self::Config) -> String;
}
