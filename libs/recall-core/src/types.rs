//! Core types for recall questions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an option is a right or a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Correct,
    Incorrect,
}

impl Polarity {
    /// Header text that opens an option of this polarity.
    pub fn header(self) -> &'static str {
        match self {
            Self::Correct => "#### Correct Option",
            Self::Incorrect => "#### Incorrect Option",
        }
    }

    /// Prefix used for this polarity's field names.
    pub fn field_prefix(self) -> &'static str {
        match self {
            Self::Correct => "Correct",
            Self::Incorrect => "Incorrect",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => f.write_str("correct"),
            Self::Incorrect => f.write_str("incorrect"),
        }
    }
}

/// Languages a preview can be rendered live for.
const RENDERABLE_LANGUAGES: &[&str] = &["html", "css", "javascript", "js"];

/// A fenced code block attached to the question or to an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub language: String,
    pub code: String,
    pub renderable: bool,
}

impl Preview {
    /// Build a preview from a fence info string and its verbatim body.
    ///
    /// The language is lowercased; a missing language means `html`.
    pub fn new(language: &str, code: impl Into<String>) -> Self {
        let language = match language.trim() {
            "" => "html".to_string(),
            lang => lang.to_lowercase(),
        };
        let renderable = RENDERABLE_LANGUAGES.contains(&language.as_str());
        Self {
            language,
            code: code.into(),
            renderable,
        }
    }
}

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub text: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
    pub line_number: usize,
}

/// A parsed question document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_preview: Option<Preview>,
    pub correct: Vec<AnswerOption>,
    pub incorrect: Vec<AnswerOption>,
}

impl Document {
    /// Options of the given polarity, in input order.
    pub fn options(&self, polarity: Polarity) -> &[AnswerOption] {
        match polarity {
            Polarity::Correct => &self.correct,
            Polarity::Incorrect => &self.incorrect,
        }
    }

    pub fn option_count(&self) -> usize {
        self.correct.len() + self.incorrect.len()
    }
}
