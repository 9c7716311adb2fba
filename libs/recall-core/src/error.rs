//! Error types for recall-core.

use crate::host::DeckId;
use crate::types::Polarity;
use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors raised while shielding, parsing or formatting a question document.
///
/// Line numbers are 1-based and refer to the text the author typed, not to
/// the shielded text the parser actually walks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("code fence opened at line {line} is never closed")]
    UnclosedFence { line: usize },

    #[error("missing \"#### Question\" header")]
    MissingQuestion,

    #[error("question at line {line} has no text")]
    EmptyQuestion { line: usize },

    #[error("no \"#### Correct Option\" or \"#### Incorrect Option\" sections found")]
    NoOptions,

    #[error("section at line {line} is marked both correct and incorrect")]
    ConflictingPolarity { line: usize },

    #[error("{polarity} option header repeated at line {line}; separate options with ---")]
    DuplicateOptionHeader { polarity: Polarity, line: usize },

    #[error("{polarity} option at line {line} has no text")]
    MissingOptionText { polarity: Polarity, line: usize },

    #[error("{polarity} option at line {line} has no explanation")]
    MissingExplanation { polarity: Polarity, line: usize },

    #[error("\"#### Preview\" at line {line} must be followed directly by a code fence")]
    MissingPreviewCode { line: usize },
}

/// Failure reported by a host adapter (collection, media store, profile).
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct HostError {
    pub context: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl HostError {
    pub fn new<E>(context: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            context,
            source: source.into(),
        }
    }
}

/// Why a remote image could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("server answered {status}")]
    Status { status: u16 },

    #[error("unexpected content type {0}")]
    ContentType(String),

    #[error("remote fetching is disabled")]
    Offline,
}

/// Everything that can abort a single authoring action.
#[derive(Debug, Error)]
pub enum AuthoringError {
    #[error("invalid question: {0}")]
    Parse(#[from] ParseError),

    #[error("no deck selected")]
    NoDeckSelected,

    #[error("deck {0} does not exist")]
    UnknownDeck(DeckId),

    #[error("note type {name} exists with fields {found:?}, expected {expected:?}")]
    SchemaMismatch {
        name: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}
