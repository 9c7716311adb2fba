//! Question authoring commands.

use crate::state::AppState;
use recall_core::host::DeckId;
use recall_core::{Author, AuthoringError, AuthoringOutcome, ParseError, RenderedQuestion};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read the document from `path`, or from stdin when absent or `-`.
pub fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// Add the question in `input` to `deck`, or to the last used deck.
pub fn create_question(
    state: &mut AppState,
    input: &str,
    deck: Option<DeckId>,
) -> Result<AuthoringOutcome, AuthoringError> {
    state.author.create(input, deck)
}

/// Format the question in `input` without storing anything.
pub fn render_question(input: &str) -> Result<RenderedQuestion, ParseError> {
    Author::render(input)
}

/// One-line report of a created note.
pub fn summary(outcome: &AuthoringOutcome) -> String {
    format!(
        "Added note {} to deck {} using note type {} {}",
        outcome.note_id, outcome.deck, outcome.note_type.name, outcome.shape
    )
}
