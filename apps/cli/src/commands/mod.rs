//! Commands exposed on the command line.

pub mod create;
pub mod deck;
pub mod notetype;

pub use create::{create_question, read_input, render_question, summary};
pub use deck::{add_deck, deck_picker, list_decks, DeckEntry};
pub use notetype::{describe, list_note_types};
