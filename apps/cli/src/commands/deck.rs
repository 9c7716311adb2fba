//! Deck commands.

use crate::db::DbError;
use crate::state::AppState;
use recall_core::host::{Collection, Deck, DeckId};
use recall_core::AuthoringError;
use serde::Serialize;

/// One row of the deck picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckEntry {
    pub id: DeckId,
    pub name: String,
    /// Short name indented two spaces per `::` level.
    pub label: String,
    pub selected: bool,
}

/// Order decks by full name and indent each by its nesting depth.
pub fn deck_picker(decks: &[Deck], selected: Option<DeckId>) -> Vec<DeckEntry> {
    let mut decks = decks.to_vec();
    decks.sort_by_key(|deck| deck.name.to_lowercase());
    decks
        .into_iter()
        .map(|deck| DeckEntry {
            label: format!("{}{}", "  ".repeat(deck.depth()), deck.short_name()),
            selected: Some(deck.id) == selected,
            id: deck.id,
            name: deck.name,
        })
        .collect()
}

/// List all decks, marking the one new questions go to by default.
pub fn list_decks(state: &AppState) -> Result<Vec<DeckEntry>, AuthoringError> {
    let decks = state.collection().decks()?;
    let selected = state.author.default_deck()?;
    Ok(deck_picker(&decks, selected))
}

/// Create a deck.
pub fn add_deck(state: &AppState, name: &str) -> Result<Deck, DbError> {
    let deck = state.collection().create_deck(name)?;
    tracing::info!(id = %deck.id, name = %deck.name, "created deck");
    Ok(deck)
}
