//! Capabilities the host application provides.
//!
//! Each trait is a narrow seam so the authoring pipeline can run against a
//! real collection, an on-disk media folder, or in-memory fakes in tests.

use crate::error::{FetchError, HostError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// Identifier of a deck in the host collection.
    DeckId
);
id_type!(
    /// Identifier of a note type in the host collection.
    NoteTypeId
);
id_type!(
    /// Identifier of a note in the host collection.
    NoteId
);

/// A deck as listed by the host. Nested decks use `::` in their name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
}

impl Deck {
    /// Nesting depth derived from the `::` hierarchy.
    pub fn depth(&self) -> usize {
        self.name.matches("::").count()
    }

    /// Last component of the name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }
}

/// The single card template attached to a recall note type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    pub front: String,
    pub back: String,
}

/// A note type to be registered with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNoteType {
    pub name: String,
    pub fields: Vec<String>,
    pub template: CardTemplate,
    pub css: String,
}

/// A note type as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTypeInfo {
    pub id: NoteTypeId,
    pub name: String,
    pub fields: Vec<String>,
}

/// A note ready to be added to a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub note_type: NoteTypeId,
    pub deck: DeckId,
    pub fields: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// Deck, note-type and note storage.
pub trait Collection {
    fn decks(&self) -> Result<Vec<Deck>, HostError>;
    fn deck(&self, id: DeckId) -> Result<Option<Deck>, HostError>;
    fn find_note_type(&self, name: &str) -> Result<Option<NoteTypeInfo>, HostError>;
    fn add_note_type(&mut self, note_type: &NewNoteType) -> Result<NoteTypeInfo, HostError>;
    fn add_note(&mut self, note: &NewNote) -> Result<NoteId, HostError>;
}

/// Flat, name-addressed media folder.
pub trait MediaStore {
    fn contains(&self, name: &str) -> Result<bool, HostError>;
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), HostError>;
}

/// Downloads remote images.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Per-profile settings.
pub trait ProfileStore {
    fn last_deck(&self) -> Result<Option<DeckId>, HostError>;
    fn set_last_deck(&mut self, deck: DeckId) -> Result<(), HostError>;
}

/// Profile key holding the last deck a question was added to.
pub const LAST_DECK_KEY: &str = "recall_last_deck";
