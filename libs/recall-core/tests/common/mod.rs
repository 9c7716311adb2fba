//! Common test utilities for integration tests.
//!
//! In-memory implementations of every host capability, so the authoring
//! flow can run end to end without a real collection or network.

#![allow(dead_code)]

pub mod fixtures;

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use recall_core::error::{FetchError, HostError};
use recall_core::host::{
    Collection, Deck, DeckId, ImageFetcher, MediaStore, NewNote, NewNoteType, NoteId, NoteTypeId,
    NoteTypeInfo, ProfileStore,
};
use recall_core::Author;

/// Collection and profile held in memory.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    pub decks: Vec<Deck>,
    pub note_types: Vec<(NoteTypeInfo, NewNoteType)>,
    pub notes: Vec<(NoteId, NewNote)>,
    pub last_deck: Option<DeckId>,
}

impl MemoryCollection {
    /// A collection holding only the `Default` deck (id 1).
    pub fn new() -> Self {
        Self {
            decks: vec![Deck {
                id: DeckId(1),
                name: "Default".into(),
            }],
            ..Self::default()
        }
    }

    pub fn with_deck(mut self, id: i64, name: &str) -> Self {
        self.decks.push(Deck {
            id: DeckId(id),
            name: name.into(),
        });
        self
    }

    pub fn note_type_names(&self) -> Vec<&str> {
        self.note_types.iter().map(|(info, _)| info.name.as_str()).collect()
    }

    pub fn last_note(&self) -> &NewNote {
        &self.notes.last().expect("no notes added").1
    }
}

impl Collection for MemoryCollection {
    fn decks(&self) -> Result<Vec<Deck>, HostError> {
        Ok(self.decks.clone())
    }

    fn deck(&self, id: DeckId) -> Result<Option<Deck>, HostError> {
        Ok(self.decks.iter().find(|deck| deck.id == id).cloned())
    }

    fn find_note_type(&self, name: &str) -> Result<Option<NoteTypeInfo>, HostError> {
        Ok(self
            .note_types
            .iter()
            .find(|(info, _)| info.name == name)
            .map(|(info, _)| info.clone()))
    }

    fn add_note_type(&mut self, note_type: &NewNoteType) -> Result<NoteTypeInfo, HostError> {
        let info = NoteTypeInfo {
            id: NoteTypeId(self.note_types.len() as i64 + 1),
            name: note_type.name.clone(),
            fields: note_type.fields.clone(),
        };
        self.note_types.push((info.clone(), note_type.clone()));
        Ok(info)
    }

    fn add_note(&mut self, note: &NewNote) -> Result<NoteId, HostError> {
        if !self.note_types.iter().any(|(info, _)| info.id == note.note_type) {
            return Err(HostError::new("adding note", "unknown note type"));
        }
        let id = NoteId(self.notes.len() as i64 + 1);
        self.notes.push((id, note.clone()));
        Ok(id)
    }
}

impl ProfileStore for MemoryCollection {
    fn last_deck(&self) -> Result<Option<DeckId>, HostError> {
        Ok(self.last_deck)
    }

    fn set_last_deck(&mut self, deck: DeckId) -> Result<(), HostError> {
        self.last_deck = Some(deck);
        Ok(())
    }
}

/// Media folder held in memory.
#[derive(Debug, Default)]
pub struct MemoryMedia {
    pub files: HashMap<String, Vec<u8>>,
}

impl MediaStore for MemoryMedia {
    fn contains(&self, name: &str) -> Result<bool, HostError> {
        Ok(self.files.contains_key(name))
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), HostError> {
        self.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Serves fixed bytes per URL and counts requests. Unknown URLs fail as
/// if the network were unreachable.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    pub responses: BTreeMap<String, Vec<u8>>,
    pub calls: Cell<usize>,
}

impl FakeFetcher {
    pub fn serving(url: &str, bytes: &[u8]) -> Self {
        let mut fetcher = Self::default();
        fetcher.responses.insert(url.to_string(), bytes.to_vec());
        fetcher
    }

    pub fn offline() -> Self {
        Self::default()
    }
}

impl ImageFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Request(format!("could not resolve {url}")))
    }
}

pub type TestAuthor = Author<MemoryCollection, MemoryMedia, FakeFetcher>;

/// An author over an empty collection with no network.
pub fn offline_author() -> TestAuthor {
    Author::new(MemoryCollection::new(), MemoryMedia::default(), FakeFetcher::offline())
}
