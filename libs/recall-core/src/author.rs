//! The authoring action: one document in, one note out.

use crate::error::{AuthoringError, ParseError};
use crate::fields::{build_fields, FieldMap};
use crate::host::{Collection, DeckId, ImageFetcher, MediaStore, NewNote, NoteId, NoteTypeInfo, ProfileStore};
use crate::image::{ImageResolver, KeepRemote};
use crate::notetype::{ensure_note_type, Shape};
use crate::parser::parse;
use chrono::Utc;
use serde::Serialize;

/// Label of the host menu entry that opens the authoring editor.
pub const MENU_LABEL: &str = "Create Recall Question";

/// Initial editor contents: a complete question with one option of each kind.
pub const PLACEHOLDER_TEMPLATE: &str = "\
#### Question
Enter your question here.
---
#### Correct Option
Enter the correct answer.
##### Explanation
Explain why this answer is correct.
---
#### Incorrect Option
Enter a wrong answer.
##### Explanation
Explain why this answer is wrong.
";

/// Result of a successful authoring action.
#[derive(Debug, Clone, Serialize)]
pub struct AuthoringOutcome {
    pub note_id: NoteId,
    pub deck: DeckId,
    pub note_type: NoteTypeInfo,
    pub shape: Shape,
    pub fields: FieldMap,
}

/// A document formatted without touching the collection.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedQuestion {
    pub note_type: String,
    pub shape: Shape,
    pub fields: FieldMap,
}

/// Runs authoring actions against a host.
pub struct Author<C, M, F> {
    collection: C,
    media: M,
    fetcher: F,
}

impl<C, M, F> Author<C, M, F>
where
    C: Collection + ProfileStore,
    M: MediaStore,
    F: ImageFetcher,
{
    pub fn new(collection: C, media: M, fetcher: F) -> Self {
        Self {
            collection,
            media,
            fetcher,
        }
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut C {
        &mut self.collection
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn into_parts(self) -> (C, M, F) {
        (self.collection, self.media, self.fetcher)
    }

    /// The deck the editor should preselect: the last one used, if it
    /// still exists.
    pub fn default_deck(&self) -> Result<Option<DeckId>, AuthoringError> {
        let Some(id) = self.collection.last_deck()? else {
            return Ok(None);
        };
        Ok(self.collection.deck(id)?.map(|deck| deck.id))
    }

    /// Parse `input`, add it as a note to `deck` (or the last used deck)
    /// and remember that deck.
    ///
    /// Nothing is written to the collection unless the document is valid
    /// and the deck exists. Images are stored before the note that
    /// references them.
    pub fn create(
        &mut self,
        input: &str,
        deck: Option<DeckId>,
    ) -> Result<AuthoringOutcome, AuthoringError> {
        let doc = parse(input)?;
        let shape = Shape::of(&doc);
        tracing::debug!(%shape, "parsed question");

        let deck = match deck {
            Some(id) => id,
            None => self
                .collection
                .last_deck()?
                .ok_or(AuthoringError::NoDeckSelected)?,
        };
        if self.collection.deck(deck)?.is_none() {
            return Err(AuthoringError::UnknownDeck(deck));
        }

        let fields = {
            let mut resolver = ImageResolver::new(&mut self.media, &self.fetcher);
            build_fields(&doc, &mut resolver)?
        };

        let note_type = ensure_note_type(&mut self.collection, shape)?;
        let note = NewNote {
            note_type: note_type.id,
            deck,
            fields: fields.clone(),
            created_at: Utc::now(),
        };
        let note_id = self.collection.add_note(&note)?;
        self.collection.set_last_deck(deck)?;

        tracing::info!(
            note = %note_id,
            %deck,
            note_type = %note_type.name,
            "added recall question"
        );

        Ok(AuthoringOutcome {
            note_id,
            deck,
            note_type,
            shape,
            fields,
        })
    }
}

impl Author<(), (), ()> {
    /// Parse and format `input` without a host. Remote images stay remote.
    pub fn render(input: &str) -> Result<RenderedQuestion, ParseError> {
        let doc = parse(input)?;
        let shape = Shape::of(&doc);
        let fields = build_fields(&doc, &mut KeepRemote)?;
        Ok(RenderedQuestion {
            note_type: shape.note_type_name(),
            shape,
            fields,
        })
    }
}
