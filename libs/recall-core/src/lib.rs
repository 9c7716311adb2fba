//! Recall question authoring.
//!
//! Provides:
//! - A shield that hides fenced code from every structural and inline pass
//! - A section parser for question documents
//! - Inline and code-fence formatters producing note-field HTML
//! - Remote image resolution into a host media store
//! - Note types keyed by option shape, with their card templates
//! - The authoring flow, generic over the host's capabilities

pub mod author;
pub mod error;
pub mod fields;
pub mod format;
pub mod host;
pub mod image;
pub mod notetype;
pub mod parser;
pub mod review;
pub mod shield;
pub mod template;
pub mod types;

pub use author::{Author, AuthoringOutcome, RenderedQuestion, MENU_LABEL, PLACEHOLDER_TEMPLATE};
pub use error::{AuthoringError, FetchError, HostError, ParseError, Result};
pub use fields::{build_fields, FieldMap};
pub use host::{
    Collection, Deck, DeckId, ImageFetcher, MediaStore, NewNote, NewNoteType, NoteId, NoteTypeId,
    NoteTypeInfo, ProfileStore,
};
pub use image::{ImageResolver, KeepRemote, ResolveImage};
pub use notetype::{ensure_note_type, Shape};
pub use parser::parse;
pub use review::{Grade, OptionMapping, Selection};
pub use shield::{shield, ShieldedText};
pub use types::{AnswerOption, Document, Polarity, Preview};
