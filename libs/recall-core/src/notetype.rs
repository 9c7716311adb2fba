//! Note-type shapes and the registry that creates them on demand.
//!
//! A shape is the `(correct, incorrect)` option count of a question. It alone
//! decides the field schema, the note-type name and the card template, so
//! two questions with the same shape always share one note type.

use crate::error::AuthoringError;
use crate::host::{Collection, NoteTypeInfo};
use crate::template;
use crate::types::{Document, Polarity};
use serde::{Deserialize, Serialize};
use std::fmt;

const BASE_NAME: &str = "Recall";
const QUESTION_FIELD: &str = "Question";

/// Option counts of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub correct: usize,
    pub incorrect: usize,
}

/// One option position in a shape, in original (unshuffled) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Position among all options; correct options come first.
    pub original_index: usize,
    pub polarity: Polarity,
    pub option_field: String,
    pub explanation_field: String,
}

impl Shape {
    pub fn new(correct: usize, incorrect: usize) -> Self {
        Self { correct, incorrect }
    }

    pub fn of(doc: &Document) -> Self {
        Self::new(doc.correct.len(), doc.incorrect.len())
    }

    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    /// `Recall` for one correct and one incorrect option, `Recall<c><i>`
    /// otherwise.
    pub fn note_type_name(&self) -> String {
        if self.correct == 1 && self.incorrect == 1 {
            BASE_NAME.to_string()
        } else {
            format!("{BASE_NAME}{}{}", self.correct, self.incorrect)
        }
    }

    /// Field suffix for the `index`-th (1-based) option of `polarity`.
    ///
    /// A lone correct option has no suffix; incorrect options always do.
    fn suffix(&self, polarity: Polarity, index: usize) -> String {
        match polarity {
            Polarity::Correct if self.correct == 1 => String::new(),
            _ => index.to_string(),
        }
    }

    pub fn option_field(&self, polarity: Polarity, index: usize) -> String {
        format!("{}Option{}", polarity.field_prefix(), self.suffix(polarity, index))
    }

    pub fn explanation_field(&self, polarity: Polarity, index: usize) -> String {
        format!("{}Explanation{}", polarity.field_prefix(), self.suffix(polarity, index))
    }

    pub fn question_field(&self) -> &'static str {
        QUESTION_FIELD
    }

    /// Every option position, correct options first.
    pub fn slots(&self) -> Vec<Slot> {
        let correct = (1..=self.correct).map(|i| (Polarity::Correct, i));
        let incorrect = (1..=self.incorrect).map(|i| (Polarity::Incorrect, i));
        correct
            .chain(incorrect)
            .enumerate()
            .map(|(original_index, (polarity, index))| Slot {
                original_index,
                polarity,
                option_field: self.option_field(polarity, index),
                explanation_field: self.explanation_field(polarity, index),
            })
            .collect()
    }

    /// The field schema, in note-type order.
    pub fn field_names(&self) -> Vec<String> {
        let mut fields = vec![QUESTION_FIELD.to_string()];
        for polarity in [Polarity::Correct, Polarity::Incorrect] {
            let count = match polarity {
                Polarity::Correct => self.correct,
                Polarity::Incorrect => self.incorrect,
            };
            fields.extend((1..=count).map(|i| self.option_field(polarity, i)));
            fields.extend((1..=count).map(|i| self.explanation_field(polarity, i)));
        }
        fields
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.correct, self.incorrect)
    }
}

/// Fetch the note type for `shape`, creating it if the collection lacks it.
///
/// An existing note type under the same name must have exactly the shape's
/// fields; `Recall111` could otherwise be either `(1, 11)` or `(11, 1)`.
pub fn ensure_note_type(
    collection: &mut dyn Collection,
    shape: Shape,
) -> Result<NoteTypeInfo, AuthoringError> {
    let name = shape.note_type_name();
    let expected = shape.field_names();

    if let Some(existing) = collection.find_note_type(&name)? {
        if existing.fields != expected {
            return Err(AuthoringError::SchemaMismatch {
                name,
                expected,
                found: existing.fields,
            });
        }
        tracing::debug!(%name, id = %existing.id, "reusing note type");
        return Ok(existing);
    }

    let info = collection.add_note_type(&template::note_type(shape))?;
    tracing::info!(%name, id = %info.id, %shape, "created note type");
    Ok(info)
}
