//! Review-time data exchanged between the card faces and the host.
//!
//! The front face stores an [`OptionMapping`] as JSON in the body's
//! `data-option-mapping` attribute and reports the picked options through
//! a `recall:submit:<json>` host command. Indices are always original
//! (pre-shuffle) positions, with correct options first.

use crate::notetype::Shape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Prefix of the host command the front face sends on submit.
pub const SUBMIT_COMMAND: &str = "recall:submit:";

/// The shuffle applied by the front face, in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionMapping {
    pub original_to_shuffled: Vec<usize>,
    pub shuffled_to_original: Vec<usize>,
}

impl OptionMapping {
    /// Build the mapping from the displayed order, where `order[k]` is the
    /// original index shown at position `k`.
    ///
    /// Returns `None` unless `order` is a permutation of `0..order.len()`.
    pub fn from_order(order: Vec<usize>) -> Option<Self> {
        let mut original_to_shuffled = vec![usize::MAX; order.len()];
        for (shuffled, &original) in order.iter().enumerate() {
            let slot = original_to_shuffled.get_mut(original)?;
            if *slot != usize::MAX {
                return None;
            }
            *slot = shuffled;
        }
        Some(Self {
            original_to_shuffled,
            shuffled_to_original: order,
        })
    }

    /// The mapping that leaves every option in place.
    pub fn identity(len: usize) -> Self {
        Self {
            original_to_shuffled: (0..len).collect(),
            shuffled_to_original: (0..len).collect(),
        }
    }

    /// Whether both directions describe the same permutation.
    pub fn is_sound(&self) -> bool {
        self.original_to_shuffled.len() == self.shuffled_to_original.len()
            && self
                .original_to_shuffled
                .iter()
                .enumerate()
                .all(|(original, &shuffled)| {
                    self.shuffled_to_original.get(shuffled) == Some(&original)
                })
    }
}

/// Why a submit command could not be decoded.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("not a recall submit command")]
    NotSubmit,

    #[error("malformed selection: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Original indices the reviewer picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub picked: BTreeSet<usize>,
}

/// How a selection compares with the correct answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grade {
    pub correct_selected: Vec<usize>,
    pub missed: Vec<usize>,
    pub wrong_selected: Vec<usize>,
}

impl Grade {
    pub fn is_perfect(&self) -> bool {
        self.missed.is_empty() && self.wrong_selected.is_empty()
    }
}

impl Selection {
    pub fn new(picked: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picked: picked.into_iter().collect(),
        }
    }

    /// Decode `recall:submit:[0,2]`.
    pub fn parse_command(command: &str) -> Result<Self, CommandError> {
        let payload = command
            .strip_prefix(SUBMIT_COMMAND)
            .ok_or(CommandError::NotSubmit)?;
        let picked: Vec<usize> = serde_json::from_str(payload)?;
        Ok(Self::new(picked))
    }

    /// Encode as the command the front face sends.
    pub fn to_command(&self) -> String {
        let picked: Vec<usize> = self.picked.iter().copied().collect();
        let mut command = SUBMIT_COMMAND.to_string();
        command.push_str(&serde_json::Value::from(picked).to_string());
        command
    }

    /// Compare against `shape`. Indices outside the shape count as wrong.
    pub fn grade(&self, shape: Shape) -> Grade {
        let correct = 0..shape.correct;
        Grade {
            correct_selected: self
                .picked
                .iter()
                .copied()
                .filter(|i| correct.contains(i))
                .collect(),
            missed: correct.clone().filter(|i| !self.picked.contains(i)).collect(),
            wrong_selected: self
                .picked
                .iter()
                .copied()
                .filter(|i| !correct.contains(i))
                .collect(),
        }
    }
}
