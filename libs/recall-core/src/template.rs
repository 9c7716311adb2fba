//! Card template payload for a note-type shape.
//!
//! The front face shuffles the options and publishes the permutation on the
//! document body as `data-option-mapping`; the selected original indices go
//! to `data-selected-options`. The back face reads both and orders and marks
//! its explanation entries accordingly. Everything else here is presentation.

use crate::host::{CardTemplate, NewNoteType};
use crate::notetype::{Shape, Slot};
use crate::types::Polarity;

const CARD_NAME: &str = "Recall Card";
const CSS: &str = include_str!("../templates/recall.css");
const FRONT_SCRIPT: &str = include_str!("../templates/front.js");
const BACK_SCRIPT: &str = include_str!("../templates/back.js");

/// How many options the reviewer may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Single,
    Multiple,
}

impl SelectionMode {
    /// Radio buttons for exactly one correct option, checkboxes otherwise.
    pub fn for_shape(shape: Shape) -> Self {
        if shape.correct == 1 {
            Self::Single
        } else {
            Self::Multiple
        }
    }

    fn input_type(self) -> &'static str {
        match self {
            Self::Single => "radio",
            Self::Multiple => "checkbox",
        }
    }
}

/// The complete note type for `shape`.
pub fn note_type(shape: Shape) -> NewNoteType {
    NewNoteType {
        name: shape.note_type_name(),
        fields: shape.field_names(),
        template: CardTemplate {
            name: CARD_NAME.to_string(),
            front: front(shape),
            back: back(shape),
        },
        css: CSS.to_string(),
    }
}

fn field_ref(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    out.push_str("{{");
    out.push_str(name);
    out.push_str("}}");
    out
}

fn question(out: &mut String, shape: Shape) {
    out.push_str("<div class=\"recall-question\">");
    out.push_str(&field_ref(shape.question_field()));
    out.push_str("</div>\n");
}

fn script(out: &mut String, body: &str) {
    out.push_str("<script>\n");
    out.push_str(body);
    out.push_str("</script>\n");
}

pub fn front(shape: Shape) -> String {
    let input = SelectionMode::for_shape(shape).input_type();
    let mut out = String::new();

    out.push_str("<div class=\"recall-card recall-front\">\n");
    question(&mut out, shape);
    out.push_str("<form class=\"recall-options\" id=\"recall-options\" data-selection=\"");
    out.push_str(input);
    out.push_str("\">\n");
    for slot in shape.slots() {
        option(&mut out, &slot, input);
    }
    out.push_str("</form>\n");
    out.push_str("<button type=\"button\" class=\"recall-submit\" id=\"recall-submit\">Submit</button>\n");
    out.push_str("</div>\n");
    script(&mut out, FRONT_SCRIPT);
    out
}

fn option(out: &mut String, slot: &Slot, input: &str) {
    let index = slot.original_index.to_string();
    out.push_str("<label class=\"recall-option\" data-original-index=\"");
    out.push_str(&index);
    out.push_str("\"><input type=\"");
    out.push_str(input);
    out.push_str("\" name=\"recall-option\" value=\"");
    out.push_str(&index);
    out.push_str("\"><div class=\"recall-option-text\">");
    out.push_str(&field_ref(&slot.option_field));
    out.push_str("</div></label>\n");
}

pub fn back(shape: Shape) -> String {
    let mut out = String::new();

    out.push_str("<div class=\"recall-card recall-back\">\n");
    question(&mut out, shape);
    out.push_str("<div class=\"recall-explanations\" id=\"recall-explanations\">\n");
    for slot in shape.slots() {
        entry(&mut out, &slot);
    }
    out.push_str("</div>\n");
    out.push_str("</div>\n");
    script(&mut out, BACK_SCRIPT);
    out
}

fn entry(out: &mut String, slot: &Slot) {
    let correct = slot.polarity == Polarity::Correct;
    out.push_str("<div class=\"recall-entry\" data-original-index=\"");
    out.push_str(&slot.original_index.to_string());
    out.push_str("\" data-correct=\"");
    out.push_str(if correct { "true" } else { "false" });
    out.push_str("\"><div class=\"recall-entry-option\">");
    out.push_str(&field_ref(&slot.option_field));
    out.push_str("</div><div class=\"recall-entry-explanation\">");
    out.push_str(&field_ref(&slot.explanation_field));
    out.push_str("</div></div>\n");
}
