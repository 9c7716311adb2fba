//! Lowering of parsed fragments to the HTML stored in note fields.

pub mod code;
mod inline;
pub mod preview;

pub use code::render_code_block;
pub use inline::{format_fragment, Formatter};
pub use preview::render_preview;
