//! Note type commands.

use crate::db::DbError;
use crate::state::AppState;
use recall_core::host::NoteTypeInfo;

/// List registered note types in creation order.
pub fn list_note_types(state: &AppState) -> Result<Vec<NoteTypeInfo>, DbError> {
    state.collection().list_note_types()
}

/// `Name: Field, Field, ...`
pub fn describe(info: &NoteTypeInfo) -> String {
    format!("{}: {}", info.name, info.fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::host::NoteTypeId;

    #[test]
    fn describe_lists_fields() {
        let info = NoteTypeInfo {
            id: NoteTypeId(1),
            name: "Recall".into(),
            fields: vec!["Question".into(), "CorrectOption".into()],
        };
        assert_eq!(describe(&info), "Recall: Question, CorrectOption");
    }
}
