//! SQLite-backed collection and profile store.

use crate::db::error::DbError;
use crate::db::schema;
use chrono::{DateTime, Utc};
use recall_core::error::HostError;
use recall_core::host::{
    Collection, Deck, DeckId, NewNote, NewNoteType, NoteId, NoteTypeId, NoteTypeInfo,
    ProfileStore, LAST_DECK_KEY,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

type Result<T> = std::result::Result<T, DbError>;

/// A note as read back from the collection.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoredNote {
    pub id: NoteId,
    pub guid: String,
    pub note_type: NoteTypeId,
    pub deck: DeckId,
    pub fields: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// SQLite implementation of the host collection.
pub struct SqliteCollection {
    conn: Connection,
}

impl SqliteCollection {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let collection = Self { conn };
        collection.initialize()?;
        Ok(collection)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let collection = Self { conn };
        collection.initialize()?;
        Ok(collection)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(schema::SCHEMA)?;
        self.conn.execute_batch(schema::INIT_DEFAULT_DECK)?;
        self.conn
            .execute(schema::INIT_SCHEMA_VERSION, params![schema::SCHEMA_VERSION])?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        let version = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// All decks ordered by name, so children follow their parent.
    pub fn list_decks(&self) -> Result<Vec<Deck>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM decks ORDER BY name COLLATE NOCASE")?;
        let decks = stmt
            .query_map([], |row| {
                Ok(Deck {
                    id: DeckId(row.get(0)?),
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(decks)
    }

    pub fn get_deck(&self, id: DeckId) -> Result<Option<Deck>> {
        let deck = self
            .conn
            .query_row(
                "SELECT id, name FROM decks WHERE id = ?1",
                params![id.0],
                |row| {
                    Ok(Deck {
                        id: DeckId(row.get(0)?),
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(deck)
    }

    /// Create a deck. Empty `::` components are rejected.
    pub fn create_deck(&self, name: &str) -> Result<Deck> {
        let name = name.trim();
        if name.is_empty() || name.split("::").any(|part| part.trim().is_empty()) {
            return Err(DbError::InvalidData(format!("invalid deck name: {name:?}")));
        }

        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM decks WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        if exists {
            return Err(DbError::DuplicateDeck(name.to_string()));
        }

        self.conn
            .execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
        Ok(Deck {
            id: DeckId(self.conn.last_insert_rowid()),
            name: name.to_string(),
        })
    }

    pub fn list_note_types(&self) -> Result<Vec<NoteTypeInfo>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, fields FROM note_types ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, name, fields)| Self::note_type_info(id, name, &fields))
            .collect()
    }

    pub fn get_note_type_by_name(&self, name: &str) -> Result<Option<NoteTypeInfo>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, fields FROM note_types WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, name, fields)| Self::note_type_info(id, name, &fields))
            .transpose()
    }

    pub fn insert_note_type(&self, note_type: &NewNoteType) -> Result<NoteTypeInfo> {
        let fields = serde_json::to_string(&note_type.fields)?;
        self.conn.execute(
            "INSERT INTO note_types (name, fields, template_name, front, back, css, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                note_type.name,
                fields,
                note_type.template.name,
                note_type.template.front,
                note_type.template.back,
                note_type.css,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(NoteTypeInfo {
            id: NoteTypeId(self.conn.last_insert_rowid()),
            name: note_type.name.clone(),
            fields: note_type.fields.clone(),
        })
    }

    pub fn insert_note(&self, note: &NewNote) -> Result<NoteId> {
        let fields = serde_json::to_string(&note.fields)?;
        self.conn.execute(
            "INSERT INTO notes (guid, note_type_id, deck_id, fields, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Uuid::new_v4().to_string(),
                note.note_type.0,
                note.deck.0,
                fields,
                note.created_at.to_rfc3339(),
            ],
        )?;
        Ok(NoteId(self.conn.last_insert_rowid()))
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<StoredNote>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, guid, note_type_id, deck_id, fields, created_at FROM notes WHERE id = ?1",
                params![id.0],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, guid, note_type, deck, fields, created_at)) = row else {
            return Ok(None);
        };
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| DbError::InvalidData(format!("note {id} created_at: {e}")))?
            .with_timezone(&Utc);
        Ok(Some(StoredNote {
            id: NoteId(id),
            guid,
            note_type: NoteTypeId(note_type),
            deck: DeckId(deck),
            fields: serde_json::from_str(&fields)?,
            created_at,
        }))
    }

    pub fn count_notes(&self, deck: DeckId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE deck_id = ?1",
            params![deck.0],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn get_profile_value(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM profile WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_profile_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO profile (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn note_type_info(id: i64, name: String, fields: &str) -> Result<NoteTypeInfo> {
        Ok(NoteTypeInfo {
            id: NoteTypeId(id),
            name,
            fields: serde_json::from_str(fields)?,
        })
    }
}

impl Collection for SqliteCollection {
    fn decks(&self) -> std::result::Result<Vec<Deck>, HostError> {
        self.list_decks()
            .map_err(|e| HostError::new("listing decks", e))
    }

    fn deck(&self, id: DeckId) -> std::result::Result<Option<Deck>, HostError> {
        self.get_deck(id)
            .map_err(|e| HostError::new("reading deck", e))
    }

    fn find_note_type(&self, name: &str) -> std::result::Result<Option<NoteTypeInfo>, HostError> {
        self.get_note_type_by_name(name)
            .map_err(|e| HostError::new("reading note type", e))
    }

    fn add_note_type(
        &mut self,
        note_type: &NewNoteType,
    ) -> std::result::Result<NoteTypeInfo, HostError> {
        self.insert_note_type(note_type)
            .map_err(|e| HostError::new("creating note type", e))
    }

    fn add_note(&mut self, note: &NewNote) -> std::result::Result<NoteId, HostError> {
        self.insert_note(note)
            .map_err(|e| HostError::new("adding note", e))
    }
}

impl ProfileStore for SqliteCollection {
    fn last_deck(&self) -> std::result::Result<Option<DeckId>, HostError> {
        let Some(value) = self
            .get_profile_value(LAST_DECK_KEY)
            .map_err(|e| HostError::new("reading profile", e))?
        else {
            return Ok(None);
        };

        match value.parse::<i64>() {
            Ok(id) => Ok(Some(DeckId(id))),
            Err(_) => {
                tracing::warn!(%value, "ignoring malformed last deck");
                Ok(None)
            }
        }
    }

    fn set_last_deck(&mut self, deck: DeckId) -> std::result::Result<(), HostError> {
        self.set_profile_value(LAST_DECK_KEY, &deck.to_string())
            .map_err(|e| HostError::new("writing profile", e))
    }
}
