//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local collection.
pub const SCHEMA: &str = r#"
-- Decks; nesting is expressed with '::' in the name
CREATE TABLE IF NOT EXISTS decks (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

-- Note types, one per option shape
CREATE TABLE IF NOT EXISTS note_types (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    fields TEXT NOT NULL,
    template_name TEXT NOT NULL,
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    css TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Notes; fields are a JSON object keyed by field name
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY,
    guid TEXT NOT NULL UNIQUE,
    note_type_id INTEGER NOT NULL REFERENCES note_types(id),
    deck_id INTEGER NOT NULL REFERENCES decks(id),
    fields TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Per-profile key/value settings
CREATE TABLE IF NOT EXISTS profile (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_notes_deck ON notes(deck_id);
CREATE INDEX IF NOT EXISTS idx_notes_note_type ON notes(note_type_id);
"#;

/// Create the default deck if not exists.
pub const INIT_DEFAULT_DECK: &str = r#"
INSERT OR IGNORE INTO decks (id, name) VALUES (1, 'Default');
"#;

/// Record the schema version if not exists.
pub const INIT_SCHEMA_VERSION: &str = r#"
INSERT OR IGNORE INTO schema_version (version) VALUES (?1);
"#;
