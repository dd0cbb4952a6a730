//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: flash cards and learner session",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Vocabulary table and review-day index",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS flash_cards (
    chunk_id INTEGER NOT NULL,
    card_id INTEGER NOT NULL,
    source_sentence TEXT NOT NULL,
    game_sentence TEXT NOT NULL,
    translation TEXT NOT NULL,

    -- Memory state, NULL until the first graded review
    last_reviewed TEXT,
    recall_strength INTEGER,
    ease_factor REAL,
    interval_days INTEGER,

    PRIMARY KEY (chunk_id, card_id)
);

CREATE INDEX IF NOT EXISTS idx_cards_chunk ON flash_cards(chunk_id);

-- Exactly one row once seeded
CREATE TABLE IF NOT EXISTS user_session (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    current_chunk_id INTEGER NOT NULL,
    flashcard_position INTEGER NOT NULL DEFAULT 0,
    user_preferences TEXT NOT NULL DEFAULT '',
    last_updated TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Vocabulary and review-day index
const MIGRATION_V2_UP: &str = r#"
CREATE TABLE IF NOT EXISTS words (
    word TEXT NOT NULL,
    word_type TEXT NOT NULL,
    translation TEXT NOT NULL,
    article TEXT
);

CREATE INDEX IF NOT EXISTS idx_words_word ON words(word);
CREATE INDEX IF NOT EXISTS idx_cards_last_reviewed ON flash_cards(last_reviewed);

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );
            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
