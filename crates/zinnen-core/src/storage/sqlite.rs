//! SQLite Storage Implementation
//!
//! The on-device deck: cards, vocabulary and the session singleton.

use chrono::NaiveDate;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{check_memory, CardStore, DeckImport, DeckSeeder, ImportSummary, Result, StorageError};
use crate::card::{format_day, parse_day, CardKey, FlashCard, UserSession, VocabCard};

const CARD_COLUMNS: &str = "chunk_id, card_id, source_sentence, game_sentence, translation,
     last_reviewed, recall_strength, ease_factor, interval_days";

/// Due predicate: never reviewed, or review day plus interval has arrived
const DUE_DATE_EXPR: &str = "date(last_reviewed, '+' || COALESCE(interval_days, 0) || ' days')";

/// SQLite-backed card store
///
/// Uses separate reader/writer connections for interior mutability.
/// All methods take `&self`, so the store is `Send + Sync` and can be
/// shared as `Arc<SqliteStore>`.
pub struct SqliteStore {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var("ZINNEN_ENCRYPTION_KEY") {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Default database location under the platform data directory
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "zinnen", "core").ok_or_else(|| {
            StorageError::Init("Could not determine project directories".to_string())
        })?;
        Ok(proj_dirs.data_dir().join("zinnen.db"))
    }

    /// Open (or create) the deck database.
    ///
    /// `None` uses [`SqliteStore::default_path`]. Pending migrations are
    /// applied on the writer connection.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
            // Restrict directory permissions to owner-only on Unix
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let perms = std::fs::Permissions::from_mode(0o700);
                let _ = std::fs::set_permissions(parent, perms);
            }
        }

        let writer_conn = Connection::open(&path)?;

        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&writer_conn)?;
        let applied = super::migrations::apply_migrations(&writer_conn)?;
        if applied > 0 {
            tracing::info!(applied, path = %path.display(), "Deck database migrated");
        }

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            path,
        })
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reader(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))
    }

    fn writer(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))
    }

    /// Parse a stored calendar day column
    fn parse_day_column(value: Option<String>, field_name: &str) -> rusqlite::Result<Option<NaiveDate>> {
        let Some(value) = value else {
            return Ok(None);
        };
        parse_day(&value).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("Invalid {} date '{}': {}", field_name, value, e),
                )),
            )
        })
    }

    /// Convert a row to FlashCard
    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<FlashCard> {
        let last_reviewed: Option<String> = row.get("last_reviewed")?;

        Ok(FlashCard {
            id: row.get("card_id")?,
            chunk_id: row.get("chunk_id")?,
            source_sentence: row.get("source_sentence")?,
            game_sentence: row.get("game_sentence")?,
            translation: row.get("translation")?,
            last_reviewed: Self::parse_day_column(last_reviewed, "last_reviewed")?,
            recall_strength: row.get("recall_strength")?,
            ease_factor: row.get("ease_factor")?,
            interval: row.get("interval_days")?,
        })
    }

    fn query_cards(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<FlashCard>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(sql)?;
        let cards = stmt.query_map(params, |row| Self::row_to_card(row))?;

        let mut result = Vec::new();
        for card in cards {
            result.push(card?);
        }
        Ok(result)
    }

    fn insert_card_with(conn: &Connection, card: &FlashCard) -> Result<()> {
        conn.execute(
            "INSERT INTO flash_cards (
                chunk_id, card_id, source_sentence, game_sentence, translation,
                last_reviewed, recall_strength, ease_factor, interval_days
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                card.chunk_id,
                card.id,
                card.source_sentence,
                card.game_sentence,
                card.translation,
                card.last_reviewed.map(format_day),
                card.recall_strength,
                card.ease_factor,
                card.interval,
            ],
        )?;
        Ok(())
    }

    fn insert_vocab_with(conn: &Connection, vocab: &VocabCard) -> Result<()> {
        conn.execute(
            "INSERT INTO words (word, word_type, translation, article) VALUES (?1, ?2, ?3, ?4)",
            params![vocab.word, vocab.word_type, vocab.translation, vocab.article],
        )?;
        Ok(())
    }

    /// Fetch one card by key
    pub fn get_card(&self, key: CardKey) -> Result<Option<FlashCard>> {
        let reader = self.reader()?;
        let sql = format!("SELECT {CARD_COLUMNS} FROM flash_cards WHERE chunk_id = ?1 AND card_id = ?2");
        let mut stmt = reader.prepare(&sql)?;
        let card = stmt
            .query_row(params![key.chunk_id, key.card_id], |row| Self::row_to_card(row))
            .optional()?;
        Ok(card)
    }

    /// Number of cards in the deck
    pub fn card_count(&self) -> Result<i64> {
        let reader = self.reader()?;
        Ok(reader.query_row("SELECT COUNT(*) FROM flash_cards", [], |row| row.get(0))?)
    }

    /// Flush the WAL into the main database file and copy it to `path`
    pub fn backup_to(&self, path: &Path) -> Result<()> {
        let writer = self.writer()?;
        writer.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        drop(writer);
        std::fs::copy(&self.path, path)?;
        Ok(())
    }
}

impl CardStore for SqliteStore {
    fn list_cards_by_chunk(&self, chunk_id: u32) -> Result<Vec<FlashCard>> {
        let sql = format!("SELECT {CARD_COLUMNS} FROM flash_cards WHERE chunk_id = ?1 ORDER BY card_id");
        let cards = self.query_cards(&sql, params![chunk_id])?;
        tracing::debug!(chunk_id, count = cards.len(), "Loaded chunk");
        Ok(cards)
    }

    fn list_all_cards(&self) -> Result<Vec<FlashCard>> {
        let sql = format!("SELECT {CARD_COLUMNS} FROM flash_cards ORDER BY chunk_id, card_id");
        self.query_cards(&sql, [])
    }

    fn list_due_cards(&self, today: NaiveDate) -> Result<Vec<FlashCard>> {
        let sql = format!(
            "SELECT {CARD_COLUMNS} FROM flash_cards
             WHERE last_reviewed IS NULL OR last_reviewed = '' OR {DUE_DATE_EXPR} <= ?1
             ORDER BY CASE WHEN last_reviewed IS NULL OR last_reviewed = '' THEN 0 ELSE 1 END,
                      {DUE_DATE_EXPR}, chunk_id, card_id"
        );
        let cards = self.query_cards(&sql, params![format_day(today)])?;
        tracing::debug!(today = %today, count = cards.len(), "Queried due cards");
        Ok(cards)
    }

    fn list_chunk_ids(&self) -> Result<Vec<u32>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare("SELECT DISTINCT chunk_id FROM flash_cards ORDER BY chunk_id")?;
        let ids = stmt.query_map([], |row| row.get(0))?;

        let mut result = Vec::new();
        for id in ids {
            result.push(id?);
        }
        Ok(result)
    }

    fn update_card(&self, card: &FlashCard) -> Result<()> {
        let writer = self.writer()?;
        let changed = writer.execute(
            "UPDATE flash_cards SET
                last_reviewed = ?1,
                recall_strength = ?2,
                ease_factor = ?3,
                interval_days = ?4
            WHERE chunk_id = ?5 AND card_id = ?6",
            params![
                card.last_reviewed.map(format_day),
                card.recall_strength,
                card.ease_factor,
                card.interval,
                card.chunk_id,
                card.id,
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(format!("card {}", card.key())));
        }
        Ok(())
    }

    fn get_session(&self) -> Result<Option<UserSession>> {
        let reader = self.reader()?;
        let row = reader
            .query_row(
                "SELECT current_chunk_id, flashcard_position, user_preferences, last_updated
                 FROM user_session WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((current_chunk_id, flashcard_position, user_preferences, last_updated)) = row else {
            return Ok(None);
        };

        let last_updated = parse_day(&last_updated)
            .ok()
            .flatten()
            .ok_or_else(|| StorageError::InvalidDate(format!("session last_updated '{}'", last_updated)))?;

        Ok(Some(UserSession {
            current_chunk_id,
            flashcard_position,
            user_preferences,
            last_updated,
        }))
    }

    fn put_session(&self, session: &UserSession) -> Result<()> {
        let writer = self.writer()?;
        writer.execute(
            "INSERT INTO user_session (id, current_chunk_id, flashcard_position, user_preferences, last_updated)
             VALUES (1, ?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                current_chunk_id = excluded.current_chunk_id,
                flashcard_position = excluded.flashcard_position,
                user_preferences = excluded.user_preferences,
                last_updated = excluded.last_updated",
            params![
                session.current_chunk_id,
                session.flashcard_position,
                session.user_preferences,
                format_day(session.last_updated),
            ],
        )?;
        Ok(())
    }

    fn list_vocab(&self) -> Result<Vec<VocabCard>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(
            "SELECT word, word_type, translation, article FROM words ORDER BY word, rowid",
        )?;
        let words = stmt.query_map([], |row| {
            Ok(VocabCard {
                word: row.get(0)?,
                word_type: row.get(1)?,
                translation: row.get(2)?,
                article: row.get(3)?,
            })
        })?;

        let mut result = Vec::new();
        for word in words {
            result.push(word?);
        }
        Ok(result)
    }
}

impl DeckSeeder for SqliteStore {
    fn insert_card(&self, card: &FlashCard) -> Result<()> {
        check_memory(card)?;
        let writer = self.writer()?;
        Self::insert_card_with(&writer, card).map_err(|e| conflict_on_duplicate(e, card.key()))
    }

    fn insert_vocab(&self, vocab: &VocabCard) -> Result<()> {
        let writer = self.writer()?;
        Self::insert_vocab_with(&writer, vocab)
    }

    fn import_deck(&self, deck: &DeckImport) -> Result<ImportSummary> {
        for card in &deck.cards {
            check_memory(card)?;
        }
        let mut writer = self.writer()?;
        let tx = writer.transaction()?;

        for card in &deck.cards {
            Self::insert_card_with(&tx, card).map_err(|e| conflict_on_duplicate(e, card.key()))?;
        }
        for vocab in &deck.vocab {
            Self::insert_vocab_with(&tx, vocab)?;
        }

        let mut session_created = false;
        if let Some(session) = &deck.session {
            let inserted = tx.execute(
                "INSERT INTO user_session (id, current_chunk_id, flashcard_position, user_preferences, last_updated)
                 VALUES (1, ?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO NOTHING",
                params![
                    session.current_chunk_id,
                    session.flashcard_position,
                    session.user_preferences,
                    format_day(session.last_updated),
                ],
            )?;
            session_created = inserted > 0;
        }

        tx.commit()?;

        let summary = ImportSummary {
            cards: deck.cards.len(),
            vocab: deck.vocab.len(),
            session_created,
        };
        tracing::info!(
            cards = summary.cards,
            vocab = summary.vocab,
            session_created,
            "Imported deck"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").field("path", &self.path).finish()
    }
}

/// Map a primary-key violation to [`StorageError::Conflict`]
fn conflict_on_duplicate(err: StorageError, key: CardKey) -> StorageError {
    match err {
        StorageError::Database(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StorageError::Conflict(format!("card {}", key))
        }
        other => other,
    }
}

// ============================================================================
// TESTS
// ============================================================================
