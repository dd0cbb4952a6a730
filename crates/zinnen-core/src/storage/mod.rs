//! Storage Module
//!
//! Repository interface the scheduler and session manager depend on, plus
//! two implementations:
//! - SQLite with versioned migrations (the on-device deck)
//! - In-memory (embedding hosts and tests)

mod memory;
mod migrations;
mod sqlite;

pub use memory::MemoryStore;
pub use migrations::{Migration, MIGRATIONS};
pub use sqlite::SqliteStore;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::card::{FlashCard, UserSession, VocabCard};
use crate::scheduler::{due_cards, MIN_EASE_FACTOR};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Row already exists
    #[error("Already exists: {0}")]
    Conflict(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid stored date
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    /// Memory fields outside their valid range
    #[error("Invalid card: {0}")]
    InvalidCard(String),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Reject a card whose stored ease is below [`MIN_EASE_FACTOR`]
pub(crate) fn check_memory(card: &FlashCard) -> Result<()> {
    match card.ease_factor {
        Some(ease) if !(ease.is_finite() && ease >= MIN_EASE_FACTOR) => Err(StorageError::InvalidCard(
            format!("card {} has ease factor {ease}, minimum is {MIN_EASE_FACTOR}", card.key()),
        )),
        _ => Ok(()),
    }
}

// ============================================================================
// REPOSITORY
// ============================================================================

/// Read/write access to cards, vocabulary and the session singleton.
///
/// All methods take `&self`; implementations handle their own interior
/// mutability so a store can be shared behind an `Arc`.
pub trait CardStore {
    /// All cards of one chunk, in card order
    fn list_cards_by_chunk(&self, chunk_id: u32) -> Result<Vec<FlashCard>>;

    /// Every card, ordered by chunk then card
    fn list_all_cards(&self) -> Result<Vec<FlashCard>>;

    /// Cards due on `today`, ordered by ascending due day.
    ///
    /// Stores that cannot express the predicate as a query get the default
    /// scan over [`CardStore::list_all_cards`].
    fn list_due_cards(&self, today: NaiveDate) -> Result<Vec<FlashCard>> {
        Ok(due_cards(self.list_all_cards()?, today))
    }

    /// Distinct chunk ids, ascending
    fn list_chunk_ids(&self) -> Result<Vec<u32>>;

    /// Write the memory fields of one card, keyed by `(chunk_id, id)`.
    ///
    /// Fails with [`StorageError::NotFound`] if the card does not exist.
    fn update_card(&self, card: &FlashCard) -> Result<()>;

    /// The session singleton, if it has been seeded
    fn get_session(&self) -> Result<Option<UserSession>>;

    /// Insert or replace the session singleton, all fields at once
    fn put_session(&self, session: &UserSession) -> Result<()>;

    /// All vocabulary entries, sorted by word
    fn list_vocab(&self) -> Result<Vec<VocabCard>>;
}

impl<S: CardStore + ?Sized> CardStore for Arc<S> {
    fn list_cards_by_chunk(&self, chunk_id: u32) -> Result<Vec<FlashCard>> {
        (**self).list_cards_by_chunk(chunk_id)
    }

    fn list_all_cards(&self) -> Result<Vec<FlashCard>> {
        (**self).list_all_cards()
    }

    fn list_due_cards(&self, today: NaiveDate) -> Result<Vec<FlashCard>> {
        (**self).list_due_cards(today)
    }

    fn list_chunk_ids(&self) -> Result<Vec<u32>> {
        (**self).list_chunk_ids()
    }

    fn update_card(&self, card: &FlashCard) -> Result<()> {
        (**self).update_card(card)
    }

    fn get_session(&self) -> Result<Option<UserSession>> {
        (**self).get_session()
    }

    fn put_session(&self, session: &UserSession) -> Result<()> {
        (**self).put_session(session)
    }

    fn list_vocab(&self) -> Result<Vec<VocabCard>> {
        (**self).list_vocab()
    }
}

// ============================================================================
// SEEDING
// ============================================================================

/// A deck file: cards, vocabulary and an optional starting session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckImport {
    #[serde(default)]
    pub cards: Vec<FlashCard>,
    #[serde(default)]
    pub vocab: Vec<VocabCard>,
    #[serde(default)]
    pub session: Option<UserSession>,
}

/// Counts from a finished import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub cards: usize,
    pub vocab: usize,
    /// Whether the import created the session row
    pub session_created: bool,
}

/// Populating a store. Runs once at setup, outside review sessions.
pub trait DeckSeeder {
    /// Insert one card; an existing `(chunk_id, id)` is an error
    fn insert_card(&self, card: &FlashCard) -> Result<()>;

    /// Insert one vocabulary entry
    fn insert_vocab(&self, vocab: &VocabCard) -> Result<()>;

    /// Import a whole deck atomically.
    ///
    /// The deck's session is only written when no session exists yet, so
    /// re-importing never rewinds learner progress.
    fn import_deck(&self, deck: &DeckImport) -> Result<ImportSummary>;
}
