//! In-memory card store
//!
//! For hosts that keep their own persistence and for tests. Can be switched
//! to read-only to exercise write-failure handling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::{check_memory, CardStore, DeckImport, DeckSeeder, ImportSummary, Result, StorageError};
use crate::card::{CardKey, FlashCard, UserSession, VocabCard};

#[derive(Debug, Default)]
struct Tables {
    cards: BTreeMap<CardKey, FlashCard>,
    vocab: Vec<VocabCard>,
    session: Option<UserSession>,
}

/// Card store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    read_only: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a deck in one step
    pub fn from_deck(deck: &DeckImport) -> Result<Self> {
        let store = Self::new();
        store.import_deck(deck)?;
        Ok(store)
    }

    /// Reject every write from now on (or accept them again)
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Fetch one card by key
    pub fn get_card(&self, key: CardKey) -> Result<Option<FlashCard>> {
        Ok(self.tables()?.cards.get(&key).cloned())
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StorageError::Init("Memory store lock poisoned".into()))
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "memory store is read-only",
            )));
        }
        Ok(())
    }
}

impl CardStore for MemoryStore {
    fn list_cards_by_chunk(&self, chunk_id: u32) -> Result<Vec<FlashCard>> {
        let tables = self.tables()?;
        let start = CardKey { chunk_id, card_id: 0 };
        let end = CardKey { chunk_id, card_id: u32::MAX };
        Ok(tables.cards.range(start..=end).map(|(_, c)| c.clone()).collect())
    }

    fn list_all_cards(&self) -> Result<Vec<FlashCard>> {
        Ok(self.tables()?.cards.values().cloned().collect())
    }

    fn list_chunk_ids(&self) -> Result<Vec<u32>> {
        let tables = self.tables()?;
        let mut ids: Vec<u32> = tables.cards.keys().map(|k| k.chunk_id).collect();
        ids.dedup();
        Ok(ids)
    }

    fn update_card(&self, card: &FlashCard) -> Result<()> {
        self.check_writable()?;
        let mut tables = self.tables()?;
        let stored = tables
            .cards
            .get_mut(&card.key())
            .ok_or_else(|| StorageError::NotFound(format!("card {}", card.key())))?;

        stored.last_reviewed = card.last_reviewed;
        stored.recall_strength = card.recall_strength;
        stored.ease_factor = card.ease_factor;
        stored.interval = card.interval;
        Ok(())
    }

    fn get_session(&self) -> Result<Option<UserSession>> {
        Ok(self.tables()?.session.clone())
    }

    fn put_session(&self, session: &UserSession) -> Result<()> {
        self.check_writable()?;
        self.tables()?.session = Some(session.clone());
        Ok(())
    }

    fn list_vocab(&self) -> Result<Vec<VocabCard>> {
        let mut vocab = self.tables()?.vocab.clone();
        vocab.sort_by(|a, b| a.word.cmp(&b.word));
        Ok(vocab)
    }
}

impl DeckSeeder for MemoryStore {
    fn insert_card(&self, card: &FlashCard) -> Result<()> {
        self.check_writable()?;
        check_memory(card)?;
        let mut tables = self.tables()?;
        if tables.cards.contains_key(&card.key()) {
            return Err(StorageError::Conflict(format!("card {}", card.key())));
        }
        tables.cards.insert(card.key(), card.clone());
        Ok(())
    }

    fn insert_vocab(&self, vocab: &VocabCard) -> Result<()> {
        self.check_writable()?;
        self.tables()?.vocab.push(vocab.clone());
        Ok(())
    }

    fn import_deck(&self, deck: &DeckImport) -> Result<ImportSummary> {
        self.check_writable()?;
        let mut tables = self.tables()?;

        // Validate everything first so a failed import leaves no trace
        let mut seen = std::collections::BTreeSet::new();
        for card in &deck.cards {
            check_memory(card)?;
            if tables.cards.contains_key(&card.key()) || !seen.insert(card.key()) {
                return Err(StorageError::Conflict(format!("card {}", card.key())));
            }
        }

        for card in &deck.cards {
            tables.cards.insert(card.key(), card.clone());
        }
        tables.vocab.extend(deck.vocab.iter().cloned());

        let session_created = match (&tables.session, &deck.session) {
            (None, Some(session)) => {
                tables.session = Some(session.clone());
                true
            }
            _ => false,
        };

        Ok(ImportSummary {
            cards: deck.cards.len(),
            vocab: deck.vocab.len(),
            session_created,
        })
    }
}
