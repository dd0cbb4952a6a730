//! Deck-level review operations
//!
//! Binds a [`CardStore`] to a [`Clock`] and runs the scheduler against it.
//! Grading and its write are one step: the caller only ever sees a new
//! snapshot that is already stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::card::{FlashCard, VocabCard};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::scheduler::{grade_answer, trouble_cards, MemoryPhase, ReviewQueue};
use crate::storage::CardStore;

/// Counts over the whole deck
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckStats {
    pub total_cards: usize,
    pub chunks: usize,
    pub due_today: usize,
    pub unseen: usize,
    pub learning: usize,
    pub retained: usize,
    pub relapsed: usize,
    pub vocab_entries: usize,
}

/// Review scheduler bound to a store and a clock
#[derive(Debug)]
pub struct Deck<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: CardStore> Deck<S> {
    /// Deck on the local wall clock
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S: CardStore, C: Clock> Deck<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Cards due today, unseen first then by due day
    pub fn due_cards(&self) -> Result<Vec<FlashCard>> {
        self.due_cards_on(self.today())
    }

    /// Cards due on an arbitrary day
    pub fn due_cards_on(&self, day: NaiveDate) -> Result<Vec<FlashCard>> {
        let due = self
            .store
            .list_due_cards(day)
            .map_err(Error::StoreUnavailable)?;
        tracing::debug!(day = %day, count = due.len(), "Loaded due cards");
        Ok(due)
    }

    /// The weakest reviewed cards, at most ten
    pub fn trouble_cards(&self) -> Result<Vec<FlashCard>> {
        let all = self.store.list_all_cards().map_err(Error::StoreUnavailable)?;
        let trouble = trouble_cards(all);
        tracing::debug!(count = trouble.len(), "Selected trouble cards");
        Ok(trouble)
    }

    /// Due cards, else trouble cards, else nothing
    pub fn review_queue(&self) -> Result<ReviewQueue> {
        let all = self.store.list_all_cards().map_err(Error::StoreUnavailable)?;
        Ok(ReviewQueue::build(all, self.today()))
    }

    /// Grade one answer and store the result.
    ///
    /// Returns the new snapshot only after the write succeeded. On a failed
    /// write nothing changes and [`Error::Persistence`] is returned.
    pub fn grade(&self, card: &FlashCard, is_correct: bool) -> Result<FlashCard> {
        let graded = grade_answer(card, is_correct, self.today());
        self.store
            .update_card(&graded)
            .map_err(|e| Error::persistence(format!("card {}", card.key()), e))?;
        Ok(graded)
    }

    /// Vocabulary entries, sorted by word
    pub fn vocabulary(&self) -> Result<Vec<VocabCard>> {
        self.store.list_vocab().map_err(Error::StoreUnavailable)
    }

    pub fn stats(&self) -> Result<DeckStats> {
        let today = self.today();
        let cards = self.store.list_all_cards().map_err(Error::StoreUnavailable)?;
        let chunks = self.store.list_chunk_ids().map_err(Error::StoreUnavailable)?;
        let vocab = self.store.list_vocab().map_err(Error::StoreUnavailable)?;

        let mut stats = DeckStats {
            total_cards: cards.len(),
            chunks: chunks.len(),
            vocab_entries: vocab.len(),
            ..Default::default()
        };
        for card in &cards {
            if card.is_due(today) {
                stats.due_today += 1;
            }
            match MemoryPhase::of(card) {
                MemoryPhase::Unseen => stats.unseen += 1,
                MemoryPhase::Learning => stats.learning += 1,
                MemoryPhase::Retained => stats.retained += 1,
                MemoryPhase::Relapsed => stats.relapsed += 1,
            }
        }
        Ok(stats)
    }
}
