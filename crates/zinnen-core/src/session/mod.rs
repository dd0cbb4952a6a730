//! Chunk/Session Manager
//!
//! Tracks which chunk the learner is working through and where they are in
//! it, and persists that position so a session can be resumed.
//!
//! Chunk transitions load the new chunk before touching the stored session,
//! so a missing or empty chunk leaves the learner where they were.

mod mode;
mod progress;

pub use mode::LearningMode;
pub use progress::ChunkSession;

use serde::{Deserialize, Serialize};

use crate::card::{FlashCard, UserSession};
use crate::clock::{Clock, SystemClock};
use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::matcher::is_good_match;
use crate::storage::CardStore;

/// Result of one typed answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    /// What the learner should have typed
    pub expected: String,
    /// Current snapshot of the card
    pub card: FlashCard,
    /// The answer was passed on to the scheduler
    pub graded: bool,
    /// Every card in the pass has now been answered correctly
    pub chunk_complete: bool,
}

/// Drives a learner through chunks
#[derive(Debug)]
pub struct SessionManager<S, C = SystemClock> {
    deck: Deck<S, C>,
    active: Option<ChunkSession>,
}

impl<S: CardStore, C: Clock> SessionManager<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self::from_deck(Deck::new(store, clock))
    }

    pub fn from_deck(deck: Deck<S, C>) -> Self {
        Self { deck, active: None }
    }

    pub fn deck(&self) -> &Deck<S, C> {
        &self.deck
    }

    /// The chunk currently being practiced, if one is loaded
    pub fn active(&self) -> Option<&ChunkSession> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ChunkSession> {
        self.active.as_mut()
    }

    /// All cards of a chunk in card order.
    ///
    /// A chunk without cards is a seeding defect: [`Error::EmptyChunk`].
    pub fn load_chunk(&self, chunk_id: u32) -> Result<Vec<FlashCard>> {
        let cards = self
            .deck
            .store()
            .list_cards_by_chunk(chunk_id)
            .map_err(Error::StoreUnavailable)?;
        if cards.is_empty() {
            return Err(Error::EmptyChunk(chunk_id));
        }
        tracing::debug!(chunk = chunk_id, cards = cards.len(), "Loaded chunk");
        Ok(cards)
    }

    /// Move the learner to `next_chunk_id` at position 0.
    ///
    /// The stored session is only rewritten once the chunk has loaded.
    /// Cards of earlier chunks stay in the deck and keep coming up for review.
    pub fn advance_chunk(&mut self, next_chunk_id: u32) -> Result<Vec<FlashCard>> {
        let cards = self.load_chunk(next_chunk_id)?;
        let preferences = self.stored_preferences()?;
        self.save_session(next_chunk_id, 0, &preferences)?;

        tracing::info!(
            from = ?self.active.as_ref().map(ChunkSession::chunk_id),
            to = next_chunk_id,
            cards = cards.len(),
            "Advanced to chunk"
        );
        self.active = Some(ChunkSession::new(next_chunk_id, cards.clone(), 0));
        Ok(cards)
    }

    /// Write the session singleton, stamped with today's date.
    ///
    /// Saving the same values twice leaves the same row.
    pub fn save_session(&self, chunk_id: u32, position: u32, preferences: &str) -> Result<UserSession> {
        let session = UserSession {
            current_chunk_id: chunk_id,
            flashcard_position: position,
            user_preferences: preferences.to_string(),
            last_updated: self.deck.today(),
        };
        self.deck
            .store()
            .put_session(&session)
            .map_err(|e| Error::persistence("session", e))?;
        tracing::info!(chunk = chunk_id, position, "Saved session");
        Ok(session)
    }

    /// The stored session; [`Error::NoSessionFound`] if it was never seeded
    pub fn load_session(&self) -> Result<UserSession> {
        self.deck
            .store()
            .get_session()
            .map_err(Error::StoreUnavailable)?
            .ok_or(Error::NoSessionFound)
    }

    /// Reload the stored chunk at the stored position.
    ///
    /// A position past the end of the chunk restarts it from 0.
    pub fn resume(&mut self) -> Result<&ChunkSession> {
        let session = self.load_session()?;
        let cards = self.load_chunk(session.current_chunk_id)?;

        let mut position = session.flashcard_position as usize;
        if position >= cards.len() {
            tracing::warn!(
                chunk = session.current_chunk_id,
                position,
                cards = cards.len(),
                "Stored position out of range, restarting chunk"
            );
            position = 0;
        }

        Ok(&*self
            .active
            .insert(ChunkSession::new(session.current_chunk_id, cards, position)))
    }

    /// Resume the stored session, or start at the first chunk if none exists
    pub fn resume_or_start(&mut self) -> Result<&ChunkSession> {
        let stored = self
            .deck
            .store()
            .get_session()
            .map_err(Error::StoreUnavailable)?;
        if stored.is_none() {
            let first = self
                .deck
                .store()
                .list_chunk_ids()
                .map_err(Error::StoreUnavailable)?
                .into_iter()
                .next()
                .ok_or(Error::NoSessionFound)?;
            self.advance_chunk(first)?;
        }
        self.resume()
    }

    /// Persist the active chunk and cursor, keeping stored preferences
    pub fn suspend(&self) -> Result<UserSession> {
        let active = self.require_active()?;
        let position = u32::try_from(active.position())
            .map_err(|_| Error::InvalidInput(format!("position {} out of range", active.position())))?;
        let preferences = self.stored_preferences()?;
        self.save_session(active.chunk_id(), position, &preferences)
    }

    /// Smallest chunk id after the current one; `None` once the deck is finished
    pub fn next_chunk_id(&self) -> Result<Option<u32>> {
        let current = match &self.active {
            Some(active) => active.chunk_id(),
            None => self.load_session()?.current_chunk_id,
        };
        let ids = self
            .deck
            .store()
            .list_chunk_ids()
            .map_err(Error::StoreUnavailable)?;
        Ok(ids.into_iter().filter(|id| *id > current).min())
    }

    /// Grade a card of the active chunk and store the result.
    ///
    /// Cards from other chunks are rejected with [`Error::CardNotInChunk`];
    /// use [`Deck::grade`] for free review.
    pub fn grade(&mut self, card: &FlashCard, is_correct: bool) -> Result<FlashCard> {
        let active = match self.active.as_mut() {
            Some(active) if active.contains(card.key()) => active,
            _ => return Err(Error::CardNotInChunk(card.key())),
        };
        let graded = self.deck.grade(card, is_correct)?;
        active.replace(graded.clone());
        Ok(graded)
    }

    /// Check a typed answer for the card under the cursor and move on if it
    /// was right.
    ///
    /// The pass score always counts the answer. The scheduler only sees the
    /// first recall of a card on a given day, and never an answer typed
    /// while it was on screen ([`LearningMode::reveals_answer`]).
    pub fn submit_answer(&mut self, input: &str) -> Result<AnswerOutcome> {
        let active = self.require_active()?;
        let card = active
            .current()
            .cloned()
            .ok_or(Error::EmptyChunk(active.chunk_id()))?;
        let mode = active.mode();
        let expected = mode.expected(&card).to_string();
        let correct = is_good_match(&expected, input);

        let reviewed_today = card.last_reviewed == Some(self.deck.today());
        let (card, graded) = if mode.reveals_answer() || reviewed_today {
            tracing::debug!(card = %card.key(), %mode, "Practice answer, not graded");
            (card, false)
        } else {
            (self.grade(&card, correct)?, true)
        };
        let active = self.require_active_mut()?;
        active.record(correct);

        Ok(AnswerOutcome {
            correct,
            expected,
            card,
            graded,
            chunk_complete: active.is_complete(),
        })
    }

    fn require_active(&self) -> Result<&ChunkSession> {
        self.active
            .as_ref()
            .ok_or_else(|| Error::InvalidInput("no chunk loaded".into()))
    }

    fn require_active_mut(&mut self) -> Result<&mut ChunkSession> {
        self.active
            .as_mut()
            .ok_or_else(|| Error::InvalidInput("no chunk loaded".into()))
    }

    fn stored_preferences(&self) -> Result<String> {
        Ok(self
            .deck
            .store()
            .get_session()
            .map_err(Error::StoreUnavailable)?
            .map(|s| s.user_preferences)
            .unwrap_or_default())
    }
}
