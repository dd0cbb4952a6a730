//! Async front for event-loop hosts
//!
//! Store calls are synchronous. [`AsyncSession`] runs each one on tokio's
//! blocking pool and hands back the result, so a UI loop never waits on disk.

use std::sync::{Arc, Mutex};

use crate::card::{FlashCard, UserSession, VocabCard};
use crate::clock::Clock;
use crate::deck::DeckStats;
use crate::error::{Error, Result};
use crate::scheduler::ReviewQueue;
use crate::session::{AnswerOutcome, ChunkSession, LearningMode, SessionManager};
use crate::storage::CardStore;

/// Shareable handle to a [`SessionManager`]; calls are serialized
pub struct AsyncSession<S, C> {
    inner: Arc<Mutex<SessionManager<S, C>>>,
}

impl<S, C> Clone for AsyncSession<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, C> AsyncSession<S, C>
where
    S: CardStore + Send + 'static,
    C: Clock + 'static,
{
    pub fn new(manager: SessionManager<S, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SessionManager<S, C>) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut manager = inner
                .lock()
                .map_err(|e| Error::Worker(format!("session lock poisoned: {}", e)))?;
            op(&mut manager)
        })
        .await
        .map_err(|e| Error::Worker(format!("task join error: {}", e)))?
    }

    pub async fn due_cards(&self) -> Result<Vec<FlashCard>> {
        self.run(|m| m.deck().due_cards()).await
    }

    pub async fn trouble_cards(&self) -> Result<Vec<FlashCard>> {
        self.run(|m| m.deck().trouble_cards()).await
    }

    pub async fn review_queue(&self) -> Result<ReviewQueue> {
        self.run(|m| m.deck().review_queue()).await
    }

    /// Grade any card in the deck; resolves once the write is done
    pub async fn grade(&self, card: FlashCard, is_correct: bool) -> Result<FlashCard> {
        self.run(move |m| m.deck().grade(&card, is_correct)).await
    }

    pub async fn load_chunk(&self, chunk_id: u32) -> Result<Vec<FlashCard>> {
        self.run(move |m| m.load_chunk(chunk_id)).await
    }

    pub async fn advance_chunk(&self, next_chunk_id: u32) -> Result<Vec<FlashCard>> {
        self.run(move |m| m.advance_chunk(next_chunk_id)).await
    }

    pub async fn save_session(&self, chunk_id: u32, position: u32, preferences: String) -> Result<UserSession> {
        self.run(move |m| m.save_session(chunk_id, position, &preferences))
            .await
    }

    pub async fn load_session(&self) -> Result<UserSession> {
        self.run(|m| m.load_session()).await
    }

    /// Resume the stored chunk; returns a snapshot of it
    pub async fn resume(&self) -> Result<ChunkSession> {
        self.run(|m| m.resume().cloned()).await
    }

    /// Switch the loaded chunk to `mode`; returns a snapshot of it
    pub async fn set_mode(&self, mode: LearningMode) -> Result<ChunkSession> {
        self.run(move |m| {
            let active = m
                .active_mut()
                .ok_or_else(|| Error::InvalidInput("no chunk loaded".into()))?;
            active.set_mode(mode);
            Ok(active.clone())
        })
        .await
    }

    pub async fn submit_answer(&self, input: String) -> Result<AnswerOutcome> {
        self.run(move |m| m.submit_answer(&input)).await
    }

    pub async fn suspend(&self) -> Result<UserSession> {
        self.run(|m| m.suspend()).await
    }

    pub async fn next_chunk_id(&self) -> Result<Option<u32>> {
        self.run(|m| m.next_chunk_id()).await
    }

    pub async fn vocabulary(&self) -> Result<Vec<VocabCard>> {
        self.run(|m| m.deck().vocabulary()).await
    }

    pub async fn stats(&self) -> Result<DeckStats> {
        self.run(|m| m.deck().stats()).await
    }
}
