//! One practice pass over a loaded chunk

use serde::{Deserialize, Serialize};

use super::mode::LearningMode;
use crate::card::{CardKey, FlashCard};

/// A loaded chunk with a cursor and a score.
///
/// Never empty: the manager refuses to load a chunk without cards. The
/// cursor only moves on correct answers and wraps around the chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkSession {
    chunk_id: u32,
    cards: Vec<FlashCard>,
    position: usize,
    score: usize,
    mode: LearningMode,
}

impl ChunkSession {
    pub(crate) fn new(chunk_id: u32, cards: Vec<FlashCard>, position: usize) -> Self {
        Self {
            chunk_id,
            cards,
            position,
            score: 0,
            mode: LearningMode::default(),
        }
    }

    pub fn chunk_id(&self) -> u32 {
        self.chunk_id
    }

    pub fn cards(&self) -> &[FlashCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn mode(&self) -> LearningMode {
        self.mode
    }

    /// Card under the cursor
    pub fn current(&self) -> Option<&FlashCard> {
        self.cards.get(self.position)
    }

    /// Prompt for the card under the cursor in the current mode
    pub fn prompt(&self) -> Option<&str> {
        self.current().map(|c| self.mode.prompt(c))
    }

    /// Expected answer for the card under the cursor
    pub fn expected(&self) -> Option<&str> {
        self.current().map(|c| self.mode.expected(c))
    }

    pub fn contains(&self, key: CardKey) -> bool {
        self.cards.iter().any(|c| c.key() == key)
    }

    /// Fraction of the pass answered correctly, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        if self.cards.is_empty() {
            return 0.0;
        }
        self.score as f64 / self.cards.len() as f64
    }

    /// The pass is complete once every card has been answered correctly once
    pub fn is_complete(&self) -> bool {
        self.score >= self.cards.len()
    }

    /// Count an answer. Correct answers score and advance the cursor.
    pub fn record(&mut self, is_correct: bool) {
        if !is_correct || self.cards.is_empty() {
            return;
        }
        self.score = (self.score + 1).min(self.cards.len());
        self.position = (self.position + 1) % self.cards.len();
    }

    /// Start the next mode in the cycle with a fresh score
    pub fn next_mode(&mut self) -> LearningMode {
        self.mode = self.mode.next();
        self.score = 0;
        self.position = 0;
        self.mode
    }

    pub fn set_mode(&mut self, mode: LearningMode) {
        self.mode = mode;
        self.score = 0;
    }

    /// Swap in a newer snapshot of a card already in the chunk
    pub(crate) fn replace(&mut self, card: FlashCard) {
        if let Some(slot) = self.cards.iter_mut().find(|c| c.key() == card.key()) {
            *slot = card;
        }
    }
}
