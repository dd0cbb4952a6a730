//! Card module - Core types and data structures
//!
//! - Flash cards: sentence pairs carrying SM-2 style recall history
//! - Vocabulary entries (read-only reference material)
//! - The singleton learner session

mod date;

pub use date::{format_day, parse_day, DAY_FORMAT};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

// ============================================================================
// FLASH CARD
// ============================================================================

/// Identifies one card across the whole deck.
///
/// Card ids are only unique within their chunk, so every store lookup or
/// write goes through the `(chunk_id, card_id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardKey {
    pub chunk_id: u32,
    pub card_id: u32,
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chunk_id, self.card_id)
    }
}

/// A single sentence-pair learning unit
///
/// The memory fields (`last_reviewed`, `recall_strength`, `ease_factor`,
/// `interval`) are unset until the card has been graded for the first time.
/// They only change through [`crate::scheduler::grade_answer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashCard {
    /// Card id, unique within the chunk
    pub id: u32,
    /// Owning chunk, never reassigned
    pub chunk_id: u32,
    /// Full correct sentence in the language being learned
    pub source_sentence: String,
    /// Partially obscured variant shown while learning
    pub game_sentence: String,
    /// Translation into the learner's language
    pub translation: String,

    // ========== Memory state ==========
    /// Day of the last graded review
    #[serde(default)]
    pub last_reviewed: Option<NaiveDate>,
    /// Consecutive correct answers since the last failure
    #[serde(default)]
    pub recall_strength: Option<u32>,
    /// Interval growth multiplier (>= 1.3 once graded)
    #[serde(default)]
    pub ease_factor: Option<f64>,
    /// Days until the card is due again (>= 1 once graded)
    #[serde(default)]
    pub interval: Option<u32>,
}

impl FlashCard {
    /// Create an unseen card
    pub fn new(
        chunk_id: u32,
        id: u32,
        source_sentence: impl Into<String>,
        game_sentence: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            chunk_id,
            source_sentence: source_sentence.into(),
            game_sentence: game_sentence.into(),
            translation: translation.into(),
            last_reviewed: None,
            recall_strength: None,
            ease_factor: None,
            interval: None,
        }
    }

    /// Replace all four memory fields at once
    pub fn with_memory(
        mut self,
        last_reviewed: NaiveDate,
        recall_strength: u32,
        ease_factor: f64,
        interval: u32,
    ) -> Self {
        self.last_reviewed = Some(last_reviewed);
        self.recall_strength = Some(recall_strength);
        self.ease_factor = Some(ease_factor);
        self.interval = Some(interval);
        self
    }

    /// Store key for this card
    pub fn key(&self) -> CardKey {
        CardKey {
            chunk_id: self.chunk_id,
            card_id: self.id,
        }
    }

    /// True if any memory field is unset
    pub fn is_new(&self) -> bool {
        self.last_reviewed.is_none()
            || self.recall_strength.is_none()
            || self.ease_factor.is_none()
            || self.interval.is_none()
    }

    /// Day the card next becomes due.
    ///
    /// `None` for never-reviewed cards, which are due on any day. An unset
    /// interval on a reviewed card counts as zero days.
    pub fn due_date(&self) -> Option<NaiveDate> {
        let last = self.last_reviewed?;
        let days = u64::from(self.interval.unwrap_or(0));
        Some(last.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX))
    }

    /// Whether the card is due on `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        match self.due_date() {
            None => true,
            Some(due) => today >= due,
        }
    }
}

// ============================================================================
// VOCABULARY
// ============================================================================

/// A vocabulary entry. Read-only from the engine's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabCard {
    pub word: String,
    /// Word class (noun, verb, ...)
    pub word_type: String,
    pub translation: String,
    /// Grammatical article ("de", "het"), if the word takes one
    #[serde(default)]
    pub article: Option<String>,
}

// ============================================================================
// USER SESSION
// ============================================================================

/// Singleton record of learner progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    /// Chunk currently being learned
    pub current_chunk_id: u32,
    /// Index into that chunk's ordered card list
    pub flashcard_position: u32,
    /// Opaque, passed through untouched
    #[serde(default)]
    pub user_preferences: String,
    /// Day of the last save
    pub last_updated: NaiveDate,
}
