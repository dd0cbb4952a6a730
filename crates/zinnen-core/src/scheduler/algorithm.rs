//! Ease/interval update rule
//!
//! Simplified SM-2: a correct answer multiplies the interval by the ease
//! factor and nudges the ease up; a wrong answer resets the interval and the
//! streak and lowers the ease, never below [`MIN_EASE_FACTOR`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::card::FlashCard;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Floor for the ease factor
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease assumed for a card graded for the first time
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Interval assumed for a card graded for the first time
pub const DEFAULT_INTERVAL: u32 = 1;

/// Ease gained per correct answer
pub const EASE_BONUS: f64 = 0.1;

/// Ease lost per wrong answer
pub const EASE_PENALTY: f64 = 0.2;

/// Streak at which a card starts counting as retained
pub const RETAINED_MIN_STRENGTH: u32 = 3;

/// Interval (days) at which a card starts counting as retained
pub const RETAINED_MIN_INTERVAL: u32 = 7;

// ============================================================================
// GRADING
// ============================================================================

/// Compute a card's memory state after a graded answer.
///
/// Pure: the input snapshot is untouched and the returned snapshot has all
/// four memory fields set, with `last_reviewed = today`. Unset fields on a
/// never-graded card start from [`DEFAULT_EASE_FACTOR`] / [`DEFAULT_INTERVAL`]
/// and a zero streak.
pub fn grade_answer(card: &FlashCard, is_correct: bool, today: NaiveDate) -> FlashCard {
    let strength = card.recall_strength.unwrap_or(0);
    let ease = sane_ease(card);
    let interval = card.interval.unwrap_or(DEFAULT_INTERVAL);

    let (next_strength, next_interval, next_ease) = if is_correct {
        // `as` saturates, so a runaway product caps at u32::MAX days
        let grown = (f64::from(interval) * ease).floor() as u32;
        (
            strength.saturating_add(1),
            grown.max(1),
            (ease + EASE_BONUS).max(MIN_EASE_FACTOR),
        )
    } else {
        (0, 1, (ease - EASE_PENALTY).max(MIN_EASE_FACTOR))
    };

    tracing::debug!(
        card = %card.key(),
        correct = is_correct,
        strength = next_strength,
        interval = next_interval,
        ease = next_ease,
        "Graded card"
    );

    FlashCard {
        last_reviewed: Some(today),
        recall_strength: Some(next_strength),
        ease_factor: Some(next_ease),
        interval: Some(next_interval),
        ..card.clone()
    }
}

/// Stored ease, lifted to [`MIN_EASE_FACTOR`] if it was written below the floor
fn sane_ease(card: &FlashCard) -> f64 {
    let ease = card.ease_factor.unwrap_or(DEFAULT_EASE_FACTOR);
    if ease.is_finite() && ease >= MIN_EASE_FACTOR {
        return ease;
    }
    tracing::warn!(
        card = %card.key(),
        ease,
        "Stored ease factor below floor, grading from {}",
        MIN_EASE_FACTOR
    );
    MIN_EASE_FACTOR
}

// ============================================================================
// MEMORY PHASE
// ============================================================================

/// Where a card sits in its memory lifecycle.
///
/// Derived from the memory fields; there is no stored state column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryPhase {
    /// Never reviewed
    Unseen,
    /// Short streak or short interval
    Learning,
    /// Long streak and long interval
    Retained,
    /// Just reset by a wrong answer
    Relapsed,
}

impl MemoryPhase {
    /// Classify a card
    pub fn of(card: &FlashCard) -> Self {
        if card.last_reviewed.is_none() {
            return MemoryPhase::Unseen;
        }
        let strength = card.recall_strength.unwrap_or(0);
        let interval = card.interval.unwrap_or(0);
        if strength == 0 {
            MemoryPhase::Relapsed
        } else if strength >= RETAINED_MIN_STRENGTH && interval >= RETAINED_MIN_INTERVAL {
            MemoryPhase::Retained
        } else {
            MemoryPhase::Learning
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryPhase::Unseen => "unseen",
            MemoryPhase::Learning => "learning",
            MemoryPhase::Retained => "retained",
            MemoryPhase::Relapsed => "relapsed",
        }
    }
}

impl std::fmt::Display for MemoryPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
