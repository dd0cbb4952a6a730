//! Review Scheduler Module
//!
//! Simplified SM-2 spaced repetition for sentence cards.
//!
//! ## Rules:
//! - Due: `today >= last_reviewed + interval` (date-only); unseen cards are always due
//! - Correct: `strength += 1`, `interval = max(1, floor(interval * ease))`, `ease += 0.1`
//! - Wrong: `strength = 0`, `interval = 1`, `ease = max(ease - 0.2, 1.3)`
//! - Trouble: up to 10 reviewed cards by (strength, ease, last review) ascending

mod algorithm;
mod selection;

pub use algorithm::{
    grade_answer, MemoryPhase, DEFAULT_EASE_FACTOR, DEFAULT_INTERVAL, EASE_BONUS, EASE_PENALTY,
    MIN_EASE_FACTOR, RETAINED_MIN_INTERVAL, RETAINED_MIN_STRENGTH,
};

pub use selection::{due_cards, trouble_cards, ReviewQueue, TROUBLE_LIMIT};
