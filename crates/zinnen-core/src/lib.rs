//! # Zinnen Core
//!
//! Spaced-repetition engine for sentence flashcards. Decides which cards are
//! due, offers the weakest cards when nothing is, and updates each card's
//! memory state after every answer.
//!
//! - **Scheduler**: simplified SM-2 (ease factor floor 1.3, day intervals)
//! - **Session manager**: chunk-by-chunk learning with a resumable position
//! - **Answer matcher**: forgiving sentence comparison and word jumbles
//! - **Storage**: repository trait with SQLite and in-memory stores
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zinnen_core::{Deck, SessionManager, SqliteStore, SystemClock};
//!
//! // Open the deck at the default platform location
//! let store = SqliteStore::new(None)?;
//! let deck = Deck::new(store, SystemClock);
//!
//! // Review what is due today
//! for card in deck.due_cards()? {
//!     let updated = deck.grade(&card, true)?;
//! }
//!
//! // Or learn chunk by chunk
//! let mut session = SessionManager::from_deck(deck);
//! session.resume_or_start()?;
//! let outcome = session.submit_answer("Ik ga naar huis.")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): compile SQLite in
//! - `encryption`: SQLCipher, keyed from `ZINNEN_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod background;
pub mod card;
pub mod clock;
pub mod deck;
pub mod error;
pub mod matcher;
pub mod scheduler;
pub mod session;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Cards
pub use card::{format_day, parse_day, CardKey, FlashCard, UserSession, VocabCard, DAY_FORMAT};

// Scheduling
pub use scheduler::{
    due_cards, grade_answer, trouble_cards, MemoryPhase, ReviewQueue, DEFAULT_EASE_FACTOR,
    DEFAULT_INTERVAL, MIN_EASE_FACTOR, TROUBLE_LIMIT,
};

// Deck and sessions
pub use background::AsyncSession;
pub use clock::{Clock, FixedClock, SystemClock};
pub use deck::{Deck, DeckStats};
pub use session::{AnswerOutcome, ChunkSession, LearningMode, SessionManager};

// Matching
pub use matcher::{is_good_match, jumble_words, jumble_words_with};

// Storage layer
pub use storage::{
    CardStore, DeckImport, DeckSeeder, ImportSummary, MemoryStore, SqliteStore, StorageError,
};

// Errors
pub use error::{Error, ErrorKind, Result};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        CardStore, Clock, Deck, DeckSeeder, Error, ErrorKind, FlashCard, LearningMode,
        ReviewQueue, Result, SessionManager, SqliteStore, SystemClock,
    };
}
