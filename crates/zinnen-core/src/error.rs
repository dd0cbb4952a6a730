//! Engine error types
//!
//! Three families, each with its own handling rule:
//! - setup errors stop the session before any review UI is shown
//! - persistence errors leave the mutation uncommitted and must be surfaced
//! - validation errors are caller mistakes

use crate::card::CardKey;
use crate::storage::StorageError;

/// How a caller should react to an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Fatal: corrupted or incomplete seeding, unreachable store
    Setup,
    /// Recoverable but must be reported; nothing was written
    Persistence,
    /// Caller mistake
    Validation,
}

/// Engine error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A chunk has no cards
    #[error("Chunk {0} has no cards")]
    EmptyChunk(u32),
    /// The singleton session row is missing
    #[error("No user session found")]
    NoSessionFound,
    /// The store could not be opened or read at startup
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StorageError),
    /// A write did not go through
    #[error("Failed to persist {what}: {source}")]
    Persistence {
        what: String,
        #[source]
        source: StorageError,
    },
    /// Input the operation cannot work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A card outside the loaded chunk was graded
    #[error("Card {0} is not part of the current chunk")]
    CardNotInChunk(CardKey),
    /// A background task died before finishing
    #[error("Background task failed: {0}")]
    Worker(String),
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyChunk(_) | Error::NoSessionFound | Error::StoreUnavailable(_) => {
                ErrorKind::Setup
            }
            // A dead worker may have been mid-write; treat it like a failed write
            Error::Persistence { .. } | Error::Worker(_) => ErrorKind::Persistence,
            Error::InvalidInput(_) | Error::CardNotInChunk(_) => ErrorKind::Validation,
        }
    }

    pub(crate) fn persistence(what: impl Into<String>, source: StorageError) -> Self {
        Error::Persistence {
            what: what.into(),
            source,
        }
    }
}

/// Engine result type
pub type Result<T> = std::result::Result<T, Error>;
