//! The unified service error type.
//!
//! Only hard failures live here -- contract violations and
//! infrastructure faults. Business policy denials travel inside the
//! outcome payloads (`success = false`) and never become a [`GameError`].

use warren_core::CoreError;
use warren_db::DbError;

/// Errors that abort a game service operation.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The caller supplied an argument outside the operation's contract.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },

    /// The operation requires something that does not exist.
    #[error("not found: {what}")]
    NotFound {
        /// What was missing.
        what: String,
    },

    /// An energy debit exceeded the available balance.
    #[error("insufficient energy: {available} available, {requested} requested")]
    InsufficientEnergy {
        /// Energy available after pending regeneration.
        available: u32,
        /// Energy the caller asked to consume.
        requested: u32,
    },

    /// Checked arithmetic left the representable range.
    #[error("arithmetic overflow in {context}")]
    Arithmetic {
        /// Which calculation overflowed.
        context: &'static str,
    },

    /// The data layer failed; the operation was rolled back.
    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}

impl From<CoreError> for GameError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument { reason } => Self::InvalidArgument { reason },
            CoreError::InsufficientEnergy {
                available,
                requested,
            } => Self::InsufficientEnergy {
                available,
                requested,
            },
            CoreError::ArithmeticOverflow { context } => Self::Arithmetic { context },
        }
    }
}

impl From<sqlx::Error> for GameError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(DbError::Postgres(err))
    }
}
