//! Hard-failure error types for the accrual logic.
//!
//! These are contract violations: the caller sent something no correct
//! client sends, or integer arithmetic left its domain. Business policy
//! denials are NOT errors -- see the `RefillDenied` and `FeedDenied`
//! enums in their respective modules.

/// Errors that abort an accrual operation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The caller supplied an argument outside the operation's contract.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },

    /// An energy debit exceeded the available balance after regeneration.
    #[error("insufficient energy: {available} available, {requested} requested")]
    InsufficientEnergy {
        /// Energy available after pending regeneration was applied.
        available: u32,
        /// Energy the caller asked to consume.
        requested: u32,
    },

    /// Checked arithmetic left the representable range.
    #[error("arithmetic overflow in {context}")]
    ArithmeticOverflow {
        /// Which calculation overflowed.
        context: &'static str,
    },
}
