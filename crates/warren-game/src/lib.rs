//! Transactional game services for the Warren backend.
//!
//! Each service composes the pure accrual logic from `warren-core` with
//! the data layer from `warren-db`. Every mutating operation is one
//! database transaction with the same shape:
//!
//! ```text
//! begin
//!   lock player row (SELECT ... FOR UPDATE, creating on first contact)
//!   pure accrual math on the loaded state
//!   write back state (+ spend record, + ledger entry)
//! commit
//! ```
//!
//! The row lock serializes concurrent operations per player -- two
//! simultaneous debits cannot both read the pre-update balance -- while
//! operations for different players never contend. There is no
//! background scheduler and no long-lived task; accrual happens lazily
//! inside whichever request observes it.
//!
//! # Modules
//!
//! - [`energy`] -- Energy status, consumption, and point-funded refills
//! - [`mining`] -- Pet status and idle mining claims
//! - [`feeding`] -- Daily-capped feeding with level-ups
//! - [`cycles`] -- Cycle lookup (with fallback) and admin management
//! - [`error`] -- The unified service error type

pub mod cycles;
pub mod energy;
pub mod error;
pub mod feeding;
pub mod mining;

// Re-export primary types at crate root.
pub use cycles::CycleService;
pub use energy::EnergyService;
pub use error::GameError;
pub use feeding::FeedingService;
pub use mining::MiningService;
