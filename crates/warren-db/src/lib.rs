//! Data layer for the Warren game backend (`PostgreSQL`).
//!
//! `PostgreSQL` is the sole source of truth for all per-player state, the
//! daily spend records, the point ledger, and the cycle configuration.
//! Every mutating game operation runs inside one transaction holding a
//! row lock on the player, so concurrent requests for the same player
//! serialize while different players never contend.
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool configuration and lifecycle
//! - [`player_store`] -- Per-player state rows (get-or-create, lock, persist)
//! - [`spend_store`] -- Daily spend records keyed by `(user_id, day)`
//! - [`cycle_store`] -- Cycle configuration rows and the activation swap
//! - [`ledger_store`] -- Append-only point ledger audit entries
//! - [`error`] -- Shared error types
//!
//! Queries are constructed at runtime (not compile-time checked) to avoid
//! requiring a live database at build time; all of them are parameterized.

pub mod cycle_store;
pub mod error;
pub mod ledger_store;
pub mod player_store;
pub mod postgres;
pub mod spend_store;

// Re-export primary types for convenience.
pub use cycle_store::CycleStore;
pub use error::DbError;
pub use ledger_store::LedgerStore;
pub use player_store::PlayerStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use spend_store::SpendStore;
