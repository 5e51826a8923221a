//! Shared type definitions for the Warren game backend.
//!
//! This crate is the single source of truth for all types used across the
//! Warren workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the Mini App frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Player and ledger-entry identifiers, including the lossy
//!   external-identity normalization
//! - [`player`] -- The per-player resource state row
//! - [`spend`] -- The per-player per-calendar-day spend record
//! - [`cycle`] -- The global reward cycle configuration row
//! - [`ledger`] -- Point ledger audit entries (one per balance change)
//! - [`status`] -- API-facing status and outcome payloads

pub mod cycle;
pub mod ids;
pub mod ledger;
pub mod player;
pub mod spend;
pub mod status;

// Re-export all public types at crate root for convenience.
pub use cycle::GameCycle;
pub use ids::{EntryId, UserId};
pub use ledger::{PointEntry, PointReason};
pub use player::PlayerState;
pub use spend::DailySpendRecord;
pub use status::{ClaimOutcome, EnergyStatus, FeedOutcome, PetStatus, RefillOutcome};
