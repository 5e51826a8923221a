//! Per-player resource state: energy, pet progression, and point balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::UserId;

/// One row of per-player resource state.
///
/// This is the aggregate that every accrual operation reads and writes
/// inside a single transaction. The store is the sole source of truth;
/// in-memory copies are transient and request-scoped.
///
/// Invariants (enforced by the accrual logic, asserted by tests):
///
/// - `0 <= current_energy <= max_energy`
/// - `1 <= pet_level <= max_level`
/// - `0 <= pet_xp < xp_per_level` (overflow is consumed by a level-up)
/// - `lifetime_points` is monotonic; `spendable_points` may go up or down
///   but never below zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerState {
    /// Canonical player key.
    pub user_id: UserId,
    /// Current energy units available for actions.
    pub current_energy: u32,
    /// Energy ceiling for this player.
    pub max_energy: u32,
    /// Instant up to which energy regeneration has already been applied.
    pub energy_updated_at: DateTime<Utc>,
    /// Current pet level.
    pub pet_level: u32,
    /// Experience accumulated toward the next pet level.
    pub pet_xp: u32,
    /// Instant up to which idle mining rewards have been paid out.
    pub pet_claimed_at: DateTime<Utc>,
    /// Spendable point balance (debited by feeding and refills).
    pub spendable_points: i64,
    /// Lifetime point total. Only ever increases.
    pub lifetime_points: i64,
}

impl PlayerState {
    /// Build the state a player starts with on first contact: full energy,
    /// a level-1 pet with no experience, and empty balances. Both accrual
    /// markers start at `now` so no retroactive time is credited.
    pub const fn fresh(user_id: UserId, max_energy: u32, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            current_energy: max_energy,
            max_energy,
            energy_updated_at: now,
            pet_level: 1,
            pet_xp: 0,
            pet_claimed_at: now,
            spendable_points: 0,
            lifetime_points: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_player_starts_full() {
        let now = Utc::now();
        let state = PlayerState::fresh(UserId::new(7), 10, now);
        assert_eq!(state.current_energy, 10);
        assert_eq!(state.max_energy, 10);
        assert_eq!(state.pet_level, 1);
        assert_eq!(state.pet_xp, 0);
        assert_eq!(state.spendable_points, 0);
        assert_eq!(state.lifetime_points, 0);
        assert_eq!(state.energy_updated_at, now);
        assert_eq!(state.pet_claimed_at, now);
    }
}
