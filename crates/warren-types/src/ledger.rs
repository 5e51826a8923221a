//! Point ledger audit entries.
//!
//! Every change to a player's point balances writes one append-only audit
//! row in the same transaction as the balance mutation. The ledger is not
//! consulted by game logic -- balances on [`PlayerState`] are
//! authoritative -- but it makes every credit and debit reconstructible.
//!
//! [`PlayerState`]: crate::player::PlayerState

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{EntryId, UserId};

/// Why a point balance changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum PointReason {
    /// Idle mining rewards claimed (credit).
    MiningClaim,
    /// Points converted into pet experience (debit).
    PetFeed,
    /// Points converted into energy (debit).
    EnergyRefill,
}

impl PointReason {
    /// Stable string form used in the database and in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MiningClaim => "mining_claim",
            Self::PetFeed => "pet_feed",
            Self::EnergyRefill => "energy_refill",
        }
    }
}

/// One append-only point ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointEntry {
    /// Entry id (UUID v7, time-ordered).
    pub id: EntryId,
    /// The player whose balance changed.
    pub user_id: UserId,
    /// Signed change to the spendable balance.
    pub delta: i64,
    /// Spendable balance after the change was applied.
    pub balance_after: i64,
    /// Why the balance changed.
    pub reason: PointReason,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

impl PointEntry {
    /// Build a new entry stamped at `now`.
    pub fn record(
        user_id: UserId,
        delta: i64,
        balance_after: i64,
        reason: PointReason,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            user_id,
            delta,
            balance_after,
            reason,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_strings_are_stable() {
        assert_eq!(PointReason::MiningClaim.as_str(), "mining_claim");
        assert_eq!(PointReason::PetFeed.as_str(), "pet_feed");
        assert_eq!(PointReason::EnergyRefill.as_str(), "energy_refill");
    }

    #[test]
    fn record_stamps_fields() {
        let now = Utc::now();
        let entry = PointEntry::record(UserId::new(9), -40, 60, PointReason::PetFeed, now);
        assert_eq!(entry.user_id, UserId::new(9));
        assert_eq!(entry.delta, -40);
        assert_eq!(entry.balance_after, 60);
        assert_eq!(entry.created_at, now);
    }
}
