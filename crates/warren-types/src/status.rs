//! API-facing status and outcome payloads.
//!
//! Two shapes live here:
//!
//! - **Status** types ([`EnergyStatus`], [`PetStatus`]) -- read projections
//!   returned by status endpoints.
//! - **Outcome** types ([`RefillOutcome`], [`ClaimOutcome`], [`FeedOutcome`])
//!   -- results of mutating operations that can be denied by business
//!   policy. A policy denial is NOT an error: the outcome carries
//!   `success = false` and a human-readable message, with zero side
//!   effects. Contract violations (bad arguments, unknown players) are
//!   raised as errors instead and never appear in these payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// EnergyStatus
// ---------------------------------------------------------------------------

/// Snapshot of a player's energy after pending regeneration was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EnergyStatus {
    /// Energy available right now.
    pub current_energy: u32,
    /// Energy ceiling for this player.
    pub max_energy: u32,
    /// When the next regeneration tick lands, if regeneration is running.
    /// `None` when energy is at or above the regeneration threshold.
    pub next_regen_at: Option<DateTime<Utc>>,
    /// Milliseconds until energy reaches the ceiling; zero when full or
    /// when regeneration is not running.
    pub time_to_full_ms: u64,
}

// ---------------------------------------------------------------------------
// PetStatus
// ---------------------------------------------------------------------------

/// Snapshot of a player's pet: progression, pending mining rewards, and
/// the feeding budget for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PetStatus {
    /// Current pet level.
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub xp: u32,
    /// Experience threshold for the next level-up.
    pub xp_for_next_level: u32,
    /// Instant up to which mining rewards have been paid out.
    pub last_claim_at: DateTime<Utc>,
    /// Rewards claimable right now. Pure projection -- reading this never
    /// mutates stored state.
    pub pending_rewards: i64,
    /// Whether accumulated experience has reached the level-up threshold.
    pub can_level_up: bool,
    /// Points spent on feeding so far today (UTC).
    pub daily_feed_spent: u32,
    /// Daily feeding spend cap.
    pub daily_feed_limit: u32,
    /// Point cost of a single feed action.
    pub feed_cost: u32,
}

// ---------------------------------------------------------------------------
// RefillOutcome
// ---------------------------------------------------------------------------

/// Result of converting points into energy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RefillOutcome {
    /// Whether the refill was applied.
    pub success: bool,
    /// Points debited (zero on denial).
    pub points_cost: i64,
    /// Energy after the operation.
    pub new_energy: u32,
    /// Denial reason, present only when `success` is false.
    pub error: Option<String>,
}

impl RefillOutcome {
    /// Build a denial outcome: nothing changed, `error` explains why.
    pub const fn denied(current_energy: u32, error: String) -> Self {
        Self {
            success: false,
            points_cost: 0,
            new_energy: current_energy,
            error: Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// ClaimOutcome
// ---------------------------------------------------------------------------

/// Result of claiming idle mining rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClaimOutcome {
    /// Whether any rewards were credited.
    pub success: bool,
    /// Points credited (zero on denial).
    pub points_earned: i64,
    /// Spendable balance after the claim.
    pub new_spendable_points: i64,
    /// Lifetime total after the claim.
    pub new_lifetime_points: i64,
    /// When the claim settled; absent on denial.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Denial reason, present only when `success` is false.
    pub error: Option<String>,
}

impl ClaimOutcome {
    /// Build a denial outcome preserving the current balances.
    pub const fn denied(spendable: i64, lifetime: i64, error: String) -> Self {
        Self {
            success: false,
            points_earned: 0,
            new_spendable_points: spendable,
            new_lifetime_points: lifetime,
            claimed_at: None,
            error: Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// FeedOutcome
// ---------------------------------------------------------------------------

/// Result of feeding the pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeedOutcome {
    /// Whether the feed batch was applied. The batch is all-or-nothing:
    /// a denial leaves points, experience, and the daily total untouched.
    pub success: bool,
    /// Points debited (zero on denial).
    pub points_spent: i64,
    /// Experience gained (zero on denial).
    pub xp_gained: u32,
    /// Experience toward the next level after the operation.
    pub new_xp: u32,
    /// New level, present only if this feed caused a level-up.
    pub new_level: Option<u32>,
    /// Whether accumulated experience has reached the level-up threshold.
    pub can_level_up: bool,
    /// Points spent on feeding today (UTC) after the operation.
    pub daily_spent_total: u32,
    /// Denial reason, present only when `success` is false.
    pub error: Option<String>,
}

impl FeedOutcome {
    /// Build a denial outcome: nothing changed, `error` explains why.
    pub const fn denied(current_xp: u32, daily_spent: u32, error: String) -> Self {
        Self {
            success: false,
            points_spent: 0,
            xp_gained: 0,
            new_xp: current_xp,
            new_level: None,
            can_level_up: false,
            daily_spent_total: daily_spent,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_refill_has_no_side_effects() {
        let outcome = RefillOutcome::denied(4, String::from("Insufficient points"));
        assert!(!outcome.success);
        assert_eq!(outcome.points_cost, 0);
        assert_eq!(outcome.new_energy, 4);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn denied_claim_preserves_balances() {
        let outcome = ClaimOutcome::denied(120, 340, String::from("No rewards to claim"));
        assert!(!outcome.success);
        assert_eq!(outcome.points_earned, 0);
        assert_eq!(outcome.new_spendable_points, 120);
        assert_eq!(outcome.new_lifetime_points, 340);
        assert!(outcome.claimed_at.is_none());
    }

    #[test]
    fn denied_feed_preserves_daily_total() {
        let outcome = FeedOutcome::denied(300, 590, String::from("Daily feeding limit reached"));
        assert!(!outcome.success);
        assert_eq!(outcome.points_spent, 0);
        assert_eq!(outcome.new_xp, 300);
        assert_eq!(outcome.daily_spent_total, 590);
    }
}
