//! Energy regeneration, consumption, and point-funded refills.
//!
//! Energy regenerates one unit per whole interval elapsed, but only while
//! the balance sits strictly below the regeneration threshold -- a player
//! hovering at or above the threshold never silently climbs toward the
//! ceiling. On any credit the accrual marker jumps to `now`; the
//! sub-interval remainder is dropped from stored state and survives only
//! in the prediction fields returned to the caller.

use chrono::{DateTime, TimeDelta, Utc};

use warren_types::PlayerState;

use crate::error::CoreError;
use crate::rules::EnergyRules;

// ---------------------------------------------------------------------------
// RegenOutcome
// ---------------------------------------------------------------------------

/// Result of applying pending regeneration to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegenOutcome {
    /// Energy credited by this application. Zero means stored state was
    /// not touched.
    pub gained: u32,
    /// When the next regeneration tick lands; `None` when regeneration is
    /// not running (at ceiling, or at/above the threshold).
    pub next_regen_at: Option<DateTime<Utc>>,
    /// Milliseconds until the ceiling is reached; zero when regeneration
    /// is not running.
    pub time_to_full_ms: u64,
}

impl RegenOutcome {
    /// Outcome for a player whose regeneration is not running.
    const IDLE: Self = Self {
        gained: 0,
        next_regen_at: None,
        time_to_full_ms: 0,
    };
}

// ---------------------------------------------------------------------------
// Regeneration
// ---------------------------------------------------------------------------

/// Apply pending regeneration to `state` as of `now`.
///
/// Called before every read or debit so the stored balance is correct up
/// to `now`. Regeneration only runs while `current_energy` is strictly
/// below `rules.regen_threshold`; above it the balance is intentionally
/// frozen (even when below the ceiling).
///
/// On credit, `energy_updated_at` advances to `now` rather than to the
/// last whole interval boundary. The dropped remainder is still used for
/// the `next_regen_at` / `time_to_full_ms` predictions of this call.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if interval math leaves the
/// representable range (practically unreachable with sane rules).
pub fn apply_regeneration(
    state: &mut PlayerState,
    rules: &EnergyRules,
    now: DateTime<Utc>,
) -> Result<RegenOutcome, CoreError> {
    if state.current_energy >= rules.regen_threshold {
        return Ok(RegenOutcome::IDLE);
    }

    let interval = rules.regen_interval_ms;
    let elapsed_ms = elapsed_since(state.energy_updated_at, now);

    let whole_intervals = elapsed_ms
        .checked_div(interval)
        .ok_or(CoreError::ArithmeticOverflow {
            context: "regeneration interval division",
        })?;
    let headroom = state.max_energy.saturating_sub(state.current_energy);
    let gained = u32::try_from(whole_intervals.min(u64::from(headroom))).unwrap_or(headroom);

    if gained > 0 {
        state.current_energy = state.current_energy.checked_add(gained).ok_or(
            CoreError::ArithmeticOverflow {
                context: "energy credit",
            },
        )?;
        state.energy_updated_at = now;
    }

    // Prediction fields: only meaningful while regeneration keeps running.
    if state.current_energy >= state.max_energy
        || state.current_energy >= rules.regen_threshold
    {
        return Ok(RegenOutcome {
            gained,
            ..RegenOutcome::IDLE
        });
    }

    let remainder = elapsed_ms.checked_rem(interval).unwrap_or(0);
    let wait_ms = interval.saturating_sub(remainder);
    let next_regen_at = i64::try_from(wait_ms)
        .ok()
        .and_then(|ms| now.checked_add_signed(TimeDelta::milliseconds(ms)));

    let energy_needed = u64::from(state.max_energy.saturating_sub(state.current_energy));
    let time_to_full_ms = energy_needed
        .saturating_sub(1)
        .checked_mul(interval)
        .and_then(|tail| tail.checked_add(wait_ms))
        .ok_or(CoreError::ArithmeticOverflow {
            context: "time-to-full projection",
        })?;

    Ok(RegenOutcome {
        gained,
        next_regen_at,
        time_to_full_ms,
    })
}

/// Milliseconds from `from` to `now`, floored at zero (a marker in the
/// future -- clock skew -- accrues nothing).
fn elapsed_since(from: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from(now.signed_duration_since(from).num_milliseconds()).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Consumption
// ---------------------------------------------------------------------------

/// Debit `amount` energy from `state`.
///
/// The caller must have applied pending regeneration first so the balance
/// is current.
///
/// # Errors
///
/// - [`CoreError::InvalidArgument`] if `amount` is zero.
/// - [`CoreError::InsufficientEnergy`] if `amount` exceeds the balance.
pub fn debit_energy(state: &mut PlayerState, amount: u32) -> Result<(), CoreError> {
    if amount == 0 {
        return Err(CoreError::InvalidArgument {
            reason: String::from("energy amount must be positive"),
        });
    }
    if amount > state.current_energy {
        return Err(CoreError::InsufficientEnergy {
            available: state.current_energy,
            requested: amount,
        });
    }
    state.current_energy = state.current_energy.saturating_sub(amount);
    Ok(())
}

// ---------------------------------------------------------------------------
// Refills
// ---------------------------------------------------------------------------

/// A refill request denied by business policy. Not an error: the caller
/// folds this into a `success = false` outcome with zero side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefillDenied {
    /// The requested amount exceeds the ceiling headroom. The message
    /// states the exact maximum so the client can retry with it.
    BeyondHeadroom {
        /// The most energy this player can currently refill.
        max_refillable: u32,
    },
    /// The spendable balance does not cover the cost.
    InsufficientPoints {
        /// Points the refill would cost.
        needed: i64,
        /// Points currently available.
        available: i64,
    },
}

impl core::fmt::Display for RefillDenied {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BeyondHeadroom { max_refillable } => {
                write!(f, "Can refill at most {max_refillable} energy")
            }
            Self::InsufficientPoints { needed, available } => {
                write!(f, "Insufficient points: need {needed}, have {available}")
            }
        }
    }
}

/// Price a refill of `amount` energy against the player's balances.
///
/// Returns the point cost on approval. The headroom check runs first so
/// the denial message can state the exact refillable maximum.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if `amount` is zero, or
/// [`CoreError::ArithmeticOverflow`] if the cost calculation overflows.
pub fn refill_quote(
    state: &PlayerState,
    rules: &EnergyRules,
    amount: u32,
) -> Result<Result<i64, RefillDenied>, CoreError> {
    if amount == 0 {
        return Err(CoreError::InvalidArgument {
            reason: String::from("refill amount must be positive"),
        });
    }

    let headroom = state.max_energy.saturating_sub(state.current_energy);
    if amount > headroom {
        return Ok(Err(RefillDenied::BeyondHeadroom {
            max_refillable: headroom,
        }));
    }

    let cost = i64::from(amount)
        .checked_mul(rules.points_per_energy)
        .ok_or(CoreError::ArithmeticOverflow {
            context: "refill cost",
        })?;
    if state.spendable_points < cost {
        return Ok(Err(RefillDenied::InsufficientPoints {
            needed: cost,
            available: state.spendable_points,
        }));
    }

    Ok(Ok(cost))
}

/// Apply an approved refill: debit `cost` points, credit `amount` energy.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if either side of the swap
/// leaves its range (the quote makes this unreachable in practice).
pub fn apply_refill(
    state: &mut PlayerState,
    amount: u32,
    cost: i64,
) -> Result<(), CoreError> {
    state.spendable_points =
        state
            .spendable_points
            .checked_sub(cost)
            .ok_or(CoreError::ArithmeticOverflow {
                context: "refill point debit",
            })?;
    state.current_energy =
        state
            .current_energy
            .checked_add(amount)
            .ok_or(CoreError::ArithmeticOverflow {
                context: "refill energy credit",
            })?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use warren_types::UserId;

    use super::*;

    const INTERVAL_MS: u64 = 30 * 60 * 1000;

    fn rules() -> EnergyRules {
        EnergyRules::default()
    }

    fn player(energy: u32, last_update_ago: TimeDelta, now: DateTime<Utc>) -> PlayerState {
        let mut state = PlayerState::fresh(UserId::new(1), 10, now - last_update_ago);
        state.current_energy = energy;
        state
    }

    #[test]
    fn no_regen_at_threshold() {
        let now = Utc::now();
        // Hours below the ceiling, but exactly at the threshold: frozen.
        let mut state = player(5, TimeDelta::hours(6), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        assert_eq!(outcome.gained, 0);
        assert_eq!(state.current_energy, 5);
        assert!(outcome.next_regen_at.is_none());
        assert_eq!(outcome.time_to_full_ms, 0);
    }

    #[test]
    fn no_regen_above_threshold() {
        let now = Utc::now();
        let mut state = player(7, TimeDelta::hours(12), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        assert_eq!(outcome.gained, 0);
        assert_eq!(state.current_energy, 7);
    }

    #[test]
    fn one_interval_credits_one_unit() {
        let now = Utc::now();
        let mut state = player(2, TimeDelta::minutes(30), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        assert_eq!(outcome.gained, 1);
        assert_eq!(state.current_energy, 3);
        assert_eq!(state.energy_updated_at, now);
    }

    #[test]
    fn partial_interval_credits_nothing() {
        let now = Utc::now();
        let before = now - TimeDelta::minutes(29);
        let mut state = player(2, TimeDelta::minutes(29), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        assert_eq!(outcome.gained, 0);
        assert_eq!(state.current_energy, 2);
        // No credit, no marker advance.
        assert_eq!(state.energy_updated_at, before);
    }

    #[test]
    fn multiple_intervals_credit_in_one_pass() {
        let now = Utc::now();
        let mut state = player(0, TimeDelta::minutes(95), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        // 95 minutes = 3 whole intervals.
        assert_eq!(outcome.gained, 3);
        assert_eq!(state.current_energy, 3);
    }

    #[test]
    fn credit_is_capped_at_ceiling() {
        let now = Utc::now();
        // A week offline: far more intervals than headroom.
        let mut state = player(1, TimeDelta::days(7), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        assert_eq!(outcome.gained, 9);
        assert_eq!(state.current_energy, 10);
        assert!(outcome.next_regen_at.is_none());
        assert_eq!(outcome.time_to_full_ms, 0);
    }

    #[test]
    fn energy_never_exceeds_ceiling() {
        let now = Utc::now();
        for start in 0..=4 {
            let mut state = player(start, TimeDelta::days(30), now);
            let _ = apply_regeneration(&mut state, &rules(), now).unwrap();
            assert!(state.current_energy <= state.max_energy);
        }
    }

    #[test]
    fn next_regen_accounts_for_partial_interval() {
        let now = Utc::now();
        // 10 minutes into a 30-minute interval: next tick in 20 minutes.
        let mut state = player(2, TimeDelta::minutes(10), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        let expected = now + TimeDelta::minutes(20);
        assert_eq!(outcome.next_regen_at, Some(expected));
    }

    #[test]
    fn remainder_survives_into_prediction_after_credit() {
        let now = Utc::now();
        // 40 minutes: one interval credited, 10-minute remainder. The
        // stored marker jumps to now, but the next tick is predicted
        // 20 minutes out, not 30.
        let mut state = player(2, TimeDelta::minutes(40), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        assert_eq!(outcome.gained, 1);
        assert_eq!(state.energy_updated_at, now);
        assert_eq!(outcome.next_regen_at, Some(now + TimeDelta::minutes(20)));
    }

    #[test]
    fn time_to_full_counts_remaining_ticks() {
        let now = Utc::now();
        // At 2 of 10 with a fresh marker: 8 units needed. First tick in a
        // full interval, then 7 more intervals.
        let mut state = player(2, TimeDelta::zero(), now);
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        assert_eq!(outcome.time_to_full_ms, 8 * INTERVAL_MS);
    }

    #[test]
    fn regeneration_is_monotonic_without_consumption() {
        let start = Utc::now();
        let mut state = player(0, TimeDelta::zero(), start);
        let mut previous = 0;
        for minutes in [15_i64, 45, 70, 100, 200, 400] {
            let now = start + TimeDelta::minutes(minutes);
            let _ = apply_regeneration(&mut state, &rules(), now).unwrap();
            assert!(state.current_energy >= previous);
            previous = state.current_energy;
        }
        // Threshold freezes the climb at 5, not at the ceiling.
        assert_eq!(state.current_energy, 5);
    }

    #[test]
    fn future_marker_accrues_nothing() {
        let now = Utc::now();
        let mut state = PlayerState::fresh(UserId::new(1), 10, now + TimeDelta::minutes(10));
        state.current_energy = 2;
        let outcome = apply_regeneration(&mut state, &rules(), now).unwrap();
        assert_eq!(outcome.gained, 0);
        assert_eq!(state.current_energy, 2);
    }

    #[test]
    fn debit_zero_is_a_contract_violation() {
        let now = Utc::now();
        let mut state = player(5, TimeDelta::zero(), now);
        let result = debit_energy(&mut state, 0);
        assert!(matches!(result, Err(CoreError::InvalidArgument { .. })));
    }

    #[test]
    fn debit_beyond_balance_fails_hard() {
        let now = Utc::now();
        let mut state = player(1, TimeDelta::zero(), now);
        let result = debit_energy(&mut state, 2);
        assert!(matches!(
            result,
            Err(CoreError::InsufficientEnergy {
                available: 1,
                requested: 2
            })
        ));
        assert_eq!(state.current_energy, 1);
    }

    #[test]
    fn debit_spends_exactly_amount() {
        let now = Utc::now();
        let mut state = player(5, TimeDelta::zero(), now);
        debit_energy(&mut state, 3).unwrap();
        assert_eq!(state.current_energy, 2);
    }

    #[test]
    fn refill_beyond_headroom_names_the_maximum() {
        let now = Utc::now();
        let mut state = player(7, TimeDelta::zero(), now);
        state.spendable_points = 1000;
        let denial = refill_quote(&state, &rules(), 4).unwrap().unwrap_err();
        assert_eq!(denial, RefillDenied::BeyondHeadroom { max_refillable: 3 });
        assert_eq!(denial.to_string(), "Can refill at most 3 energy");
    }

    #[test]
    fn refill_without_points_is_denied() {
        let now = Utc::now();
        let mut state = player(2, TimeDelta::zero(), now);
        state.spendable_points = 15;
        let denial = refill_quote(&state, &rules(), 2).unwrap().unwrap_err();
        assert_eq!(
            denial,
            RefillDenied::InsufficientPoints {
                needed: 20,
                available: 15
            }
        );
    }

    #[test]
    fn refill_quote_prices_at_ten_points_per_unit() {
        let now = Utc::now();
        let mut state = player(2, TimeDelta::zero(), now);
        state.spendable_points = 100;
        let cost = refill_quote(&state, &rules(), 5).unwrap().unwrap();
        assert_eq!(cost, 50);
    }

    #[test]
    fn apply_refill_swaps_points_for_energy() {
        let now = Utc::now();
        let mut state = player(2, TimeDelta::zero(), now);
        state.spendable_points = 100;
        apply_refill(&mut state, 5, 50).unwrap();
        assert_eq!(state.current_energy, 7);
        assert_eq!(state.spendable_points, 50);
    }

    #[test]
    fn refill_zero_is_a_contract_violation() {
        let now = Utc::now();
        let state = player(2, TimeDelta::zero(), now);
        let result = refill_quote(&state, &rules(), 0);
        assert!(matches!(result, Err(CoreError::InvalidArgument { .. })));
    }
}
