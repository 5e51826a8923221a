//! Idle mining: reward projection and claim settlement.
//!
//! The pet mines continuously while the player is away. Accrued value is
//! a pure projection over `(now - pet_claimed_at)` -- nothing is banked
//! until a claim settles -- and the projection window is capped at
//! `max_claim_hours`: a player who claims late forfeits everything past
//! the cap.
//!
//! All fractional math runs in [`Decimal`]; the result floors to whole
//! points.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use warren_types::{GameCycle, PlayerState};

use crate::error::CoreError;
use crate::rules::PetRules;

/// Milliseconds per hour, the unit of the cycle growth rate.
pub const HOUR_MS: u64 = 3_600_000;

/// Rewards claimable by `state` at `now` under `cycle`.
///
/// Pure projection: reading never mutates stored state. The effective
/// accrual window is `min(now - pet_claimed_at, max_claim_hours)`, floored
/// at zero (a claim marker in the future accrues nothing). The mining rate
/// is `pet_level x growth_rate` points per hour, bounded by the cycle's
/// `max_speed_cap`; with the default parameters the bound never binds.
pub fn pending_rewards(
    state: &PlayerState,
    cycle: &GameCycle,
    rules: &PetRules,
    now: DateTime<Utc>,
) -> i64 {
    let elapsed_ms = u64::try_from(
        now.signed_duration_since(state.pet_claimed_at)
            .num_milliseconds(),
    )
    .unwrap_or(0);
    let cap_ms = u64::from(rules.max_claim_hours)
        .checked_mul(HOUR_MS)
        .unwrap_or(u64::MAX);
    let effective_ms = elapsed_ms.min(cap_ms);

    let rate = Decimal::from(state.pet_level)
        .checked_mul(cycle.growth_rate)
        .unwrap_or(Decimal::ZERO);
    let points_per_hour = rate.min(cycle.max_speed_cap);

    let hours = Decimal::from(effective_ms)
        .checked_div(Decimal::from(HOUR_MS))
        .unwrap_or(Decimal::ZERO);
    let rewards = hours
        .checked_mul(points_per_hour)
        .unwrap_or(Decimal::ZERO)
        .floor();

    rewards.to_i64().unwrap_or(0).max(0)
}

/// Settle a claim: credit both balances and advance the claim marker.
///
/// The caller computed `earned` via [`pending_rewards`] inside the same
/// transaction that holds the player row lock; settling with a stale
/// figure would double-credit.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if a balance would leave the
/// `i64` range.
pub fn settle_claim(
    state: &mut PlayerState,
    earned: i64,
    now: DateTime<Utc>,
) -> Result<(), CoreError> {
    state.spendable_points =
        state
            .spendable_points
            .checked_add(earned)
            .ok_or(CoreError::ArithmeticOverflow {
                context: "claim spendable credit",
            })?;
    state.lifetime_points =
        state
            .lifetime_points
            .checked_add(earned)
            .ok_or(CoreError::ArithmeticOverflow {
                context: "claim lifetime credit",
            })?;
    state.pet_claimed_at = now;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use rust_decimal_macros::dec;
    use warren_types::UserId;

    use super::*;

    fn cycle(growth_rate: Decimal, max_speed_cap: Decimal) -> GameCycle {
        let now = Utc::now();
        GameCycle {
            cycle_number: 1,
            growth_rate,
            max_speed_cap,
            starts_at: now - TimeDelta::days(1),
            ends_at: now + TimeDelta::days(29),
            is_active: true,
        }
    }

    fn miner(level: u32, claimed_ago: TimeDelta, now: DateTime<Utc>) -> PlayerState {
        let mut state = PlayerState::fresh(UserId::new(1), 10, now - claimed_ago);
        state.pet_level = level;
        state
    }

    #[test]
    fn one_hour_at_level_one_default_rate() {
        let now = Utc::now();
        let state = miner(1, TimeDelta::hours(1), now);
        // 1 level x 0.8/hour x 1 hour = 0.8, floored to 0.
        let rewards = pending_rewards(&state, &cycle(dec!(0.8), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(rewards, 0);
    }

    #[test]
    fn two_hours_at_level_two_default_rate() {
        let now = Utc::now();
        let state = miner(2, TimeDelta::hours(2), now);
        // 2 x 0.8 x 2 = 3.2 -> 3.
        let rewards = pending_rewards(&state, &cycle(dec!(0.8), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(rewards, 3);
    }

    #[test]
    fn late_claim_is_capped_at_four_hours() {
        let now = Utc::now();
        // Ten hours idle pays only the four-hour window: 4 x 2 x 1.0 = 8.
        let state = miner(2, TimeDelta::hours(10), now);
        let rewards = pending_rewards(&state, &cycle(dec!(1.0), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(rewards, 8);
    }

    #[test]
    fn fresh_claim_marker_pays_nothing() {
        let now = Utc::now();
        let state = miner(5, TimeDelta::zero(), now);
        let rewards = pending_rewards(&state, &cycle(dec!(0.8), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(rewards, 0);
    }

    #[test]
    fn future_claim_marker_pays_nothing() {
        let now = Utc::now();
        let mut state = PlayerState::fresh(UserId::new(1), 10, now);
        state.pet_claimed_at = now + TimeDelta::hours(1);
        let rewards = pending_rewards(&state, &cycle(dec!(0.8), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(rewards, 0);
    }

    #[test]
    fn speed_cap_bounds_the_rate() {
        let now = Utc::now();
        // 10 x 1.5 = 15 points/hour, capped at 8.0: one hour pays 8.
        let state = miner(10, TimeDelta::hours(1), now);
        let rewards = pending_rewards(&state, &cycle(dec!(1.5), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(rewards, 8);
    }

    #[test]
    fn default_parameters_never_hit_the_cap() {
        let now = Utc::now();
        // Max level at the default rate sits exactly at the cap.
        let state = miner(10, TimeDelta::hours(4), now);
        let rewards = pending_rewards(&state, &cycle(dec!(0.8), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(rewards, 32);
    }

    #[test]
    fn projection_does_not_mutate_state() {
        let now = Utc::now();
        let state = miner(3, TimeDelta::hours(2), now);
        let before = state.clone();
        let _ = pending_rewards(&state, &cycle(dec!(0.8), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(state, before);
    }

    #[test]
    fn settle_credits_both_balances() {
        let now = Utc::now();
        let mut state = miner(2, TimeDelta::hours(3), now);
        state.spendable_points = 10;
        state.lifetime_points = 50;
        settle_claim(&mut state, 4, now).unwrap();
        assert_eq!(state.spendable_points, 14);
        assert_eq!(state.lifetime_points, 54);
        assert_eq!(state.pet_claimed_at, now);
    }

    #[test]
    fn second_settle_after_advance_pays_zero() {
        let now = Utc::now();
        let mut state = miner(2, TimeDelta::hours(3), now);
        let earned = pending_rewards(&state, &cycle(dec!(1.0), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(earned, 6);
        settle_claim(&mut state, earned, now).unwrap();
        // The marker advanced; a double-submission computes zero.
        let again = pending_rewards(&state, &cycle(dec!(1.0), dec!(8.0)), &PetRules::default(), now);
        assert_eq!(again, 0);
    }
}
