//! Active-cycle selection and the availability fallback.
//!
//! Mining must keep paying out even when cycle configuration is missing,
//! expired, or unreadable. Selection therefore never fails: when no
//! stored cycle matches, the hardcoded default takes over. Availability
//! wins over configuration correctness here.

use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

use warren_types::GameCycle;

/// How long the default cycle advertises itself as valid.
const DEFAULT_CYCLE_DAYS: i64 = 30;

/// The hardcoded fallback cycle, anchored at `now`.
///
/// Used whenever no stored cycle is active and inside its window --
/// including when the store itself is unreachable.
pub fn default_cycle(now: DateTime<Utc>) -> GameCycle {
    let window = TimeDelta::try_days(DEFAULT_CYCLE_DAYS).unwrap_or_else(TimeDelta::zero);
    GameCycle {
        cycle_number: 1,
        growth_rate: Decimal::new(8, 1),
        max_speed_cap: Decimal::new(80, 1),
        starts_at: now,
        ends_at: now.checked_add_signed(window).unwrap_or(now),
        is_active: true,
    }
}

/// Pick the cycle in effect at `now` from `candidates`.
///
/// A candidate must be administratively active and inside its date
/// window. If several qualify -- which the activation invariant should
/// prevent, but a reader racing an activation swap can observe -- the
/// highest `cycle_number` wins. No qualifier means the default cycle.
pub fn select_active(candidates: &[GameCycle], now: DateTime<Utc>) -> GameCycle {
    candidates
        .iter()
        .filter(|cycle| cycle.is_current(now))
        .max_by_key(|cycle| cycle.cycle_number)
        .cloned()
        .unwrap_or_else(|| {
            tracing::debug!("no stored cycle matches; using the default cycle");
            default_cycle(now)
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn stored(number: i32, active: bool, start_h: i64, end_h: i64, now: DateTime<Utc>) -> GameCycle {
        GameCycle {
            cycle_number: number,
            growth_rate: dec!(1.2),
            max_speed_cap: dec!(12.0),
            starts_at: now + TimeDelta::hours(start_h),
            ends_at: now + TimeDelta::hours(end_h),
            is_active: active,
        }
    }

    #[test]
    fn default_cycle_has_documented_shape() {
        let now = Utc::now();
        let cycle = default_cycle(now);
        assert_eq!(cycle.cycle_number, 1);
        assert_eq!(cycle.growth_rate, dec!(0.8));
        assert_eq!(cycle.max_speed_cap, dec!(8.0));
        assert!(cycle.is_active);
        assert_eq!(cycle.starts_at, now);
        assert_eq!(cycle.ends_at, now + TimeDelta::days(30));
    }

    #[test]
    fn empty_candidates_fall_back() {
        let now = Utc::now();
        let cycle = select_active(&[], now);
        assert_eq!(cycle.cycle_number, 1);
        assert_eq!(cycle.growth_rate, dec!(0.8));
    }

    #[test]
    fn inactive_candidates_fall_back() {
        let now = Utc::now();
        let cycle = select_active(&[stored(5, false, -1, 1, now)], now);
        assert_eq!(cycle.growth_rate, dec!(0.8));
    }

    #[test]
    fn expired_candidates_fall_back() {
        let now = Utc::now();
        let cycle = select_active(&[stored(5, true, -10, -1, now)], now);
        assert_eq!(cycle.growth_rate, dec!(0.8));
    }

    #[test]
    fn matching_candidate_is_selected() {
        let now = Utc::now();
        let cycle = select_active(&[stored(5, true, -1, 1, now)], now);
        assert_eq!(cycle.cycle_number, 5);
        assert_eq!(cycle.growth_rate, dec!(1.2));
    }

    #[test]
    fn highest_cycle_number_wins_a_doubled_flag() {
        let now = Utc::now();
        let candidates = [stored(3, true, -1, 1, now), stored(7, true, -2, 2, now)];
        let cycle = select_active(&candidates, now);
        assert_eq!(cycle.cycle_number, 7);
    }
}
