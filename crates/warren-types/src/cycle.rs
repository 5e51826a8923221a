//! Global reward cycle configuration.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An admin-managed reward cycle parameterizing idle mining.
///
/// At most one cycle is active at a time; activation of one cycle
/// deactivates all others in a single transaction. A cycle also expires
/// for lookup purposes once `now` leaves `[starts_at, ends_at]`, at which
/// point readers fall back to the hardcoded default cycle rather than
/// erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameCycle {
    /// Sequence number identifying the cycle. Higher wins if the active
    /// flag is ever transiently doubled.
    pub cycle_number: i32,
    /// Mining reward rate: points per hour per pet level.
    #[ts(as = "String")]
    pub growth_rate: Decimal,
    /// Upper bound on the effective points-per-hour mining rate.
    #[ts(as = "String")]
    pub max_speed_cap: Decimal,
    /// Instant from which the cycle is eligible.
    pub starts_at: DateTime<Utc>,
    /// Instant after which the cycle no longer matches lookups.
    pub ends_at: DateTime<Utc>,
    /// Whether this cycle is the administratively active one.
    pub is_active: bool,
}

impl GameCycle {
    /// Whether this cycle matches reward lookups at `now`: administratively
    /// active and inside its date window.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.starts_at <= now && now <= self.ends_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use rust_decimal_macros::dec;

    use super::*;

    fn cycle(active: bool, start_offset_h: i64, end_offset_h: i64) -> GameCycle {
        let now = Utc::now();
        GameCycle {
            cycle_number: 1,
            growth_rate: dec!(0.8),
            max_speed_cap: dec!(8.0),
            starts_at: now + TimeDelta::hours(start_offset_h),
            ends_at: now + TimeDelta::hours(end_offset_h),
            is_active: active,
        }
    }

    #[test]
    fn current_inside_window() {
        assert!(cycle(true, -1, 1).is_current(Utc::now()));
    }

    #[test]
    fn not_current_when_inactive() {
        assert!(!cycle(false, -1, 1).is_current(Utc::now()));
    }

    #[test]
    fn not_current_before_start() {
        assert!(!cycle(true, 1, 2).is_current(Utc::now()));
    }

    #[test]
    fn not_current_after_end() {
        assert!(!cycle(true, -2, -1).is_current(Utc::now()));
    }
}
