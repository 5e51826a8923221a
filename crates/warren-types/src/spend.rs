//! Per-player per-day spend tracking for the daily feeding cap.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::UserId;

/// Cumulative points spent on feeding by one player on one calendar day.
///
/// Keyed by `(user_id, day)` where `day` is a date-only value in UTC.
/// Rollover is implicit: a new date key simply starts at zero. There is
/// no cleanup job and none is needed -- old rows are inert history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DailySpendRecord {
    /// The player this record belongs to.
    pub user_id: UserId,
    /// The UTC calendar day this record covers.
    pub day: NaiveDate,
    /// Points spent on feeding so far this day. Monotonic within the day.
    pub total_spent: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_day_as_plain_date() {
        let record = DailySpendRecord {
            user_id: UserId::new(1),
            day: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap_or_default(),
            total_spent: 40,
        };
        let json = serde_json::to_string(&record).unwrap_or_default();
        assert!(json.contains("2026-03-14"));
    }
}
