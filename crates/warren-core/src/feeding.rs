//! Pet feeding: daily-capped point spend converted into experience.
//!
//! A feed batch is all-or-nothing. The quote step evaluates every policy
//! against the balances and the CURRENT day's spend total; only an
//! approved quote is applied. A batch that would cross the daily cap is
//! rejected whole -- there is no partial feeding down to the cap.
//!
//! Level-ups consume the experience threshold exactly once per feed, with
//! the overflow carried forward. A single batch can never earn two
//! level-ups (the batch size bound keeps the maximum gain well under two
//! thresholds), and the logic does not support it.

use warren_types::PlayerState;

use crate::error::CoreError;
use crate::rules::{FeedRules, PetRules};

// ---------------------------------------------------------------------------
// FeedDenied
// ---------------------------------------------------------------------------

/// A feed request denied by business policy. Not an error: the caller
/// folds this into a `success = false` outcome with zero side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedDenied {
    /// The spendable balance does not cover the batch.
    InsufficientPoints {
        /// Points the batch would cost.
        needed: i64,
        /// Points currently available.
        available: i64,
    },
    /// The batch would push the day's spend past the cap.
    DailyCapExceeded {
        /// The daily spend cap.
        cap: u32,
        /// Points already spent today.
        spent: u32,
        /// Points the batch would have added.
        attempted: u32,
    },
    /// The pet is already at the level ceiling.
    MaxLevelReached {
        /// The ceiling.
        level: u32,
    },
}

impl core::fmt::Display for FeedDenied {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InsufficientPoints { needed, available } => {
                write!(f, "Insufficient points: need {needed}, have {available}")
            }
            Self::DailyCapExceeded { cap, spent, .. } => {
                write!(f, "Daily feeding limit reached: {spent} of {cap} spent today")
            }
            Self::MaxLevelReached { level } => {
                write!(f, "Pet is already at max level {level}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// An approved feed batch, priced and ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuote {
    /// Points the batch debits.
    pub total_cost: i64,
    /// Points the batch adds to the day's spend record.
    pub total_spend: u32,
    /// Experience the batch grants.
    pub total_xp: u32,
}

/// Validate the batch size against the contract.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] unless
/// `1 <= feed_count <= rules.max_feed_count`.
pub fn validate_feed_count(feed_count: u32, rules: &FeedRules) -> Result<(), CoreError> {
    if feed_count == 0 || feed_count > rules.max_feed_count {
        return Err(CoreError::InvalidArgument {
            reason: format!(
                "feed count must be between 1 and {}, got {feed_count}",
                rules.max_feed_count
            ),
        });
    }
    Ok(())
}

/// Price a feed batch against the player's balance, the day's spend total,
/// and the level ceiling.
///
/// The caller validated `feed_count` via [`validate_feed_count`] and read
/// `daily_spent` inside the same transaction that will apply the quote.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if pricing overflows
/// (unreachable with validated rules and a bounded count).
pub fn feed_quote(
    state: &PlayerState,
    feed: &FeedRules,
    pet: &PetRules,
    daily_spent: u32,
    feed_count: u32,
) -> Result<Result<FeedQuote, FeedDenied>, CoreError> {
    let total_spend = feed_count
        .checked_mul(feed.feed_cost)
        .ok_or(CoreError::ArithmeticOverflow {
            context: "feed cost",
        })?;
    let total_cost = i64::from(total_spend);
    let total_xp = feed_count
        .checked_mul(feed.xp_per_feed)
        .ok_or(CoreError::ArithmeticOverflow {
            context: "feed experience",
        })?;

    if state.spendable_points < total_cost {
        return Ok(Err(FeedDenied::InsufficientPoints {
            needed: total_cost,
            available: state.spendable_points,
        }));
    }

    let projected = daily_spent
        .checked_add(total_spend)
        .ok_or(CoreError::ArithmeticOverflow {
            context: "daily spend projection",
        })?;
    if projected > feed.daily_spend_cap {
        return Ok(Err(FeedDenied::DailyCapExceeded {
            cap: feed.daily_spend_cap,
            spent: daily_spent,
            attempted: total_spend,
        }));
    }

    if state.pet_level >= pet.max_level {
        return Ok(Err(FeedDenied::MaxLevelReached {
            level: state.pet_level,
        }));
    }

    Ok(Ok(FeedQuote {
        total_cost,
        total_spend,
        total_xp,
    }))
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// What an applied feed batch did to the pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedApplied {
    /// The level after the batch, if the batch caused a level-up.
    pub new_level: Option<u32>,
    /// Experience toward the next level after the batch.
    pub new_xp: u32,
}

/// Apply an approved feed quote: debit points, grant experience, and
/// perform at most one level-up with carry-over.
///
/// When the accumulated experience reaches the threshold below the level
/// ceiling, the level rises by exactly one and the threshold is consumed;
/// the remainder stays on the counter. A second threshold crossing in the
/// same batch is deliberately NOT honored.
///
/// # Errors
///
/// Returns [`CoreError::ArithmeticOverflow`] if a counter leaves its
/// range (the quote makes this unreachable in practice).
pub fn apply_feed(
    state: &mut PlayerState,
    pet: &PetRules,
    quote: FeedQuote,
) -> Result<FeedApplied, CoreError> {
    state.spendable_points = state.spendable_points.checked_sub(quote.total_cost).ok_or(
        CoreError::ArithmeticOverflow {
            context: "feed point debit",
        },
    )?;

    let accumulated =
        state
            .pet_xp
            .checked_add(quote.total_xp)
            .ok_or(CoreError::ArithmeticOverflow {
                context: "experience accumulation",
            })?;

    if accumulated >= pet.xp_per_level && state.pet_level < pet.max_level {
        state.pet_level = state.pet_level.saturating_add(1);
        state.pet_xp = accumulated.saturating_sub(pet.xp_per_level);
        return Ok(FeedApplied {
            new_level: Some(state.pet_level),
            new_xp: state.pet_xp,
        });
    }

    state.pet_xp = accumulated;
    Ok(FeedApplied {
        new_level: None,
        new_xp: state.pet_xp,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use warren_types::UserId;

    use super::*;

    fn feeder(points: i64, level: u32, xp: u32) -> PlayerState {
        let mut state = PlayerState::fresh(UserId::new(1), 10, Utc::now());
        state.spendable_points = points;
        state.pet_level = level;
        state.pet_xp = xp;
        state
    }

    fn quote_for(
        state: &PlayerState,
        daily_spent: u32,
        feed_count: u32,
    ) -> Result<FeedQuote, FeedDenied> {
        feed_quote(
            state,
            &FeedRules::default(),
            &PetRules::default(),
            daily_spent,
            feed_count,
        )
        .unwrap()
    }

    #[test]
    fn count_bounds_are_a_contract() {
        let rules = FeedRules::default();
        assert!(validate_feed_count(0, &rules).is_err());
        assert!(validate_feed_count(31, &rules).is_err());
        assert!(validate_feed_count(1, &rules).is_ok());
        assert!(validate_feed_count(30, &rules).is_ok());
    }

    #[test]
    fn quote_prices_twenty_points_per_feed() {
        let state = feeder(1000, 3, 0);
        let quote = quote_for(&state, 0, 5).unwrap();
        assert_eq!(quote.total_cost, 100);
        assert_eq!(quote.total_spend, 100);
        assert_eq!(quote.total_xp, 100);
    }

    #[test]
    fn insufficient_points_denied() {
        let state = feeder(39, 3, 0);
        let denial = quote_for(&state, 0, 2).unwrap_err();
        assert_eq!(
            denial,
            FeedDenied::InsufficientPoints {
                needed: 40,
                available: 39
            }
        );
    }

    #[test]
    fn daily_cap_rejects_the_whole_batch() {
        // 590 spent, a single feed (20) would land at 610 > 600: rejected
        // in full, nothing applied.
        let state = feeder(1000, 3, 0);
        let denial = quote_for(&state, 590, 1).unwrap_err();
        assert_eq!(
            denial,
            FeedDenied::DailyCapExceeded {
                cap: 600,
                spent: 590,
                attempted: 20
            }
        );
    }

    #[test]
    fn daily_cap_boundary_is_inclusive() {
        // 580 + 20 = 600 lands exactly on the cap: allowed.
        let state = feeder(1000, 3, 0);
        assert!(quote_for(&state, 580, 1).is_ok());
    }

    #[test]
    fn max_level_denied() {
        let state = feeder(1000, 10, 0);
        let denial = quote_for(&state, 0, 1).unwrap_err();
        assert_eq!(denial, FeedDenied::MaxLevelReached { level: 10 });
    }

    #[test]
    fn level_up_carries_overflow_forward() {
        // 1190 + 20 = 1210: level up, 10 carries over.
        let mut state = feeder(1000, 3, 1190);
        let quote = quote_for(&state, 0, 1).unwrap();
        let applied = apply_feed(&mut state, &PetRules::default(), quote).unwrap();
        assert_eq!(applied.new_level, Some(4));
        assert_eq!(applied.new_xp, 10);
        assert_eq!(state.pet_level, 4);
        assert_eq!(state.pet_xp, 10);
        assert_eq!(state.spendable_points, 980);
    }

    #[test]
    fn exact_threshold_levels_with_zero_remainder() {
        let mut state = feeder(1000, 2, 1180);
        let quote = quote_for(&state, 0, 1).unwrap();
        let applied = apply_feed(&mut state, &PetRules::default(), quote).unwrap();
        assert_eq!(applied.new_level, Some(3));
        assert_eq!(applied.new_xp, 0);
    }

    #[test]
    fn below_threshold_accumulates_without_leveling() {
        let mut state = feeder(1000, 2, 100);
        let quote = quote_for(&state, 0, 3).unwrap();
        let applied = apply_feed(&mut state, &PetRules::default(), quote).unwrap();
        assert_eq!(applied.new_level, None);
        assert_eq!(applied.new_xp, 160);
        assert_eq!(state.pet_level, 2);
    }

    #[test]
    fn at_most_one_level_per_batch() {
        // The largest batch (30 feeds, 600 XP) on a nearly-full counter
        // crosses the threshold once; the remainder stays below it.
        let mut state = feeder(1000, 2, 1199);
        let quote = quote_for(&state, 0, 30).unwrap();
        let applied = apply_feed(&mut state, &PetRules::default(), quote).unwrap();
        assert_eq!(applied.new_level, Some(3));
        assert_eq!(applied.new_xp, 599);
        assert_eq!(state.pet_level, 3);
    }

    #[test]
    fn lifetime_points_untouched_by_feeding() {
        let mut state = feeder(1000, 2, 0);
        state.lifetime_points = 5000;
        let quote = quote_for(&state, 0, 2).unwrap();
        let _ = apply_feed(&mut state, &PetRules::default(), quote).unwrap();
        assert_eq!(state.lifetime_points, 5000);
    }
}
