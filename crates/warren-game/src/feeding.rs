//! Feeding service: daily-capped point spend converted into experience.

use std::sync::Arc;

use warren_core::feeding::{apply_feed, feed_quote, validate_feed_count};
use warren_core::{Clock, GameRules};
use warren_db::{LedgerStore, PlayerStore, PostgresPool, SpendStore};
use warren_types::{FeedOutcome, PointEntry, PointReason, UserId};

use crate::error::GameError;

/// Pet feeding operations.
#[derive(Clone)]
pub struct FeedingService {
    pool: PostgresPool,
    rules: Arc<GameRules>,
    clock: Arc<dyn Clock>,
}

impl FeedingService {
    /// Create a service over the given pool, rules, and clock.
    pub fn new(pool: PostgresPool, rules: Arc<GameRules>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, rules, clock }
    }

    /// Feed the pet `feed_count` times as one all-or-nothing batch.
    ///
    /// The daily-cap check reads the pre-existing total and the spend
    /// update runs in the same transaction as the point debit, so the cap
    /// cannot be overshot by racing requests. Policy denials
    /// (insufficient points, daily cap, max level) are soft outcomes with
    /// zero side effects.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidArgument`] if `feed_count` is outside the
    ///   allowed batch range.
    /// - [`GameError::Storage`] on data-layer failure.
    pub async fn feed(&self, user_id: UserId, feed_count: i64) -> Result<FeedOutcome, GameError> {
        if feed_count < 1 {
            return Err(GameError::InvalidArgument {
                reason: format!(
                    "feed count must be between 1 and {}, got {feed_count}",
                    self.rules.feed.max_feed_count
                ),
            });
        }
        let count = u32::try_from(feed_count).unwrap_or(u32::MAX);
        validate_feed_count(count, &self.rules.feed)?;

        let now = self.clock.now();
        let day = now.date_naive();
        let mut tx = self.pool.pool().begin().await?;

        let mut state =
            PlayerStore::lock_or_create(&mut tx, user_id, self.rules.energy.max_energy, now)
                .await?;
        let daily_spent = SpendStore::day_total(&mut tx, user_id, day).await?;

        let quote = match feed_quote(
            &state,
            &self.rules.feed,
            &self.rules.pet,
            daily_spent,
            count,
        )? {
            Ok(quote) => quote,
            Err(denial) => {
                return Ok(FeedOutcome::denied(
                    state.pet_xp,
                    daily_spent,
                    denial.to_string(),
                ));
            }
        };

        let applied = apply_feed(&mut state, &self.rules.pet, quote)?;
        let record = SpendStore::add_spend(&mut tx, user_id, day, quote.total_spend).await?;
        LedgerStore::record(
            &mut tx,
            &PointEntry::record(
                user_id,
                quote.total_cost.checked_neg().unwrap_or(0),
                state.spendable_points,
                PointReason::PetFeed,
                now,
            ),
        )
        .await?;
        PlayerStore::persist(&mut tx, &state).await?;
        tx.commit().await?;

        if let Some(level) = applied.new_level {
            tracing::info!(%user_id, level, "Pet leveled up");
        }

        Ok(FeedOutcome {
            success: true,
            points_spent: quote.total_cost,
            xp_gained: quote.total_xp,
            new_xp: applied.new_xp,
            new_level: applied.new_level,
            can_level_up: state.pet_xp >= self.rules.pet.xp_per_level
                && state.pet_level < self.rules.pet.max_level,
            daily_spent_total: record.total_spent,
            error: None,
        })
    }
}
