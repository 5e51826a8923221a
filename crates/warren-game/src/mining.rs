//! Mining service: pet status projection and idle reward claims.

use std::sync::Arc;

use warren_core::mining::{pending_rewards, settle_claim};
use warren_core::{Clock, GameRules};
use warren_db::{LedgerStore, PlayerStore, PostgresPool, SpendStore};
use warren_types::{ClaimOutcome, PetStatus, PointEntry, PointReason, UserId};

use crate::cycles::CycleService;
use crate::error::GameError;

/// Idle mining operations.
#[derive(Clone)]
pub struct MiningService {
    pool: PostgresPool,
    rules: Arc<GameRules>,
    clock: Arc<dyn Clock>,
    cycles: CycleService,
}

impl MiningService {
    /// Create a service over the given pool, rules, clock, and cycle
    /// lookup.
    pub fn new(
        pool: PostgresPool,
        rules: Arc<GameRules>,
        clock: Arc<dyn Clock>,
        cycles: CycleService,
    ) -> Self {
        Self {
            pool,
            rules,
            clock,
            cycles,
        }
    }

    /// Return the pet's status: progression, pending rewards, and the
    /// day's feeding budget.
    ///
    /// `pending_rewards` is a pure projection; reading the status never
    /// advances the claim marker or touches balances. First contact
    /// lazily creates the player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] on data-layer failure.
    pub async fn pet_status(&self, user_id: UserId) -> Result<PetStatus, GameError> {
        let cycle = self.cycles.current().await;
        let now = self.clock.now();
        let mut tx = self.pool.pool().begin().await?;

        let state =
            PlayerStore::lock_or_create(&mut tx, user_id, self.rules.energy.max_energy, now)
                .await?;
        let daily_feed_spent = SpendStore::day_total(&mut tx, user_id, now.date_naive()).await?;
        tx.commit().await?;

        let pending = pending_rewards(&state, &cycle, &self.rules.pet, now);

        Ok(PetStatus {
            level: state.pet_level,
            xp: state.pet_xp,
            xp_for_next_level: self.rules.pet.xp_per_level,
            last_claim_at: state.pet_claimed_at,
            pending_rewards: pending,
            can_level_up: state.pet_xp >= self.rules.pet.xp_per_level
                && state.pet_level < self.rules.pet.max_level,
            daily_feed_spent,
            daily_feed_limit: self.rules.feed.daily_spend_cap,
            feed_cost: self.rules.feed.feed_cost,
        })
    }

    /// Claim pending mining rewards.
    ///
    /// Rewards are recomputed at claim time under the player row lock, so
    /// two racing claims serialize: the first settles and advances the
    /// claim marker, the second recomputes zero pending and is denied.
    /// Zero pending is a soft denial, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] on data-layer failure.
    pub async fn claim(&self, user_id: UserId) -> Result<ClaimOutcome, GameError> {
        let cycle = self.cycles.current().await;
        let now = self.clock.now();
        let mut tx = self.pool.pool().begin().await?;

        let mut state =
            PlayerStore::lock_or_create(&mut tx, user_id, self.rules.energy.max_energy, now)
                .await?;
        let earned = pending_rewards(&state, &cycle, &self.rules.pet, now);
        if earned <= 0 {
            return Ok(ClaimOutcome::denied(
                state.spendable_points,
                state.lifetime_points,
                String::from("No rewards to claim"),
            ));
        }

        settle_claim(&mut state, earned, now)?;
        LedgerStore::record(
            &mut tx,
            &PointEntry::record(
                user_id,
                earned,
                state.spendable_points,
                PointReason::MiningClaim,
                now,
            ),
        )
        .await?;
        PlayerStore::persist(&mut tx, &state).await?;
        tx.commit().await?;

        tracing::info!(%user_id, earned, "Claimed mining rewards");
        Ok(ClaimOutcome {
            success: true,
            points_earned: earned,
            new_spendable_points: state.spendable_points,
            new_lifetime_points: state.lifetime_points,
            claimed_at: Some(now),
            error: None,
        })
    }
}
