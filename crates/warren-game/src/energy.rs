//! Energy service: status reads, consumption, and point-funded refills.

use std::sync::Arc;

use warren_core::energy::{
    apply_refill, apply_regeneration, debit_energy, refill_quote, RegenOutcome,
};
use warren_core::{Clock, GameRules};
use warren_db::{LedgerStore, PlayerStore, PostgresPool};
use warren_types::{EnergyStatus, PlayerState, PointEntry, PointReason, RefillOutcome, UserId};

use crate::error::GameError;

/// Energy operations: lazy regeneration, debits, and refills.
#[derive(Clone)]
pub struct EnergyService {
    pool: PostgresPool,
    rules: Arc<GameRules>,
    clock: Arc<dyn Clock>,
}

impl EnergyService {
    /// Create a service over the given pool, rules, and clock.
    pub fn new(pool: PostgresPool, rules: Arc<GameRules>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, rules, clock }
    }

    /// Return the player's energy status, applying pending regeneration
    /// first.
    ///
    /// First contact lazily creates the player at full energy. The
    /// regenerated balance is persisted only when it actually changed, so
    /// a player hovering at or above the threshold costs no writes.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] on data-layer failure.
    pub async fn status(&self, user_id: UserId) -> Result<EnergyStatus, GameError> {
        let now = self.clock.now();
        let mut tx = self.pool.pool().begin().await?;

        let mut state =
            PlayerStore::lock_or_create(&mut tx, user_id, self.rules.energy.max_energy, now)
                .await?;
        let outcome = apply_regeneration(&mut state, &self.rules.energy, now)?;
        if outcome.gained > 0 {
            PlayerStore::persist(&mut tx, &state).await?;
            tracing::debug!(%user_id, gained = outcome.gained, "Applied energy regeneration");
        }
        tx.commit().await?;

        Ok(Self::to_status(&state, &outcome))
    }

    /// Consume `amount` energy.
    ///
    /// Pending regeneration is applied before the debit, inside the same
    /// transaction. On success the accrual marker advances to `now`: the
    /// balance is known-correct at the debit instant.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidArgument`] if `amount` is not positive.
    /// - [`GameError::InsufficientEnergy`] if the regenerated balance
    ///   cannot cover the debit. Nothing is persisted.
    /// - [`GameError::Storage`] on data-layer failure.
    pub async fn consume(&self, user_id: UserId, amount: i64) -> Result<EnergyStatus, GameError> {
        if amount <= 0 {
            return Err(GameError::InvalidArgument {
                reason: format!("energy amount must be positive, got {amount}"),
            });
        }
        let requested = u32::try_from(amount).unwrap_or(u32::MAX);

        let now = self.clock.now();
        let mut tx = self.pool.pool().begin().await?;

        let mut state =
            PlayerStore::lock_or_create(&mut tx, user_id, self.rules.energy.max_energy, now)
                .await?;
        apply_regeneration(&mut state, &self.rules.energy, now)?;
        debit_energy(&mut state, requested)?;
        state.energy_updated_at = now;

        // The debit may have re-opened regeneration; predictions come
        // from the post-debit balance and marker.
        let outcome = apply_regeneration(&mut state, &self.rules.energy, now)?;
        PlayerStore::persist(&mut tx, &state).await?;
        tx.commit().await?;

        tracing::debug!(%user_id, requested, remaining = state.current_energy, "Consumed energy");
        Ok(Self::to_status(&state, &outcome))
    }

    /// Convert points into energy, one transaction for both sides.
    ///
    /// Denials are soft: unknown player, insufficient points, or a
    /// request beyond the ceiling headroom yield `success = false` with a
    /// message (the headroom message names the exact refillable maximum)
    /// and leave all balances untouched. The stored balance is priced
    /// as-is; no regeneration is applied on this path.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidArgument`] if `amount` is not positive.
    /// - [`GameError::Storage`] on data-layer failure.
    pub async fn refill(&self, user_id: UserId, amount: i64) -> Result<RefillOutcome, GameError> {
        if amount <= 0 {
            return Err(GameError::InvalidArgument {
                reason: format!("refill amount must be positive, got {amount}"),
            });
        }
        let requested = u32::try_from(amount).unwrap_or(u32::MAX);

        let now = self.clock.now();
        let mut tx = self.pool.pool().begin().await?;

        let Some(mut state) = PlayerStore::lock(&mut tx, user_id).await? else {
            return Ok(RefillOutcome::denied(0, String::from("User profile not found")));
        };

        let cost = match refill_quote(&state, &self.rules.energy, requested)? {
            Ok(cost) => cost,
            Err(denial) => {
                return Ok(RefillOutcome::denied(
                    state.current_energy,
                    denial.to_string(),
                ));
            }
        };

        apply_refill(&mut state, requested, cost)?;
        LedgerStore::record(
            &mut tx,
            &PointEntry::record(
                user_id,
                cost.checked_neg().unwrap_or(0),
                state.spendable_points,
                PointReason::EnergyRefill,
                now,
            ),
        )
        .await?;
        PlayerStore::persist(&mut tx, &state).await?;
        tx.commit().await?;

        tracing::info!(%user_id, energy = requested, cost, "Refilled energy from points");
        Ok(RefillOutcome {
            success: true,
            points_cost: cost,
            new_energy: state.current_energy,
            error: None,
        })
    }

    /// Shape a state + regeneration outcome into the API payload.
    const fn to_status(state: &PlayerState, outcome: &RegenOutcome) -> EnergyStatus {
        EnergyStatus {
            current_energy: state.current_energy,
            max_energy: state.max_energy,
            next_regen_at: outcome.next_regen_at,
            time_to_full_ms: outcome.time_to_full_ms,
        }
    }
}
