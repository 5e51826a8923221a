//! Cycle service: lookup with the availability fallback, plus admin
//! creation and activation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use warren_core::{select_active, Clock};
use warren_db::{CycleStore, PostgresPool};
use warren_types::GameCycle;

use crate::error::GameError;

/// Cycle configuration operations.
#[derive(Clone)]
pub struct CycleService {
    pool: PostgresPool,
    clock: Arc<dyn Clock>,
}

impl CycleService {
    /// Create a service over the given pool and clock.
    pub fn new(pool: PostgresPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// The cycle in effect right now.
    ///
    /// This NEVER fails: when no stored cycle is active and in-window, or
    /// when the store itself is unreachable, the hardcoded default cycle
    /// is substituted so reward accrual stays available. A storage fault
    /// is logged and swallowed here -- deliberately, and only here.
    pub async fn current(&self) -> GameCycle {
        let now = self.clock.now();
        match CycleStore::matching_cycles(self.pool.pool(), now).await {
            Ok(candidates) => select_active(&candidates, now),
            Err(err) => {
                tracing::warn!(error = %err, "Cycle lookup failed; using default cycle");
                warren_core::default_cycle(now)
            }
        }
    }

    /// Create a new cycle. Always created inactive.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidArgument`] if the window is inverted or a
    ///   rate is negative.
    /// - [`GameError::Storage`] on data-layer failure (including a
    ///   duplicate cycle number).
    pub async fn create(
        &self,
        cycle_number: i32,
        growth_rate: Decimal,
        max_speed_cap: Decimal,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<GameCycle, GameError> {
        if starts_at > ends_at {
            return Err(GameError::InvalidArgument {
                reason: String::from("cycle start must not be after its end"),
            });
        }
        if growth_rate < Decimal::ZERO || max_speed_cap < Decimal::ZERO {
            return Err(GameError::InvalidArgument {
                reason: String::from("cycle rates must not be negative"),
            });
        }

        let cycle = CycleStore::insert(
            self.pool.pool(),
            cycle_number,
            growth_rate,
            max_speed_cap,
            starts_at,
            ends_at,
        )
        .await?;
        tracing::info!(cycle_number, "Created game cycle (inactive)");
        Ok(cycle)
    }

    /// Activate `cycle_number`, deactivating every other cycle in the
    /// same transaction. The two steps are never exposed separately.
    ///
    /// # Errors
    ///
    /// - [`GameError::NotFound`] if no cycle has that number.
    /// - [`GameError::Storage`] on data-layer failure.
    pub async fn activate(&self, cycle_number: i32) -> Result<(), GameError> {
        let found = CycleStore::activate(self.pool.pool(), cycle_number).await?;
        if !found {
            return Err(GameError::NotFound {
                what: format!("cycle {cycle_number}"),
            });
        }
        Ok(())
    }

    /// List all cycles, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] on data-layer failure.
    pub async fn list(&self) -> Result<Vec<GameCycle>, GameError> {
        Ok(CycleStore::list(self.pool.pool()).await?)
    }
}
