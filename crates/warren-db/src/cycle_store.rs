//! Cycle configuration rows and the activation swap.
//!
//! Cycles are admin-managed. The invariant -- at most one active cycle --
//! is maintained by [`CycleStore::activate`], which deactivates all rows
//! and activates the target inside one transaction. A reader racing that
//! transaction can observe zero active cycles; readers handle that with
//! the default-cycle fallback rather than blocking.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use warren_types::GameCycle;

use crate::error::DbError;

/// A row from the `game_cycles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct CycleRow {
    cycle_number: i32,
    growth_rate: Decimal,
    max_speed_cap: Decimal,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    is_active: bool,
}

impl From<CycleRow> for GameCycle {
    fn from(row: CycleRow) -> Self {
        Self {
            cycle_number: row.cycle_number,
            growth_rate: row.growth_rate,
            max_speed_cap: row.max_speed_cap,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            is_active: row.is_active,
        }
    }
}

/// Columns selected for every cycle query.
const CYCLE_COLUMNS: &str =
    "cycle_number, growth_rate, max_speed_cap, starts_at, ends_at, is_active";

/// Operations on the `game_cycles` table.
pub struct CycleStore;

impl CycleStore {
    /// Fetch every cycle eligible at `now`: administratively active and
    /// inside its date window. Ordered by `cycle_number` descending so a
    /// transiently-doubled active flag resolves to the newest cycle.
    ///
    /// The activation invariant makes more than one row here abnormal,
    /// but a reader racing the activation swap can observe it; callers
    /// pick deterministically rather than assuming a single row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn matching_cycles(
        pool: &PgPool,
        now: DateTime<Utc>,
    ) -> Result<Vec<GameCycle>, DbError> {
        let rows = sqlx::query_as::<_, CycleRow>(&format!(
            r"SELECT {CYCLE_COLUMNS}
              FROM game_cycles
              WHERE is_active AND starts_at <= $1 AND ends_at >= $1
              ORDER BY cycle_number DESC",
        ))
        .bind(now)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(GameCycle::from).collect())
    }

    /// Insert a new cycle. Always created inactive; activation is a
    /// separate, explicit step.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails (including a
    /// duplicate `cycle_number`).
    pub async fn insert(
        pool: &PgPool,
        cycle_number: i32,
        growth_rate: Decimal,
        max_speed_cap: Decimal,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<GameCycle, DbError> {
        let row = sqlx::query_as::<_, CycleRow>(&format!(
            r"INSERT INTO game_cycles
                  (cycle_number, growth_rate, max_speed_cap, starts_at, ends_at, is_active)
              VALUES ($1, $2, $3, $4, $5, FALSE)
              RETURNING {CYCLE_COLUMNS}",
        ))
        .bind(cycle_number)
        .bind(growth_rate)
        .bind(max_speed_cap)
        .bind(starts_at)
        .bind(ends_at)
        .fetch_one(pool)
        .await?;

        Ok(row.into())
    }

    /// Activate `cycle_number`, deactivating every other cycle.
    ///
    /// The deactivate-all and activate-one statements run in a single
    /// transaction; they are never exposed as independently callable
    /// steps. Returns `false` if no row matched `cycle_number` (the
    /// transaction rolls back and nothing is deactivated).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if either statement fails.
    pub async fn activate(pool: &PgPool, cycle_number: i32) -> Result<bool, DbError> {
        let mut tx = pool.begin().await?;

        sqlx::query(r"UPDATE game_cycles SET is_active = FALSE WHERE is_active")
            .execute(&mut *tx)
            .await?;

        let updated = sqlx::query(
            r"UPDATE game_cycles SET is_active = TRUE WHERE cycle_number = $1",
        )
        .bind(cycle_number)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        tracing::info!(cycle_number, "Activated game cycle");
        Ok(true)
    }

    /// List all cycles, newest first. Admin convenience.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(pool: &PgPool) -> Result<Vec<GameCycle>, DbError> {
        let rows = sqlx::query_as::<_, CycleRow>(&format!(
            r"SELECT {CYCLE_COLUMNS} FROM game_cycles ORDER BY cycle_number DESC",
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(GameCycle::from).collect())
    }
}
