//! Per-player state rows: get-or-create, row locking, and write-back.
//!
//! Every mutating game operation follows the same shape: begin a
//! transaction, call [`PlayerStore::lock_or_create`] to materialize and
//! lock the player row (`SELECT ... FOR UPDATE`), run the pure accrual
//! math, then [`PlayerStore::persist`] and commit. The row lock is what
//! serializes concurrent operations for one player; rows for different
//! players never contend.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use warren_types::{PlayerState, UserId};

use crate::error::DbError;

/// A row from the `player_states` table, as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
struct PlayerRow {
    user_id: i64,
    current_energy: i32,
    max_energy: i32,
    energy_updated_at: DateTime<Utc>,
    pet_level: i32,
    pet_xp: i32,
    pet_claimed_at: DateTime<Utc>,
    spendable_points: i64,
    lifetime_points: i64,
}

impl PlayerRow {
    /// Convert the stored row into the domain type.
    ///
    /// The schema constrains the counters to be non-negative; a negative
    /// value here means the row was corrupted outside the application.
    fn into_state(self) -> Result<PlayerState, DbError> {
        let decode = |value: i32, column: &str| {
            u32::try_from(value)
                .map_err(|_e| DbError::RowDecode(format!("negative {column}: {value}")))
        };
        Ok(PlayerState {
            user_id: UserId::new(self.user_id),
            current_energy: decode(self.current_energy, "current_energy")?,
            max_energy: decode(self.max_energy, "max_energy")?,
            energy_updated_at: self.energy_updated_at,
            pet_level: decode(self.pet_level, "pet_level")?,
            pet_xp: decode(self.pet_xp, "pet_xp")?,
            pet_claimed_at: self.pet_claimed_at,
            spendable_points: self.spendable_points,
            lifetime_points: self.lifetime_points,
        })
    }
}

/// Operations on the `player_states` table.
pub struct PlayerStore;

impl PlayerStore {
    /// Materialize the player row if it does not exist, then lock it for
    /// the remainder of the transaction.
    ///
    /// First contact creates the row at full energy (`current_energy =
    /// max_energy`) with both accrual markers at `now`, so no retroactive
    /// time is credited. The subsequent `SELECT ... FOR UPDATE` blocks
    /// concurrent transactions on the same player until this one commits.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] on query failure, or
    /// [`DbError::RowDecode`] if the stored row is corrupted.
    pub async fn lock_or_create(
        conn: &mut PgConnection,
        user_id: UserId,
        max_energy: u32,
        now: DateTime<Utc>,
    ) -> Result<PlayerState, DbError> {
        sqlx::query(
            r"INSERT INTO player_states
                  (user_id, current_energy, max_energy, energy_updated_at,
                   pet_level, pet_xp, pet_claimed_at, spendable_points, lifetime_points)
              VALUES ($1, $2, $2, $3, 1, 0, $3, 0, 0)
              ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id.into_inner())
        .bind(to_db_i32(max_energy))
        .bind(now)
        .execute(&mut *conn)
        .await?;

        let row = sqlx::query_as::<_, PlayerRow>(
            r"SELECT user_id, current_energy, max_energy, energy_updated_at,
                     pet_level, pet_xp, pet_claimed_at, spendable_points, lifetime_points
              FROM player_states
              WHERE user_id = $1
              FOR UPDATE",
        )
        .bind(user_id.into_inner())
        .fetch_one(&mut *conn)
        .await?;

        row.into_state()
    }

    /// Lock an existing player row for the remainder of the transaction,
    /// without creating one.
    ///
    /// Used by operations that soft-fail on an unknown player instead of
    /// materializing a fresh profile.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] on query failure, or
    /// [`DbError::RowDecode`] if the stored row is corrupted.
    pub async fn lock(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<Option<PlayerState>, DbError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r"SELECT user_id, current_energy, max_energy, energy_updated_at,
                     pet_level, pet_xp, pet_claimed_at, spendable_points, lifetime_points
              FROM player_states
              WHERE user_id = $1
              FOR UPDATE",
        )
        .bind(user_id.into_inner())
        .fetch_optional(&mut *conn)
        .await?;

        row.map(PlayerRow::into_state).transpose()
    }

    /// Read a player row without creating or locking it.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] on query failure, or
    /// [`DbError::RowDecode`] if the stored row is corrupted.
    pub async fn fetch(pool: &PgPool, user_id: UserId) -> Result<Option<PlayerState>, DbError> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r"SELECT user_id, current_energy, max_energy, energy_updated_at,
                     pet_level, pet_xp, pet_claimed_at, spendable_points, lifetime_points
              FROM player_states
              WHERE user_id = $1",
        )
        .bind(user_id.into_inner())
        .fetch_optional(pool)
        .await?;

        row.map(PlayerRow::into_state).transpose()
    }

    /// Write a player state back to its row.
    ///
    /// Must run inside the transaction that locked the row via
    /// [`PlayerStore::lock_or_create`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn persist(conn: &mut PgConnection, state: &PlayerState) -> Result<(), DbError> {
        sqlx::query(
            r"UPDATE player_states
              SET current_energy = $2,
                  energy_updated_at = $3,
                  pet_level = $4,
                  pet_xp = $5,
                  pet_claimed_at = $6,
                  spendable_points = $7,
                  lifetime_points = $8,
                  updated_at = now()
              WHERE user_id = $1",
        )
        .bind(state.user_id.into_inner())
        .bind(to_db_i32(state.current_energy))
        .bind(state.energy_updated_at)
        .bind(to_db_i32(state.pet_level))
        .bind(to_db_i32(state.pet_xp))
        .bind(state.pet_claimed_at)
        .bind(state.spendable_points)
        .bind(state.lifetime_points)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

/// Narrow a domain counter to the `INTEGER` column type.
///
/// The accrual invariants keep every counter far below this bound.
fn to_db_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
