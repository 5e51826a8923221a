//! Append-only point ledger persistence.
//!
//! One row per point balance change, written in the same transaction as
//! the balance mutation it records. Game logic never reads the ledger;
//! it exists so every credit and debit is reconstructible after the fact.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use warren_types::{EntryId, PointEntry, PointReason, UserId};

use crate::error::DbError;

/// A row from the `point_ledger` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct EntryRow {
    id: Uuid,
    user_id: i64,
    delta: i64,
    balance_after: i64,
    reason: String,
    created_at: DateTime<Utc>,
}

impl EntryRow {
    fn into_entry(self) -> Result<PointEntry, DbError> {
        let reason = match self.reason.as_str() {
            "mining_claim" => PointReason::MiningClaim,
            "pet_feed" => PointReason::PetFeed,
            "energy_refill" => PointReason::EnergyRefill,
            other => {
                return Err(DbError::RowDecode(format!("unknown point reason: {other}")));
            }
        };
        Ok(PointEntry {
            id: EntryId::from(self.id),
            user_id: UserId::new(self.user_id),
            delta: self.delta,
            balance_after: self.balance_after,
            reason,
            created_at: self.created_at,
        })
    }
}

/// Operations on the `point_ledger` table.
pub struct LedgerStore;

impl LedgerStore {
    /// Append one ledger entry.
    ///
    /// Runs on the caller's transaction so the entry commits or rolls
    /// back together with the balance change it records.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the insert fails.
    pub async fn record(conn: &mut PgConnection, entry: &PointEntry) -> Result<(), DbError> {
        sqlx::query(
            r"INSERT INTO point_ledger (id, user_id, delta, balance_after, reason, created_at)
              VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.id.into_inner())
        .bind(entry.user_id.into_inner())
        .bind(entry.delta)
        .bind(entry.balance_after)
        .bind(entry.reason.as_str())
        .bind(entry.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Fetch a player's most recent ledger entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] on query failure, or
    /// [`DbError::RowDecode`] if a stored reason is unknown.
    pub async fn entries_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<PointEntry>, DbError> {
        let rows = sqlx::query_as::<_, EntryRow>(
            r"SELECT id, user_id, delta, balance_after, reason, created_at
              FROM point_ledger
              WHERE user_id = $1
              ORDER BY created_at DESC
              LIMIT $2",
        )
        .bind(user_id.into_inner())
        .bind(limit.max(0))
        .fetch_all(pool)
        .await?;

        rows.into_iter().map(EntryRow::into_entry).collect()
    }
}
