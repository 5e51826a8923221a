//! Daily spend records keyed by `(user_id, day)`.
//!
//! The feeding cap is per UTC calendar day. The key carries the date-only
//! value directly: a new day means a new key starting at zero, so there
//! is no reset job and no row mutation at midnight. Both operations here
//! run on the transaction that holds the player row lock, which makes the
//! cap check and the spend update atomic with the balance debit they gate.

use chrono::NaiveDate;
use sqlx::PgConnection;

use warren_types::{DailySpendRecord, UserId};

use crate::error::DbError;

/// Operations on the `daily_spend` table.
pub struct SpendStore;

impl SpendStore {
    /// Points spent on feeding by `user_id` on `day`. Zero if no record
    /// exists (including every new day).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] on query failure, or
    /// [`DbError::RowDecode`] if the stored total is corrupted.
    pub async fn day_total(
        conn: &mut PgConnection,
        user_id: UserId,
        day: NaiveDate,
    ) -> Result<u32, DbError> {
        let total: Option<(i32,)> = sqlx::query_as(
            r"SELECT total_spent FROM daily_spend WHERE user_id = $1 AND day = $2",
        )
        .bind(user_id.into_inner())
        .bind(day)
        .fetch_optional(&mut *conn)
        .await?;

        match total {
            None => Ok(0),
            Some((value,)) => u32::try_from(value)
                .map_err(|_e| DbError::RowDecode(format!("negative total_spent: {value}"))),
        }
    }

    /// Add `amount` to the day's cumulative spend, creating the record at
    /// `amount` if the day has no row yet.
    ///
    /// Returns the record after the update.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] on query failure, or
    /// [`DbError::RowDecode`] if the stored total is corrupted.
    pub async fn add_spend(
        conn: &mut PgConnection,
        user_id: UserId,
        day: NaiveDate,
        amount: u32,
    ) -> Result<DailySpendRecord, DbError> {
        let (total,): (i32,) = sqlx::query_as(
            r"INSERT INTO daily_spend (user_id, day, total_spent)
              VALUES ($1, $2, $3)
              ON CONFLICT (user_id, day)
              DO UPDATE SET total_spent = daily_spend.total_spent + EXCLUDED.total_spent
              RETURNING total_spent",
        )
        .bind(user_id.into_inner())
        .bind(day)
        .bind(to_db_i32(amount))
        .fetch_one(&mut *conn)
        .await?;

        let total_spent = u32::try_from(total)
            .map_err(|_e| DbError::RowDecode(format!("negative total_spent: {total}")))?;

        Ok(DailySpendRecord {
            user_id,
            day,
            total_spent,
        })
    }
}

/// Narrow a spend amount to the `INTEGER` column type.
fn to_db_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
