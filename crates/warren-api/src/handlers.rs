//! REST endpoint handlers for the game API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/health` | Database round-trip health check |
//! | `GET` | `/api/players/{id}/energy` | Energy status (applies lazy regen) |
//! | `POST` | `/api/players/{id}/energy/consume` | Debit energy |
//! | `POST` | `/api/players/{id}/energy/refill` | Convert points into energy |
//! | `GET` | `/api/players/{id}/pet` | Pet status + pending rewards |
//! | `POST` | `/api/players/{id}/pet/claim` | Claim idle mining rewards |
//! | `POST` | `/api/players/{id}/pet/feed` | Feed the pet (daily-capped) |
//! | `GET` | `/api/players/{id}/points/history` | Recent point ledger entries |
//! | `GET` | `/api/cycles/current` | Active cycle (fallback, never 5xx) |
//! | `GET` | `/api/cycles` | All cycles, newest first |
//! | `POST` | `/api/admin/cycles` | Create a cycle (inactive) |
//! | `POST` | `/api/admin/cycles/{n}/activate` | Atomic activation swap |

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use warren_db::LedgerStore;
use warren_types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Default number of ledger entries returned by the history endpoint.
const DEFAULT_HISTORY_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Body for `POST /api/players/{id}/energy/consume`.
#[derive(Debug, serde::Deserialize)]
pub struct ConsumeRequest {
    /// Energy units to debit. Defaults to one.
    #[serde(default = "default_consume_amount")]
    pub amount: i64,
}

const fn default_consume_amount() -> i64 {
    1
}

/// Body for `POST /api/players/{id}/energy/refill`.
#[derive(Debug, serde::Deserialize)]
pub struct RefillRequest {
    /// Energy units to buy with points.
    pub amount: i64,
}

/// Body for `POST /api/players/{id}/pet/feed`.
#[derive(Debug, serde::Deserialize)]
pub struct FeedRequest {
    /// Number of feed actions in the batch.
    pub count: i64,
}

/// Body for `POST /api/admin/cycles`.
#[derive(Debug, serde::Deserialize)]
pub struct CreateCycleRequest {
    /// Sequence number for the new cycle.
    pub cycle_number: i32,
    /// Points per hour per pet level.
    pub growth_rate: Decimal,
    /// Upper bound on the effective mining rate.
    pub max_speed_cap: Decimal,
    /// Window start.
    pub starts_at: DateTime<Utc>,
    /// Window end.
    pub ends_at: DateTime<Utc>,
}

/// Query parameters for `GET /api/players/{id}/points/history`.
#[derive(Debug, serde::Deserialize)]
pub struct HistoryQuery {
    /// Maximum entries to return (default 50).
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page listing the API surface.
pub async fn index() -> impl IntoResponse {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Warren API</title>
    <style>
        body { background: #0d1117; color: #c9d1d9; font-family: monospace; padding: 2rem; }
        h1 { color: #58a6ff; }
        li::before { content: attr(data-m) " "; color: #7ee787; font-weight: bold; }
        ul { list-style: none; padding: 0; }
        li { padding: 0.3rem 0; }
    </style>
</head>
<body>
    <h1>Warren API</h1>
    <ul>
        <li data-m="GET">/health</li>
        <li data-m="GET">/api/players/{id}/energy</li>
        <li data-m="POST">/api/players/{id}/energy/consume</li>
        <li data-m="POST">/api/players/{id}/energy/refill</li>
        <li data-m="GET">/api/players/{id}/pet</li>
        <li data-m="POST">/api/players/{id}/pet/claim</li>
        <li data-m="POST">/api/players/{id}/pet/feed</li>
        <li data-m="GET">/api/players/{id}/points/history</li>
        <li data-m="GET">/api/cycles/current</li>
        <li data-m="GET">/api/cycles</li>
        <li data-m="POST">/api/admin/cycles</li>
        <li data-m="POST">/api/admin/cycles/{n}/activate</li>
    </ul>
</body>
</html>"#,
    )
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Round-trip the database and report liveness.
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .pool
        .ping()
        .await
        .map_err(warren_game::GameError::from)?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

// ---------------------------------------------------------------------------
// Energy
// ---------------------------------------------------------------------------

/// Energy status, applying pending regeneration first.
pub async fn get_energy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.energy.status(user_id(&id)).await?;
    Ok(Json(status))
}

/// Debit energy for an action.
pub async fn post_consume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ConsumeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.energy.consume(user_id(&id), body.amount).await?;
    Ok(Json(status))
}

/// Convert points into energy.
pub async fn post_refill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RefillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.energy.refill(user_id(&id), body.amount).await?;
    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// Pet
// ---------------------------------------------------------------------------

/// Pet status with the pending-reward projection.
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state.mining.pet_status(user_id(&id)).await?;
    Ok(Json(status))
}

/// Claim idle mining rewards.
pub async fn post_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.mining.claim(user_id(&id)).await?;
    Ok(Json(outcome))
}

/// Feed the pet.
pub async fn post_feed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<FeedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.feeding.feed(user_id(&id), body.count).await?;
    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// Point ledger
// ---------------------------------------------------------------------------

/// Recent point ledger entries, newest first.
pub async fn get_points_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500);
    let entries = LedgerStore::entries_for_user(state.pool.pool(), user_id(&id), limit)
        .await
        .map_err(warren_game::GameError::from)?;
    Ok(Json(entries))
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

/// The cycle in effect right now. Never 5xxs: misconfiguration and
/// storage faults fall back to the default cycle.
pub async fn get_current_cycle(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.cycles.current().await)
}

/// All cycles, newest first.
pub async fn list_cycles(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.cycles.list().await?))
}

/// Create a cycle. Always created inactive.
pub async fn post_create_cycle(
    State(state): State<AppState>,
    Json(body): Json<CreateCycleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cycle = state
        .cycles
        .create(
            body.cycle_number,
            body.growth_rate,
            body.max_speed_cap,
            body.starts_at,
            body.ends_at,
        )
        .await?;
    Ok(Json(cycle))
}

/// Activate a cycle, deactivating all others atomically.
pub async fn post_activate_cycle(
    State(state): State<AppState>,
    Path(cycle_number): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.cycles.activate(cycle_number).await?;
    Ok(Json(serde_json::json!({ "activated": cycle_number })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Normalize the path id through the identity boundary.
fn user_id(raw: &str) -> UserId {
    UserId::from_external(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn consume_amount_defaults_to_one() {
        let body: ConsumeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(body.amount, 1);
    }

    #[test]
    fn numeric_path_id_maps_to_itself() {
        assert_eq!(user_id("98765"), UserId::new(98_765));
    }

    #[test]
    fn non_numeric_path_id_is_normalized() {
        let id = user_id("tg_user_x");
        assert!(id.into_inner() >= 0);
        assert_eq!(id, user_id("tg_user_x"));
    }
}
