//! Axum router construction for the game API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for the Mini App webview origin.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the game API.
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted to the Mini App origin.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page + health
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Energy
        .route("/api/players/{id}/energy", get(handlers::get_energy))
        .route(
            "/api/players/{id}/energy/consume",
            post(handlers::post_consume),
        )
        .route(
            "/api/players/{id}/energy/refill",
            post(handlers::post_refill),
        )
        // Pet
        .route("/api/players/{id}/pet", get(handlers::get_pet))
        .route("/api/players/{id}/pet/claim", post(handlers::post_claim))
        .route("/api/players/{id}/pet/feed", post(handlers::post_feed))
        // Point ledger
        .route(
            "/api/players/{id}/points/history",
            get(handlers::get_points_history),
        )
        // Cycles
        .route("/api/cycles/current", get(handlers::get_current_cycle))
        .route("/api/cycles", get(handlers::list_cycles))
        .route("/api/admin/cycles", post(handlers::post_create_cycle))
        .route(
            "/api/admin/cycles/{cycle_number}/activate",
            post(handlers::post_activate_cycle),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
