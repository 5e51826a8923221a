//! Game API server for the Warren backend.
//!
//! A thin Axum surface over the transactional services in `warren-game`:
//!
//! - **Player endpoints** for energy (status, consume, refill), the pet
//!   (status, claim, feed), and the point ledger history
//! - **Cycle endpoints** for the current cycle (with the availability
//!   fallback, so it never 5xxs on misconfiguration) and admin
//!   create/activate
//! - **Health check** that round-trips the database
//!
//! Path player ids accept any external identity string; non-numeric ids
//! pass through the documented lossy normalization in
//! [`warren_types::UserId::from_external`].
//!
//! Hard failures map to 4xx/5xx status codes. Business policy denials
//! are 200s carrying `success = false` payloads -- the client reads the
//! message, not the status code.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::ApiConfig;
pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
