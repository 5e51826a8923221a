//! Warren API service binary.
//!
//! Startup sequence: tracing, configuration, database pool + migrations,
//! service wiring, serve.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use warren_api::{start_server, ApiConfig, AppState};
use warren_core::{GameRules, SystemClock};
use warren_db::PostgresPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_e| EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env();

    let rules = match &config.rules_path {
        Some(path) => GameRules::from_file(path)
            .with_context(|| format!("loading rules from {}", path.display()))?,
        None => GameRules::default(),
    };

    let pool = PostgresPool::connect_url(&config.database_url)
        .await
        .context("connecting to PostgreSQL")?;
    pool.run_migrations().await.context("running migrations")?;

    let state = AppState::new(pool, Arc::new(rules), Arc::new(SystemClock));
    start_server(&config.server, state)
        .await
        .context("serving the game API")?;

    Ok(())
}
