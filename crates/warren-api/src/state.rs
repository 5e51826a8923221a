//! Shared application state for the API server.

use std::sync::Arc;

use warren_core::{Clock, GameRules};
use warren_db::PostgresPool;
use warren_game::{CycleService, EnergyService, FeedingService, MiningService};

/// Everything the handlers need, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Energy operations.
    pub energy: EnergyService,
    /// Idle mining operations.
    pub mining: MiningService,
    /// Feeding operations.
    pub feeding: FeedingService,
    /// Cycle configuration operations.
    pub cycles: CycleService,
    /// The connection pool, for the health check and ledger reads.
    pub pool: PostgresPool,
}

impl AppState {
    /// Wire the services over a pool, rule set, and clock.
    pub fn new(pool: PostgresPool, rules: Arc<GameRules>, clock: Arc<dyn Clock>) -> Self {
        let cycles = CycleService::new(pool.clone(), clock.clone());
        Self {
            energy: EnergyService::new(pool.clone(), rules.clone(), clock.clone()),
            mining: MiningService::new(pool.clone(), rules.clone(), clock.clone(), cycles.clone()),
            feeding: FeedingService::new(pool.clone(), rules, clock),
            cycles,
            pool,
        }
    }
}
