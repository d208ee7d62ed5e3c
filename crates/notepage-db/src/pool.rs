//! PostgreSQL pool sizing and startup.
//!
//! The server sizes the pool from `DB_MAX_CONNECTIONS` and bounds connection
//! acquisition by its request timeout, so a request never waits on the pool
//! longer than it is allowed to live.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use notepage_core::defaults::REQUEST_TIMEOUT_SECS;
use notepage_core::{Error, Result};

/// Pool size used when the server is not configured otherwise.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Sizing and acquire bound for the note pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    /// Longest a query waits for a free connection.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_CONNECTIONS,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }
}

impl PoolConfig {
    pub fn new(max_connections: u32, acquire_timeout: Duration) -> Self {
        Self {
            max_connections,
            acquire_timeout,
        }
    }

    /// Translate into `sqlx` pool options, rejecting unusable values.
    pub fn pool_options(&self) -> Result<PgPoolOptions> {
        if self.max_connections == 0 {
            return Err(Error::Config("max_connections must be at least 1".into()));
        }
        if self.acquire_timeout.is_zero() {
            return Err(Error::Config("acquire_timeout must be non-zero".into()));
        }
        Ok(PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(1)
            .acquire_timeout(self.acquire_timeout))
    }
}

/// Open a pool against `database_url`.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let options = config.pool_options()?;
    let start = Instant::now();

    let pool = options
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Note pool ready"
    );
    Ok(pool)
}

/// Log the pool's current `(size, idle)` and return it.
pub fn log_pool_metrics(pool: &PgPool) -> (u32, usize) {
    let (size, idle) = (pool.size(), pool.num_idle());
    debug!(
        subsystem = "database",
        component = "pool",
        pool_size = size,
        pool_idle = idle,
        "Pool metrics"
    );
    if size > 0 && idle == 0 {
        warn!(subsystem = "database", component = "pool", "No idle connections");
    }
    (size, idle)
}
