//! # notepage-db
//!
//! PostgreSQL database layer for notepage.
//!
//! This crate provides:
//! - Connection pool management
//! - The keyset/offset note repository behind the pagination endpoints
//! - Embedded schema migrations (behind the `migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use notepage_db::{paginate_by_cursor, CursorPageRequest, Database, PoolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/notepage", &PoolConfig::default()).await?;
//!     let page = paginate_by_cursor(&db.notes, CursorPageRequest::default()).await?;
//!     println!("{} notes, more: {}", page.items.len(), page.metadata.has_more);
//!     Ok(())
//! }
//! ```
pub mod notes;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use notepage_core::*;

pub use notes::PgNoteRepository;
pub use pool::{create_pool, log_pool_metrics, PoolConfig};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository for paged reads and seeding.
    pub notes: PgNoteRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to `url` with a pool sized by `config`.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
