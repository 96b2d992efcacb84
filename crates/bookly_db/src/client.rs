//! Database client for Bookly
//!
//! This module provides a database client over the `sqlx` Any driver. The concrete
//! backend is picked from the URL scheme at runtime.

use crate::error::DbError;
use bookly_config::DatabaseConfig;
use sqlx::pool::PoolOptions;
use sqlx::{Pool, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database transaction
pub type DbTransaction<'a> = Transaction<'a, sqlx::Any>;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// The concrete database behind the Any driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackend {
    Sqlite,
    Postgres,
}

impl DbBackend {
    pub fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.starts_with("sqlite:") {
            Ok(DbBackend::Sqlite)
        } else if db_url.starts_with("postgres:") || db_url.starts_with("postgresql:") {
            Ok(DbBackend::Postgres)
        } else {
            Err(DbError::UrlError(format!(
                "Unsupported database URL scheme: {}",
                db_url.split(':').next().unwrap_or_default()
            )))
        }
    }
}

/// Database client for Bookly
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct DbClient {
    /// The database connection pool
    pool: Pool<sqlx::Any>,
    backend: DbBackend,
}

impl DbClient {
    /// Create a new database client from a database configuration
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        let db_url = &db_config.url;
        if db_url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }

        let max_connections = db_config.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        Self::connect(db_url, max_connections).await
    }

    /// Create a new database client from a database URL
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::UrlError("Database URL is empty".to_string()));
        }

        Self::connect(db_url, DEFAULT_MAX_CONNECTIONS).await
    }

    async fn connect(db_url: &str, max_connections: u32) -> Result<Self, DbError> {
        let backend = DbBackend::from_url(db_url)?;
        let pool = Self::create_pool(db_url, backend, max_connections).await?;
        Ok(Self { pool, backend })
    }

    /// Create a connection pool
    ///
    /// For SQLite the database file (and its directory) is created if missing,
    /// since `create_if_missing` cannot be set through the Any options.
    async fn create_pool(
        db_url: &str,
        backend: DbBackend,
        max_connections: u32,
    ) -> Result<Pool<sqlx::Any>, DbError> {
        debug!("Creating {:?} database pool with URL: {}", backend, db_url);

        // Register the compiled-in drivers with the Any driver
        sqlx::any::install_default_drivers();

        let pool_options = PoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(3))
            .idle_timeout(Duration::from_secs(600));

        if backend == DbBackend::Sqlite {
            Self::ensure_sqlite_file(db_url)?;
        }

        let pool = pool_options
            .connect_with(sqlx::any::AnyConnectOptions::from_str(db_url)?)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                DbError::PoolError(e.to_string())
            })?;

        info!(
            "Database pool created successfully (max {} connections)",
            max_connections
        );
        Ok(pool)
    }

    fn ensure_sqlite_file(db_url: &str) -> Result<(), DbError> {
        // Handle both "sqlite:example.db" and "sqlite://example.db" formats
        let db_path = db_url
            .strip_prefix("sqlite://")
            .or_else(|| db_url.strip_prefix("sqlite:"))
            .unwrap_or(db_url);
        // Drop query parameters such as "?mode=rwc"
        let db_path = db_path.split('?').next().unwrap_or(db_path);

        if db_path.is_empty() || db_path.contains(":memory:") {
            return Ok(());
        }

        let path = Path::new(db_path);
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                debug!("Creating directory for SQLite database: {:?}", dir);
                std::fs::create_dir_all(dir).map_err(|e| {
                    error!("Failed to create directory for SQLite database: {}", e);
                    DbError::PoolError(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        if !path.exists() {
            debug!("Creating empty SQLite database file: {}", db_path);
            std::fs::File::create(path).map_err(|e| {
                error!("Failed to create SQLite database file: {}", e);
                DbError::PoolError(format!("Failed to create database file: {}", e))
            })?;
        }
        Ok(())
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    pub fn backend(&self) -> DbBackend {
        self.backend
    }

    /// Begin a transaction
    pub async fn begin(&self) -> Result<DbTransaction<'_>, DbError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))
    }

    /// Execute a query that returns no rows
    ///
    /// # Returns
    ///
    /// The number of rows affected
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Check if the database is healthy
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

impl std::fmt::Display for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DbClient({:?})", self.backend)
    }
}
