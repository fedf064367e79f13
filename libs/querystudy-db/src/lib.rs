#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Database access layer for the querystudy workspace.
//!
//! Wraps an `SQLx` pool together with the `SeaORM` connection built on top of
//! it, and adds the pieces the query catalog relies on:
//! - typed connection configuration loaded through `figment`
//! - `SQLite` PRAGMA whitelist and in-memory DSN handling
//! - transaction scopes with an explicit commit/rollback policy
//! - fetch helpers (`fetch_one`, `fetch_first`, `fetch_results`, `fetch_count`)
//!
//! # Features
//! - `sqlite` (default), `pg`: enable `SQLx` backends
//!
//! # Example
//! ```rust,no_run
//! use querystudy_db::{ConnectOpts, DbHandle, TxPolicy};
//!
//! # async fn demo() -> querystudy_db::Result<()> {
//! let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//! let rows = db
//!     .with_sea_tx(TxPolicy::Rollback, |tx| {
//!         Box::pin(async move {
//!             use sea_orm::ConnectionTrait;
//!             tx.execute_unprepared("CREATE TABLE t (id INTEGER PRIMARY KEY)").await?;
//!             Ok(1_u64)
//!         })
//!     })
//!     .await?;
//! assert_eq!(rows, 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(any(feature = "pg", feature = "sqlite")),
    allow(
        unused_imports,
        unused_variables,
        dead_code,
        unreachable_code,
        unused_lifetimes,
        clippy::unused_async,
    )
)]

pub use sea_orm::ConnectionTrait as DbConnTrait;

// Core modules
pub mod config;
pub mod fetch;
pub mod options;
pub mod tx;

// Internal modules
mod pool_opts;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use config::{DbConnConfig, DbEngineCfg, PoolCfg, load_db_config};
pub use fetch::{FetchExt, PageRequest, QueryResults};
pub use options::{DbConnectOptions, build_db_handle, redact_credentials_in_dsn};
pub use tx::TxPolicy;

use std::time::Duration;

#[cfg(any(feature = "pg", feature = "sqlite"))]
use pool_opts::ApplyPoolOpts;
#[cfg(feature = "sqlite")]
use sqlite::{Pragmas, extract_sqlite_pragmas, is_memory_dsn, prepare_sqlite_path};

#[cfg(feature = "pg")]
use sea_orm::sqlx::{PgPool, Postgres, postgres::PgPoolOptions};
#[cfg(feature = "sqlite")]
use sea_orm::sqlx::{Sqlite, SqlitePool, sqlite::SqlitePoolOptions};

use sea_orm::DatabaseConnection;
#[cfg(feature = "pg")]
use sea_orm::SqlxPostgresConnector;
#[cfg(feature = "sqlite")]
use sea_orm::SqlxSqliteConnector;

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for the DB handle and helpers.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration conflict: {0}")]
    ConfigConflict(String),

    #[error("Invalid SQLite PRAGMA parameter '{key}': {message}")]
    InvalidSqlitePragma { key: String, message: String },

    #[error("Unknown SQLite PRAGMA parameter: {0}")]
    UnknownSqlitePragma(String),

    #[error("Invalid connection parameter: {0}")]
    InvalidParameter(String),

    #[error("Query returned {found} rows where at most one was expected")]
    NonUniqueResult { found: usize },

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[cfg(any(feature = "pg", feature = "sqlite"))]
    #[error(transparent)]
    Sqlx(#[from] sea_orm::sqlx::Error),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

/// Connection options.
/// Covers the common sqlx pool knobs; each driver applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// Maximum lifetime for a connection.
    pub max_lifetime: Option<Duration>,
    /// Test connection health before acquire.
    pub test_before_acquire: bool,
    /// For `SQLite` file DSNs, create parent directories if missing.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            max_lifetime: None,
            test_before_acquire: false,

            create_sqlite_dirs: true,
        }
    }
}

impl ConnectOpts {
    /// Every connection to `sqlite::memory:` opens its own private database, so an
    /// in-memory pool must never hold more than one connection nor recycle it.
    #[must_use]
    pub fn for_memory_sqlite(mut self) -> Self {
        self.max_conns = Some(1);
        self.min_conns = Some(1);
        self.idle_timeout = None;
        self.max_lifetime = None;
        self
    }
}

/// One concrete sqlx pool.
#[derive(Clone, Debug)]
pub enum DbPool {
    #[cfg(feature = "pg")]
    Postgres(PgPool),
    #[cfg(feature = "sqlite")]
    Sqlite(SqlitePool),
}

/// Main handle.
#[derive(Debug, Clone)]
pub struct DbHandle {
    engine: DbEngine,
    pool: DbPool,
    dsn: String,
    sea: DatabaseConnection,
}

#[cfg(feature = "sqlite")]
const DEFAULT_SQLITE_BUSY_TIMEOUT: i32 = 5000;

impl DbHandle {
    /// Detect engine by DSN.
    ///
    /// Only the scheme prefix is inspected; the tail (credentials etc.) is left alone.
    ///
    /// # Errors
    /// Returns `DbError::UnknownDsn` if the DSN scheme is not recognized.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let s = dsn.trim_start();

        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(dsn.to_owned()))
        }
    }

    /// Connect and build handle.
    ///
    /// # Errors
    /// Returns an error if the connection fails or the DSN is invalid.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        match engine {
            #[cfg(feature = "pg")]
            DbEngine::Postgres => {
                let o = PgPoolOptions::new().apply(&opts);
                let pool = o.connect(dsn).await?;
                let sea = SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone());
                tracing::debug!(dsn = %redact_credentials_in_dsn(Some(dsn)), "Connected to PostgreSQL");
                Ok(Self {
                    engine,
                    pool: DbPool::Postgres(pool),
                    dsn: dsn.to_owned(),
                    sea,
                })
            }
            #[cfg(not(feature = "pg"))]
            DbEngine::Postgres => Err(DbError::FeatureDisabled("PostgreSQL feature not enabled")),
            #[cfg(feature = "sqlite")]
            DbEngine::Sqlite => {
                let dsn = prepare_sqlite_path(dsn, opts.create_sqlite_dirs)?;

                let (clean_dsn, pairs) = extract_sqlite_pragmas(&dsn);
                let pragmas = Pragmas::from_pairs(&pairs)?;

                let is_memory = is_memory_dsn(&clean_dsn);
                let opts = if is_memory {
                    opts.for_memory_sqlite()
                } else {
                    opts
                };
                let mut o = SqlitePoolOptions::new().apply(&opts);

                o = o.after_connect(move |conn, _meta| {
                    let pragmas = pragmas.clone();
                    Box::pin(async move {
                        let journal_mode = pragmas.effective_journal_mode().map_or(
                            if is_memory { "DELETE" } else { "WAL" },
                            sqlite::pragmas::JournalMode::as_sql,
                        );
                        let stmt = format!("PRAGMA journal_mode = {journal_mode}");
                        sea_orm::sqlx::query(&stmt).execute(&mut *conn).await?;

                        let sync_mode = pragmas
                            .synchronous
                            .map_or("NORMAL", sqlite::pragmas::SyncMode::as_sql);
                        let stmt = format!("PRAGMA synchronous = {sync_mode}");
                        sea_orm::sqlx::query(&stmt).execute(&mut *conn).await?;

                        sea_orm::sqlx::query("PRAGMA foreign_keys = ON")
                            .execute(&mut *conn)
                            .await?;

                        if !is_memory {
                            let timeout = pragmas
                                .busy_timeout_ms
                                .unwrap_or(DEFAULT_SQLITE_BUSY_TIMEOUT.into());
                            // PRAGMA takes no bound parameters.
                            let stmt = format!("PRAGMA busy_timeout = {timeout}");
                            sea_orm::sqlx::query(&stmt).execute(&mut *conn).await?;
                        }

                        Ok(())
                    })
                });

                let pool = o.connect(&clean_dsn).await?;
                let sea = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool.clone());
                tracing::debug!(dsn = %clean_dsn, in_memory = is_memory, "Connected to SQLite");

                Ok(Self {
                    engine,
                    pool: DbPool::Sqlite(pool),
                    dsn: clean_dsn,
                    sea,
                })
            }
            #[cfg(not(feature = "sqlite"))]
            DbEngine::Sqlite => Err(DbError::FeatureDisabled("SQLite feature not enabled")),
        }
    }

    /// Wrap an already built pool. Used by [`DbConnectOptions::connect`].
    pub(crate) fn from_parts(
        engine: DbEngine,
        pool: DbPool,
        dsn: String,
        sea: DatabaseConnection,
    ) -> Self {
        Self {
            engine,
            pool,
            dsn,
            sea,
        }
    }

    /// Close every pooled connection and wait for them to finish.
    pub async fn close(self) {
        match self.pool {
            #[cfg(feature = "pg")]
            DbPool::Postgres(p) => p.close().await,
            #[cfg(feature = "sqlite")]
            DbPool::Sqlite(p) => p.close().await,
        }
    }

    /// Get the backend.
    #[must_use]
    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    /// Get the DSN used for this connection.
    #[must_use]
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Whether this handle holds a private in-memory `SQLite` database that
    /// disappears with the pool.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        #[cfg(feature = "sqlite")]
        if self.engine == DbEngine::Sqlite {
            return is_memory_dsn(&self.dsn);
        }
        false
    }

    /// `SeaORM` connection backed by this handle's pool.
    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.sea
    }

    // --- sqlx accessors ---
    #[cfg(feature = "pg")]
    #[must_use]
    pub fn sqlx_postgres(&self) -> Option<&PgPool> {
        match self.pool {
            DbPool::Postgres(ref p) => Some(p),
            #[cfg(feature = "sqlite")]
            DbPool::Sqlite(_) => None,
        }
    }

    #[cfg(feature = "sqlite")]
    #[must_use]
    pub fn sqlx_sqlite(&self) -> Option<&SqlitePool> {
        match self.pool {
            DbPool::Sqlite(ref p) => Some(p),
            #[cfg(feature = "pg")]
            DbPool::Postgres(_) => None,
        }
    }

    // --- Raw sqlx transaction helpers (engine-specific) ---

    /// Execute a closure within a `PostgreSQL` transaction.
    ///
    /// # Errors
    /// Returns an error if the transaction fails or the closure returns an error.
    #[cfg(feature = "pg")]
    pub async fn with_pg_tx<F, T>(&self, f: F) -> Result<T>
    where
        F: for<'a> FnOnce(
            &'a mut sea_orm::sqlx::Transaction<'_, Postgres>,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<T>> + Send + 'a>,
        >,
    {
        let pool = self
            .sqlx_postgres()
            .ok_or(DbError::FeatureDisabled("not a postgres pool"))?;
        let mut tx = pool.begin().await?;
        match f(&mut tx).await {
            Ok(v) => {
                tx.commit().await?;
                Ok(v)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    tracing::warn!(error = %rb, "rollback failed after unit-of-work error");
                }
                Err(e)
            }
        }
    }

    /// Execute a closure within a `SQLite` transaction.
    ///
    /// # Errors
    /// Returns an error if the transaction fails or the closure returns an error.
    #[cfg(feature = "sqlite")]
    pub async fn with_sqlite_tx<F, T>(&self, f: F) -> Result<T>
    where
        F: for<'a> FnOnce(
            &'a mut sea_orm::sqlx::Transaction<'_, Sqlite>,
        ) -> std::pin::Pin<
            Box<dyn std::future::Future<Output = Result<T>> + Send + 'a>,
        >,
    {
        let pool = self
            .sqlx_sqlite()
            .ok_or(DbError::FeatureDisabled("not a sqlite pool"))?;
        let mut tx = pool.begin().await?;
        match f(&mut tx).await {
            Ok(v) => {
                tx.commit().await?;
                Ok(v)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    tracing::warn!(error = %rb, "rollback failed after unit-of-work error");
                }
                Err(e)
            }
        }
    }
}
