//! Building a [`DbHandle`] from a [`DbConnConfig`].

use crate::config::{DbConnConfig, DbEngineCfg, PoolCfg};
use crate::{DbError, DbHandle, Result};

/// Database connection options using typed sqlx `ConnectOptions`.
#[derive(Debug, Clone)]
pub enum DbConnectOptions {
    #[cfg(feature = "sqlite")]
    Sqlite {
        opts: sea_orm::sqlx::sqlite::SqliteConnectOptions,
        in_memory: bool,
    },
    #[cfg(feature = "pg")]
    Postgres(sea_orm::sqlx::postgres::PgConnectOptions),
}

impl std::fmt::Display for DbConnectOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            DbConnectOptions::Sqlite { in_memory: true, .. } => write!(f, "sqlite::memory:"),
            #[cfg(feature = "sqlite")]
            DbConnectOptions::Sqlite { opts, .. } => {
                write!(f, "sqlite://{}", opts.get_filename().display())
            }
            #[cfg(feature = "pg")]
            DbConnectOptions::Postgres(opts) => {
                write!(
                    f,
                    "postgresql://<redacted>@{}:{}/{}",
                    opts.get_host(),
                    opts.get_port(),
                    opts.get_database().unwrap_or("")
                )
            }
            #[cfg(not(any(feature = "sqlite", feature = "pg")))]
            _ => {
                unreachable!("No database features enabled")
            }
        }
    }
}

impl DbConnectOptions {
    /// Connect to the database using the configured options.
    ///
    /// # Errors
    /// Returns an error if the database connection fails.
    pub async fn connect(&self, pool: &PoolCfg) -> Result<DbHandle> {
        let display = self.to_string();
        match self {
            #[cfg(feature = "sqlite")]
            DbConnectOptions::Sqlite { opts, in_memory } => {
                let pool_opts = if *in_memory {
                    use crate::pool_opts::ApplyPoolOpts;
                    let single = pool
                        .to_connect_opts(crate::ConnectOpts::default())
                        .for_memory_sqlite();
                    sea_orm::sqlx::sqlite::SqlitePoolOptions::new().apply(&single)
                } else {
                    pool.apply_sqlite(sea_orm::sqlx::sqlite::SqlitePoolOptions::new())
                };

                let sqlx_pool = pool_opts.connect_with(opts.clone()).await?;
                let sea = sea_orm::SqlxSqliteConnector::from_sqlx_sqlite_pool(sqlx_pool.clone());

                Ok(DbHandle::from_parts(
                    crate::DbEngine::Sqlite,
                    crate::DbPool::Sqlite(sqlx_pool),
                    display,
                    sea,
                ))
            }
            #[cfg(feature = "pg")]
            DbConnectOptions::Postgres(opts) => {
                let pool_opts = pool.apply_pg(sea_orm::sqlx::postgres::PgPoolOptions::new());
                let sqlx_pool = pool_opts.connect_with(opts.clone()).await?;
                let sea =
                    sea_orm::SqlxPostgresConnector::from_sqlx_postgres_pool(sqlx_pool.clone());

                Ok(DbHandle::from_parts(
                    crate::DbEngine::Postgres,
                    crate::DbPool::Postgres(sqlx_pool),
                    display,
                    sea,
                ))
            }
            #[cfg(not(any(feature = "sqlite", feature = "pg")))]
            _ => {
                unreachable!("No database features enabled")
            }
        }
    }
}

/// Build a database handle from configuration.
///
/// Expands `${VAR}` references, checks the config for conflicting fields,
/// then connects with the typed options of the selected engine.
///
/// # Errors
/// Returns an error if the database connection fails or configuration is invalid.
pub async fn build_db_handle(mut cfg: DbConnConfig) -> Result<DbHandle> {
    if let Some(dsn) = &cfg.dsn {
        cfg.dsn = Some(expand_env_vars(dsn)?);
    }
    if let Some(password) = &cfg.password {
        cfg.password = Some(resolve_password(password)?);
    }
    if let Some(ref mut params) = cfg.params {
        for value in params.values_mut() {
            if value.contains("${") {
                *value = expand_env_vars(value)?;
            }
        }
    }

    validate_config_consistency(&cfg)?;

    let engine = determine_engine(&cfg)?;
    let connect_options = match engine {
        DbEngineCfg::Sqlite => build_sqlite_options(&cfg)?,
        DbEngineCfg::Postgres => build_server_options(&cfg)?,
    };

    let pool_cfg = cfg.pool.unwrap_or_default();

    let log_dsn = redact_credentials_in_dsn(cfg.dsn.as_deref());
    tracing::debug!(dsn = log_dsn, engine = ?engine, "Building database connection");

    connect_options.connect(&pool_cfg).await
}

fn determine_engine(cfg: &DbConnConfig) -> Result<DbEngineCfg> {
    if let Some(engine) = cfg.engine {
        if let Some(dsn) = cfg.dsn.as_deref() {
            let inferred = engine_from_dsn(dsn)?;
            if inferred != engine {
                return Err(DbError::ConfigConflict(format!(
                    "engine='{engine:?}' conflicts with DSN scheme inferred as '{inferred:?}'"
                )));
            }
        }
        return Ok(engine);
    }

    let Some(dsn) = cfg.dsn.as_deref() else {
        return Err(DbError::InvalidParameter(
            "Missing 'engine': required when 'dsn' is not provided".to_owned(),
        ));
    };
    engine_from_dsn(dsn)
}

fn engine_from_dsn(dsn: &str) -> Result<DbEngineCfg> {
    match DbHandle::detect(dsn)? {
        crate::DbEngine::Postgres => Ok(DbEngineCfg::Postgres),
        crate::DbEngine::Sqlite => Ok(DbEngineCfg::Sqlite),
    }
}

/// Build `SQLite` connection options from configuration.
#[cfg(feature = "sqlite")]
fn build_sqlite_options(cfg: &DbConnConfig) -> Result<DbConnectOptions> {
    use crate::sqlite::{Pragmas, extract_sqlite_pragmas, is_memory_dsn, sqlite_file_path};
    use std::str::FromStr;

    let mut pairs = std::collections::HashMap::new();
    let (mut opts, in_memory) = match (&cfg.dsn, &cfg.path) {
        (Some(dsn), _) => {
            let (clean, dsn_pairs) = extract_sqlite_pragmas(dsn);
            pairs.extend(dsn_pairs);
            if is_memory_dsn(&clean) {
                let opts = sea_orm::sqlx::sqlite::SqliteConnectOptions::from_str(&clean)
                    .map_err(|e| DbError::InvalidParameter(e.to_string()))?;
                (opts, true)
            } else {
                (file_options(&sqlite_file_path(&clean)?)?, false)
            }
        }
        (None, Some(path)) => (file_options(path)?, false),
        (None, None) => {
            return Err(DbError::InvalidParameter(
                "SQLite connection requires either 'dsn' or 'path'".to_owned(),
            ));
        }
    };

    // Explicit params override the ones carried in the DSN.
    if let Some(params) = &cfg.params {
        pairs.extend(params.iter().map(|(k, v)| (k.to_lowercase(), v.clone())));
    }
    opts = Pragmas::from_pairs(&pairs)?.apply_to(opts);

    Ok(DbConnectOptions::Sqlite { opts, in_memory })
}

#[cfg(feature = "sqlite")]
fn file_options(path: &std::path::Path) -> Result<sea_orm::sqlx::sqlite::SqliteConnectOptions> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(sea_orm::sqlx::sqlite::SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true))
}

#[cfg(not(feature = "sqlite"))]
fn build_sqlite_options(_: &DbConnConfig) -> Result<DbConnectOptions> {
    Err(DbError::FeatureDisabled("SQLite feature not enabled"))
}

/// Build `PostgreSQL` connection options from configuration.
#[cfg(feature = "pg")]
fn build_server_options(cfg: &DbConnConfig) -> Result<DbConnectOptions> {
    let mut opts = if let Some(dsn) = &cfg.dsn {
        dsn.parse::<sea_orm::sqlx::postgres::PgConnectOptions>()
            .map_err(|e| DbError::InvalidParameter(e.to_string()))?
    } else {
        sea_orm::sqlx::postgres::PgConnectOptions::new()
    };

    // Discrete fields override the DSN
    if let Some(host) = &cfg.host {
        opts = opts.host(host);
    }
    if let Some(port) = cfg.port {
        opts = opts.port(port);
    }
    if let Some(user) = &cfg.user {
        opts = opts.username(user);
    }
    if let Some(password) = &cfg.password {
        opts = opts.password(password);
    }
    if let Some(dbname) = &cfg.dbname {
        opts = opts.database(dbname);
    } else if cfg.dsn.is_none() {
        return Err(DbError::InvalidParameter(
            "dbname is required for PostgreSQL connections".to_owned(),
        ));
    }

    if let Some(params) = &cfg.params {
        for (key, value) in params {
            opts = opts.options([(key.as_str(), value.as_str())]);
        }
    }

    Ok(DbConnectOptions::Postgres(opts))
}

#[cfg(not(feature = "pg"))]
fn build_server_options(_: &DbConnConfig) -> Result<DbConnectOptions> {
    Err(DbError::FeatureDisabled("PostgreSQL feature not enabled"))
}

/// Expand `${VAR}` references from the process environment.
///
/// # Errors
/// Returns `DbError::EnvVar` when a referenced variable is not set.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| DbError::InvalidParameter(e.to_string()))?;
    let mut result = input.to_owned();

    for caps in re.captures_iter(input) {
        let full_match = &caps[0];
        let var_name = &caps[1];
        let value = std::env::var(var_name)?;
        result = result.replace(full_match, &value);
    }

    Ok(result)
}

/// Resolve password from environment variable if it is exactly `${VAR}`.
fn resolve_password(password: &str) -> Result<String> {
    match password
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(var_name) => Ok(std::env::var(var_name)?),
        None => Ok(password.to_owned()),
    }
}

/// Validate configuration for consistency and detect conflicts.
fn validate_config_consistency(cfg: &DbConnConfig) -> Result<()> {
    if let (Some(engine), Some(dsn)) = (cfg.engine, cfg.dsn.as_deref()) {
        let inferred = engine_from_dsn(dsn)?;
        if inferred != engine {
            return Err(DbError::ConfigConflict(format!(
                "engine='{engine:?}' conflicts with DSN scheme inferred as '{inferred:?}'"
            )));
        }
    }

    let has_server_fields = cfg.host.is_some() || cfg.port.is_some();
    let has_credentials = cfg.user.is_some() || cfg.password.is_some() || cfg.dbname.is_some();

    if let Some(dsn) = &cfg.dsn {
        let is_sqlite_dsn = dsn.starts_with("sqlite");

        if is_sqlite_dsn && has_server_fields {
            return Err(DbError::ConfigConflict(
                "SQLite DSN cannot be used with host/port fields".to_owned(),
            ));
        }

        if !is_sqlite_dsn && cfg.path.is_some() {
            return Err(DbError::ConfigConflict(
                "Non-SQLite DSN cannot be used with the path field".to_owned(),
            ));
        }
    }

    if cfg.path.is_some() && has_server_fields {
        return Err(DbError::ConfigConflict(
            "SQLite path cannot be used with host/port fields".to_owned(),
        ));
    }

    if cfg.engine == Some(DbEngineCfg::Sqlite) && (has_server_fields || has_credentials) {
        return Err(DbError::ConfigConflict(
            "engine=sqlite cannot be used with host/port/user/password/dbname fields".to_owned(),
        ));
    }

    if cfg.engine == Some(DbEngineCfg::Postgres) && cfg.path.is_some() {
        return Err(DbError::ConfigConflict(
            "engine=postgres cannot be used with the path field".to_owned(),
        ));
    }

    Ok(())
}

/// Redact credentials from DSN for logging.
#[must_use]
pub fn redact_credentials_in_dsn(dsn: Option<&str>) -> String {
    match dsn {
        Some(dsn) if dsn.contains('@') => {
            if let Ok(mut parsed) = url::Url::parse(dsn) {
                if parsed.password().is_some() && parsed.set_password(Some("***")).is_err() {
                    return "***".to_owned();
                }
                parsed.to_string()
            } else {
                "***".to_owned()
            }
        }
        Some(dsn) => dsn.to_owned(),
        None => "none".to_owned(),
    }
}
