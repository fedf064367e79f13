//! Typed database configuration.
//!
//! The structs here are plain `serde` targets; [`load_db_config`] pulls one of
//! them out of a layered `figment` so callers can merge YAML, environment and
//! command line overrides before connecting.

use std::collections::HashMap;
use std::time::Duration;

use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::{ConnectOpts, DbError, Result};

/// Engine selector used when the DSN alone does not say which backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngineCfg {
    Postgres,
    Sqlite,
}

/// Pool tuning knobs. Every field is optional; unset fields keep the sqlx defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolCfg {
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    #[serde(with = "duration_serde")]
    pub acquire_timeout: Option<Duration>,
    #[serde(with = "duration_serde")]
    pub idle_timeout: Option<Duration>,
    #[serde(with = "duration_serde")]
    pub max_lifetime: Option<Duration>,
    pub test_before_acquire: Option<bool>,
}

impl PoolCfg {
    /// Overlay these knobs on top of `base`.
    #[must_use]
    pub fn to_connect_opts(&self, base: ConnectOpts) -> ConnectOpts {
        ConnectOpts {
            max_conns: self.max_conns.or(base.max_conns),
            min_conns: self.min_conns.or(base.min_conns),
            acquire_timeout: self.acquire_timeout.or(base.acquire_timeout),
            idle_timeout: self.idle_timeout.or(base.idle_timeout),
            max_lifetime: self.max_lifetime.or(base.max_lifetime),
            test_before_acquire: self
                .test_before_acquire
                .unwrap_or(base.test_before_acquire),
            create_sqlite_dirs: base.create_sqlite_dirs,
        }
    }

    #[cfg(feature = "sqlite")]
    pub(crate) fn apply_sqlite(
        &self,
        opts: sea_orm::sqlx::sqlite::SqlitePoolOptions,
    ) -> sea_orm::sqlx::sqlite::SqlitePoolOptions {
        use crate::pool_opts::ApplyPoolOpts;
        opts.apply(&self.to_connect_opts(ConnectOpts::default()))
    }

    #[cfg(feature = "pg")]
    pub(crate) fn apply_pg(
        &self,
        opts: sea_orm::sqlx::postgres::PgPoolOptions,
    ) -> sea_orm::sqlx::postgres::PgPoolOptions {
        use crate::pool_opts::ApplyPoolOpts;
        opts.apply(&self.to_connect_opts(ConnectOpts::default()))
    }
}

/// One database connection, either as a DSN or as discrete fields.
///
/// Discrete fields override the matching DSN parts. `${VAR}` references in
/// `dsn`, `password` and `params` are expanded from the environment when the
/// handle is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConnConfig {
    pub engine: Option<DbEngineCfg>,
    pub dsn: Option<String>,

    // Server engines
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,

    // SQLite
    pub path: Option<std::path::PathBuf>,

    /// Engine specific parameters. For `SQLite` these are whitelisted PRAGMAs.
    pub params: Option<HashMap<String, String>>,

    pub pool: Option<PoolCfg>,
}

/// Extract the [`DbConnConfig`] stored under `key` in a layered figment.
///
/// A missing key yields the default (empty) config so callers can fall back
/// to their own DSN.
///
/// # Errors
/// Returns `DbError::InvalidConfig` when a provider fails to load or the
/// section does not match the schema.
pub fn load_db_config(figment: &Figment, key: &str) -> Result<DbConnConfig> {
    match figment.find_value(key) {
        Ok(_) => figment
            .extract_inner::<DbConnConfig>(key)
            .map_err(|e| DbError::InvalidConfig(format!("{key}: {e}"))),
        Err(e) if matches!(e.kind, figment::error::Kind::MissingField(_)) => {
            Ok(DbConnConfig::default())
        }
        Err(e) => Err(DbError::InvalidConfig(format!("{key}: {e}"))),
    }
}

/// `humantime` (de)serialization for optional durations, e.g. `"30s"` or `"5m"`.
pub mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    /// # Errors
    /// Fails when the serializer rejects a string or unit value.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_str(&humantime::format_duration(*d).to_string()),
            None => s.serialize_none(),
        }
    }

    /// # Errors
    /// Fails when the value is not a `humantime` duration string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|v| {
            humantime::parse_duration(&v)
                .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(&v), &"a duration"))
        })
        .transpose()
    }
}
