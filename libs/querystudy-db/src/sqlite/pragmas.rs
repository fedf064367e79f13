//! Whitelisted `SQLite` PRAGMAs with typed values.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::{DbError, Result};

const ALLOWED_PRAGMAS: &[&str] = &["wal", "synchronous", "busy_timeout", "journal_mode"];

pub(crate) fn is_pragma_key(key: &str) -> bool {
    ALLOWED_PRAGMAS.contains(&key.to_lowercase().as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    Delete,
    Wal,
    Memory,
    Truncate,
    Persist,
    Off,
}

impl JournalMode {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Wal => "WAL",
            Self::Memory => "MEMORY",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Off => "OFF",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.to_uppercase().as_str() {
            "DELETE" => Ok(Self::Delete),
            "WAL" => Ok(Self::Wal),
            "MEMORY" => Ok(Self::Memory),
            "TRUNCATE" => Ok(Self::Truncate),
            "PERSIST" => Ok(Self::Persist),
            "OFF" => Ok(Self::Off),
            _ => Err(DbError::InvalidSqlitePragma {
                key: "journal_mode".to_owned(),
                message: format!("must be DELETE/WAL/MEMORY/TRUNCATE/PERSIST/OFF, got '{value}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Off,
    Normal,
    Full,
    Extra,
}

impl SyncMode {
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Normal => "NORMAL",
            Self::Full => "FULL",
            Self::Extra => "EXTRA",
        }
    }

    fn parse(value: &str) -> Result<Self> {
        match value.to_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "NORMAL" => Ok(Self::Normal),
            "FULL" => Ok(Self::Full),
            "EXTRA" => Ok(Self::Extra),
            _ => Err(DbError::InvalidSqlitePragma {
                key: "synchronous".to_owned(),
                message: format!("must be OFF/NORMAL/FULL/EXTRA, got '{value}'"),
            }),
        }
    }
}

/// Validated PRAGMA set. `None` means "use the connection default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pragmas {
    pub wal_toggle: Option<bool>,
    pub journal_mode: Option<JournalMode>,
    pub synchronous: Option<SyncMode>,
    pub busy_timeout_ms: Option<i64>,
}

impl Pragmas {
    /// Validate raw key/value pairs against the whitelist.
    ///
    /// # Errors
    /// `DbError::UnknownSqlitePragma` for keys outside the whitelist,
    /// `DbError::InvalidSqlitePragma` for values that do not parse.
    pub fn from_pairs<S: BuildHasher>(pairs: &HashMap<String, String, S>) -> Result<Self> {
        let mut out = Self::default();
        for (key, value) in pairs {
            match key.to_lowercase().as_str() {
                "wal" => out.wal_toggle = Some(parse_wal(value)?),
                "journal_mode" => out.journal_mode = Some(JournalMode::parse(value)?),
                "synchronous" => out.synchronous = Some(SyncMode::parse(value)?),
                "busy_timeout" => out.busy_timeout_ms = Some(parse_busy_timeout(value)?),
                _ => return Err(DbError::UnknownSqlitePragma(key.clone())),
            }
        }
        Ok(out)
    }

    /// Effective journal mode: an explicit `journal_mode` wins over the `wal` toggle.
    #[must_use]
    pub fn effective_journal_mode(&self) -> Option<JournalMode> {
        self.journal_mode.or_else(|| {
            self.wal_toggle
                .map(|on| if on { JournalMode::Wal } else { JournalMode::Delete })
        })
    }

    /// Apply to typed sqlx connect options.
    #[must_use]
    pub fn apply_to(
        &self,
        mut opts: sea_orm::sqlx::sqlite::SqliteConnectOptions,
    ) -> sea_orm::sqlx::sqlite::SqliteConnectOptions {
        if let Some(mode) = self.effective_journal_mode() {
            opts = opts.pragma("journal_mode", mode.as_sql());
        }
        if let Some(sync) = self.synchronous {
            opts = opts.pragma("synchronous", sync.as_sql());
        }
        if let Some(ms) = self.busy_timeout_ms {
            opts = opts.pragma("busy_timeout", ms.to_string());
        }
        opts.foreign_keys(true)
    }
}

fn parse_wal(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(DbError::InvalidSqlitePragma {
            key: "wal".to_owned(),
            message: format!("must be true/false/1/0, got '{value}'"),
        }),
    }
}

fn parse_busy_timeout(value: &str) -> Result<i64> {
    let timeout = value
        .parse::<i64>()
        .map_err(|_| DbError::InvalidSqlitePragma {
            key: "busy_timeout".to_owned(),
            message: format!("must be a non-negative integer, got '{value}'"),
        })?;

    if timeout < 0 {
        return Err(DbError::InvalidSqlitePragma {
            key: "busy_timeout".to_owned(),
            message: format!("must be non-negative, got '{timeout}'"),
        });
    }

    Ok(timeout)
}
