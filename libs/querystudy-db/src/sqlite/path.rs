//! File path handling for `SQLite` DSNs.

use std::path::PathBuf;

use super::dsn::is_memory_dsn;
use crate::{DbError, Result};

/// Extract the database file path from a `sqlite:` DSN (query string dropped).
///
/// # Errors
/// Returns `DbError::InvalidParameter` when the DSN is not a `sqlite:` DSN.
pub fn sqlite_file_path(dsn: &str) -> Result<PathBuf> {
    let rest = dsn
        .strip_prefix("sqlite:")
        .ok_or_else(|| DbError::InvalidParameter(format!("Invalid SQLite DSN: {dsn}")))?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let rest = rest.split_once('?').map_or(rest, |(path, _)| path);
    Ok(PathBuf::from(rest))
}

/// Prepare a file DSN for connecting: create parent directories when asked and
/// make sure sqlx creates the file if it is missing (`mode=rwc`).
///
/// In-memory DSNs are returned unchanged.
///
/// # Errors
/// Returns an error when the DSN is malformed or the directories cannot be created.
pub fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(dsn.to_owned());
    }

    let path = sqlite_file_path(dsn)?;
    if create_dirs
        && let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
        tracing::debug!(dir = %parent.display(), "Ensured SQLite parent directory");
    }

    if dsn.contains("mode=") {
        Ok(dsn.to_owned())
    } else if dsn.contains('?') {
        Ok(format!("{dsn}&mode=rwc"))
    } else {
        Ok(format!("{dsn}?mode=rwc"))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn file_path_forms() {
        assert_eq!(
            sqlite_file_path("sqlite:///tmp/q/a.db?wal=true").unwrap(),
            PathBuf::from("/tmp/q/a.db")
        );
        assert_eq!(
            sqlite_file_path("sqlite:data/a.db").unwrap(),
            PathBuf::from("data/a.db")
        );
        assert!(sqlite_file_path("postgres://x/y").is_err());
    }

    #[test]
    fn prepare_creates_dirs_and_sets_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let db = tmp.path().join("nested").join("deeper").join("q.db");
        let dsn = format!("sqlite://{}", db.display());

        let prepared = prepare_sqlite_path(&dsn, true).unwrap();
        assert!(db.parent().unwrap().is_dir());
        assert!(prepared.ends_with("?mode=rwc"));
    }

    #[test]
    fn prepare_leaves_memory_and_explicit_mode_alone() {
        assert_eq!(
            prepare_sqlite_path("sqlite::memory:", true).unwrap(),
            "sqlite::memory:"
        );
        let tmp = tempfile::tempdir().unwrap();
        let dsn = format!("sqlite://{}/a.db?mode=ro", tmp.path().display());
        assert_eq!(prepare_sqlite_path(&dsn, false).unwrap(), dsn);
    }
}
