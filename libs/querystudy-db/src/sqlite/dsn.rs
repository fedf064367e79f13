//! `SQLite` DSN parsing.

use std::collections::HashMap;

use super::pragmas::is_pragma_key;

/// Split a DSN into the part sqlx understands and the PRAGMA pairs we apply ourselves.
///
/// Whitelisted PRAGMA keys are removed from the query string; any other
/// parameter (`mode`, `cache`, ...) stays in the returned DSN for sqlx.
#[must_use]
pub fn extract_sqlite_pragmas(dsn: &str) -> (String, HashMap<String, String>) {
    let Some((base, query)) = dsn.split_once('?') else {
        return (dsn.to_owned(), HashMap::new());
    };

    let mut pairs = HashMap::new();
    let mut kept = Vec::new();
    for part in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        if is_pragma_key(key) {
            pairs.insert(key.to_lowercase(), value.to_owned());
        } else {
            kept.push(part);
        }
    }

    let clean = if kept.is_empty() {
        base.to_owned()
    } else {
        format!("{base}?{}", kept.join("&"))
    };
    (clean, pairs)
}

/// Whether the DSN points at a private in-memory database.
#[must_use]
pub fn is_memory_dsn(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn pragmas_are_split_off_and_other_params_kept() {
        let (clean, pairs) =
            extract_sqlite_pragmas("sqlite:///tmp/a.db?mode=rwc&wal=true&BUSY_TIMEOUT=100");
        assert_eq!(clean, "sqlite:///tmp/a.db?mode=rwc");
        assert_eq!(pairs.get("wal").map(String::as_str), Some("true"));
        assert_eq!(pairs.get("busy_timeout").map(String::as_str), Some("100"));
    }

    #[test]
    fn dsn_without_query_is_untouched() {
        let (clean, pairs) = extract_sqlite_pragmas("sqlite::memory:");
        assert_eq!(clean, "sqlite::memory:");
        assert!(pairs.is_empty());
    }

    #[test]
    fn memory_detection() {
        assert!(is_memory_dsn("sqlite::memory:"));
        assert!(is_memory_dsn("sqlite://file:shared?mode=memory&cache=shared"));
        assert!(!is_memory_dsn("sqlite:///var/lib/querystudy.db"));
    }
}
