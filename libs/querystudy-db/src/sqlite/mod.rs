//! SQLite-specific helpers:
//! - DSN parsing and PRAGMA extraction
//! - typed PRAGMA whitelist
//! - file path preparation

pub mod dsn;
pub mod path;
pub mod pragmas;

pub use dsn::{extract_sqlite_pragmas, is_memory_dsn};
pub use path::{prepare_sqlite_path, sqlite_file_path};
pub use pragmas::Pragmas;
