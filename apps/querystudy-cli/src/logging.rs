//! Tracing subscriber setup. Logs go to stderr so stdout carries only command output.

use tracing_subscriber::{EnvFilter, fmt};

/// Filter directive for a `-v` count, `None` when no flag was given.
#[must_use]
pub fn level_for_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins, then `-v`, then the configured level.
pub fn init(configured_level: &str, verbose: u8) {
    let level = level_for_verbosity(verbose).unwrap_or(configured_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for_verbosity(0), None);
        assert_eq!(level_for_verbosity(1), Some("info"));
        assert_eq!(level_for_verbosity(2), Some("debug"));
        assert_eq!(level_for_verbosity(3), Some("trace"));
        assert_eq!(level_for_verbosity(9), Some("trace"));
    }
}
