//! Logging setup.
//!
//! Logs go to stderr; stdout carries the user-facing report.

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter when neither flags nor `RUST_LOG` say otherwise
pub const DEFAULT_LEVEL: &str = "warn";

/// Build an `EnvFilter` based on CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > RUST_LOG env > default_level
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(filter: EnvFilter) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins() {
        assert_eq!(env_filter(true, 3, "warn").to_string(), "error");
    }

    #[test]
    fn test_verbose_levels() {
        assert_eq!(env_filter(false, 1, "warn").to_string(), "info");
        assert_eq!(env_filter(false, 2, "warn").to_string(), "debug");
        assert_eq!(env_filter(false, 9, "warn").to_string(), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(env_filter(true, 0, DEFAULT_LEVEL));
        init_logging(env_filter(true, 0, DEFAULT_LEVEL));
    }
}
