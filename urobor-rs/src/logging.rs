//! Log subscriber setup for the binary.
//!
//! `RUST_LOG` wins when set and valid; otherwise the level chosen from the
//! command line or config file applies to the whole process.  Output goes to
//! stderr so stdout stays reserved for the outline and `print` output.

use tracing_subscriber::EnvFilter;

/// Default when neither flags, config nor `RUST_LOG` pick a level.
pub const DEFAULT_LEVEL: &str = "warn";

/// Pick the effective level: `-d` beats `-q`, both beat the config file.
pub fn choose_level(debug: bool, quiet: bool, configured: Option<&str>) -> &str {
    if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        configured.unwrap_or(DEFAULT_LEVEL)
    }
}

/// Build the filter for `level`, deferring to `RUST_LOG` when present.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber.  Later calls are ignored.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_precedence() {
        assert_eq!(choose_level(true, true, Some("info")), "debug");
        assert_eq!(choose_level(false, true, Some("info")), "error");
        assert_eq!(choose_level(false, false, Some("info")), "info");
        assert_eq!(choose_level(false, false, None), DEFAULT_LEVEL);
    }
}
