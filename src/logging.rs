//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides every other log setting
pub const LOG_ENV: &str = "HEALTHBUDDY_LOG";

/// Effective level from config and command-line flags.
///
/// `-q` wins over `-v`; `-v` is debug and `-vv` or more is trace.
pub fn level_for(configured: &str, verbose: u8, quiet: bool) -> String {
    if quiet {
        return "warn".to_string();
    }
    match verbose {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber on stderr.
///
/// `HEALTHBUDDY_LOG` takes precedence over `level`. Returns false when a
/// subscriber was already installed, so repeated calls are harmless.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for("info", 0, false), "info");
        assert_eq!(level_for("error", 1, false), "debug");
        assert_eq!(level_for("info", 3, false), "trace");
        assert_eq!(level_for("debug", 2, true), "warn");
    }

    #[test]
    fn test_init_is_idempotent() {
        init("warn");
        assert!(!init("debug"));
    }
}
