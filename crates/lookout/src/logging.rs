//! Logging setup on the `tracing` ecosystem.
//!
//! Logs always go to stderr; stdout carries answers and JSON output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `level` is the default directive; `RUST_LOG` wins when set. HTTP request
/// spans from `tower_http` follow the same level.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize from the `[logging]` section, with CLI flags taking precedence.
pub fn init_from_config(config: &lookout_core::Config, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let json_format = json_logs || config.logging.format == "json";
    init(level, json_format);
}

fn default_directive(level: &str) -> String {
    let level = match level {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    };
    format!("{level},tower_http={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("debug"), "debug,tower_http=debug");
        assert_eq!(default_directive("loud"), "info,tower_http=info");
    }
}
