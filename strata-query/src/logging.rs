//! Logging infrastructure.
//!
//! Structured logging controlled by the `STRATA_DEBUG` environment variable.
//!
//! # Environment Variables
//!
//! - `STRATA_DEBUG=true` - Enable debug logging
//! - `STRATA_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `STRATA_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use strata_query::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```
//!
//! Internally the crates use the standard tracing macros
//! (`debug!`, `warn!`, ...) with structured fields.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `STRATA_DEBUG`.
///
/// Returns `true` if `STRATA_DEBUG` is set to "true", "1", or "yes"
/// (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("STRATA_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `STRATA_LOG_LEVEL`.
///
/// Defaults to "debug" if `STRATA_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    if let Ok(level) = env::var("STRATA_LOG_LEVEL") {
        match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => {
                if is_debug_enabled() {
                    "debug"
                } else {
                    "warn"
                }
            }
        }
    } else if is_debug_enabled() {
        "debug"
    } else {
        "warn"
    }
}

/// Get the configured log format from `STRATA_LOG_FORMAT`.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("STRATA_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Initialize the logging system.
///
/// Call once at application startup; subsequent calls are no-ops. Does
/// nothing unless `STRATA_DEBUG` or `STRATA_LOG_LEVEL` is set, so library
/// users with their own subscriber are unaffected.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("STRATA_LOG_LEVEL").is_err() {
            // No logging requested, skip initialization
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "strata_query={},strata_cache={}",
                level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            match get_log_format() {
                "json" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().json())
                        .init();
                }
                "compact" => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().compact())
                        .init();
                }
                _ => {
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(fmt::layer().pretty())
                        .init();
                }
            }

            tracing::info!(
                level = level,
                format = get_log_format(),
                "Strata logging initialized"
            );
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            // Without the tracing-subscriber feature, logging stays silent
            // unless the user installs their own subscriber.
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_disabled_by_default() {
        // Unset in the test environment unless explicitly exported.
        if env::var("STRATA_DEBUG").is_err() {
            assert!(!is_debug_enabled());
            assert_eq!(get_log_level(), "warn");
        }
    }

    #[test]
    fn test_log_format_default() {
        if env::var("STRATA_LOG_FORMAT").is_err() {
            assert_eq!(get_log_format(), "json");
        }
    }
}
