//! # Logging
//!
//! Environment-aware console logging using the tracing ecosystem. Output goes to
//! stdout: human-readable with ANSI colours on a terminal, JSON lines otherwise
//! (or whenever `ENQUIRY_LOG_FORMAT=json`).
//!
//! Level resolution, highest precedence first: `LOG_LEVEL`, `RUST_LOG`, then a
//! default for the environment (`debug` for development and test, `info` for
//! production).
//!
//! Entry points on [`crate::services::EnquiryService`] open a span carrying a
//! fresh `correlation_id`, so every event emitted while resolving one request
//! can be grouped.

use crate::config::detect_environment;
use std::io::IsTerminal;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Initialize console logging. Safe to call more than once; an already
/// installed global subscriber is left in place.
pub fn init_structured_logging() {
    TRACING_INITIALIZED.get_or_init(|| {
        let environment = detect_environment();
        let log_level = get_log_level(&environment);
        let use_ansi = IsTerminal::is_terminal(&std::io::stdout());
        let format = get_log_format(use_ansi);

        let installed = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_current_span(true)
                        .with_filter(EnvFilter::new(&log_level)),
                )
                .try_init()
                .is_ok(),
            LogFormat::Pretty => tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true)
                        .with_ansi(use_ansi)
                        .with_filter(EnvFilter::new(&log_level)),
                )
                .try_init()
                .is_ok(),
        };

        if installed {
            tracing::info!(
                environment = %environment,
                log_level = %log_level,
                format = ?format,
                "Structured logging initialized"
            );
        } else {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }
    });
}

fn get_log_format(is_terminal: bool) -> LogFormat {
    match std::env::var("ENQUIRY_LOG_FORMAT") {
        Ok(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
        Ok(format) if format.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
        _ if is_terminal => LogFormat::Pretty,
        _ => LogFormat::Json,
    }
}

fn get_log_level(environment: &str) -> String {
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        return level.to_lowercase();
    }

    if let Ok(level) = std::env::var("RUST_LOG") {
        return level.to_lowercase();
    }

    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both checks touch process-wide variables, so they share one test.
    #[test]
    fn level_and_format_resolution() {
        std::env::remove_var("LOG_LEVEL");
        std::env::remove_var("RUST_LOG");
        std::env::remove_var("ENQUIRY_LOG_FORMAT");

        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");

        std::env::set_var("RUST_LOG", "WARN");
        assert_eq!(get_log_level("production"), "warn");
        std::env::set_var("LOG_LEVEL", "ERROR");
        assert_eq!(get_log_level("production"), "error");

        assert_eq!(get_log_format(true), LogFormat::Pretty);
        assert_eq!(get_log_format(false), LogFormat::Json);
        std::env::set_var("ENQUIRY_LOG_FORMAT", "json");
        assert_eq!(get_log_format(true), LogFormat::Json);
        std::env::set_var("ENQUIRY_LOG_FORMAT", "pretty");
        assert_eq!(get_log_format(false), LogFormat::Pretty);

        std::env::remove_var("LOG_LEVEL");
        std::env::remove_var("RUST_LOG");
        std::env::remove_var("ENQUIRY_LOG_FORMAT");
    }

    #[test]
    fn init_is_idempotent() {
        init_structured_logging();
        init_structured_logging();
        tracing::debug!("still logging");
    }
}
