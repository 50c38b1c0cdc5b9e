//! Tracing subscriber setup
//!
//! The library itself only emits `tracing` events (targets
//! `session_fetch::http` and `session_fetch::session`). Binaries and tests can
//! install a subscriber with the helpers below.
//!
//! ## Example
//!
//! ```rust,ignore
//! use session_fetch::telemetry::{init_subscriber, OutputFormat, SubscriberConfig};
//!
//! init_subscriber(SubscriberConfig {
//!     log_level: tracing::Level::DEBUG,
//!     output_format: OutputFormat::Json,
//! })?;
//! ```

use crate::error::FetchError;
use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "SESSION_FETCH_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "SESSION_FETCH_LOG_FORMAT";

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Configuration for the tracing subscriber
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
        }
    }
}

/// Parse a log level name (`trace`, `debug`, `info`, `warn`, `error`).
pub fn parse_level(level: &str) -> Result<tracing::Level, FetchError> {
    match level.trim().to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        other => Err(FetchError::configuration(format!(
            "Invalid log level: {other}. Valid options: trace, debug, info, warn, error"
        ))),
    }
}

/// Install a global fmt subscriber filtered to this crate.
///
/// `RUST_LOG` takes precedence over `log_level` when it is set. Installing
/// twice is not an error; the first subscriber stays active.
pub fn init_subscriber(config: SubscriberConfig) -> Result<(), FetchError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => parse_filter(&directives)?,
        _ => parse_filter(&format!(
            "session_fetch={}",
            config.log_level.as_str().to_lowercase()
        ))?,
    };
    install(filter, config.output_format)
}

/// Install a global text subscriber with caller-supplied `EnvFilter`
/// directives, e.g. `"session_fetch=debug,reqwest=warn"`.
pub fn init_tracing(filter: &str) -> Result<(), FetchError> {
    install(parse_filter(filter)?, OutputFormat::Text)
}

fn parse_filter(directives: &str) -> Result<EnvFilter, FetchError> {
    EnvFilter::try_new(directives).map_err(|e| {
        FetchError::configuration(format!("Invalid log filter '{directives}': {e}"))
    })
}

fn install(filter: EnvFilter, format: OutputFormat) -> Result<(), FetchError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let init_result = match format {
        OutputFormat::Json => builder.json().try_init(),
        OutputFormat::Text => builder.try_init(),
    };

    // Another thread may have won the race since the check above
    init_result.or_else(|e| {
        if tracing::dispatcher::has_been_set() {
            Ok(())
        } else {
            Err(FetchError::configuration(format!(
                "Failed to initialize tracing: {e}"
            )))
        }
    })
}

/// Initialize from `SESSION_FETCH_LOG_LEVEL` and `SESSION_FETCH_LOG_FORMAT`
/// (`text` or `json`).
pub fn init_from_env() -> Result<(), FetchError> {
    let mut config = SubscriberConfig::default();

    if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
        config.log_level = parse_level(&level)?;
    }

    if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
        config.output_format = match format.trim().to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "text" => OutputFormat::Text,
            other => {
                return Err(FetchError::configuration(format!(
                    "Invalid log format: {other}. Valid options: text, json"
                )));
            }
        };
    }

    init_subscriber(config)
}
