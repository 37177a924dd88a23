//! Structured logging
//!
//! Console output plus, when a log directory is configured, a `combined.log`
//! with every event and an `error.log` with errors only. Request and response
//! payloads always pass through [`redact`](crate::redact::redact) first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, error, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::core::{HttpRequest, HttpResponse};
use crate::error::{ApiError, Result, SdkError};
use crate::redact::{redact, redact_headers};
use crate::util::truncate_string;

/// Longest rendering of a payload written to a log
pub const MAX_LOGGED_BODY_CHARS: usize = 2048;

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

// Dropping a guard stops its background writer
static FILE_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error)
    pub level: String,
    /// Service name recorded at startup
    pub service_name: String,
    /// Whether console output is JSON
    pub json_format: bool,
    /// Directory for `combined.log` and `error.log`
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            service_name: "seller-sdk".to_string(),
            json_format: false,
            log_dir: None,
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `config.level`. Calling this again after
/// a successful initialization does nothing.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    if LOGGING_INITIALIZED.load(Ordering::SeqCst) {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| SdkError::configuration(format!("Invalid log level '{}': {}", config.level, e)))?;

    let json_layer = config
        .json_format
        .then(|| fmt::layer().json().flatten_event(true).with_target(true));
    let text_layer = (!config.json_format).then(|| fmt::layer().with_target(true));

    let (combined_layer, error_layer) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                SdkError::configuration(format!("Cannot create log directory '{}': {}", dir, e))
            })?;

            let (combined, combined_guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "combined.log"));
            let (errors, errors_guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "error.log"));

            FILE_GUARDS
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .extend([combined_guard, errors_guard]);

            (
                Some(fmt::layer().with_writer(combined).with_ansi(false)),
                Some(
                    fmt::layer()
                        .with_writer(errors.with_max_level(Level::ERROR))
                        .with_ansi(false),
                ),
            )
        }
        None => (None, None),
    };

    let subscriber = Registry::default()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(combined_layer)
        .with(error_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| SdkError::configuration(format!("Failed to set global subscriber: {}", e)))?;

    LOGGING_INITIALIZED.store(true, Ordering::SeqCst);

    tracing::info!(
        service = %config.service_name,
        level = %config.level,
        json = config.json_format,
        log_dir = config.log_dir.as_deref().unwrap_or("-"),
        "Logging initialized"
    );

    Ok(())
}

/// Redact and truncate a payload for logging
pub fn render_payload(value: &Value) -> String {
    truncate_string(&redact(value).to_string(), MAX_LOGGED_BODY_CHARS)
}

/// Log an outbound request attempt
pub fn log_request(request: &HttpRequest, request_id: &str, attempt: u32) {
    debug!(
        request_id,
        attempt,
        method = %request.method,
        url = %request.url,
        headers = ?redact_headers(&request.headers),
        body = %request.body.as_ref().map(render_payload).unwrap_or_default(),
        "API request"
    );
}

/// Log a successful response
pub fn log_response(request: &HttpRequest, request_id: &str, response: &HttpResponse) {
    debug!(
        request_id,
        method = %request.method,
        url = %request.url,
        status = response.status,
        body = %render_payload(&response.body),
        "API response"
    );
}

/// Log a normalized error with its redacted payload
pub fn log_error(err: &ApiError) {
    error!(
        kind = %err.kind,
        status = err.status_code,
        method = err.context.method.as_deref().unwrap_or("-"),
        url = err.context.url.as_deref().unwrap_or("-"),
        request_id = err.context.request_id.as_deref().unwrap_or("-"),
        attempt = err.context.attempt.unwrap_or_default(),
        body = %err.details.as_ref().map(render_payload).unwrap_or_default(),
        "{}",
        err.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redact::REDACTION_MARKER;
    use serde_json::json;

    #[test]
    fn test_render_payload_redacts() {
        let rendered = render_payload(&json!({"token": "abc", "nested": {"Authorization": "xyz"}, "nmID": 7}));
        assert!(!rendered.contains("abc"));
        assert!(!rendered.contains("xyz"));
        assert_eq!(rendered.matches(REDACTION_MARKER).count(), 2);
        assert!(rendered.contains("\"nmID\":7"));
    }

    #[test]
    fn test_render_payload_truncates() {
        let rendered = render_payload(&json!("x".repeat(MAX_LOGGED_BODY_CHARS * 2)));
        assert_eq!(rendered.chars().count(), MAX_LOGGED_BODY_CHARS);
        assert!(rendered.ends_with("..."));
    }
}
