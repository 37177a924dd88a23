//! Normalization of transport failures
//!
//! Every failed attempt, whatever shape it arrives in, is converted to exactly
//! one `ApiError` here before retry policy or caller code sees it.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::{ApiError, ErrorContext, ErrorKind};
use crate::core::{HttpResponse, TransportFailure};
use crate::logging;

/// Cooldown assumed when a 429 response carries no usable `retry-after`
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

static CONNECTION_REFUSED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)ECONNREFUSED|connection refused").expect("valid connection refused pattern")
});

static TIMED_OUT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)timeout|timed out").expect("valid timeout pattern"));

/// Convert a failed attempt into a normalized error
///
/// Normalization is a pure function of the failure: the same input always
/// yields the same kind, status and message. The error is logged once with
/// its payload redacted.
pub fn normalize(failure: &TransportFailure, context: &ErrorContext) -> ApiError {
    let error = match failure {
        TransportFailure::Status(response) => map_status(response),
        TransportFailure::Transport { message, timeout } => map_transport(message, *timeout),
        TransportFailure::Opaque(value) => {
            ApiError::new(ErrorKind::UnknownError, 500, "An unknown error occurred")
                .with_details(value.clone())
        }
    }
    .with_context(context.clone());

    logging::log_error(&error);
    error
}

/// Classify a non-success protocol response
pub fn map_status(response: &HttpResponse) -> ApiError {
    let status = response.status;
    let body = response.body.clone();

    match status {
        429 => {
            let retry_after = parse_retry_after(response.header("retry-after"));
            ApiError::rate_limited(
                "Rate limit exceeded. Too many requests to Wildberries API.",
                retry_after,
            )
            .with_details(body)
        }
        401 | 403 => ApiError::new(
            ErrorKind::AuthError,
            status,
            "Authentication failed. Please check your API token.",
        )
        .with_details(body),
        404 => ApiError::new(ErrorKind::NotFound, status, "Resource not found.").with_details(body),
        400 => {
            let message =
                body_message(&body).unwrap_or_else(|| "Invalid request parameters.".to_string());
            ApiError::new(ErrorKind::BadRequest, status, message).with_details(body)
        }
        s if s >= 500 => ApiError::new(
            ErrorKind::ServerError,
            status,
            "Wildberries API server error. Please try again later.",
        )
        .with_details(body),
        _ => {
            let message = body_message(&body)
                .unwrap_or_else(|| format!("Request failed with status code {}", status));
            ApiError::new(ErrorKind::ApiError, status, message).with_details(body)
        }
    }
}

/// Classify a failure where no response was received
///
/// Only a refused connection is a network error, and it wins over a timeout.
/// Anything else, DNS and TLS failures included, keeps its original message
/// as an unknown error.
pub fn map_transport(message: &str, timeout: bool) -> ApiError {
    if CONNECTION_REFUSED.is_match(message) {
        return ApiError::new(
            ErrorKind::NetworkError,
            0,
            "Cannot connect to Wildberries API. Please check your internet connection.",
        );
    }

    if timeout || TIMED_OUT.is_match(message) {
        return ApiError::new(
            ErrorKind::TimeoutError,
            0,
            "Request timeout. Wildberries API did not respond in time.",
        );
    }

    let message = if message.trim().is_empty() {
        "API request failed"
    } else {
        message
    };
    ApiError::new(ErrorKind::UnknownError, 500, message)
}

/// Parse a `retry-after` header given in whole seconds
///
/// Leading digits are honoured (`"30.5"` is 30 seconds); a missing or
/// unparseable value falls back to `DEFAULT_RETRY_AFTER`.
pub fn parse_retry_after(header: Option<&str>) -> Duration {
    header
        .map(str::trim)
        .map(|value| {
            value
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .and_then(|digits| digits.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

fn body_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after(Some("30")), Duration::from_secs(30));
        assert_eq!(parse_retry_after(Some(" 5 ")), Duration::from_secs(5));
        assert_eq!(parse_retry_after(Some("30.5")), Duration::from_secs(30));
        assert_eq!(parse_retry_after(Some("soon")), DEFAULT_RETRY_AFTER);
        assert_eq!(parse_retry_after(None), DEFAULT_RETRY_AFTER);
    }

    #[test]
    fn test_refused_wins_over_timeout() {
        let error = map_transport("connect ECONNREFUSED after timeout", true);
        assert_eq!(error.kind, ErrorKind::NetworkError);
        assert_eq!(error.status_code, 0);
    }

    #[test]
    fn test_connect_timeout_is_timeout() {
        let error = map_transport("error trying to connect: deadline elapsed", true);
        assert_eq!(error.kind, ErrorKind::TimeoutError);
    }

    #[test]
    fn test_failed_lookup_is_unknown_error() {
        let message = "error sending request for url (https://content-api.wildberries.ru/ping): \
                       error trying to connect: dns error: failed to lookup address information";
        let error = map_transport(message, false);
        assert_eq!(error.kind, ErrorKind::UnknownError);
        assert_eq!(error.status_code, 500);
        assert_eq!(error.message, message);
    }
}
