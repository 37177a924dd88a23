//! Error handling for the seller SDK
//!
//! This module provides the error system used across the request pipeline:
//! - A closed taxonomy of API failure kinds (`ErrorKind`)
//! - The normalized error every transport failure is converted to (`ApiError`)
//! - Diagnostic context attached to errors (`ErrorContext`)
//! - The crate-level error and `Result` alias (`SdkError`, `Result`)

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub mod mapping;

/// Result type for seller SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// Closed set of failure kinds a call to the seller API can end with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// 401 or 403
    AuthError,
    /// 404
    NotFound,
    /// 400
    BadRequest,
    /// Any 5xx status
    ServerError,
    /// 429
    RateLimitExceeded,
    /// The connection could not be established
    NetworkError,
    /// The server did not answer in time
    TimeoutError,
    /// Any other non-success status
    ApiError,
    /// Anything that could not be classified
    UnknownError,
}

impl ErrorKind {
    /// Wire code of this kind, e.g. `RATE_LIMIT_EXCEEDED`
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AuthError => "AUTH_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::ServerError => "SERVER_ERROR",
            ErrorKind::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorKind::NetworkError => "NETWORK_ERROR",
            ErrorKind::TimeoutError => "TIMEOUT_ERROR",
            ErrorKind::ApiError => "API_ERROR",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and when a failure happened
///
/// Never carries the credential; only enough to locate the failed call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorContext {
    /// HTTP verb of the failed call
    pub method: Option<String>,

    /// Full target URL of the failed call
    pub url: Option<String>,

    /// Identifier shared by every attempt of one logical call
    pub request_id: Option<String>,

    /// Zero-based attempt number that produced the failure
    pub attempt: Option<u32>,

    /// When the failure was observed
    pub timestamp: DateTime<Utc>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            method: None,
            url: None,
            request_id: None,
            attempt: None,
            timestamp: Utc::now(),
        }
    }
}

impl ErrorContext {
    /// Create an empty context stamped with the current time
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the HTTP verb
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Add the target URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add the logical call identifier
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Add the attempt number
    pub fn attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }
}

/// A failed call, normalized into the closed `ErrorKind` taxonomy
///
/// Rate limit failures additionally carry `retry_after`, the cooldown the
/// server advertised (or the default one when it did not).
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    /// Human-readable description
    pub message: String,

    /// HTTP status, `0` when no response was received
    pub status_code: u16,

    /// Failure classification
    pub kind: ErrorKind,

    /// Response payload or the unrecognized failure value
    pub details: Option<Value>,

    /// Cooldown hint, only present for `RateLimitExceeded`
    pub retry_after: Option<Duration>,

    /// Location of the failed call
    pub context: ErrorContext,
}

impl ApiError {
    /// Create a new error of the given kind
    pub fn new(kind: ErrorKind, status_code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
            kind,
            details: None,
            retry_after: None,
            context: ErrorContext::default(),
        }
    }

    /// Create a rate limit error with the given cooldown
    pub fn rate_limited(message: impl Into<String>, retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(ErrorKind::RateLimitExceeded, 429, message)
        }
    }

    /// Attach the response payload or failure value
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the location of the failed call
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Whether the server refused the call for exceeding its quota
    pub fn is_rate_limit(&self) -> bool {
        self.kind == ErrorKind::RateLimitExceeded
    }

    /// Cooldown hint in milliseconds
    pub fn retry_after_ms(&self) -> Option<u64> {
        self.retry_after
            .map(|delay| u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
    }

    /// Structured description handed back to the caller of a tool
    pub fn report(&self) -> Value {
        let mut report = json!({
            "error": self.message,
            "code": self.kind,
            "statusCode": self.status_code,
        });

        if let Some(method) = &self.context.method {
            report["method"] = json!(method);
        }
        if let Some(url) = &self.context.url {
            report["url"] = json!(url);
        }
        if let Some(retry_after_ms) = self.retry_after_ms() {
            report["retryAfterMs"] = json!(retry_after_ms);
        }

        report
    }
}

/// Main error type for the seller SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// The API call failed, after any retries
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The configured credential is empty or a placeholder
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A request payload or query could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A successful response did not match the requested type
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The call was abandoned because shutdown was requested
    #[error("Cancelled while {0}")]
    Cancelled(String),
}

impl SdkError {
    /// Create an invalid credential error
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        SdkError::InvalidCredential(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        SdkError::Configuration(message.into())
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        SdkError::Serialization(message.into())
    }

    /// Create a cancellation error describing what was interrupted
    pub fn cancelled(during: impl Into<String>) -> Self {
        SdkError::Cancelled(during.into())
    }

    /// The normalized API error, if this is one
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            SdkError::Api(error) => Some(error),
            _ => None,
        }
    }

    /// The API failure kind, if this is an API error
    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_api_error().map(|error| error.kind)
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::serialization(format!("JSON error: {}", err))
    }
}
