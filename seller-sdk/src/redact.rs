//! Redaction of credentials from logged payloads
//!
//! Every request or response body and header map passes through here before
//! it reaches a log sink.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Replacement written in place of a sensitive value
pub const REDACTION_MARKER: &str = "***REDACTED***";

// Matched as substrings of the lowercased key
const SENSITIVE_KEY_FRAGMENTS: [&str; 5] = ["token", "password", "apikey", "authorization", "secret"];

/// Whether a key names a value that must never be logged
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEY_FRAGMENTS
        .iter()
        .any(|fragment| key.contains(fragment))
}

/// Copy a JSON value with every sensitive entry replaced by the marker
///
/// Walks nested objects and arrays; scalars are returned unchanged.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| {
                    let value = if is_sensitive_key(key) {
                        Value::String(REDACTION_MARKER.to_string())
                    } else {
                        redact(value)
                    };
                    (key.clone(), value)
                })
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// Copy a header map with sensitive header values replaced by the marker
pub fn redact_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if is_sensitive_key(name) {
                REDACTION_MARKER.to_string()
            } else {
                value.clone()
            };
            (name.clone(), value)
        })
        .collect()
}
