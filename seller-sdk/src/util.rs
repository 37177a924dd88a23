//! Utility module for common functionality

use std::time::Duration;

use crate::error::{Result, SdkError};

/// Generate a unique identifier for one logical call
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parse a duration string
///
/// Accepts `ms`, `s`, `m` and `h` suffixes; a bare number is seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    let invalid = || SdkError::configuration(format!("Invalid duration: '{}'", s));

    let (digits, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(index) => s.split_at(index),
        None => (s, "s"),
    };
    let value: u64 = digits.parse().map_err(|_| invalid())?;

    match unit.trim() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" | "" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        "h" => Ok(Duration::from_secs(value.saturating_mul(3600))),
        _ => Err(invalid()),
    }
}

/// Truncate a string to at most `max_chars` characters, adding ellipsis if truncated
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars <= 3 {
        return s.chars().take(max_chars).collect();
    }
    let mut truncated: String = s.chars().take(max_chars - 3).collect();
    truncated.push_str("...");
    truncated
}
