//! Seller API credential
//!
//! The token is checked once, when a client is built, and attached verbatim
//! as the `Authorization` header of every outbound request.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, SdkError};

/// Values that show up when the credential was never filled in
///
/// Matched case-insensitively as substrings of the token.
pub const PLACEHOLDER_TOKENS: [&str; 4] = ["your_wildberries_api_token_here", "token", "api_token", "test"];

const TOKEN_HELP: &str = "Invalid Wildberries API token. Please set WB_API_TOKEN in your .env file. \
     Get your token at: https://seller.wildberries.ru/supplier-settings/access-to-api";

/// Whether a token is non-empty and not a known placeholder
pub fn is_token_valid(token: &str) -> bool {
    if token.trim().is_empty() {
        return false;
    }

    let token = token.to_lowercase();
    !PLACEHOLDER_TOKENS
        .iter()
        .any(|placeholder| token.contains(placeholder))
}

/// Reject an empty or placeholder token
pub fn validate_token(token: &str) -> Result<()> {
    if is_token_valid(token) {
        Ok(())
    } else {
        Err(SdkError::invalid_credential(TOKEN_HELP))
    }
}

/// A validated seller API token
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Validate and wrap a token
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        validate_token(&token)?;
        Ok(Self(token))
    }

    /// The raw token value
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Add the authorization and content type headers
    pub fn apply(&self, headers: &mut HashMap<String, String>) {
        headers.insert("Authorization".to_string(), self.expose().to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***REDACTED***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_placeholders() {
        for token in ["", "   ", "your_wildberries_api_token_here", "MyTestKey", "API_TOKEN", "xTOKENx"] {
            assert!(!is_token_valid(token), "{:?} should be rejected", token);
        }
        assert!(is_token_valid("eyJhbGciOiJFUzI1NiJ9.seller-key"));
    }

    #[test]
    fn test_new_fails_with_help() {
        let err = ApiToken::new("test").unwrap_err();
        assert!(matches!(err, SdkError::InvalidCredential(_)));
        assert!(err.to_string().contains("WB_API_TOKEN"));
    }

    #[test]
    fn test_apply_headers_and_debug() {
        let token = ApiToken::new("eyJhbGciOiJFUzI1NiJ9.seller-key").unwrap();
        let mut headers = HashMap::new();
        token.apply(&mut headers);

        assert_eq!(headers["Authorization"], "eyJhbGciOiJFUzI1NiJ9.seller-key");
        assert_eq!(headers["Content-Type"], "application/json");
        assert_eq!(token.expose(), headers["Authorization"]);
        assert!(!format!("{:?}", token).contains("seller-key"));
    }
}
