//! The request pipeline
//!
//! Every call made through a `SellerClient` follows the same path:
//! credential headers are attached, a rate limit slot is acquired, the
//! request is dispatched, a failure is normalized, and retryable failures
//! re-enter the pipeline after a backoff delay.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::ApiToken;
use crate::core::{ClientBuilder, HttpRequest, HttpTransport, TransportFailure};
use crate::error::{mapping, ErrorContext, Result, SdkError};
use crate::logging;
use crate::rate_limit::RateLimiter;
use crate::resilience::{RetryConfig, RetryExecutor, Shutdown};
use crate::util::generate_request_id;

/// Settings fixed when a client is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint every path is resolved against, without a trailing slash
    pub base_url: String,
    /// Timeout of every request without its own override
    pub timeout: Duration,
    /// Retry settings
    pub retry: RetryConfig,
}

/// Per-call overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Timeout for this call instead of the client default
    pub timeout: Option<Duration>,
    /// Extra headers for this call
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the timeout, e.g. for uploads
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Client for one API surface of the seller platform
#[derive(Clone)]
pub struct SellerClient {
    pub(crate) config: ClientConfig,
    pub(crate) token: ApiToken,
    pub(crate) default_headers: HashMap<String, String>,
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) limiter: Arc<RateLimiter>,
    pub(crate) retry: RetryExecutor,
    pub(crate) shutdown: Shutdown,
}

impl fmt::Debug for SellerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SellerClient")
            .field("config", &self.config)
            .field("token", &self.token)
            .field("limiter", &self.limiter.config())
            .finish()
    }
}

impl SellerClient {
    /// Start building a client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Check a base URL and strip its trailing slash
    pub(crate) fn normalize_base_url(url: &str) -> Result<String> {
        let url = url.trim();
        let parsed = Url::parse(url)
            .map_err(|e| SdkError::configuration(format!("Invalid base URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SdkError::configuration(format!(
                "Base URL '{}' must use http or https",
                url
            )));
        }
        Ok(url.trim_end_matches('/').to_string())
    }

    /// The endpoint paths are resolved against
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Point this client at another endpoint
    ///
    /// Credential, limiter and retry settings are kept.
    pub fn set_base_url(&mut self, url: &str) -> Result<()> {
        self.config.base_url = Self::normalize_base_url(url)?;
        Ok(())
    }

    /// Settings fixed at construction
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The limiter this client draws admissions from
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Absolute URL of `path` on this client's endpoint
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    /// GET `path`; pass `&()` for no query
    pub async fn get<R, Q>(&self, path: &str, query: &Q) -> Result<R>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = query_pairs(query)?;
        self.send(Method::GET, path, query, None, RequestOptions::default())
            .await
    }

    /// POST a JSON body to `path`
    pub async fn post<R, B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = json_body(body)?;
        self.send(Method::POST, path, Vec::new(), body, options).await
    }

    /// PUT a JSON body to `path`
    pub async fn put<R, B>(&self, path: &str, body: &B) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = json_body(body)?;
        self.send(Method::PUT, path, Vec::new(), body, RequestOptions::default())
            .await
    }

    /// PATCH `path` with a JSON body
    pub async fn patch<R, B>(&self, path: &str, body: &B) -> Result<R>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = json_body(body)?;
        self.send(Method::PATCH, path, Vec::new(), body, RequestOptions::default())
            .await
    }

    /// DELETE `path`; pass `&()` for no query
    pub async fn delete<R, Q>(&self, path: &str, query: &Q) -> Result<R>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let query = query_pairs(query)?;
        self.send(Method::DELETE, path, query, None, RequestOptions::default())
            .await
    }

    /// Run one logical call and decode its response body
    pub async fn send<R>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.url_for(path);
        let value = self.execute(method, url.clone(), query, body, options).await?;
        serde_json::from_value(value).map_err(|e| SdkError::Decode {
            url,
            message: e.to_string(),
        })
    }

    async fn execute(
        &self,
        method: Method,
        url: String,
        query: Vec<(String, String)>,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<Value> {
        let request_id = generate_request_id();

        let mut headers = self.default_headers.clone();
        headers.extend(options.headers);
        self.token.apply(&mut headers);

        let request = HttpRequest {
            headers,
            query,
            body,
            timeout: Some(options.timeout.unwrap_or(self.config.timeout)),
            ..HttpRequest::new(method, url)
        };

        self.retry
            .execute(|attempt| self.attempt(&request, &request_id, attempt))
            .await
    }

    /// One pass through the pipeline: admission, dispatch, classification
    async fn attempt(&self, request: &HttpRequest, request_id: &str, attempt: u32) -> Result<Value> {
        if self.shutdown.is_triggered() {
            return Err(SdkError::cancelled("starting a request"));
        }

        let outcome = self
            .limiter
            .run_gated(&self.shutdown, || async {
                logging::log_request(request, request_id, attempt);
                tokio::select! {
                    biased;
                    _ = self.shutdown.triggered() => None,
                    result = self.transport.send(request.clone()) => Some(result),
                }
            })
            .await?;

        let failure = match outcome {
            None => return Err(SdkError::cancelled("waiting for a response")),
            Some(Ok(response)) if response.is_success() => {
                logging::log_response(request, request_id, &response);
                return Ok(response.body);
            }
            Some(Ok(response)) => TransportFailure::Status(response),
            Some(Err(failure)) => failure,
        };

        let context = ErrorContext::new()
            .method(request.method.as_str())
            .url(request.url.as_str())
            .request_id(request_id)
            .attempt(attempt);
        Err(mapping::normalize(&failure, &context).into())
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Option<Value>> {
    match serde_json::to_value(body)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

/// Flatten a serializable query into key/value pairs
///
/// `None` fields are skipped and sequences repeat their key. Nested objects
/// have no query string form and are rejected.
pub fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>> {
    let map = match serde_json::to_value(query)? {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(SdkError::serialization(format!(
                "Query must be a map or struct, got {}",
                other
            )))
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar(&key, item)?));
                }
            }
            value => pairs.push((key.clone(), scalar(&key, value)?)),
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(SdkError::serialization(format!(
            "Query parameter '{}' must be a scalar",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct OrdersQuery {
        #[serde(rename = "dateFrom")]
        date_from: String,
        flag: Option<u8>,
        limit: u32,
    }

    #[test]
    fn test_query_pairs_from_struct() {
        let pairs = query_pairs(&OrdersQuery {
            date_from: "2024-01-01".to_string(),
            flag: None,
            limit: 100,
        })
        .unwrap();

        assert!(pairs.contains(&("dateFrom".to_string(), "2024-01-01".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "100".to_string())));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_query_pairs_repeat_sequences() {
        let pairs = query_pairs(&json!({"nm": [1, 2]})).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("nm".to_string(), "1".to_string()),
                ("nm".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_query_pairs_reject_nesting() {
        assert!(query_pairs(&json!({"filter": {"a": 1}})).is_err());
        assert!(query_pairs(&json!([1, 2])).is_err());
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            SellerClient::normalize_base_url("https://content-api.wildberries.ru/").unwrap(),
            "https://content-api.wildberries.ru"
        );
        assert!(SellerClient::normalize_base_url("not a url").is_err());
        assert!(SellerClient::normalize_base_url("ftp://example.com").is_err());
    }
}
