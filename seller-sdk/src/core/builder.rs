//! Client builder implementation
//!
//! Provides the builder used to assemble a `SellerClient` from a credential,
//! an endpoint, a shared rate limiter and resilience settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as ReqwestClient;

use super::HttpTransport;
use crate::auth::ApiToken;
use crate::client::{ClientConfig, SellerClient};
use crate::error::{Result, SdkError};
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::resilience::{RetryConfig, RetryExecutor, Shutdown, Sleeper};
use crate::transport::ReqwestTransport;

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("seller-sdk/", env!("CARGO_PKG_VERSION"));

/// Builder for `SellerClient`
pub struct ClientBuilder {
    /// Base URL for the API surface
    base_url: Option<String>,

    /// Seller API token
    token: Option<String>,

    /// Custom headers to include with all requests
    custom_headers: HashMap<String, String>,

    /// Request timeout
    timeout: Duration,

    /// Retry configuration
    retry_config: RetryConfig,

    /// Shared limiter, or the configuration of a private one
    rate_limiter: Option<Arc<RateLimiter>>,
    rate_limit: Option<RateLimitConfig>,

    /// Transport override, reqwest otherwise
    transport: Option<Arc<dyn HttpTransport>>,

    /// Sleeper override for backoff waits
    sleeper: Option<Arc<dyn Sleeper>>,

    /// Shutdown signal, never fires by default
    shutdown: Shutdown,

    /// User agent
    user_agent: String,

    /// Enable response decompression
    compression: bool,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            custom_headers: HashMap::new(),
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
            rate_limiter: None,
            rate_limit: None,
            transport: None,
            sleeper: None,
            shutdown: Shutdown::never(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            compression: true,
        }
    }
}

impl ClientBuilder {
    /// Create a new client builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the API surface
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the seller API token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Add a custom header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(key.into(), value.into());
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure retry behavior
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Draw admissions from a limiter shared with other clients
    pub fn rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Give this client a limiter of its own
    pub fn rate_limit(mut self, max_requests: u32, window: Duration) -> Self {
        self.rate_limit = Some(RateLimitConfig::new(max_requests, window));
        self
    }

    /// Send requests through a custom transport
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Wait out backoff delays with a custom sleeper
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Abandon waits and in-flight requests when this signal fires
    pub fn shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable response decompression
    pub fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }

    /// Build an HTTP client with the configured settings
    pub fn build_http_client(&self) -> Result<ReqwestClient> {
        ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(self.compression)
            .build()
            .map_err(|e| SdkError::configuration(format!("Failed to build HTTP client: {}", e)))
    }

    /// Build the retry executor with the configured settings
    pub fn build_retry(&self) -> RetryExecutor {
        let retry = RetryExecutor::new(self.retry_config.clone()).with_shutdown(self.shutdown.clone());
        match &self.sleeper {
            Some(sleeper) => retry.with_sleeper(Arc::clone(sleeper)),
            None => retry,
        }
    }

    /// Build the client
    ///
    /// The token is checked before anything else, so an invalid credential
    /// fails here and never reaches the network.
    pub fn build(self) -> Result<SellerClient> {
        let token = ApiToken::new(self.token.clone().unwrap_or_default())?;

        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| SdkError::configuration("Base URL is required"))?;
        let base_url = SellerClient::normalize_base_url(base_url)?;

        let limiter = match (&self.rate_limiter, self.rate_limit) {
            (Some(limiter), _) => Arc::clone(limiter),
            (None, Some(config)) => Arc::new(RateLimiter::new(config)),
            (None, None) => {
                return Err(SdkError::configuration(
                    "A rate limiter is required; share one across clients with `rate_limiter`",
                ))
            }
        };

        let transport: Arc<dyn HttpTransport> = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(ReqwestTransport::from_client(self.build_http_client()?)),
        };

        Ok(SellerClient {
            config: ClientConfig {
                base_url,
                timeout: self.timeout,
                retry: self.retry_config.clone(),
            },
            retry: self.build_retry(),
            token,
            default_headers: self.custom_headers,
            transport,
            limiter,
            shutdown: self.shutdown,
        })
    }
}
