//! Core abstractions for the seller SDK
//!
//! - `ApiSurface`: the four fixed API families and their endpoints
//! - `HttpRequest` / `HttpResponse`: what the pipeline hands to and gets from a transport
//! - `TransportFailure`: every way a single attempt can fail before normalization
//! - `HttpTransport`: the seam between the pipeline and the network
//! - `ClientBuilder`: Builder pattern for creating clients

pub mod builder;
pub use builder::ClientBuilder;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// One of the four API families of the seller platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiSurface {
    /// Prices, tariffs and general supplier endpoints
    General,
    /// Sales, orders and stock reports
    Statistics,
    /// Product cards
    Content,
    /// Fulfilment orders and supplies
    Marketplace,
}

impl ApiSurface {
    /// Every surface, in a fixed order
    pub const ALL: [ApiSurface; 4] = [
        ApiSurface::General,
        ApiSurface::Statistics,
        ApiSurface::Content,
        ApiSurface::Marketplace,
    ];

    /// Production endpoint of the surface
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ApiSurface::General => "https://suppliers-api.wildberries.ru",
            ApiSurface::Statistics => "https://statistics-api.wildberries.ru",
            ApiSurface::Content => "https://content-api.wildberries.ru",
            ApiSurface::Marketplace => "https://marketplace-api.wildberries.ru",
        }
    }

    /// Short lowercase name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            ApiSurface::General => "general",
            ApiSurface::Statistics => "statistics",
            ApiSurface::Content => "content",
            ApiSurface::Marketplace => "marketplace",
        }
    }
}

impl fmt::Display for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully resolved outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL without query string
    pub url: String,
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Overrides the transport's default timeout for this request
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a request with no headers, query or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }
}

/// A received response, whatever its status
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lowercase
    pub headers: HashMap<String, String>,
    /// JSON body; a non-JSON body is kept as a string, an empty one as null
    pub body: Value,
}

impl HttpResponse {
    /// Create a response without headers
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Add a header, lowercasing its name
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Look up a header case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// A response arrived with a non-success status
    Status(HttpResponse),

    /// No response arrived
    Transport {
        message: String,
        /// A deadline elapsed
        timeout: bool,
    },

    /// A failure value that is not error-shaped
    Opaque(Value),
}

impl TransportFailure {
    /// A transport failure known only by its message
    pub fn message(message: impl Into<String>) -> Self {
        TransportFailure::Transport {
            message: message.into(),
            timeout: false,
        }
    }
}

/// Sends one request and returns whatever response arrives
///
/// Implementations return `Ok` for every received response, success or not;
/// the pipeline decides what a status means.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportFailure>;
}
