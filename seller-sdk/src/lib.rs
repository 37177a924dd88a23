//! # Seller SDK
//!
//! A resilient client for the Wildberries seller API (products, orders and
//! analytics).
//!
//! This crate provides:
//!
//! - A request pipeline shared by all four API surfaces
//! - Sliding window rate limiting with a single process-wide quota
//! - Retry with exponential backoff and jitter
//! - A closed error taxonomy every failure is normalized into
//! - Configuration from the environment and structured logging
//!
//! ## Architecture
//!
//! - `SellerApi`: composition root owning one client per API surface
//! - `Products` / `Orders` / `Analytics`: typed operations on top of the surfaces
//! - `SellerClient`: the pipeline (auth headers, admission, dispatch, normalization, retry)
//! - `RateLimiter`: shared admission control
//! - `RetryExecutor`: the retry loop around each logical call
//! - `HttpTransport`: the seam between the pipeline and the network
//! - `ApiError` / `SdkError`: normalized and crate-level errors

pub mod api;
pub use api::SellerApi;

pub mod auth;
pub use auth::{is_token_valid, validate_token, ApiToken};

pub mod client;
pub use client::{RequestOptions, SellerClient};

pub mod core;
pub use core::{ApiSurface, ClientBuilder, HttpRequest, HttpResponse, HttpTransport, TransportFailure};

pub mod error;
pub use error::{ApiError, ErrorContext, ErrorKind, Result, SdkError};

pub mod rate_limit;
pub use rate_limit::{RateLimitConfig, RateLimitStatus, RateLimiter};

pub mod resilience;
pub use resilience::{shutdown_channel, RetryConfig, RetryExecutor, RetryPolicy, Shutdown, ShutdownTrigger};

pub mod config;
pub use config::{ConfigProvider, EnvConfigProvider, MemoryConfigProvider, SellerApiConfig};

pub mod logging;
pub use logging::{init_logging, LoggingConfig};

pub mod redact;
pub mod services;
pub mod transport;
pub use transport::ReqwestTransport;

mod util;

#[cfg(test)]
mod tests;
