//! Composition root for the four API surfaces
//!
//! `SellerApi` builds one client per surface. All of them share a single
//! rate limiter and a single connection pool.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::auth::validate_token;
use crate::client::{RequestOptions, SellerClient};
use crate::config::SellerApiConfig;
use crate::core::{ApiSurface, ClientBuilder, HttpTransport};
use crate::error::Result;
use crate::rate_limit::RateLimiter;
use crate::resilience::Shutdown;
use crate::services::{Analytics, Orders, Products};
use crate::transport::ReqwestTransport;

/// Clients for every API surface of the seller platform
#[derive(Debug, Clone)]
pub struct SellerApi {
    general: SellerClient,
    statistics: SellerClient,
    content: SellerClient,
    marketplace: SellerClient,
    limiter: Arc<RateLimiter>,
    upload_timeout: Duration,
}

impl SellerApi {
    /// Build all clients from a configuration
    pub fn new(config: &SellerApiConfig) -> Result<Self> {
        Self::with_shutdown(config, Shutdown::never())
    }

    /// Build all clients, abandoning their calls when `shutdown` fires
    pub fn with_shutdown(config: &SellerApiConfig, shutdown: Shutdown) -> Result<Self> {
        validate_token(&config.api_token)?;
        config.validate()?;

        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config.timeouts.default)?);
        Self::assemble(config, transport, shutdown)
    }

    /// Build all clients on top of a custom transport
    pub fn with_transport(
        config: &SellerApiConfig,
        transport: Arc<dyn HttpTransport>,
        shutdown: Shutdown,
    ) -> Result<Self> {
        validate_token(&config.api_token)?;
        config.validate()?;
        Self::assemble(config, transport, shutdown)
    }

    fn assemble(
        config: &SellerApiConfig,
        transport: Arc<dyn HttpTransport>,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::new(config.rate_limit));

        let build = |surface: ApiSurface| {
            ClientBuilder::new()
                .base_url(config.endpoints.url_for(surface))
                .token(config.api_token.clone())
                .timeout(config.timeouts.default)
                .retry_config(config.retry.clone())
                .rate_limiter(Arc::clone(&limiter))
                .transport(Arc::clone(&transport))
                .shutdown(shutdown.clone())
                .build()
        };

        let api = Self {
            general: build(ApiSurface::General)?,
            statistics: build(ApiSurface::Statistics)?,
            content: build(ApiSurface::Content)?,
            marketplace: build(ApiSurface::Marketplace)?,
            limiter: Arc::clone(&limiter),
            upload_timeout: config.timeouts.upload,
        };

        info!(
            max_requests = config.rate_limit.max_requests,
            window_ms = config.rate_limit.window.as_millis() as u64,
            max_retries = config.retry.max_retries,
            "Seller API clients initialized"
        );

        Ok(api)
    }

    /// Prices, tariffs and general supplier endpoints
    pub fn general(&self) -> &SellerClient {
        &self.general
    }

    /// Sales, orders and stock reports
    pub fn statistics(&self) -> &SellerClient {
        &self.statistics
    }

    /// Product cards
    pub fn content(&self) -> &SellerClient {
        &self.content
    }

    /// Fulfilment orders and supplies
    pub fn marketplace(&self) -> &SellerClient {
        &self.marketplace
    }

    /// The client wired to a surface
    pub fn client_for(&self, surface: ApiSurface) -> &SellerClient {
        match surface {
            ApiSurface::General => &self.general,
            ApiSurface::Statistics => &self.statistics,
            ApiSurface::Content => &self.content,
            ApiSurface::Marketplace => &self.marketplace,
        }
    }

    /// Product cards, prices and stocks
    pub fn products(&self) -> Products<'_> {
        Products::new(&self.content, &self.general, &self.marketplace)
    }

    /// FBS orders and picking tasks
    pub fn orders(&self) -> Orders<'_> {
        Orders::new(&self.marketplace)
    }

    /// Sales funnel, stock history and search query reports
    pub fn analytics(&self) -> Analytics<'_> {
        Analytics::new(&self.statistics)
    }

    /// Options for upload calls, which get the longer upload timeout
    pub fn upload_options(&self) -> RequestOptions {
        RequestOptions::new().timeout(self.upload_timeout)
    }

    /// The limiter every client draws from
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }
}
