//! Sliding window rate limiting
//!
//! One `RateLimiter` is shared by every client of a process so that all API
//! surfaces draw from a single request quota. Admission timestamps are kept
//! in insertion order and pruned lazily whenever admission is evaluated.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use crate::error::{Result, SdkError};
use crate::resilience::Shutdown;

/// Extra wait added to every slot wait so a waiter does not wake just before
/// the oldest entry leaves the window
pub const SLOT_GUARD: Duration = Duration::from_millis(100);

/// Rate limiting configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum number of admissions within one window
    pub max_requests: u32,

    /// Length of the sliding window
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    /// Create a new configuration
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

/// Rate limit status information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window
    pub max_requests: u32,

    /// Length of the sliding window
    pub window: Duration,

    /// Admissions recorded in the current window
    pub current_count: u32,

    /// Time until the next admission is possible
    pub reset_after: Duration,

    /// Whether callers are currently being held back
    pub enforced: bool,
}

/// Admission control over a sliding window of request timestamps
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    requests: Mutex<VecDeque<Instant>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

impl RateLimiter {
    /// Create a limiter with an empty window
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            requests: Mutex::new(VecDeque::with_capacity(config.max_requests as usize)),
        }
    }

    /// Get the limiter configuration
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Lock the timestamps and drop every entry that has left the window
    fn pruned(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        while let Some(&oldest) = requests.front() {
            if now.duration_since(oldest) >= self.config.window {
                requests.pop_front();
            } else {
                break;
            }
        }
        requests
    }

    fn admits(&self, requests: &VecDeque<Instant>) -> bool {
        requests.len() < self.config.max_requests as usize
    }

    fn wait_for(&self, requests: &VecDeque<Instant>) -> Duration {
        if self.admits(requests) {
            return Duration::ZERO;
        }
        match requests.front() {
            Some(&oldest) => self
                .config
                .window
                .saturating_sub(Instant::now().duration_since(oldest)),
            None => self.config.window,
        }
    }

    /// Whether a request would be admitted right now
    pub fn can_admit(&self) -> bool {
        let requests = self.pruned();
        self.admits(&requests)
    }

    /// Record an admission at the current instant
    pub fn record(&self) {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        requests.push_back(Instant::now());
    }

    /// Zero when a request would be admitted, otherwise the time until the
    /// oldest recorded admission leaves the window
    pub fn time_until_next_slot(&self) -> Duration {
        let requests = self.pruned();
        self.wait_for(&requests)
    }

    /// Admit and record in one step, or report how long to wait
    ///
    /// The check and the record happen under one lock, so concurrent callers
    /// can never push the window past `max_requests`.
    pub fn try_acquire(&self) -> std::result::Result<(), Duration> {
        let mut requests = self.pruned();
        if self.admits(&requests) {
            requests.push_back(Instant::now());
            Ok(())
        } else {
            Err(self.wait_for(&requests))
        }
    }

    /// Wait until a request would be admitted, without recording it
    pub async fn await_slot(&self, shutdown: &Shutdown) -> Result<()> {
        while !self.can_admit() {
            let wait = self.time_until_next_slot();
            self.hold(wait, shutdown).await?;
        }
        Ok(())
    }

    /// Wait for a slot and record the admission
    pub async fn acquire(&self, shutdown: &Shutdown) -> Result<()> {
        loop {
            match self.try_acquire() {
                Ok(()) => return Ok(()),
                Err(wait) => self.hold(wait, shutdown).await?,
            }
        }
    }

    /// Acquire a slot, then run `operation` and hand back its output untouched
    pub async fn run_gated<F, Fut, T>(&self, shutdown: &Shutdown, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        self.acquire(shutdown).await?;
        Ok(operation().await)
    }

    async fn hold(&self, wait: Duration, shutdown: &Shutdown) -> Result<()> {
        warn!(
            wait_ms = wait.as_millis() as u64,
            max_requests = self.config.max_requests,
            window_ms = self.config.window.as_millis() as u64,
            "Rate limit reached, waiting"
        );

        tokio::select! {
            biased;
            _ = shutdown.triggered() => Err(SdkError::cancelled("waiting for a rate limit slot")),
            _ = tokio::time::sleep(wait + SLOT_GUARD) => Ok(()),
        }
    }

    /// Admissions recorded in the current window
    pub fn current_count(&self) -> u32 {
        self.pruned().len() as u32
    }

    /// Forget every recorded admission
    pub fn reset(&self) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Snapshot of the current window
    pub fn status(&self) -> RateLimitStatus {
        let requests = self.pruned();
        let reset_after = self.wait_for(&requests);
        RateLimitStatus {
            max_requests: self.config.max_requests,
            window: self.config.window,
            current_count: requests.len() as u32,
            reset_after,
            enforced: !reset_after.is_zero(),
        }
    }
}
