//! Resilience patterns for the request pipeline
//!
//! This module provides:
//! - Retry with exponential backoff and jitter
//! - A shutdown signal that interrupts every suspension point of a call
//! - The sleeping seam used for backoff waits

mod retry;

pub use retry::{is_retryable, RetryConfig, RetryExecutor, RetryPolicy};

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::{Result, SdkError};

/// Receiving side of a shutdown signal
///
/// Cheap to clone; every clone observes the same trigger.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Sending side of a shutdown signal
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

/// Create a connected trigger and signal
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

impl ShutdownTrigger {
    /// Request shutdown; every waiting call resolves to `SdkError::Cancelled`
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Create another signal connected to this trigger
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::never()
    }
}

impl Shutdown {
    /// A signal that never fires
    pub fn never() -> Self {
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether shutdown has been requested
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is requested
    ///
    /// Pends forever if the trigger is dropped without firing.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Suspends the current task for a backoff delay
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleep for `duration` unless shutdown is requested first
pub async fn sleep_or_shutdown(
    sleeper: &dyn Sleeper,
    duration: Duration,
    shutdown: &Shutdown,
) -> Result<()> {
    tokio::select! {
        biased;
        _ = shutdown.triggered() => Err(SdkError::cancelled("waiting out retry backoff")),
        _ = sleeper.sleep(duration) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_never_is_not_triggered() {
        let shutdown = Shutdown::never();
        assert!(!shutdown.is_triggered());

        let waited = tokio::time::timeout(Duration::from_millis(20), shutdown.triggered()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_trigger_reaches_every_clone() {
        let (trigger, shutdown) = shutdown_channel();
        let other = trigger.subscribe();
        let copy = shutdown.clone();

        trigger.trigger();

        assert!(shutdown.is_triggered());
        assert!(other.is_triggered());
        copy.triggered().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_interrupted_by_shutdown() {
        let (trigger, shutdown) = shutdown_channel();

        let handle = tokio::spawn(async move {
            sleep_or_shutdown(&TokioSleeper, Duration::from_secs(3600), &shutdown).await
        });
        tokio::task::yield_now().await;
        trigger.trigger();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(SdkError::Cancelled(_))));
    }
}
