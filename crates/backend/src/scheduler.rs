//! Periodic cleanup pass.
//!
//! The scheduler wakes once per interval, counts the documents in each
//! collection and logs the result. It never deletes anything: no retention
//! policy exists yet, so the pass is a read-only diagnostic.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::db::{PaymentRepository, ProductRepository};

/// Counts observed by a single pass. `None` means the count failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub products: Option<u64>,
    pub payments: Option<u64>,
}

/// Background task running the cleanup pass on a fixed interval.
#[derive(Clone)]
pub struct CleanupScheduler {
    products: Arc<dyn ProductRepository>,
    payments: Arc<dyn PaymentRepository>,
    interval: Duration,
}

impl std::fmt::Debug for CleanupScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupScheduler")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl CleanupScheduler {
    /// Create a scheduler. `interval` must be non-zero.
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductRepository>,
        payments: Arc<dyn PaymentRepository>,
        interval: Duration,
    ) -> Self {
        Self {
            products,
            payments,
            interval,
        }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    ///
    /// The first pass happens one full interval after start. A pass in
    /// progress is abandoned when shutdown arrives. Returns the number of
    /// passes completed.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs(), "Cleanup scheduler started");

        let mut passes = 0;
        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = shutdown.wait_for(|stop| *stop) => {
                            tracing::info!("Cleanup pass interrupted by shutdown");
                            break;
                        }
                        _ = self.run_once() => passes += 1,
                    }
                }
            }
        }

        tracing::info!(passes, "Cleanup scheduler stopped");
        passes
    }

    /// Perform one pass immediately.
    pub async fn run_once(&self) -> CleanupReport {
        tracing::info!("Running scheduled cleanup...");

        let payments = match self.payments.count().await {
            Ok(n) => {
                tracing::info!(count = n, "Payments in store");
                Some(n)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to count payments");
                None
            }
        };

        let products = match self.products.count().await {
            Ok(n) => {
                tracing::info!(count = n, "Products in store");
                Some(n)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to count products");
                None
            }
        };

        tracing::info!("Cleanup completed");
        CleanupReport { products, payments }
    }
}
