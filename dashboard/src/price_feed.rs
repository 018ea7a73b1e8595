//! Price Feed
//!
//! Polls a price source on a fixed period and hands every successful
//! sample to a subscriber callback. Only the latest sample is kept.
//!
//! # Scheduling
//! ```text
//! t=0      t=30s     t=60s     t=90s
//!  |tick    |tick     |tick     |tick        fixed-period ticker
//!  └fetch─┘ └fetch──────────┘   └fetch─┘     one spawned task per tick
//!                     └fetch─┘                fetches may overlap
//! ```
//!
//! The ticker never waits for a fetch to finish, so a slow request does not
//! push back the schedule. When two fetches overlap, whichever finishes last
//! is the sample that stays (last writer wins). Ticks the runtime could not
//! service on time are skipped rather than fired in a burst.
//!
//! # Failures
//! A failed fetch is logged and otherwise ignored: the previous sample stays,
//! the subscriber is not called, and the next tick is the only retry.
//!
//! # Cancellation
//! [`FeedHandle::cancel`] stops the ticker. Fetches already in flight run to
//! completion and still deliver to the subscriber.

use crate::{error::Result, types::PriceSample};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Anything that can produce an ETH/USD sample
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self) -> Result<PriceSample>;
}

type Subscriber = Arc<dyn Fn(PriceSample) + Send + Sync>;

/// State shared between the ticker, spawned fetches and the handle
struct FeedShared {
    source: Arc<dyn PriceSource>,
    latest: RwLock<Option<PriceSample>>,
    on_sample: Subscriber,
}

impl FeedShared {
    /// One fetch on the common success/failure path
    async fn poll(&self) -> Option<PriceSample> {
        match self.source.fetch_price().await {
            Ok(sample) => {
                debug!(
                    "New ETH price sample: ${} ({}%) at {}",
                    sample.value_usd, sample.change_percent_24h, sample.observed_at_epoch_seconds
                );

                *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(sample.clone());
                (self.on_sample)(sample.clone());

                Some(sample)
            }
            Err(e) => {
                warn!("Price fetch failed, keeping last sample: {}", e);
                None
            }
        }
    }
}

/// Periodic price poller
pub struct PriceFeed {
    source: Arc<dyn PriceSource>,
    poll_interval: Duration,
}

impl PriceFeed {
    /// Create a new feed
    ///
    /// # Arguments
    /// * `source` - Where prices come from
    /// * `poll_interval` - Period between scheduled fetches (must be non-zero)
    pub fn new(source: Arc<dyn PriceSource>, poll_interval: Duration) -> Self {
        Self { source, poll_interval }
    }

    /// Start polling
    ///
    /// Fetches immediately, then once per `poll_interval` measured from this
    /// call. Must be called from within a Tokio runtime.
    ///
    /// # Example
    /// ```rust,ignore
    /// let handle = feed.start(|sample| println!("ETH: ${}", sample.value_usd));
    /// handle.refresh().await;
    /// handle.cancel();
    /// ```
    pub fn start<F>(&self, on_sample: F) -> FeedHandle
    where
        F: Fn(PriceSample) + Send + Sync + 'static,
    {
        let shared = Arc::new(FeedShared {
            source: self.source.clone(),
            latest: RwLock::new(None),
            on_sample: Arc::new(on_sample),
        });

        let period = self.poll_interval;
        let ticker_shared = shared.clone();

        let ticker_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let shared = ticker_shared.clone();
                tokio::spawn(async move {
                    shared.poll().await;
                });
            }
        });

        info!("Price feed started (every {}s)", period.as_secs_f64());

        FeedHandle {
            shared,
            ticker_task,
            cancelled: AtomicBool::new(false),
        }
    }
}

/// Handle to a running feed. Dropping it cancels the feed.
pub struct FeedHandle {
    shared: Arc<FeedShared>,
    ticker_task: JoinHandle<()>,
    cancelled: AtomicBool,
}

impl FeedHandle {
    /// Out-of-band fetch, not de-duplicated against scheduled ones.
    ///
    /// Returns the new sample, or `None` if the fetch failed.
    pub async fn refresh(&self) -> Option<PriceSample> {
        debug!("Manual price refresh");
        self.shared.poll().await
    }

    /// Latest successful sample, if any
    pub fn latest(&self) -> Option<PriceSample> {
        self.shared
            .latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stop scheduling fetches. Idempotent.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.ticker_task.abort();
            info!("Price feed cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
