//! Three-tier price resolution.
//!
//! Order of tiers: in-memory cache, persistent store, remote API. The
//! cache layer also provides single-flight semantics: concurrent callers
//! asking for the same uncached key share one load, so the rate-limited
//! remote tier sees at most one request per key.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{JourneyKey, JourneyPrice};
use crate::limiter::RateLimiter;
use crate::sink::ErrorSink;
use crate::store::{PriceStore, StoreError};

use super::client::PricingApi;
use super::error::PriceError;

/// Configuration for the price resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum number of cached prices.
    pub cache_capacity: u64,

    /// Bound on each persistent-store operation. A store timeout is a
    /// soft error: resolution falls through to the remote API.
    pub store_timeout: Duration,

    /// Ceiling on remote API requests per second.
    pub max_requests_per_second: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 10_000,
            store_timeout: Duration::from_secs(5),
            max_requests_per_second: 3,
        }
    }
}

/// Resolves journey prices through cache → store → remote API.
pub struct PriceResolver {
    cache: MokaCache<String, JourneyPrice>,
    store: Arc<dyn PriceStore>,
    api: Arc<dyn PricingApi>,
    limiter: RateLimiter,
    sink: Arc<dyn ErrorSink>,
    store_timeout: Duration,
}

impl PriceResolver {
    /// Create a resolver over the given store and remote API.
    pub fn new(
        store: Arc<dyn PriceStore>,
        api: Arc<dyn PricingApi>,
        sink: Arc<dyn ErrorSink>,
        config: &ResolverConfig,
    ) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.cache_capacity)
            .build();

        Self {
            cache,
            store,
            api,
            limiter: RateLimiter::per_second(config.max_requests_per_second),
            sink,
            store_timeout: config.store_timeout,
        }
    }

    /// Resolve the price for a journey key.
    ///
    /// Identical keys always yield identical prices regardless of which
    /// tier answered; cache population is transparent to the caller.
    /// Failures are not cached, so a later call retries the remote tier.
    pub async fn fetch_price(&self, key: &JourneyKey) -> Result<JourneyPrice, PriceError> {
        let hash = key.price_hash();
        self.cache
            .try_get_with(hash.clone(), self.load(key, &hash))
            .await
            .map_err(|shared| (*shared).clone())
    }

    /// Number of cached prices (for monitoring).
    pub fn cached_price_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Load a price from the store, falling back to the remote API.
    async fn load(&self, key: &JourneyKey, hash: &str) -> Result<JourneyPrice, PriceError> {
        match tokio::time::timeout(self.store_timeout, self.store.get(hash)).await {
            Ok(Ok(price)) => return Ok(price),
            // Expected miss; fall through to the API without logging.
            Ok(Err(StoreError::NotFound)) => {}
            Ok(Err(e)) => self.sink.report_soft("price store lookup", &e),
            Err(_) => self
                .sink
                .report_soft("price store lookup", &"timed out"),
        }

        self.limiter.take().await;
        let price = self.api.fetch_journey_price(key).await?;

        let written = match tokio::time::timeout(
            self.store_timeout,
            self.store.put(price.clone()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(StoreError::Io("put timed out".to_string())),
        };
        if let Err(e) = written {
            // The price is still served from cache; persistence failures
            // must not fail the journey.
            self.sink.report_soft("price store write", &e);
        }

        Ok(price)
    }
}
