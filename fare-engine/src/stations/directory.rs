//! Free-text station label resolution.
//!
//! Operators emit station names as free text, and occasionally emit the
//! station code where a name belongs. The directory case-folds the label,
//! tries the name index, then retries the label as a code, recording a
//! soft diagnostic when the fallback path answered.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::sink::ErrorSink;
use crate::store::{StationStore, StoreError};
use crate::domain::Station;

use super::error::StationError;

/// Configuration for the station directory.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Maximum number of cached resolutions.
    pub cache_capacity: u64,

    /// Bound on each station-store operation. A stalled store call fails
    /// the lookup instead of hanging the batch.
    pub store_timeout: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1024,
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Resolves free-text station labels to canonical stations.
pub struct StationDirectory {
    store: Arc<dyn StationStore>,
    cache: MokaCache<String, Station>,
    sink: Arc<dyn ErrorSink>,
    store_timeout: Duration,
}

impl StationDirectory {
    pub fn new(
        store: Arc<dyn StationStore>,
        sink: Arc<dyn ErrorSink>,
        config: &DirectoryConfig,
    ) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.cache_capacity)
            .build();

        Self {
            store,
            cache,
            sink,
            store_timeout: config.store_timeout,
        }
    }

    /// Resolve a station label to its canonical station.
    ///
    /// Successful resolutions populate the cache keyed by the resolved
    /// canonical name, so repeat lookups of the canonical spelling stay
    /// off the store.
    pub async fn resolve(&self, label: &str) -> Result<Station, StationError> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return Err(StationError::InvalidStationName { label });
        }

        if let Some(hit) = self.cache.get(&label).await {
            return Ok(hit);
        }

        let station = match self.bounded(self.store.get_by_name(&label)).await {
            Ok(station) => station,
            Err(StoreError::NotFound) => self.resolve_as_code(&label).await?,
            Err(e) => return Err(StationError::Store(e.to_string())),
        };

        self.cache.insert(station.name.clone(), station.clone()).await;
        Ok(station)
    }

    /// Run one store operation under the configured timeout.
    async fn bounded<F>(&self, op: F) -> Result<Station, StoreError>
    where
        F: Future<Output = Result<Station, StoreError>>,
    {
        match tokio::time::timeout(self.store_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Io("timed out".to_string())),
        }
    }

    /// Fallback for labels that are actually station codes.
    async fn resolve_as_code(&self, label: &str) -> Result<Station, StationError> {
        match self.bounded(self.store.get_by_code(label)).await {
            Ok(station) => {
                self.sink.report_soft(
                    "station lookup",
                    &format!("label '{label}' resolved via station-code fallback"),
                );
                Ok(station)
            }
            Err(StoreError::NotFound) => Err(StationError::InvalidStationName {
                label: label.to_string(),
            }),
            Err(e) => Err(StationError::Store(e.to_string())),
        }
    }
}
