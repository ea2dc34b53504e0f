//! JSON-file-backed price store.
//!
//! Keeps the full price map in memory and rewrites the file on every new
//! entry. Price histories are small (one entry per distinct journey key
//! per year), so a whole-file rewrite is cheap and keeps the format
//! trivially inspectable.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::JourneyPrice;

use super::{PriceStore, StoreError};

/// Price store persisted as a single JSON file.
#[derive(Debug)]
pub struct JsonPriceStore {
    path: PathBuf,
    prices: RwLock<HashMap<String, JourneyPrice>>,
}

impl JsonPriceStore {
    /// Open a store at `path`, loading any existing contents.
    ///
    /// A missing file is an empty store; parent directories are created
    /// on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let prices = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StoreError::Serde(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        Ok(Self {
            path,
            prices: RwLock::new(prices),
        })
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored prices.
    pub async fn len(&self) -> usize {
        self.prices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.prices.read().await.is_empty()
    }

    fn persist(&self, prices: &HashMap<String, JourneyPrice>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(prices).map_err(|e| StoreError::Serde(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::Io(e.to_string()))
    }
}

#[async_trait]
impl PriceStore for JsonPriceStore {
    async fn get(&self, hash: &str) -> Result<JourneyPrice, StoreError> {
        self.prices
            .read()
            .await
            .get(hash)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn put(&self, price: JourneyPrice) -> Result<(), StoreError> {
        let mut prices = self.prices.write().await;
        // First writer wins: committed fares are never overwritten.
        if prices.contains_key(&price.hash) {
            return Ok(());
        }
        prices.insert(price.hash.clone(), price);
        self.persist(&prices)
    }
}
