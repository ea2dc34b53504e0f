//! Persistent-store collaborator contracts.
//!
//! The engine does not prescribe a storage engine; it consumes these
//! traits. `NotFound` is an expected outcome that drives fallback and is
//! never logged as an error; every other variant is a real failure.

mod file;
mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{JourneyPrice, Station};

pub use file::JsonPriceStore;
pub use memory::{MemoryHolidayCalendar, MemoryPriceStore, MemoryStationStore};

/// Errors from a backing store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The requested entry does not exist. Expected; drives fallback.
    #[error("not found")]
    NotFound,

    /// I/O failure talking to the store.
    #[error("store I/O error: {0}")]
    Io(String),

    /// The stored data could not be (de)serialized.
    #[error("store serialization error: {0}")]
    Serde(String),
}

/// Persisted journey prices, keyed by `JourneyKey::price_hash`.
///
/// The fare for a given key is invariant within its year, so `put` follows
/// a first-writer-wins policy: once a hash is committed, later writes for
/// the same hash may be skipped.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn get(&self, hash: &str) -> Result<JourneyPrice, StoreError>;
    async fn put(&self, price: JourneyPrice) -> Result<(), StoreError>;
}

/// Canonical station reference data.
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Look up a station by its (case-folded) display name.
    async fn get_by_name(&self, name: &str) -> Result<Station, StoreError>;

    /// Look up a station by its station code.
    async fn get_by_code(&self, code: &str) -> Result<Station, StoreError>;
}

/// Public-holiday reference calendar.
#[async_trait]
pub trait HolidayCalendar: Send + Sync {
    /// Whether the given date is a national holiday.
    async fn has_holiday(&self, date: NaiveDate) -> Result<bool, StoreError>;
}
