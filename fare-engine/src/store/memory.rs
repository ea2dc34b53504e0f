//! In-memory store implementations.
//!
//! Useful for tests and for runs where the price history fits in memory.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::domain::{JourneyPrice, Station};

use super::{HolidayCalendar, PriceStore, StationStore, StoreError};

/// Map-backed price store.
#[derive(Debug, Default)]
pub struct MemoryPriceStore {
    prices: RwLock<HashMap<String, JourneyPrice>>,
}

impl MemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored prices.
    pub async fn len(&self) -> usize {
        self.prices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.prices.read().await.is_empty()
    }
}

#[async_trait]
impl PriceStore for MemoryPriceStore {
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
        // First writer wins: a committed fare is invariant.
        prices.entry(price.hash.clone()).or_insert(price);
        Ok(())
    }
}

/// Map-backed station store. Read-only after construction.
///
/// Several names (current name plus synonyms) may map to the same code;
/// the code index keeps the first station seen for each code.
#[derive(Debug, Default)]
pub struct MemoryStationStore {
    by_name: HashMap<String, Station>,
    by_code: HashMap<String, Station>,
}

impl MemoryStationStore {
    pub fn new(stations: impl IntoIterator<Item = Station>) -> Self {
        let mut by_name = HashMap::new();
        let mut by_code = HashMap::new();
        for station in stations {
            by_code
                .entry(station.code.as_str().to_lowercase())
                .or_insert_with(|| station.clone());
            by_name.insert(station.name.clone(), station);
        }
        Self { by_name, by_code }
    }
}

#[async_trait]
impl StationStore for MemoryStationStore {
    async fn get_by_name(&self, name: &str) -> Result<Station, StoreError> {
        self.by_name
            .get(&name.to_lowercase())
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_by_code(&self, code: &str) -> Result<Station, StoreError> {
        self.by_code
            .get(&code.to_lowercase())
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

/// Set-backed holiday calendar.
#[derive(Debug, Default)]
pub struct MemoryHolidayCalendar {
    dates: HashSet<NaiveDate>,
}

impl MemoryHolidayCalendar {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }
}

#[async_trait]
impl HolidayCalendar for MemoryHolidayCalendar {
    async fn has_holiday(&self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.dates.contains(&date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JourneyKey, StationCode};

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn price(origin: &str, destination: &str, second_class: i64) -> JourneyPrice {
        let key = JourneyKey::new(code(origin), code(destination), 2020);
        JourneyPrice {
            year: key.year,
            origin: key.origin.clone(),
            destination: key.destination.clone(),
            hash: key.price_hash(),
            first_class_single_fare: second_class + 500,
            second_class_single_fare: second_class,
            first_class_route_fare: 0,
            second_class_route_fare: 0,
            first_class_route_business_fare: 0,
            second_class_route_business_fare: 0,
        }
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryPriceStore::new();
        let price = price("ASD", "GVC", 1000);

        store.put(price.clone()).await.unwrap();
        let loaded = store.get(&price.hash).await.unwrap();
        assert_eq!(loaded, price);
    }

    #[tokio::test]
    async fn missing_hash_is_not_found() {
        let store = MemoryPriceStore::new();
        assert!(matches!(
            store.get("no-such-hash").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn first_writer_wins() {
        let store = MemoryPriceStore::new();
        let original = price("ASD", "GVC", 1000);
        let mut conflicting = price("ASD", "GVC", 9999);
        conflicting.hash = original.hash.clone();

        store.put(original.clone()).await.unwrap();
        store.put(conflicting).await.unwrap();

        let loaded = store.get(&original.hash).await.unwrap();
        assert_eq!(loaded.second_class_single_fare, 1000);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn station_lookup_by_name_and_code() {
        let store = MemoryStationStore::new([
            Station::new(code("ASD"), "Amsterdam Centraal"),
            Station::new(code("GVC"), "Den Haag Centraal"),
        ]);

        let by_name = store.get_by_name("amsterdam centraal").await.unwrap();
        assert_eq!(by_name.code.as_str(), "ASD");

        let by_code = store.get_by_code("gvc").await.unwrap();
        assert_eq!(by_code.name, "den haag centraal");

        assert!(matches!(
            store.get_by_name("nowhere").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn synonyms_share_a_code() {
        let asd = code("ASD");
        let store = MemoryStationStore::new([
            Station::new(asd.clone(), "Amsterdam Centraal"),
            Station::new(asd, "Amsterdam CS"),
        ]);

        let synonym = store.get_by_name("amsterdam cs").await.unwrap();
        assert_eq!(synonym.code.as_str(), "ASD");
        // The code index keeps the first entry.
        let by_code = store.get_by_code("asd").await.unwrap();
        assert_eq!(by_code.name, "amsterdam centraal");
    }

    #[tokio::test]
    async fn holiday_calendar_contains() {
        let kings_day = NaiveDate::from_ymd_opt(2020, 4, 27).unwrap();
        let calendar = MemoryHolidayCalendar::new([kings_day]);

        assert!(calendar.has_holiday(kings_day).await.unwrap());
        let workday = NaiveDate::from_ymd_opt(2020, 4, 28).unwrap();
        assert!(!calendar.has_holiday(workday).await.unwrap());
    }
}
