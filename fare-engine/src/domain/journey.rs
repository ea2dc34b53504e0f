//! Journey keys, resolved prices, and enriched journey records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::station::StationCode;

/// Base fare in cents charged for any rail journey (2020 tariff). Used
/// only for duration back-estimation, never billed.
pub const BASE_FARE_CENTS: i64 = 98;

/// Estimated travel minutes per fare unit above the base fare, so
/// estimated duration = (second class fare - base fare) * this value.
pub const MINUTES_PER_FARE_UNIT: i64 = 5;

/// The unit of price lookup: two journeys with the same key always have
/// the same fare within that calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JourneyKey {
    pub origin: StationCode,
    pub destination: StationCode,
    pub year: i32,
}

impl JourneyKey {
    pub fn new(origin: StationCode, destination: StationCode, year: i32) -> Self {
        Self {
            origin,
            destination,
            year,
        }
    }

    /// Stable content hash of the key, used as the price store's primary
    /// lookup key. Hashes the canonical uppercase codes so the value
    /// survives process restarts and re-ingestion.
    pub fn price_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.origin.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(self.destination.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(self.year.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Per-class fares for one journey key, as quoted by the pricing API.
///
/// Created once per key and immutable afterward: fares do not change
/// retroactively within a tariff year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyPrice {
    pub year: i32,
    pub origin: StationCode,
    pub destination: StationCode,
    /// `JourneyKey::price_hash` of the key this price answers.
    pub hash: String,
    pub first_class_single_fare: i64,
    pub second_class_single_fare: i64,
    pub first_class_route_fare: i64,
    pub second_class_route_fare: i64,
    pub first_class_route_business_fare: i64,
    pub second_class_route_business_fare: i64,
}

impl JourneyPrice {
    /// Estimate the journey duration from its price.
    ///
    /// The second-class single fare grows roughly linearly with distance,
    /// so the fare above the base fare is a usable proxy for travel time.
    /// Only ever used to fill an estimated start time, never to price.
    /// Fares below the base fare clamp to zero.
    pub fn estimated_duration_ms(&self) -> i64 {
        let units = (self.second_class_single_fare - BASE_FARE_CENTS).max(0);
        units * MINUTES_PER_FARE_UNIT * 60 * 1000
    }
}

/// What an enriched journey represents.
///
/// A travel leg always has both endpoints resolved; a supplement never
/// carries station codes. Encoding that in the variant makes the
/// invariant unrepresentable to violate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyKind {
    Travel {
        origin: StationCode,
        destination: StationCode,
    },
    Supplement,
}

/// A journey reconstructed from raw swipe records. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedJourney {
    /// Back-reference to the raw event this journey was derived from.
    pub source_event_id: String,
    pub kind: JourneyKind,
    pub start_time: NaiveDateTime,
    /// Always the check-out event time for travel legs.
    pub end_time: NaiveDateTime,
    /// True when the start time came from a matched check-in; false when
    /// it was back-estimated from the price-implied duration.
    pub start_time_is_exact: bool,
    pub duration_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> StationCode {
        StationCode::parse(s).unwrap()
    }

    fn key(origin: &str, destination: &str, year: i32) -> JourneyKey {
        JourneyKey::new(code(origin), code(destination), year)
    }

    #[test]
    fn price_hash_is_deterministic() {
        let a = key("ASD", "GVC", 2020).price_hash();
        let b = key("ASD", "GVC", 2020).price_hash();
        assert_eq!(a, b);
        // 32-byte SHA-256 digest, hex encoded
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn price_hash_distinguishes_keys() {
        let base = key("ASD", "GVC", 2020).price_hash();
        assert_ne!(base, key("GVC", "ASD", 2020).price_hash());
        assert_ne!(base, key("ASD", "GVC", 2021).price_hash());
        assert_ne!(base, key("ASD", "RTD", 2020).price_hash());
    }

    #[test]
    fn price_hash_ignores_input_case() {
        // Codes are canonicalized at parse, so the hash is case-stable.
        assert_eq!(
            key("asd", "gvc", 2020).price_hash(),
            key("ASD", "GVC", 2020).price_hash()
        );
    }

    fn price(second_class_single_fare: i64) -> JourneyPrice {
        JourneyPrice {
            year: 2020,
            origin: code("ASD"),
            destination: code("GVC"),
            hash: key("ASD", "GVC", 2020).price_hash(),
            first_class_single_fare: 0,
            second_class_single_fare,
            first_class_route_fare: 0,
            second_class_route_fare: 0,
            first_class_route_business_fare: 0,
            second_class_route_business_fare: 0,
        }
    }

    #[test]
    fn estimated_duration_from_fare() {
        // (1000 - 98) * 5 minutes = 4510 minutes
        assert_eq!(price(1000).estimated_duration_ms(), 902 * 5 * 60 * 1000);
    }

    #[test]
    fn estimated_duration_clamps_below_base_fare() {
        assert_eq!(price(50).estimated_duration_ms(), 0);
        assert_eq!(price(BASE_FARE_CENTS).estimated_duration_ms(), 0);
    }

    #[test]
    fn journey_price_survives_json_roundtrip() {
        let original = price(745);
        let json = serde_json::to_string(&original).unwrap();
        let restored: JourneyPrice = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
    }

}
