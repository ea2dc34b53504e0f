//! Shared test doubles and fixture builders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{EventKind, JourneyKey, JourneyPrice, RawEvent, StationCode};
use crate::pricing::{PriceError, PricingApi};

pub fn station_code(s: &str) -> StationCode {
    StationCode::parse(s).unwrap()
}

/// A journey price for (origin, destination, 2020) where the first-class
/// fare is the second-class fare plus 500 cents and the route fares are
/// simple multiples, so tests can tell the fields apart.
pub fn journey_price(origin: &str, destination: &str, second_class: i64) -> JourneyPrice {
    let key = JourneyKey::new(station_code(origin), station_code(destination), 2020);
    JourneyPrice {
        year: key.year,
        origin: key.origin.clone(),
        destination: key.destination.clone(),
        hash: key.price_hash(),
        first_class_single_fare: second_class + 500,
        second_class_single_fare: second_class,
        first_class_route_fare: second_class * 20,
        second_class_route_fare: second_class * 15,
        first_class_route_business_fare: second_class * 18,
        second_class_route_business_fare: second_class * 14,
    }
}

/// Pricing API double serving a fixed set of quotes.
///
/// Unquoted keys answer like the real API answering 404. Counts calls so
/// tests can assert rate-limit-relevant behavior (tier transparency,
/// single-flight coalescing).
pub struct FixedPricingApi {
    quotes: HashMap<String, JourneyPrice>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl FixedPricingApi {
    pub fn quoting(prices: impl IntoIterator<Item = JourneyPrice>) -> Self {
        Self {
            quotes: prices
                .into_iter()
                .map(|price| (price.hash.clone(), price))
                .collect(),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Delay every response, to widen coalescing windows in tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PricingApi for FixedPricingApi {
    async fn fetch_journey_price(&self, key: &JourneyKey) -> Result<JourneyPrice, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.quotes
            .get(&key.price_hash())
            .cloned()
            .ok_or(PriceError::Api {
                status: 404,
                message: format!("no quote for {} -> {}", key.origin, key.destination),
            })
    }
}

/// Builder for raw swipe events with sensible rail defaults.
pub struct EventBuilder {
    event: RawEvent,
}

impl EventBuilder {
    pub fn new(id: &str, kind: EventKind, timestamp_ms: i64) -> Self {
        Self {
            event: RawEvent {
                id: id.to_string(),
                operator: "NS".to_string(),
                modality: "Trein".to_string(),
                origin_label: String::new(),
                location_label: String::new(),
                kind,
                timestamp_ms,
                fare: None,
            },
        }
    }

    pub fn operator(mut self, operator: &str) -> Self {
        self.event.operator = operator.to_string();
        self
    }

    pub fn origin_label(mut self, label: &str) -> Self {
        self.event.origin_label = label.to_string();
        self
    }

    pub fn location_label(mut self, label: &str) -> Self {
        self.event.location_label = label.to_string();
        self
    }

    pub fn build(self) -> RawEvent {
        self.event
    }
}
