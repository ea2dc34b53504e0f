//! Journey enrichment.
//!
//! Consumes the ordered raw-event stream for one travel history and pairs
//! check-in/check-out (and supplement) events into priced journeys. The
//! stream is frequently incomplete: a check-out without a matching
//! check-in still yields a journey, with its start time back-estimated
//! from the price-implied duration.
//!
//! Events must arrive in non-decreasing timestamp order within one travel
//! history; pairing relies on arrival order.

use std::sync::Arc;

use chrono::{Datelike, Duration};

use crate::domain::{
    EnrichedJourney, EventKind, JourneyKey, JourneyKind, RawEvent,
};
use crate::pricing::{PriceError, PriceResolver};
use crate::stations::{StationDirectory, StationError};

/// Which events the enricher treats as its own operator's rail journeys.
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Operator code of the participating operator.
    pub operator: String,
    /// Modality label the operator uses for rail.
    pub modality: String,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            operator: "NS".to_string(),
            modality: "Trein".to_string(),
        }
    }
}

/// Why a single raw event could not be enriched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnrichError {
    #[error("timestamp {0} ms is out of range")]
    InvalidTimestamp(i64),

    #[error("cannot resolve station '{label}': {source}")]
    Station {
        label: String,
        source: StationError,
    },

    #[error("cannot fetch price for journey: {0}")]
    Price(#[from] PriceError),
}

/// A rejected event together with its cause, retained for diagnosis and
/// retry.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub event: RawEvent,
    pub cause: EnrichError,
}

/// Counts reported in a batch summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub valid: usize,
    pub failed: usize,
}

/// The result of enriching one travel history: every journey that could
/// be reconstructed, plus a per-event error list. A bad event never
/// aborts the batch.
#[derive(Debug, Default)]
pub struct EnrichmentOutcome {
    pub journeys: Vec<EnrichedJourney>,
    pub errors: Vec<ErrorRecord>,
}

impl EnrichmentOutcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            valid: self.journeys.len(),
            failed: self.errors.len(),
        }
    }
}

/// Pairs raw swipe events into enriched journeys.
pub struct JourneyEnricher {
    directory: Arc<StationDirectory>,
    resolver: Arc<PriceResolver>,
    config: EnricherConfig,
}

impl JourneyEnricher {
    pub fn new(
        directory: Arc<StationDirectory>,
        resolver: Arc<PriceResolver>,
        config: EnricherConfig,
    ) -> Self {
        Self {
            directory,
            resolver,
            config,
        }
    }

    /// Enrich one travel history.
    ///
    /// The scan carries a single piece of state: the last seen event,
    /// which a later check-out may pair with. Supplements deliberately do
    /// not update it; a pending check-in must survive an interleaved
    /// supplement swipe.
    pub async fn enrich(&self, events: &[RawEvent]) -> EnrichmentOutcome {
        let mut outcome = EnrichmentOutcome::default();
        let mut previous: Option<RawEvent> = None;

        for event in events {
            match event.kind {
                EventKind::CheckIn => {
                    previous = Some(event.clone());
                }
                EventKind::Supplement => match self.enrich_supplement(event) {
                    Ok(journey) => outcome.journeys.push(journey),
                    Err(cause) => outcome.errors.push(ErrorRecord {
                        event: event.clone(),
                        cause,
                    }),
                },
                _ if !event.is_operated_by(&self.config.operator, &self.config.modality) => {
                    previous = Some(event.clone());
                }
                EventKind::CheckOut => {
                    match self.enrich_checkout(previous.as_ref(), event).await {
                        Ok(journey) => outcome.journeys.push(journey),
                        Err(cause) => outcome.errors.push(ErrorRecord {
                            event: event.clone(),
                            cause,
                        }),
                    }
                    // A check-out can anchor a later unmatched check-out.
                    previous = Some(event.clone());
                }
                // Top-ups and anything else: remember, emit nothing.
                _ => {
                    previous = Some(event.clone());
                }
            }
        }

        let summary = outcome.summary();
        tracing::debug!(valid = summary.valid, failed = summary.failed, "enriched batch");
        outcome
    }

    fn enrich_supplement(&self, event: &RawEvent) -> Result<EnrichedJourney, EnrichError> {
        let at = event
            .timestamp()
            .map_err(|e| EnrichError::InvalidTimestamp(e.millis))?;

        Ok(EnrichedJourney {
            source_event_id: event.id.clone(),
            kind: JourneyKind::Supplement,
            start_time: at,
            end_time: at,
            start_time_is_exact: true,
            duration_ms: 0,
        })
    }

    async fn enrich_checkout(
        &self,
        previous: Option<&RawEvent>,
        event: &RawEvent,
    ) -> Result<EnrichedJourney, EnrichError> {
        let end_time = event
            .timestamp()
            .map_err(|e| EnrichError::InvalidTimestamp(e.millis))?;

        let origin = self.resolve(&event.origin_label).await?;
        let destination = self.resolve(&event.location_label).await?;

        // The start time is exact when the previous event is a check-in
        // at the station this journey departed from.
        let matched_check_in = previous
            .filter(|p| {
                p.kind == EventKind::CheckIn
                    && labels_match(&p.location_label, &event.origin_label)
            })
            .and_then(|p| p.timestamp().ok());

        let (start_time, start_time_is_exact) = match matched_check_in {
            Some(start) => (start, true),
            None => {
                let key = JourneyKey::new(
                    origin.code.clone(),
                    destination.code.clone(),
                    end_time.year(),
                );
                let price = self.resolver.fetch_price(&key).await?;
                let estimated = Duration::milliseconds(price.estimated_duration_ms());
                (end_time - estimated, false)
            }
        };

        Ok(EnrichedJourney {
            source_event_id: event.id.clone(),
            kind: JourneyKind::Travel {
                origin: origin.code,
                destination: destination.code,
            },
            start_time,
            end_time,
            start_time_is_exact,
            duration_ms: (end_time - start_time).num_milliseconds(),
        })
    }

    async fn resolve(&self, label: &str) -> Result<crate::domain::Station, EnrichError> {
        self.directory
            .resolve(label)
            .await
            .map_err(|source| EnrichError::Station {
                label: label.to_string(),
                source,
            })
    }
}

fn labels_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
