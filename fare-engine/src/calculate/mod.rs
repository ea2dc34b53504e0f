//! Fare totals under the alternative subscription plans.
//!
//! Each plan is evaluated over the same enriched-journey list. Journeys
//! are bucketed by the peak classification of their start time, priced
//! per class from the resolved fares, and accumulated as exact integer
//! money. A journey whose price cannot be fetched is excluded from the
//! totals and reported in the result's error list; it never aborts the
//! batch.

mod plan;

pub use plan::{DiscountPlan, OFF_PEAK_SUPPLEMENT_CENTS, PEAK_SUPPLEMENT_CENTS};

use std::sync::Arc;

use chrono::Datelike;

use crate::domain::{EnrichedJourney, JourneyKey, JourneyKind, Money};
use crate::offpeak::PeakClassifier;
use crate::pricing::{PriceError, PriceResolver};

/// A journey that could not be priced, kept for diagnosis and retry.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationError {
    pub journey: EnrichedJourney,
    pub cause: PriceError,
}

/// Accumulated totals for one peak bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketTotals {
    pub journey_count: usize,
    pub first_class: Money,
    pub second_class: Money,
    pub supplement_count: usize,
    pub supplement_total: Money,
}

impl Default for BucketTotals {
    fn default() -> Self {
        Self {
            journey_count: 0,
            first_class: Money::eur(0),
            second_class: Money::eur(0),
            supplement_count: 0,
            supplement_total: Money::eur(0),
        }
    }
}

/// The cost of a travel history under one plan, split by peak bucket.
///
/// The split is the canonical schema; single-aggregate views are derived
/// through the accessor methods.
#[derive(Debug, Default)]
pub struct CalculatorResult {
    pub peak: BucketTotals,
    pub off_peak: BucketTotals,
    pub errors: Vec<CalculationError>,
}

impl CalculatorResult {
    pub fn journey_count(&self) -> usize {
        self.peak.journey_count + self.off_peak.journey_count
    }

    pub fn first_class_total(&self) -> Money {
        self.peak.first_class + self.off_peak.first_class
    }

    pub fn second_class_total(&self) -> Money {
        self.peak.second_class + self.off_peak.second_class
    }

    pub fn supplement_count(&self) -> usize {
        self.peak.supplement_count + self.off_peak.supplement_count
    }

    pub fn supplement_total(&self) -> Money {
        self.peak.supplement_total + self.off_peak.supplement_total
    }
}

/// Prices an enriched-journey list under one subscription plan.
pub struct FareCalculator {
    resolver: Arc<PriceResolver>,
    classifier: Arc<PeakClassifier>,
    plan: DiscountPlan,
}

impl FareCalculator {
    pub fn new(
        resolver: Arc<PriceResolver>,
        classifier: Arc<PeakClassifier>,
        plan: DiscountPlan,
    ) -> Self {
        Self {
            resolver,
            classifier,
            plan,
        }
    }

    pub fn plan(&self) -> DiscountPlan {
        self.plan
    }

    /// Total the journey list under this calculator's plan.
    pub async fn calculate(&self, journeys: &[EnrichedJourney]) -> CalculatorResult {
        let mut result = CalculatorResult::default();

        for journey in journeys {
            // Discounts apply based on when the journey began.
            let off_peak = self.classifier.is_off_peak(journey.start_time).await;
            let bucket = if off_peak {
                &mut result.off_peak
            } else {
                &mut result.peak
            };

            match &journey.kind {
                JourneyKind::Supplement => {
                    let fare = if off_peak {
                        OFF_PEAK_SUPPLEMENT_CENTS
                    } else {
                        PEAK_SUPPLEMENT_CENTS
                    };
                    bucket.supplement_count += 1;
                    bucket.supplement_total = bucket.supplement_total + Money::eur(fare);
                }
                JourneyKind::Travel {
                    origin,
                    destination,
                } => {
                    // Fares are quoted per tariff year of the check-out.
                    let key = JourneyKey::new(
                        origin.clone(),
                        destination.clone(),
                        journey.end_time.year(),
                    );
                    let price = match self.resolver.fetch_price(&key).await {
                        Ok(price) => price,
                        Err(cause) => {
                            result.errors.push(CalculationError {
                                journey: journey.clone(),
                                cause,
                            });
                            continue;
                        }
                    };

                    let rate = self.plan.travel_rate(off_peak);
                    bucket.journey_count += 1;
                    bucket.first_class = bucket.first_class
                        + Money::eur(price.first_class_single_fare).scale_round(rate);
                    bucket.second_class = bucket.second_class
                        + Money::eur(price.second_class_single_fare).scale_round(rate);
                }
            }
        }

        tracing::debug!(
            plan = %self.plan,
            journeys = result.journey_count(),
            failed = result.errors.len(),
            "calculated fare totals"
        );
        result
    }
}
