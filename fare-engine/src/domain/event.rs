//! Raw swipe records as produced by the ingestion layer.

use chrono::{DateTime, NaiveDateTime};

/// The kind of a swipe transaction, mapped from the operator's free-text
/// transaction name by the ingestion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    CheckIn,
    CheckOut,
    /// A fixed surcharge (e.g. priority-service supplement), independent
    /// of a journey leg.
    Supplement,
    /// E-purse credit added to the card.
    TopUp,
    Other,
}

/// Error returned when a raw event carries a timestamp outside the
/// representable range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("timestamp {millis} ms is out of range")]
pub struct InvalidTimestamp {
    pub millis: i64,
}

/// One raw swipe record. Immutable once read; produced by an external
/// ingestion collaborator (CSV import or operator API).
///
/// `origin_label` is the free-text location where the card holder checked
/// in; `location_label` is the free-text location where this transaction
/// itself happened. For a check-out event the pair reads as
/// (origin, destination); for a check-in event `location_label` is the
/// check-in station.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    /// Identifier assigned by the ingestion layer, kept for diagnosis/retry.
    pub id: String,
    /// Operator code (e.g. "NS", "RET").
    pub operator: String,
    /// Modality as reported by the operator (e.g. "Trein").
    pub modality: String,
    pub origin_label: String,
    pub location_label: String,
    pub kind: EventKind,
    /// Transaction time in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Fare already billed by the operator, carried verbatim from the
    /// raw feed. Never used in fare arithmetic.
    pub fare: Option<f64>,
}

impl RawEvent {
    /// The transaction time as a naive UTC datetime.
    pub fn timestamp(&self) -> Result<NaiveDateTime, InvalidTimestamp> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
            .map(|dt| dt.naive_utc())
            .ok_or(InvalidTimestamp {
                millis: self.timestamp_ms,
            })
    }

    /// Whether this event was recorded by the given operator and modality.
    pub fn is_operated_by(&self, operator: &str, modality: &str) -> bool {
        self.operator.eq_ignore_ascii_case(operator)
            && self.modality.eq_ignore_ascii_case(modality)
    }
}
