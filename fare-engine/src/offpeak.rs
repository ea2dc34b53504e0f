//! Peak / off-peak classification.
//!
//! A timestamp is off-peak when it falls on a weekend, inside one of the
//! fixed daily off-peak windows, or on a national holiday. Holiday
//! determinations are cached per calendar date; the intra-day window
//! check is time-of-day dependent and is evaluated on every call, never
//! short-circuited by the date cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use moka::future::Cache as MokaCache;

use crate::sink::ErrorSink;
use crate::store::{HolidayCalendar, StoreError};

/// One cache entry per date touched by a travel history; a year of daily
/// travel is a few hundred entries.
const DATE_CACHE_CAPACITY: u64 = 4096;

/// Bound on each holiday-calendar lookup. A stalled lookup degrades like
/// any other calendar failure instead of hanging the batch.
const CALENDAR_TIMEOUT: Duration = Duration::from_secs(5);

/// Classifies timestamps as peak or off-peak.
pub struct PeakClassifier {
    calendar: Arc<dyn HolidayCalendar>,
    holiday_cache: MokaCache<NaiveDate, bool>,
    sink: Arc<dyn ErrorSink>,
}

impl PeakClassifier {
    pub fn new(calendar: Arc<dyn HolidayCalendar>, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            calendar,
            holiday_cache: MokaCache::builder()
                .max_capacity(DATE_CACHE_CAPACITY)
                .build(),
            sink,
        }
    }

    /// Whether the timestamp falls in a discounted window.
    ///
    /// Pure given (timestamp, holiday set): identical inputs always give
    /// identical answers. A holiday-calendar failure or timeout is soft;
    /// the date is treated as a regular workday and the degraded answer
    /// is not cached, so a later call may recover.
    pub async fn is_off_peak(&self, timestamp: NaiveDateTime) -> bool {
        let date = timestamp.date();

        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return true;
        }

        if in_off_peak_window(timestamp.time()) {
            return true;
        }

        self.is_holiday(date).await
    }

    async fn is_holiday(&self, date: NaiveDate) -> bool {
        if let Some(cached) = self.holiday_cache.get(&date).await {
            return cached;
        }

        let looked_up =
            match tokio::time::timeout(CALENDAR_TIMEOUT, self.calendar.has_holiday(date)).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Io("timed out".to_string())),
            };

        match looked_up {
            Ok(holiday) => {
                self.holiday_cache.insert(date, holiday).await;
                holiday
            }
            Err(e) => {
                self.sink.report_soft("holiday lookup", &e);
                false
            }
        }
    }
}

/// The fixed daily off-peak windows: 00:00:00–05:59:59, 06:00:00–06:30:00
/// (inclusive), 09:00:00–15:59:59 and 18:30:00–23:59:59.
fn in_off_peak_window(time: NaiveTime) -> bool {
    let (hour, minute, second) = (time.hour(), time.minute(), time.second());

    if hour < 6 {
        return true;
    }
    if hour == 6 && (minute < 30 || (minute == 30 && second == 0)) {
        return true;
    }
    if (9..16).contains(&hour) {
        return true;
    }
    if hour > 18 || (hour == 18 && minute >= 30) {
        return true;
    }

    false
}
