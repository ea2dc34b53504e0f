//! Domain types for the fare engine.
//!
//! This module contains the core domain model types that represent
//! validated transit data. All types enforce their invariants at
//! construction time, so code that receives these types can trust
//! their validity.

mod event;
mod journey;
mod money;
mod station;

pub use event::{EventKind, InvalidTimestamp, RawEvent};
pub use journey::{
    BASE_FARE_CENTS, EnrichedJourney, JourneyKey, JourneyKind, JourneyPrice,
    MINUTES_PER_FARE_UNIT,
};
pub use money::{Currency, Money, Rate};
pub use station::{InvalidStationCode, Station, StationCode};
