//! Station directory error types.

/// Errors from resolving a free-text station label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StationError {
    /// The label matches neither a station name nor a station code.
    #[error("invalid station name: '{label}'")]
    InvalidStationName { label: String },

    /// The backing station store failed with something other than a miss.
    #[error("station store error: {0}")]
    Store(String),
}
