//! Pricing error types.

/// Errors from price resolution.
///
/// `Clone` because a single in-flight remote lookup may be shared by many
/// coalesced callers, each of which receives the same failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// HTTP transport failure (network error, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API response could not be parsed.
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The API returned an error status.
    #[error("pricing API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The API rejected the journey parameters (field validation).
    /// Distinct from transport errors: retrying will not help.
    #[error("pricing API rejected the journey: {0}")]
    Validation(String),

    /// Rate limited by the pricing API.
    #[error("rate limited by pricing API")]
    RateLimited,

    /// Invalid or missing API key.
    #[error("unauthorized (invalid API key)")]
    Unauthorized,
}

impl From<reqwest::Error> for PriceError {
    fn from(err: reqwest::Error) -> Self {
        PriceError::Http(err.to_string())
    }
}
