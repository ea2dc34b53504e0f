//! NS public price-information API client.
//!
//! Queries `GET {base}/prices?date&fromStation&toStation` with
//! subscription-key authentication. The API answers 200 for priced
//! journeys and 400 with a `fieldErrors` body when it rejects the
//! parameters; both carry JSON, so a 400 is parsed rather than treated
//! as a transport failure.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;

use crate::domain::{JourneyKey, JourneyPrice};

use super::error::PriceError;

/// Default base URL for the NS price-information API.
const DEFAULT_BASE_URL: &str = "https://gateway.apiportal.ns.nl/public-prijsinformatie";

const CLASS_FIRST: &str = "FIRST";
const CLASS_SECOND: &str = "SECOND";

const PRODUCT_SINGLE_FARE: &str = "SINGLE_FARE";
const PRODUCT_ROUTE_FREE: &str = "TRAJECTVRIJ_MAAND";
const PRODUCT_ROUTE_BUSINESS: &str = "TRAJECTVRIJ_NSBUSINESSKAART";

/// Configuration for the pricing API client.
#[derive(Debug, Clone)]
pub struct NsApiConfig {
    /// Subscription key for the public travel-information API.
    pub api_key: String,
    /// Base URL for the API (defaults to production).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl NsApiConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Remote pricing collaborator contract.
#[async_trait]
pub trait PricingApi: Send + Sync {
    /// Fetch the fares for one journey key.
    async fn fetch_journey_price(&self, key: &JourneyKey) -> Result<JourneyPrice, PriceError>;
}

/// HTTP client for the NS price-information API.
#[derive(Debug, Clone)]
pub struct NsApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl NsApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NsApiConfig) -> Result<Self, PriceError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| PriceError::Api {
            status: 0,
            message: "Invalid API key format".to_string(),
        })?;
        headers.insert(
            HeaderName::from_static("ocp-apim-subscription-key"),
            api_key,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl PricingApi for NsApiClient {
    async fn fetch_journey_price(&self, key: &JourneyKey) -> Result<JourneyPrice, PriceError> {
        let date = request_date(key.year, Utc::now().date_naive());
        let url = format!("{}/prices", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("date", date.format("%Y-%m-%d").to_string()),
                ("fromStation", key.origin.as_str().to_string()),
                ("toStation", key.destination.as_str().to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(PriceError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceError::RateLimited);
        }

        // 400 responses carry fieldErrors JSON and are parsed below.
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(PriceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: PriceResponse =
            serde_json::from_str(&body).map_err(|e| PriceError::Json {
                message: e.to_string(),
            })?;

        build_price(key, &parsed)
    }
}

/// The date sent to the API for a journey in the given tariff year.
///
/// The API only quotes recent tariffs, so a journey from a past year is
/// clamped to the last priceable day of the previous tariff year.
fn request_date(year: i32, today: NaiveDate) -> NaiveDate {
    if year < today.year() {
        NaiveDate::from_ymd_opt(today.year() - 1, 12, 30).unwrap_or(today)
    } else {
        today
    }
}

fn build_price(key: &JourneyKey, response: &PriceResponse) -> Result<JourneyPrice, PriceError> {
    if let Some(errors) = &response.field_errors {
        return Err(PriceError::Validation(errors.describe()));
    }

    let route = response.route_prices();
    Ok(JourneyPrice {
        year: key.year,
        origin: key.origin.clone(),
        destination: key.destination.clone(),
        hash: key.price_hash(),
        first_class_single_fare: route.price_for(PRODUCT_SINGLE_FARE, CLASS_FIRST),
        second_class_single_fare: route.price_for(PRODUCT_SINGLE_FARE, CLASS_SECOND),
        first_class_route_fare: route.price_for(PRODUCT_ROUTE_FREE, CLASS_FIRST),
        second_class_route_fare: route.price_for(PRODUCT_ROUTE_FREE, CLASS_SECOND),
        first_class_route_business_fare: route.price_for(PRODUCT_ROUTE_BUSINESS, CLASS_FIRST),
        second_class_route_business_fare: route.price_for(PRODUCT_ROUTE_BUSINESS, CLASS_SECOND),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceResponse {
    #[serde(default)]
    price_options: Vec<PriceOption>,
    field_errors: Option<FieldErrors>,
}

impl PriceResponse {
    /// The prices for the single-leg route, if any option describes one.
    fn route_prices(&self) -> RoutePrices {
        self.price_options
            .iter()
            .find(|option| option.trajecten.len() == 1)
            .map(|option| option.trajecten[0].clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceOption {
    #[serde(default)]
    trajecten: Vec<RoutePrices>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoutePrices {
    #[serde(default)]
    prices: Vec<PriceEntry>,
}

impl RoutePrices {
    /// The undiscounted fare for a product/class pair, or 0 if unquoted.
    fn price_for(&self, product: &str, class: &str) -> i64 {
        self.prices
            .iter()
            .find(|p| {
                p.product_type == product && p.class_type == class && p.discount_type == "NONE"
            })
            .map(|p| p.price)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceEntry {
    class_type: String,
    discount_type: String,
    product_type: String,
    price: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldErrors {
    #[serde(default)]
    field_errors: Vec<FieldError>,
}

impl FieldErrors {
    fn describe(&self) -> String {
        self.field_errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldError {
    #[serde(default)]
    field: String,
    #[serde(default)]
    message: String,
}
