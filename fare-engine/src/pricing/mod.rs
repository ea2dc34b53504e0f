//! Journey price resolution.
//!
//! Prices come from a three-tier lookup: an in-memory cache, the
//! persistent [`PriceStore`](crate::store::PriceStore), and finally the
//! operator's public pricing API. The remote tier is rate limited and
//! concurrent lookups for the same journey key are coalesced to a single
//! in-flight request.

mod client;
mod error;
mod resolver;

pub use client::{NsApiClient, NsApiConfig, PricingApi};
pub use error::PriceError;
pub use resolver::{PriceResolver, ResolverConfig};
