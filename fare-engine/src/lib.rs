//! Transit fare enrichment and pricing engine.
//!
//! Ingests raw transit-card swipe records for a single rail operator,
//! reconstructs journeys from (possibly incomplete) check-in/check-out
//! pairs, resolves fares through a tiered cache → store → remote-API
//! lookup, and totals a travel history under several subscription plans.

pub mod calculate;
pub mod domain;
pub mod enrich;
pub mod limiter;
pub mod offpeak;
pub mod pricing;
pub mod sink;
pub mod stations;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;
