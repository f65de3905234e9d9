//! TLD registration pricing.
//!
//! Pricing comes from a [`PricingSource`] that returns the whole catalog in
//! one call. [`TldPriceCache`] sits in front of it and answers per-TLD
//! questions. [`CloudflarePricing`] is the built-in source.

use crate::error::PricingError;
use crate::types::TldPrice;
use async_trait::async_trait;

/// Per-TLD price memoization
pub mod cache;

/// Cloudflare registrar pricing API client
pub mod cloudflare;

pub use cache::TldPriceCache;
pub use cloudflare::CloudflarePricing;

/// A full pricing catalog, fetched in one request.
#[async_trait]
pub trait PricingSource: Send + Sync {
    async fn fetch_tld_pricing(&self) -> Result<Vec<TldPrice>, PricingError>;
}
