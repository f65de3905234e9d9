//! Cloudflare domain pricing API client.
//!
//! The endpoint is public and returns every TLD in one response:
//!
//! ```json
//! {"success": true, "errors": [], "result": [{"tld": "com", "price": 10.44, "renewal_price": 10.44}]}
//! ```
//!
//! Prices are in dollars and converted to cents here.

use crate::error::PricingError;
use crate::pricing::PricingSource;
use crate::types::{TldPrice, DEFAULT_CURRENCY};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Public pricing endpoint.
pub const CLOUDFLARE_PRICING_URL: &str = "https://api.cloudflare.com/client/v4/domains/pricing";

#[derive(Debug, Deserialize)]
struct PricingResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: serde_json::Value,
    #[serde(default)]
    result: Vec<PricingEntry>,
}

#[derive(Debug, Deserialize)]
struct PricingEntry {
    tld: String,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    renewal_price: Option<f64>,
    #[serde(default)]
    currency: Option<String>,
}

/// Pricing source backed by Cloudflare's registrar price list.
#[derive(Clone)]
pub struct CloudflarePricing {
    http_client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl CloudflarePricing {
    /// Client for the public endpoint with a 10 second timeout.
    pub fn new() -> Result<Self, PricingError> {
        Self::with_config(CLOUDFLARE_PRICING_URL, Duration::from_secs(10))
    }

    pub fn with_config<U: Into<String>>(api_url: U, timeout: Duration) -> Result<Self, PricingError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PricingError::Http(format!("Failed to create pricing HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: api_url.into(),
            timeout,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn fetch(&self) -> Result<Vec<TldPrice>, PricingError> {
        tracing::debug!(url = %self.api_url, "fetching TLD pricing catalog");

        let response = self
            .http_client
            .get(&self.api_url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PricingError::Timeout(self.timeout)
                } else {
                    PricingError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PricingError::Status(status.as_u16()));
        }

        let body: PricingResponse = response
            .json()
            .await
            .map_err(|e| PricingError::Malformed(e.to_string()))?;

        parse_catalog(body)
    }
}

#[async_trait]
impl PricingSource for CloudflarePricing {
    async fn fetch_tld_pricing(&self) -> Result<Vec<TldPrice>, PricingError> {
        self.fetch().await
    }
}

fn parse_catalog(body: PricingResponse) -> Result<Vec<TldPrice>, PricingError> {
    if !body.success {
        let errors = if body.errors.is_null() {
            "Unknown error".to_string()
        } else {
            body.errors.to_string()
        };
        return Err(PricingError::Api(errors));
    }

    let mut prices = Vec::with_capacity(body.result.len());
    for entry in body.result {
        let Some(price) = entry.price else {
            tracing::warn!(tld = %entry.tld, "skipping TLD without a price");
            continue;
        };
        let Some(price_cents) = dollars_to_cents(price) else {
            tracing::warn!(tld = %entry.tld, price, "skipping TLD with invalid price");
            continue;
        };

        prices.push(TldPrice {
            tld: entry.tld.trim_start_matches('.').to_lowercase(),
            price_cents,
            currency: entry
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            annual_renewal_cents: entry.renewal_price.and_then(dollars_to_cents),
        });
    }

    Ok(prices)
}

/// Convert a dollar amount to whole cents, rounding to the nearest cent.
fn dollars_to_cents(dollars: f64) -> Option<u64> {
    if !dollars.is_finite() || dollars < 0.0 {
        return None;
    }
    Some((dollars * 100.0).round() as u64)
}
