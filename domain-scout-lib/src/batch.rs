//! Batch orchestration.
//!
//! [`BatchOrchestrator::check_batch`] runs the paced availability pass, then
//! prices the available domains with one lookup per distinct TLD, and merges
//! both into a [`Report`] in input order.

use crate::categorize::{PriceTiers, PricingCategorizer};
use crate::checker::{AvailabilityChecker, ProgressObserver};
use crate::config::{ScoutConfig, DEFAULT_RDAP_DELAY_SECONDS};
use crate::error::DomainScoutError;
use crate::pricing::{CloudflarePricing, TldPriceCache};
use crate::protocols::{extract_tld, RdapLookup};
use crate::types::{DomainStatus, Report, ReportEntry, TldPrice, TldPricingFailure};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Entry point for checking a list of domains with optional pricing.
///
/// The orchestrator owns its price cache, so prices fetched by one batch
/// are reused by later batches on the same orchestrator.
///
/// # Example
///
/// ```rust,no_run
/// use domain_scout_lib::{BatchOrchestrator, ScoutConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let orchestrator = BatchOrchestrator::from_config(&ScoutConfig::default())?;
///     let domains = vec!["example.com".to_string(), "grove.dev".to_string()];
///     let report = orchestrator.check_batch(&domains, true).await;
///
///     for entry in &report {
///         println!("{} {}", entry.result.domain, entry.result.status);
///     }
///     Ok(())
/// }
/// ```
pub struct BatchOrchestrator {
    checker: AvailabilityChecker,
    prices: TldPriceCache,
    categorizer: PricingCategorizer,
    delay: Duration,
    progress: Option<Arc<dyn ProgressObserver>>,
}

impl BatchOrchestrator {
    /// Assemble an orchestrator from its parts, with the default lookup
    /// delay and thresholds.
    pub fn new(checker: AvailabilityChecker, prices: TldPriceCache) -> Self {
        Self {
            checker,
            prices,
            categorizer: PricingCategorizer::default(),
            delay: Duration::from_secs_f64(DEFAULT_RDAP_DELAY_SECONDS),
            progress: None,
        }
    }

    /// Build the RDAP lookup and Cloudflare pricing clients from a
    /// validated configuration.
    pub fn from_config(config: &ScoutConfig) -> Result<Self, DomainScoutError> {
        config.validate()?;

        let lookup = RdapLookup::with_config(config.lookup_timeout, config.enable_bootstrap)?;
        let checker =
            AvailabilityChecker::new(Arc::new(lookup)).with_lookup_timeout(config.lookup_timeout);
        let pricing = CloudflarePricing::with_config(&config.pricing_api_url, config.pricing_timeout)?;

        Ok(Self::new(checker, TldPriceCache::new(Arc::new(pricing)))
            .with_delay(config.rdap_delay)
            .with_categorizer(PricingCategorizer::new(config.thresholds)))
    }

    /// Pause between successive availability lookups.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_categorizer(mut self, categorizer: PricingCategorizer) -> Self {
        self.categorizer = categorizer;
        self
    }

    pub fn with_progress(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.progress = Some(observer);
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn categorizer(&self) -> &PricingCategorizer {
        &self.categorizer
    }

    pub fn price_cache(&self) -> &TldPriceCache {
        &self.prices
    }

    /// Check every domain and, if asked, price the available ones.
    ///
    /// Never fails: lookup errors show up as UNKNOWN results and pricing
    /// errors as missing prices plus an entry in
    /// [`Report::pricing_failures`].
    pub async fn check_batch(&self, domains: &[String], include_pricing: bool) -> Report {
        if domains.is_empty() {
            return Report::default();
        }

        tracing::info!(domains = domains.len(), delay = ?self.delay, "checking availability");
        let results = self
            .checker
            .check_domains_with_progress(domains, self.delay, self.progress.as_deref())
            .await;

        if !include_pricing {
            let entries = results
                .into_iter()
                .map(|result| ReportEntry {
                    result,
                    price: None,
                })
                .collect();
            return Report::new(entries, Vec::new());
        }

        let available: Vec<&str> = results
            .iter()
            .filter(|r| r.status == DomainStatus::Available)
            .map(|r| r.domain.as_str())
            .collect();

        let (tld_prices, failures) = self.price_tlds(&available).await;

        let entries = results
            .into_iter()
            .map(|result| {
                let price = if result.status == DomainStatus::Available {
                    tld_prices
                        .get(&extract_tld(&result.domain))
                        .map(|tld_price| tld_price.for_domain(result.domain.as_str()))
                } else {
                    None
                };
                ReportEntry { result, price }
            })
            .collect();

        Report::new(entries, failures)
    }

    /// Categorize the prices attached to a report.
    pub fn price_tiers(&self, report: &Report) -> PriceTiers {
        self.categorizer.categorize(report.prices())
    }

    /// Look up each distinct TLD once, concurrently.
    async fn price_tlds(
        &self,
        domains: &[&str],
    ) -> (HashMap<String, TldPrice>, Vec<TldPricingFailure>) {
        let mut tlds: Vec<String> = Vec::new();
        for domain in domains {
            let tld = extract_tld(domain);
            if !tlds.contains(&tld) {
                tlds.push(tld);
            }
        }

        if tlds.is_empty() {
            return (HashMap::new(), Vec::new());
        }

        tracing::info!(tlds = tlds.len(), "fetching pricing");
        let lookups = tlds.iter().map(|tld| async move {
            (tld.clone(), self.prices.get_tld_pricing(tld).await)
        });

        let mut prices = HashMap::new();
        let mut failures = Vec::new();
        for (tld, outcome) in join_all(lookups).await {
            match outcome {
                Ok(Some(price)) => {
                    prices.insert(tld, price);
                }
                Ok(None) => {
                    tracing::debug!(tld = %tld, "no pricing available");
                }
                Err(e) => {
                    tracing::warn!(tld = %tld, error = %e, "could not fetch pricing");
                    failures.push(TldPricingFailure {
                        tld,
                        message: e.to_string(),
                    });
                }
            }
        }

        (prices, failures)
    }
}
