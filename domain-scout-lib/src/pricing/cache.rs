//! Per-TLD price memoization.

use crate::error::PricingError;
use crate::pricing::PricingSource;
use crate::types::TldPrice;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Option<TldPrice>>>;

/// Memoizes pricing answers per TLD.
///
/// A miss fetches the full catalog from the source and keeps only the
/// requested TLD, including a "no pricing" answer when the TLD is absent.
/// Concurrent requests for the same TLD wait on one in-flight fetch.
/// Failed fetches are not cached. Entries never expire; the cache lives as
/// long as its owner.
pub struct TldPriceCache {
    source: Arc<dyn PricingSource>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl TldPriceCache {
    pub fn new(source: Arc<dyn PricingSource>) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Pricing for one TLD, or `None` if the catalog does not list it.
    pub async fn get_tld_pricing(&self, tld: &str) -> Result<Option<TldPrice>, PricingError> {
        let tld = tld.trim_start_matches('.').to_lowercase();
        let slot = self.slot(&tld);

        if let Some(cached) = slot.get() {
            tracing::trace!(tld = %tld, "price cache hit");
            return Ok(cached.clone());
        }

        slot.get_or_try_init(|| self.fetch_one(&tld))
            .await
            .cloned()
    }

    /// TLDs with a settled answer (priced or not).
    pub fn cached_tlds(&self) -> Vec<String> {
        let mut tlds: Vec<String> = self
            .slots
            .lock()
            .map(|slots| {
                slots
                    .iter()
                    .filter(|(_, slot)| slot.initialized())
                    .map(|(tld, _)| tld.clone())
                    .collect()
            })
            .unwrap_or_default();
        tlds.sort();
        tlds
    }

    pub fn len(&self) -> usize {
        self.cached_tlds().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, tld: &str) -> Slot {
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.entry(tld.to_string()).or_default().clone()
    }

    async fn fetch_one(&self, tld: &str) -> Result<Option<TldPrice>, PricingError> {
        tracing::debug!(tld, "price cache miss, fetching catalog");
        let catalog = self.source.fetch_tld_pricing().await?;
        let found = catalog.into_iter().find(|price| price.tld == tld);
        if found.is_none() {
            tracing::debug!(tld, "no pricing listed for TLD");
        }
        Ok(found)
    }
}
