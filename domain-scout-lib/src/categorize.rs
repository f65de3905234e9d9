//! Pricing tiers.
//!
//! A price falls into exactly one tier, checked in this order:
//! bundled (≤ `bundled_max_cents`), recommended (≤ `recommended_max_cents`),
//! premium (≥ `premium_flag_above_cents`), otherwise standard.

use crate::error::DomainScoutError;
use crate::types::DomainPrice;
use serde::{Deserialize, Serialize};

/// Pricing tier of a domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PriceCategory {
    Bundled,
    Recommended,
    Standard,
    Premium,
}

impl PriceCategory {
    /// All categories in report order.
    pub const ALL: [PriceCategory; 4] = [
        PriceCategory::Bundled,
        PriceCategory::Recommended,
        PriceCategory::Standard,
        PriceCategory::Premium,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceCategory::Bundled => "bundled",
            PriceCategory::Recommended => "recommended",
            PriceCategory::Standard => "standard",
            PriceCategory::Premium => "premium",
        }
    }
}

impl std::fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cent thresholds that define the pricing tiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingThresholds {
    pub bundled_max_cents: u64,
    pub recommended_max_cents: u64,
    pub premium_flag_above_cents: u64,
}

impl Default for PricingThresholds {
    fn default() -> Self {
        Self {
            bundled_max_cents: 3000,
            recommended_max_cents: 5000,
            premium_flag_above_cents: 10000,
        }
    }
}

impl PricingThresholds {
    pub fn new(bundled_max_cents: u64, recommended_max_cents: u64, premium_flag_above_cents: u64) -> Self {
        Self {
            bundled_max_cents,
            recommended_max_cents,
            premium_flag_above_cents,
        }
    }

    /// Reject threshold sets whose tiers would overlap out of order.
    pub fn validate(&self) -> Result<(), DomainScoutError> {
        if self.bundled_max_cents > self.recommended_max_cents {
            return Err(DomainScoutError::config(format!(
                "pricing.bundled_max_cents ({}) must not exceed pricing.recommended_max_cents ({})",
                self.bundled_max_cents, self.recommended_max_cents
            )));
        }
        Ok(())
    }

    pub fn is_bundled(&self, price_cents: u64) -> bool {
        price_cents <= self.bundled_max_cents
    }

    pub fn is_recommended(&self, price_cents: u64) -> bool {
        price_cents <= self.recommended_max_cents
    }

    pub fn is_premium(&self, price_cents: u64) -> bool {
        price_cents >= self.premium_flag_above_cents
    }

    /// The single tier a price belongs to.
    pub fn category_of(&self, price_cents: u64) -> PriceCategory {
        if self.is_bundled(price_cents) {
            PriceCategory::Bundled
        } else if self.is_recommended(price_cents) {
            PriceCategory::Recommended
        } else if self.is_premium(price_cents) {
            PriceCategory::Premium
        } else {
            PriceCategory::Standard
        }
    }
}

/// Domains grouped by pricing tier, each list in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTiers {
    pub bundled: Vec<String>,
    pub recommended: Vec<String>,
    pub standard: Vec<String>,
    pub premium: Vec<String>,
}

impl PriceTiers {
    pub fn get(&self, category: PriceCategory) -> &[String] {
        match category {
            PriceCategory::Bundled => &self.bundled,
            PriceCategory::Recommended => &self.recommended,
            PriceCategory::Standard => &self.standard,
            PriceCategory::Premium => &self.premium,
        }
    }

    fn get_mut(&mut self, category: PriceCategory) -> &mut Vec<String> {
        match category {
            PriceCategory::Bundled => &mut self.bundled,
            PriceCategory::Recommended => &mut self.recommended,
            PriceCategory::Standard => &mut self.standard,
            PriceCategory::Premium => &mut self.premium,
        }
    }

    /// Every category with its domains, in report order. Empty tiers included.
    pub fn iter(&self) -> impl Iterator<Item = (PriceCategory, &[String])> + '_ {
        PriceCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn total(&self) -> usize {
        self.bundled.len() + self.recommended.len() + self.standard.len() + self.premium.len()
    }
}

/// Sorts priced domains into tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingCategorizer {
    thresholds: PricingThresholds,
}

impl PricingCategorizer {
    pub fn new(thresholds: PricingThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PricingThresholds {
        &self.thresholds
    }

    pub fn category_of(&self, price_cents: u64) -> PriceCategory {
        self.thresholds.category_of(price_cents)
    }

    /// Place every priced domain in exactly one tier.
    pub fn categorize<'a, I>(&self, prices: I) -> PriceTiers
    where
        I: IntoIterator<Item = &'a DomainPrice>,
    {
        let mut tiers = PriceTiers::default();
        for price in prices {
            tiers
                .get_mut(self.category_of(price.price_cents))
                .push(price.domain.clone());
        }
        tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TldPrice;

    fn thresholds() -> PricingThresholds {
        PricingThresholds::new(500, 1500, 3000)
    }

    #[test]
    fn test_tier_scenario() {
        let t = thresholds();
        assert_eq!(t.category_of(400), PriceCategory::Bundled);
        assert_eq!(t.category_of(1000), PriceCategory::Recommended);
        assert_eq!(t.category_of(3500), PriceCategory::Premium);
        assert_eq!(t.category_of(2000), PriceCategory::Standard);
    }

    #[test]
    fn test_tier_boundaries() {
        let t = thresholds();
        assert_eq!(t.category_of(0), PriceCategory::Bundled);
        assert_eq!(t.category_of(500), PriceCategory::Bundled);
        assert_eq!(t.category_of(501), PriceCategory::Recommended);
        assert_eq!(t.category_of(1500), PriceCategory::Recommended);
        assert_eq!(t.category_of(2999), PriceCategory::Standard);
        assert_eq!(t.category_of(3000), PriceCategory::Premium);
    }

    #[test]
    fn test_recommended_wins_over_premium() {
        // premium threshold below recommended ceiling
        let t = PricingThresholds::new(500, 5000, 1000);
        assert_eq!(t.category_of(2000), PriceCategory::Recommended);
        assert!(t.is_premium(2000));
        assert_eq!(t.category_of(6000), PriceCategory::Premium);
    }

    #[test]
    fn test_flags_overlap_but_category_does_not() {
        let t = thresholds();
        assert!(t.is_bundled(400));
        assert!(t.is_recommended(400));
        assert!(!t.is_premium(400));
    }

    #[test]
    fn test_categorization_is_total_and_exclusive() {
        let t = thresholds();
        for cents in (0..5000).step_by(7) {
            let category = t.category_of(cents);
            let hits = PriceCategory::ALL.iter().filter(|c| **c == category).count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        assert!(thresholds().validate().is_ok());
        let err = PricingThresholds::new(2000, 1000, 3000).validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_categorize_keeps_input_order() {
        let categorizer = PricingCategorizer::new(thresholds());
        let prices = vec![
            TldPrice::new("dev", 1200).for_domain("b.dev"),
            TldPrice::new("xyz", 100).for_domain("a.xyz"),
            TldPrice::new("ai", 8000).for_domain("c.ai"),
            TldPrice::new("dev", 1200).for_domain("a.dev"),
            TldPrice::new("io", 2000).for_domain("d.io"),
        ];

        let tiers = categorizer.categorize(&prices);

        assert_eq!(tiers.bundled, vec!["a.xyz"]);
        assert_eq!(tiers.recommended, vec!["b.dev", "a.dev"]);
        assert_eq!(tiers.standard, vec!["d.io"]);
        assert_eq!(tiers.premium, vec!["c.ai"]);
        assert_eq!(tiers.total(), prices.len());

        let order: Vec<PriceCategory> = tiers.iter().map(|(c, _)| c).collect();
        assert_eq!(order, PriceCategory::ALL.to_vec());
    }
}
