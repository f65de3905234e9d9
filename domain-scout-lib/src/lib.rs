//! # Domain Scout Library
//!
//! Bulk domain availability checks with TLD pricing.
//!
//! Domains are looked up one at a time at a fixed pace (registries rate
//! limit aggressively), then the available ones are priced with a single
//! catalog lookup per distinct TLD. Both passes merge into one ordered
//! [`Report`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_scout_lib::{BatchOrchestrator, DomainStatus, ScoutConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = BatchOrchestrator::from_config(&ScoutConfig::default())?;
//!     let domains = vec!["example.com".to_string(), "grove.place".to_string()];
//!     let report = orchestrator.check_batch(&domains, true).await;
//!
//!     for entry in report.with_status(DomainStatus::Available) {
//!         match &entry.price {
//!             Some(price) => println!("{} ${:.2}", entry.result.domain, price.price_dollars()),
//!             None => println!("{} (no pricing)", entry.result.domain),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Paced RDAP lookups**: sequential, with a configurable delay between calls
//! - **Bootstrap Registry**: RDAP endpoint discovery for TLDs outside the built-in table
//! - **Per-TLD price cache**: one catalog fetch per TLD, shared by concurrent callers
//! - **Pricing tiers**: bundled, recommended, standard and premium thresholds in cents
//! - **Configurable**: TOML files and `DS_*` environment variables

// Re-export main public API types and functions
pub use batch::BatchOrchestrator;
pub use categorize::{PriceCategory, PriceTiers, PricingCategorizer, PricingThresholds};
pub use checker::{AvailabilityChecker, ProgressObserver};
pub use config::{
    delay_from_seconds, load_env_config, load_env_config_from, parse_timeout_string,
    ConfigManager, EnvConfig, FileConfig, LookupConfig, PricingConfig, RateLimitConfig,
    ScoutConfig,
};
pub use error::{DomainScoutError, PricingError};
pub use pacing::{paced, Pacer};
pub use pricing::{CloudflarePricing, PricingSource, TldPriceCache};
pub use protocols::{extract_tld, DomainLookup, RdapLookup, RdapRegistry};
pub use types::{
    DomainPrice, DomainResult, DomainStatus, RegistrationInfo, RegistrationStatus, Report,
    ReportEntry, TldPrice, TldPricingFailure,
};
pub use utils::{normalize_domain, parse_domain_list, read_domains_file, validate_domain};

// Public modules
pub mod pacing;
pub mod pricing;
pub mod protocols;

// Internal modules, exposed through the re-exports above
mod batch;
mod categorize;
mod checker;
mod config;
mod error;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainScoutError>;
