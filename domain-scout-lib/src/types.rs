//! Core data types for availability and pricing checks.
//!
//! This module defines the main data structures used throughout the library:
//! per-domain results, pricing records and the merged report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration status of a checked domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum DomainStatus {
    /// No registration record exists
    Available,
    /// The domain is registered
    Registered,
    /// The lookup failed or gave no clear answer
    Unknown,
}

/// Result of a single availability check.
///
/// Built once by the availability checker and never changed afterwards.
/// A result with [`DomainStatus::Unknown`] always carries a non-empty
/// `error`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainResult {
    /// The domain name that was checked (e.g., "example.com")
    pub domain: String,

    /// Availability status
    pub status: DomainStatus,

    /// Sponsoring registrar, for registered domains
    pub registrar: Option<String>,

    /// When the registration expires
    pub expiration: Option<DateTime<Utc>>,

    /// When the domain was first registered
    pub creation: Option<DateTime<Utc>>,

    /// Why the status could not be determined
    pub error: Option<String>,
}

impl DomainResult {
    /// Result for a domain with no registration record.
    pub fn available<D: Into<String>>(domain: D) -> Self {
        Self {
            domain: domain.into(),
            status: DomainStatus::Available,
            registrar: None,
            expiration: None,
            creation: None,
            error: None,
        }
    }

    /// Result for a registered domain.
    pub fn registered<D: Into<String>>(domain: D, info: RegistrationInfo) -> Self {
        Self {
            domain: domain.into(),
            status: DomainStatus::Registered,
            registrar: info.registrar,
            expiration: info.expiration,
            creation: info.creation,
            error: None,
        }
    }

    /// Result for a domain whose status could not be determined.
    ///
    /// An empty reason is replaced so the error is never blank.
    pub fn unknown<D: Into<String>, E: Into<String>>(domain: D, error: E) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        };

        Self {
            domain: domain.into(),
            status: DomainStatus::Unknown,
            registrar: None,
            expiration: None,
            creation: None,
            error: Some(error),
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == DomainStatus::Available
    }
}

/// Registration details returned by a lookup for a registered domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    pub registrar: Option<String>,
    pub creation: Option<DateTime<Utc>>,
    pub expiration: Option<DateTime<Utc>>,
}

/// What an external registration lookup found out about a domain.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationStatus {
    /// A registration record exists
    Registered(RegistrationInfo),
    /// The registry has no record for the domain
    NotRegistered,
    /// The registry answered, but not conclusively
    Indeterminate { reason: String },
}

/// Registration price for one TLD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldPrice {
    /// Lower-cased TLD without the leading dot (e.g., "com")
    pub tld: String,

    /// First-year registration price in cents
    pub price_cents: u64,

    /// ISO currency code
    pub currency: String,

    /// Yearly renewal price in cents, when published
    pub annual_renewal_cents: Option<u64>,
}

/// Currency assumed when the pricing source does not state one.
pub const DEFAULT_CURRENCY: &str = "USD";

impl TldPrice {
    /// Create a USD price for a TLD.
    pub fn new<T: Into<String>>(tld: T, price_cents: u64) -> Self {
        Self {
            tld: tld.into().to_lowercase(),
            price_cents,
            currency: DEFAULT_CURRENCY.to_string(),
            annual_renewal_cents: None,
        }
    }

    pub fn with_renewal(mut self, annual_renewal_cents: u64) -> Self {
        self.annual_renewal_cents = Some(annual_renewal_cents);
        self
    }

    /// Bind this TLD price to a specific domain.
    pub fn for_domain<D: Into<String>>(&self, domain: D) -> DomainPrice {
        DomainPrice {
            domain: domain.into(),
            tld: self.tld.clone(),
            price_cents: self.price_cents,
            currency: self.currency.clone(),
            annual_renewal_cents: self.annual_renewal_cents,
        }
    }
}

/// A TLD price projected onto one requested domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainPrice {
    pub domain: String,
    pub tld: String,
    pub price_cents: u64,
    pub currency: String,
    pub annual_renewal_cents: Option<u64>,
}

impl DomainPrice {
    /// Price in whole currency units, for display.
    pub fn price_dollars(&self) -> f64 {
        self.price_cents as f64 / 100.0
    }
}

/// One line of a batch report: the availability result and, for available
/// domains with known pricing, its price.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub result: DomainResult,
    pub price: Option<DomainPrice>,
}

/// A TLD whose pricing could not be fetched during a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TldPricingFailure {
    pub tld: String,
    pub message: String,
}

/// Ordered outcome of a batch check, one entry per input domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<ReportEntry>,
    pricing_failures: Vec<TldPricingFailure>,
}

impl Report {
    pub fn new(entries: Vec<ReportEntry>, pricing_failures: Vec<TldPricingFailure>) -> Self {
        Self {
            entries,
            pricing_failures,
        }
    }

    /// All entries, in input order.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportEntry> {
        self.entries.iter()
    }

    /// TLDs whose pricing lookup failed. Their domains carry no price.
    pub fn pricing_failures(&self) -> &[TldPricingFailure] {
        &self.pricing_failures
    }

    /// Entries with the given status, in input order.
    pub fn with_status(&self, status: DomainStatus) -> impl Iterator<Item = &ReportEntry> + '_ {
        self.entries
            .iter()
            .filter(move |entry| entry.result.status == status)
    }

    /// Number of entries with the given status.
    pub fn count(&self, status: DomainStatus) -> usize {
        self.with_status(status).count()
    }

    /// All attached prices, in input order.
    pub fn prices(&self) -> impl Iterator<Item = &DomainPrice> + '_ {
        self.entries.iter().filter_map(|entry| entry.price.as_ref())
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a ReportEntry;
    type IntoIter = std::slice::Iter<'a, ReportEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl std::fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainStatus::Available => write!(f, "AVAILABLE"),
            DomainStatus::Registered => write!(f, "REGISTERED"),
            DomainStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
