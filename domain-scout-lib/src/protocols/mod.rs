//! Registration lookup protocols.
//!
//! The availability checker talks to registries through the [`DomainLookup`]
//! trait. The built-in implementation is [`RdapLookup`].

use crate::error::DomainScoutError;
use crate::types::RegistrationStatus;
use async_trait::async_trait;

/// RDAP (Registration Data Access Protocol) implementation
pub mod rdap;

/// TLD to RDAP endpoint mappings and bootstrap discovery
pub mod registry;

pub use rdap::{extract_registration_info, RdapLookup};
pub use registry::{extract_tld, get_rdap_registry_map, RdapRegistry};

/// Source of registration data for a single domain.
///
/// Implementations report protocol failures as errors; turning those into
/// `UNKNOWN` results is the checker's job.
#[async_trait]
pub trait DomainLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<RegistrationStatus, DomainScoutError>;
}
