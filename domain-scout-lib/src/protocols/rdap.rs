//! RDAP (Registration Data Access Protocol) implementation.
//!
//! RDAP replaces WHOIS with structured JSON responses. A `200` answer means
//! the domain is registered, a `404` means it is not.

use crate::error::DomainScoutError;
use crate::protocols::registry::{extract_tld, RdapRegistry};
use crate::protocols::DomainLookup;
use crate::types::{RegistrationInfo, RegistrationStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::time::Duration;

/// Pause before the single retry of a rate-limited request.
const RATE_LIMIT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// RDAP lookup client.
///
/// Handles endpoint discovery, request formatting, response parsing and
/// error mapping.
pub struct RdapLookup {
    /// HTTP client for making RDAP requests
    http_client: reqwest::Client,
    /// Per-request timeout
    timeout: Duration,
    /// TLD → endpoint resolution
    registry: RdapRegistry,
}

impl RdapLookup {
    /// Create a new RDAP client with default settings.
    pub fn new() -> Result<Self, DomainScoutError> {
        Self::with_config(Duration::from_secs(5), true)
    }

    /// Create a new RDAP client with custom settings.
    pub fn with_config(timeout: Duration, use_bootstrap: bool) -> Result<Self, DomainScoutError> {
        Self::with_registry(timeout, RdapRegistry::new(use_bootstrap))
    }

    /// Create a client that resolves endpoints through the given registry.
    pub fn with_registry(
        timeout: Duration,
        registry: RdapRegistry,
    ) -> Result<Self, DomainScoutError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout + Duration::from_secs(2)) // Add buffer for HTTP timeout
            .build()
            .map_err(|e| {
                DomainScoutError::network_with_source(
                    "Failed to create RDAP HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            timeout,
            registry,
        })
    }

    /// Query RDAP for one domain.
    ///
    /// # Errors
    ///
    /// Returns `DomainScoutError` if no endpoint exists for the TLD, the
    /// request fails or times out, or the server answers with an
    /// unexpected status.
    pub async fn check(&self, domain: &str) -> Result<RegistrationStatus, DomainScoutError> {
        let tld = extract_tld(domain);
        let endpoint = self.registry.endpoint_for(&self.http_client, &tld).await?;
        let rdap_url = format!("{}{}", endpoint, domain);

        tracing::debug!(domain, url = %rdap_url, "sending RDAP request");

        match tokio::time::timeout(self.timeout, self.make_rdap_request(&rdap_url, domain)).await {
            Ok(Ok(status)) => Ok(status),
            Ok(Err(e)) if e.indicates_available() => Ok(RegistrationStatus::NotRegistered),
            Ok(Err(e)) => {
                tracing::debug!(domain, error = %e, "RDAP lookup failed");
                Err(e)
            }
            Err(_) => {
                tracing::debug!(domain, timeout = ?self.timeout, "RDAP lookup timed out");
                Err(DomainScoutError::timeout("RDAP request", self.timeout))
            }
        }
    }

    /// Make an RDAP request, retrying once on HTTP 429.
    async fn make_rdap_request(
        &self,
        rdap_url: &str,
        domain: &str,
    ) -> Result<RegistrationStatus, DomainScoutError> {
        let response = self.send(rdap_url, domain).await?;

        let response = if response.status() == StatusCode::TOO_MANY_REQUESTS {
            tracing::debug!(domain, "rate limited by RDAP server, retrying once");
            tokio::time::sleep(RATE_LIMIT_RETRY_DELAY).await;
            self.send(rdap_url, domain).await?
        } else {
            response
        };

        tracing::debug!(domain, status = %response.status(), "RDAP response");

        match response.status() {
            StatusCode::OK => {
                let json = response.json::<serde_json::Value>().await.map_err(|e| {
                    DomainScoutError::rdap(domain, format!("Failed to parse JSON: {}", e))
                })?;
                Ok(RegistrationStatus::Registered(extract_registration_info(
                    &json,
                )))
            }
            StatusCode::NOT_FOUND => Ok(RegistrationStatus::NotRegistered),
            code => Err(DomainScoutError::rdap_with_status(
                domain,
                format!("RDAP server returned error: {}", code),
                code.as_u16(),
            )),
        }
    }

    async fn send(
        &self,
        rdap_url: &str,
        domain: &str,
    ) -> Result<reqwest::Response, DomainScoutError> {
        self.http_client
            .get(rdap_url)
            .header(reqwest::header::ACCEPT, "application/rdap+json")
            .send()
            .await
            .map_err(|e| DomainScoutError::rdap(domain, format!("Request failed: {}", e)))
    }
}

#[async_trait]
impl DomainLookup for RdapLookup {
    async fn lookup(&self, domain: &str) -> Result<RegistrationStatus, DomainScoutError> {
        self.check(domain).await
    }
}

/// Extract registration details from an RDAP JSON response.
pub fn extract_registration_info(json: &serde_json::Value) -> RegistrationInfo {
    let mut info = RegistrationInfo::default();

    // Registrar from the entity carrying the "registrar" role
    if let Some(entities) = json.get("entities").and_then(|e| e.as_array()) {
        info.registrar = entities
            .iter()
            .filter(|entity| {
                entity
                    .get("roles")
                    .and_then(|r| r.as_array())
                    .is_some_and(|roles| roles.iter().any(|role| role.as_str() == Some("registrar")))
            })
            .find_map(|entity| {
                extract_vcard_name(entity).or_else(|| extract_entity_identifier(entity))
            });
    }

    // Dates from events
    if let Some(events) = json.get("events").and_then(|e| e.as_array()) {
        for event in events {
            if let (Some(event_action), Some(event_date)) = (
                event.get("eventAction").and_then(|a| a.as_str()),
                event.get("eventDate").and_then(|d| d.as_str()),
            ) {
                match event_action {
                    "registration" => info.creation = parse_event_date(event_date),
                    "expiration" => info.expiration = parse_event_date(event_date),
                    _ => {}
                }
            }
        }
    }

    info
}

/// Parse an RFC 3339 event date; unparseable dates are dropped.
fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!(date = raw, error = %e, "ignoring unparseable RDAP event date");
            None
        }
    }
}

/// Extract organization name from vCard format in RDAP entity.
fn extract_vcard_name(entity: &serde_json::Value) -> Option<String> {
    entity
        .get("vcardArray")
        .and_then(|v| v.as_array())
        .and_then(|a| a.get(1))
        .and_then(|a| a.as_array())?
        .iter()
        .filter_map(|item| item.as_array())
        .find(|item| item.len() >= 4 && item.first().and_then(|f| f.as_str()) == Some("fn"))
        .and_then(|item| item.get(3))
        .and_then(|n| n.as_str())
        .map(String::from)
}

/// Extract entity identifier from publicIds, handle or name.
fn extract_entity_identifier(entity: &serde_json::Value) -> Option<String> {
    entity
        .get("publicIds")
        .and_then(|p| p.as_array())
        .and_then(|ids| ids.first())
        .and_then(|id| id.get("identifier"))
        .and_then(|i| i.as_str())
        .or_else(|| entity.get("handle").and_then(|h| h.as_str()))
        .or_else(|| entity.get("name").and_then(|n| n.as_str()))
        .map(String::from)
}
