//! Domain registry mappings and IANA bootstrap functionality.
//!
//! This module maps TLDs to their RDAP endpoints, using a built-in table
//! first and the IANA bootstrap registry for everything else.

use crate::error::DomainScoutError;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::OnceCell;

/// IANA RDAP bootstrap file for DNS.
pub const IANA_BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";

/// Get the built-in RDAP registry mappings.
///
/// Returns a map of TLD strings to RDAP endpoint base URLs. The domain name
/// is appended directly to the endpoint.
pub fn get_rdap_registry_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        // Popular gTLDs
        ("com", "https://rdap.verisign.com/com/v1/domain/"),
        ("net", "https://rdap.verisign.com/net/v1/domain/"),
        (
            "org",
            "https://rdap.publicinterestregistry.org/rdap/domain/",
        ),
        ("info", "https://rdap.identitydigital.services/rdap/domain/"),
        ("biz", "https://rdap.nic.biz/domain/"),
        // Google TLDs
        ("app", "https://pubapi.registry.google/rdap/domain/"),
        ("dev", "https://pubapi.registry.google/rdap/domain/"),
        ("page", "https://pubapi.registry.google/rdap/domain/"),
        // CentralNic managed gTLDs
        ("xyz", "https://rdap.centralnic.com/xyz/domain/"),
        ("tech", "https://rdap.centralnic.com/tech/domain/"),
        ("online", "https://rdap.centralnic.com/online/domain/"),
        ("site", "https://rdap.centralnic.com/site/domain/"),
        ("website", "https://rdap.centralnic.com/website/domain/"),
        ("blog", "https://rdap.blog.fury.ca/rdap/domain/"),
        ("shop", "https://rdap.gmoregistry.net/rdap/domain/"),
        // Identity Digital managed TLDs
        ("ai", "https://rdap.identitydigital.services/rdap/domain/"),
        ("io", "https://rdap.identitydigital.services/rdap/domain/"),
        ("me", "https://rdap.identitydigital.services/rdap/domain/"),
        ("zone", "https://rdap.identitydigital.services/rdap/domain/"),
        (
            "digital",
            "https://rdap.identitydigital.services/rdap/domain/",
        ),
        // Country code TLDs
        ("us", "https://rdap.nic.us/domain/"),
        ("uk", "https://rdap.nominet.uk/domain/"),
        ("de", "https://rdap.denic.de/domain/"),
        ("ca", "https://rdap.ca.fury.ca/rdap/domain/"),
        ("fr", "https://rdap.nic.fr/domain/"),
        ("nl", "https://rdap.sidn.nl/domain/"),
        ("br", "https://rdap.registro.br/domain/"),
        ("tv", "https://rdap.nic.tv/domain/"),
        ("cc", "https://tld-rdap.verisign.com/cc/v1/domain/"),
        ("cloud", "https://rdap.registry.cloud/rdap/domain/"),
    ])
}

/// Resolves RDAP endpoints for TLDs.
///
/// The IANA bootstrap file is downloaded at most once per registry, on the
/// first TLD missing from the built-in table. TLDs absent from the bootstrap
/// file are remembered so they fail fast afterwards.
pub struct RdapRegistry {
    builtin: HashMap<&'static str, &'static str>,
    use_bootstrap: bool,
    bootstrap_url: String,
    bootstrap: OnceCell<HashMap<String, String>>,
    no_rdap: Mutex<HashSet<String>>,
}

impl RdapRegistry {
    pub fn new(use_bootstrap: bool) -> Self {
        Self::with_bootstrap_url(use_bootstrap, IANA_BOOTSTRAP_URL)
    }

    /// Use a different bootstrap file location (mirrors, tests).
    pub fn with_bootstrap_url<U: Into<String>>(use_bootstrap: bool, bootstrap_url: U) -> Self {
        Self {
            builtin: get_rdap_registry_map(),
            use_bootstrap,
            bootstrap_url: bootstrap_url.into(),
            bootstrap: OnceCell::new(),
            no_rdap: Mutex::new(HashSet::new()),
        }
    }

    /// Look up the RDAP endpoint for a TLD.
    ///
    /// Lookup flow:
    /// 1. Built-in table
    /// 2. Negative cache
    /// 3. Bootstrap file (fetched once), if enabled
    pub async fn endpoint_for(
        &self,
        http_client: &reqwest::Client,
        tld: &str,
    ) -> Result<String, DomainScoutError> {
        let tld_lower = tld.to_lowercase();

        if let Some(endpoint) = self.builtin.get(tld_lower.as_str()) {
            return Ok(endpoint.to_string());
        }

        if !self.use_bootstrap {
            return Err(DomainScoutError::bootstrap(
                &tld_lower,
                "No built-in RDAP endpoint and bootstrap is disabled",
            ));
        }

        if self.is_known_without_rdap(&tld_lower) {
            return Err(DomainScoutError::bootstrap(
                &tld_lower,
                "TLD has no RDAP service in the IANA bootstrap registry",
            ));
        }

        let endpoints = self
            .bootstrap
            .get_or_try_init(|| fetch_bootstrap(http_client, &self.bootstrap_url))
            .await?;

        match endpoints.get(&tld_lower) {
            Some(endpoint) => Ok(endpoint.clone()),
            None => {
                if let Ok(mut no_rdap) = self.no_rdap.lock() {
                    no_rdap.insert(tld_lower.clone());
                }
                Err(DomainScoutError::bootstrap(
                    &tld_lower,
                    "TLD has no RDAP service in the IANA bootstrap registry",
                ))
            }
        }
    }

    fn is_known_without_rdap(&self, tld: &str) -> bool {
        self.no_rdap
            .lock()
            .map(|no_rdap| no_rdap.contains(tld))
            .unwrap_or(false)
    }
}

/// Download and parse the IANA bootstrap file.
async fn fetch_bootstrap(
    http_client: &reqwest::Client,
    url: &str,
) -> Result<HashMap<String, String>, DomainScoutError> {
    tracing::debug!(url, "fetching RDAP bootstrap registry");

    let response = http_client
        .get(url)
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| {
            DomainScoutError::bootstrap("*", format!("Failed to fetch bootstrap registry: {}", e))
        })?;

    if !response.status().is_success() {
        return Err(DomainScoutError::bootstrap(
            "*",
            format!("Bootstrap registry returned HTTP {}", response.status()),
        ));
    }

    let json: serde_json::Value = response.json().await.map_err(|e| {
        DomainScoutError::bootstrap("*", format!("Failed to parse bootstrap JSON: {}", e))
    })?;

    let endpoints = parse_bootstrap(&json)?;
    tracing::debug!(tlds = endpoints.len(), "loaded RDAP bootstrap registry");
    Ok(endpoints)
}

/// Turn the IANA `services` array into a TLD → endpoint map.
///
/// Each service is `[[tld, ...], [base_url, ...]]`; the first URL wins.
pub(crate) fn parse_bootstrap(
    json: &serde_json::Value,
) -> Result<HashMap<String, String>, DomainScoutError> {
    let services = json
        .get("services")
        .and_then(|s| s.as_array())
        .ok_or_else(|| {
            DomainScoutError::bootstrap("*", "Bootstrap registry has no 'services' array")
        })?;

    let mut endpoints = HashMap::new();

    for service in services {
        let Some([tlds, urls, ..]) = service.as_array().map(Vec::as_slice) else {
            continue;
        };

        let Some(url) = urls
            .as_array()
            .and_then(|urls| urls.first())
            .and_then(|u| u.as_str())
        else {
            continue;
        };

        let endpoint = format!("{}/domain/", url.trim_end_matches('/'));

        for tld in tlds.as_array().into_iter().flatten() {
            if let Some(tld) = tld.as_str() {
                endpoints.insert(tld.to_lowercase(), endpoint.clone());
            }
        }
    }

    Ok(endpoints)
}

/// Extract TLD from a domain name.
///
/// Returns the lower-cased label after the last dot. A name without any dot
/// is its own TLD.
pub fn extract_tld(domain: &str) -> String {
    domain
        .trim()
        .trim_end_matches('.')
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_extract_tld() {
        assert_eq!(extract_tld("example.com"), "com");
        assert_eq!(extract_tld("Example.CO.UK"), "uk");
        assert_eq!(extract_tld("localhost"), "localhost");
        assert_eq!(extract_tld("grove.place."), "place");
    }

    #[test]
    fn test_parse_bootstrap() {
        let json = serde_json::json!({
            "services": [
                [["Example", "test"], ["https://rdap.example.net/"]],
                [["place"], ["https://rdap.place.example/rdap", "https://backup.example/"]],
                ["malformed"]
            ]
        });

        let endpoints = parse_bootstrap(&json).unwrap();
        assert_eq!(
            endpoints.get("example").map(String::as_str),
            Some("https://rdap.example.net/domain/")
        );
        assert_eq!(
            endpoints.get("place").map(String::as_str),
            Some("https://rdap.place.example/rdap/domain/")
        );
        assert_eq!(endpoints.len(), 3);
    }

    #[test]
    fn test_parse_bootstrap_rejects_missing_services() {
        assert!(parse_bootstrap(&serde_json::json!({})).is_err());
    }

    #[tokio::test]
    async fn test_builtin_endpoint_needs_no_network() {
        let registry = RdapRegistry::with_bootstrap_url(true, "http://127.0.0.1:9/unreachable");
        let client = reqwest::Client::new();
        let endpoint = registry.endpoint_for(&client, "COM").await.unwrap();
        assert_eq!(endpoint, "https://rdap.verisign.com/com/v1/domain/");
    }

    #[tokio::test]
    async fn test_unknown_tld_without_bootstrap() {
        let registry = RdapRegistry::new(false);
        let client = reqwest::Client::new();
        let err = registry.endpoint_for(&client, "place").await.unwrap_err();
        assert!(matches!(err, DomainScoutError::BootstrapError { .. }));
    }

    #[tokio::test]
    async fn test_bootstrap_fetched_once() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/dns.json");
                then.status(200).json_body(serde_json::json!({
                    "services": [[["place"], ["https://rdap.place.example/"]]]
                }));
            })
            .await;

        let registry = RdapRegistry::with_bootstrap_url(true, server.url("/dns.json"));
        let client = reqwest::Client::new();

        let endpoint = registry.endpoint_for(&client, "place").await.unwrap();
        assert_eq!(endpoint, "https://rdap.place.example/domain/");
        assert!(registry.endpoint_for(&client, "nowhere").await.is_err());
        assert!(registry.endpoint_for(&client, "nowhere").await.is_err());

        mock.assert_hits_async(1).await;
    }
}
