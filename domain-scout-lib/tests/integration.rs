//! Integration tests for domain-scout-lib exports and the full batch pipeline

use domain_scout_lib::{
    extract_tld, AvailabilityChecker, BatchOrchestrator, CloudflarePricing, DomainStatus,
    PriceCategory, PricingCategorizer, PricingThresholds, RdapLookup, RdapRegistry,
    TldPriceCache,
};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_extract_tld_export() {
    assert_eq!(extract_tld("Grove.PLACE"), "place");
    assert_eq!(extract_tld("sub.example.co.uk"), "uk");
    assert_eq!(extract_tld("localhost"), "localhost");
}

/// Mock server standing in for the IANA bootstrap file, an RDAP server
/// for the `.test` TLD, and the pricing catalog.
async fn mock_world(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/bootstrap/dns.json");
            then.status(200).json_body(json!({
                "version": "1.0",
                "services": [
                    [["test", "example"], [server.url("/rdap/")]]
                ]
            }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/rdap/domain/taken.test");
            then.status(200).json_body(json!({
                "objectClassName": "domain",
                "ldhName": "taken.test",
                "entities": [{
                    "roles": ["registrar"],
                    "vcardArray": ["vcard", [["fn", {}, "text", "Example Registrar LLC"]]]
                }],
                "events": [
                    {"eventAction": "registration", "eventDate": "2015-03-01T00:00:00Z"},
                    {"eventAction": "expiration", "eventDate": "2030-03-01T00:00:00Z"}
                ]
            }));
        })
        .await;

    for free in ["free.test", "spare.test", "open.example"] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/rdap/domain/{}", free));
                then.status(404);
            })
            .await;
    }

    server
        .mock_async(|when, then| {
            when.method(GET).path("/rdap/domain/flaky.test");
            then.status(503);
        })
        .await;
}

fn orchestrator(server: &MockServer) -> BatchOrchestrator {
    let registry = RdapRegistry::with_bootstrap_url(true, server.url("/bootstrap/dns.json"));
    let lookup = RdapLookup::with_registry(Duration::from_secs(5), registry).unwrap();
    let pricing =
        CloudflarePricing::with_config(server.url("/pricing"), Duration::from_secs(5)).unwrap();

    BatchOrchestrator::new(
        AvailabilityChecker::new(Arc::new(lookup)),
        TldPriceCache::new(Arc::new(pricing)),
    )
    .with_delay(Duration::from_millis(10))
    .with_categorizer(PricingCategorizer::new(PricingThresholds::new(1000, 1500, 3000)))
}

fn domains(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_full_batch_with_pricing() {
    let server = MockServer::start_async().await;
    mock_world(&server).await;
    let catalog = server
        .mock_async(|when, then| {
            when.method(GET).path("/pricing");
            then.status(200).json_body(json!({
                "success": true,
                "errors": [],
                "result": [
                    {"tld": "test", "price": 12.50, "renewal_price": 14.00},
                    {"tld": "com", "price": 10.44}
                ]
            }));
        })
        .await;

    let orch = orchestrator(&server);
    let input = domains(&["taken.test", "free.test", "flaky.test", "spare.test", "open.example"]);
    let report = orch.check_batch(&input, true).await;

    let statuses: Vec<DomainStatus> = report.iter().map(|e| e.result.status).collect();
    assert_eq!(
        statuses,
        vec![
            DomainStatus::Registered,
            DomainStatus::Available,
            DomainStatus::Unknown,
            DomainStatus::Available,
            DomainStatus::Available,
        ]
    );

    let taken = &report.entries()[0];
    assert_eq!(taken.result.registrar.as_deref(), Some("Example Registrar LLC"));
    assert!(taken.result.expiration.is_some());
    assert!(taken.price.is_none());

    let flaky = &report.entries()[2].result;
    assert!(flaky.error.as_deref().unwrap_or_default().contains("503"));

    let free = report.entries()[1].price.as_ref().unwrap();
    assert_eq!(free.price_cents, 1250);
    assert_eq!(free.annual_renewal_cents, Some(1400));

    // "example" is absent from the catalog: no price and no failure.
    assert!(report.entries()[4].price.is_none());
    assert!(report.pricing_failures().is_empty());

    // Two distinct TLDs among available domains.
    catalog.assert_hits_async(2).await;

    let tiers = orch.price_tiers(&report);
    assert_eq!(tiers.get(PriceCategory::Recommended), ["free.test", "spare.test"]);
    assert_eq!(tiers.total(), 2);
}

#[tokio::test]
async fn test_pricing_outage_keeps_availability() {
    let server = MockServer::start_async().await;
    mock_world(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pricing");
            then.status(502);
        })
        .await;

    let orch = orchestrator(&server);
    let report = orch
        .check_batch(&domains(&["free.test", "taken.test"]), true)
        .await;

    assert_eq!(report.len(), 2);
    assert_eq!(report.count(DomainStatus::Available), 1);
    assert_eq!(report.count(DomainStatus::Registered), 1);
    assert_eq!(report.prices().count(), 0);

    let failures = report.pricing_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].tld, "test");
    assert!(failures[0].message.contains("502"));
    assert!(orch.price_cache().is_empty());
}

#[tokio::test]
async fn test_without_pricing_never_calls_catalog() {
    let server = MockServer::start_async().await;
    mock_world(&server).await;
    let catalog = server
        .mock_async(|when, then| {
            when.method(GET).path("/pricing");
            then.status(200).json_body(json!({"success": true, "result": []}));
        })
        .await;

    let report = orchestrator(&server)
        .check_batch(&domains(&["free.test"]), false)
        .await;

    assert_eq!(report.entries()[0].result.status, DomainStatus::Available);
    catalog.assert_hits_async(0).await;
}
