//! Availability checking.
//!
//! This module provides [`AvailabilityChecker`], which runs registration
//! lookups one at a time at a fixed pace and turns every outcome, including
//! failures, into a [`DomainResult`].

use crate::pacing::paced;
use crate::protocols::DomainLookup;
use crate::types::{DomainResult, RegistrationStatus};
use futures_util::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Receives progress notifications during a paced batch.
pub trait ProgressObserver: Send + Sync {
    /// Called after each domain finishes.
    fn on_progress(&self, completed: usize, total: usize, result: &DomainResult);
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize, &DomainResult) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize, result: &DomainResult) {
        self(completed, total, result)
    }
}

/// Runs registration lookups and normalizes their outcome.
///
/// # Example
///
/// ```rust,no_run
/// use domain_scout_lib::{AvailabilityChecker, RdapLookup};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = AvailabilityChecker::new(Arc::new(RdapLookup::new()?));
///     let domains = vec!["example.com".to_string(), "grove.place".to_string()];
///     for result in checker.check_domains(&domains, Duration::from_secs(1)).await {
///         println!("{}: {}", result.domain, result.status);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct AvailabilityChecker {
    lookup: Arc<dyn DomainLookup>,
    /// Upper bound for a single lookup
    lookup_timeout: Option<Duration>,
}

impl AvailabilityChecker {
    pub fn new(lookup: Arc<dyn DomainLookup>) -> Self {
        Self {
            lookup,
            lookup_timeout: None,
        }
    }

    /// Bound each lookup; a lookup that runs over yields an UNKNOWN result.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    /// Check a single domain. Never fails: lookup errors become
    /// [`DomainStatus::Unknown`](crate::DomainStatus::Unknown) results.
    pub async fn check_domain(&self, domain: &str) -> DomainResult {
        let domain = domain.trim();

        let outcome = match self.lookup_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.lookup.lookup(domain)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(crate::DomainScoutError::timeout("domain lookup", limit)),
            },
            None => self.lookup.lookup(domain).await,
        };

        match outcome {
            Ok(RegistrationStatus::Registered(info)) => DomainResult::registered(domain, info),
            Ok(RegistrationStatus::NotRegistered) => DomainResult::available(domain),
            Ok(RegistrationStatus::Indeterminate { reason }) => {
                DomainResult::unknown(domain, reason)
            }
            Err(e) => {
                tracing::debug!(domain, error = %e, "lookup failed");
                DomainResult::unknown(domain, e.to_string())
            }
        }
    }

    /// Check domains in input order, dispatching at most one lookup per
    /// `delay`. The first lookup starts immediately.
    pub async fn check_domains(&self, domains: &[String], delay: Duration) -> Vec<DomainResult> {
        self.check_domains_with_progress(domains, delay, None).await
    }

    /// Like [`check_domains`](Self::check_domains), reporting progress after
    /// each domain.
    pub async fn check_domains_with_progress(
        &self,
        domains: &[String],
        delay: Duration,
        observer: Option<&dyn ProgressObserver>,
    ) -> Vec<DomainResult> {
        let total = domains.len();
        let mut results = Vec::with_capacity(total);
        let mut stream = self.check_domains_stream(domains, delay);

        while let Some(result) = stream.next().await {
            if let Some(observer) = observer {
                observer.on_progress(results.len() + 1, total, &result);
            }
            results.push(result);
        }

        results
    }

    /// Paced results as a stream, in input order.
    pub fn check_domains_stream<'a>(
        &'a self,
        domains: &'a [String],
        delay: Duration,
    ) -> Pin<Box<dyn Stream<Item = DomainResult> + Send + 'a>> {
        Box::pin(paced(domains.iter(), delay).then(move |domain| self.check_domain(domain)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainScoutError;
    use crate::types::{DomainStatus, RegistrationInfo};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Instant;

    /// Answers from the domain name: "taken*" registered, "broken*" errors,
    /// "maybe*" indeterminate, "slow*" sleeps, everything else available.
    #[derive(Default)]
    struct ScriptedLookup {
        calls: Mutex<Vec<(String, Instant)>>,
    }

    #[async_trait]
    impl DomainLookup for ScriptedLookup {
        async fn lookup(&self, domain: &str) -> Result<RegistrationStatus, DomainScoutError> {
            self.calls
                .lock()
                .unwrap()
                .push((domain.to_string(), Instant::now()));

            if domain.starts_with("taken") {
                Ok(RegistrationStatus::Registered(RegistrationInfo {
                    registrar: Some("Example Registrar".to_string()),
                    ..Default::default()
                }))
            } else if domain.starts_with("broken") {
                Err(DomainScoutError::network("connection refused"))
            } else if domain.starts_with("maybe") {
                Ok(RegistrationStatus::Indeterminate {
                    reason: "registry returned partial data".to_string(),
                })
            } else if domain.starts_with("slow") {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(RegistrationStatus::NotRegistered)
            } else {
                Ok(RegistrationStatus::NotRegistered)
            }
        }
    }

    fn domains(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let checker = AvailabilityChecker::new(Arc::new(ScriptedLookup::default()));

        let taken = checker.check_domain("taken.com").await;
        assert_eq!(taken.status, DomainStatus::Registered);
        assert_eq!(taken.registrar.as_deref(), Some("Example Registrar"));

        let free = checker.check_domain("free.com").await;
        assert_eq!(free.status, DomainStatus::Available);
        assert!(free.error.is_none());

        let broken = checker.check_domain("broken.com").await;
        assert_eq!(broken.status, DomainStatus::Unknown);
        assert!(broken.error.unwrap().contains("connection refused"));

        let maybe = checker.check_domain("maybe.com").await;
        assert_eq!(maybe.status, DomainStatus::Unknown);
        assert_eq!(maybe.error.as_deref(), Some("registry returned partial data"));
    }

    #[tokio::test]
    async fn test_unknown_always_has_error() {
        let checker = AvailabilityChecker::new(Arc::new(ScriptedLookup::default()));
        let results = checker
            .check_domains(
                &domains(&["taken.io", "broken.io", "free.io", "maybe.io"]),
                Duration::ZERO,
            )
            .await;

        for result in results {
            if result.status == DomainStatus::Unknown {
                assert!(!result.error.unwrap_or_default().is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_lookup_timeout_yields_unknown() {
        let checker = AvailabilityChecker::new(Arc::new(ScriptedLookup::default()))
            .with_lookup_timeout(Duration::from_millis(50));

        let result = checker.check_domain("slow.com").await;
        assert_eq!(result.status, DomainStatus::Unknown);
        assert!(result.error.unwrap().contains("Timeout"));
    }

    #[tokio::test]
    async fn test_paced_batch_keeps_order_and_delay() {
        let lookup = Arc::new(ScriptedLookup::default());
        let checker = AvailabilityChecker::new(lookup.clone());
        let input = domains(&["one.com", "taken.com", "three.com"]);

        let start = Instant::now();
        let results = checker
            .check_domains(&input, Duration::from_millis(100))
            .await;
        let elapsed = start.elapsed();

        assert!(elapsed >= Duration::from_millis(200), "elapsed {:?}", elapsed);

        let checked: Vec<&str> = results.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(checked, vec!["one.com", "taken.com", "three.com"]);

        let calls = lookup.calls.lock().unwrap();
        let called: Vec<&str> = calls.iter().map(|(d, _)| d.as_str()).collect();
        assert_eq!(called, checked);
        for pair in calls.windows(2) {
            assert!(pair[1].1.duration_since(pair[0].1) >= Duration::from_millis(90));
        }
    }

    #[tokio::test]
    async fn test_progress_observer() {
        let checker = AvailabilityChecker::new(Arc::new(ScriptedLookup::default()));
        let seen = AtomicUsize::new(0);
        let observer = |completed: usize, total: usize, _result: &DomainResult| {
            assert_eq!(total, 3);
            assert_eq!(completed, seen.fetch_add(1, Ordering::SeqCst) + 1);
        };

        let results = checker
            .check_domains_with_progress(
                &domains(&["a.com", "b.com", "c.com"]),
                Duration::ZERO,
                Some(&observer),
            )
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_batch_makes_no_calls() {
        let lookup = Arc::new(ScriptedLookup::default());
        let checker = AvailabilityChecker::new(lookup.clone());
        let results = checker.check_domains(&[], Duration::from_secs(10)).await;
        assert!(results.is_empty());
        assert!(lookup.calls.lock().unwrap().is_empty());
    }
}
