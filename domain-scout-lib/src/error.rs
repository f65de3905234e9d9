//! Error handling for availability and pricing operations.
//!
//! Two error types live here. [`DomainScoutError`] covers lookups,
//! configuration and I/O. [`PricingError`] is kept separate so the batch
//! pipeline can tolerate pricing failures without also swallowing
//! unrelated errors.

use std::time::Duration;
use thiserror::Error;

/// Main error type for the library.
#[derive(Debug, Clone, Error)]
pub enum DomainScoutError {
    /// Invalid domain name format
    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },

    /// Network-related errors (connection, DNS, etc.)
    #[error("Network error: {message}{}", detail_suffix(.detail))]
    NetworkError {
        message: String,
        detail: Option<String>,
    },

    /// RDAP protocol specific errors
    #[error("RDAP error for '{domain}'{}: {message}", status_suffix(.status_code))]
    RdapError {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    /// No RDAP endpoint could be found for a TLD
    #[error("Bootstrap error for TLD '{tld}': {message}")]
    BootstrapError { tld: String, message: String },

    /// JSON parsing errors
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Invalid or missing configuration. Fatal before any batch starts.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File I/O errors when reading domain lists or config files
    #[error("File error at '{path}': {message}")]
    FileError { path: String, message: String },

    /// Operation exceeded its time budget
    #[error("Timeout after {duration:?} during: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Pricing lookup failure
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Failure while fetching or reading the pricing catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Transport-level failure talking to the pricing API
    #[error("HTTP error fetching pricing: {0}")]
    Http(String),

    /// The pricing API answered with a non-success HTTP status
    #[error("Pricing API returned HTTP {0}")]
    Status(u16),

    /// The API answered but reported `success: false`
    #[error("Pricing API error: {0}")]
    Api(String),

    /// The payload could not be understood
    #[error("Malformed pricing payload: {0}")]
    Malformed(String),

    /// The fetch did not finish in time
    #[error("Pricing request timed out after {0:?}")]
    Timeout(Duration),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" (source: {})", d))
        .unwrap_or_default()
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code
        .map(|code| format!(" (HTTP {})", code))
        .unwrap_or_default()
}

impl DomainScoutError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            detail: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            detail: Some(source.into()),
        }
    }

    /// Create a new RDAP error.
    pub fn rdap<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new RDAP error with HTTP status code.
    pub fn rdap_with_status<D: Into<String>, M: Into<String>>(
        domain: D,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::RdapError {
            domain: domain.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new bootstrap error.
    pub fn bootstrap<T: Into<String>, M: Into<String>>(tld: T, message: M) -> Self {
        Self::BootstrapError {
            tld: tld.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error indicates the domain is definitely available.
    ///
    /// An RDAP 404 means the registry holds no record for the name.
    pub fn indicates_available(&self) -> bool {
        matches!(
            self,
            Self::RdapError {
                status_code: Some(404),
                ..
            }
        )
    }

    /// Whether this is a configuration problem.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }
}

// Implement From conversions for common error types
impl From<reqwest::Error> for DomainScoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", Duration::from_secs(30))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for DomainScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<reqwest::Error> for PricingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rdap_error_display_with_status() {
        let err = DomainScoutError::rdap_with_status("example.com", "server error", 503);
        assert_eq!(
            err.to_string(),
            "RDAP error for 'example.com' (HTTP 503): server error"
        );
    }

    #[test]
    fn test_network_error_display() {
        assert_eq!(
            DomainScoutError::network("down").to_string(),
            "Network error: down"
        );
        assert_eq!(
            DomainScoutError::network_with_source("down", "refused").to_string(),
            "Network error: down (source: refused)"
        );
    }

    #[test]
    fn test_indicates_available() {
        assert!(DomainScoutError::rdap_with_status("a.com", "nf", 404).indicates_available());
        assert!(!DomainScoutError::rdap_with_status("a.com", "err", 500).indicates_available());
        assert!(!DomainScoutError::network("x").indicates_available());
    }

    #[test]
    fn test_pricing_error_is_transparent() {
        let err: DomainScoutError = PricingError::Status(502).into();
        assert_eq!(err.to_string(), "Pricing API returned HTTP 502");
        assert!(!err.is_config());
        assert!(DomainScoutError::config("bad").is_config());
    }
}
