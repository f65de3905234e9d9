//! Utility functions for domain lists and validation.

use crate::error::DomainScoutError;
use std::fs;
use std::path::Path;

/// Trim whitespace and a trailing root dot, and lowercase.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_lowercase()
}

/// Validate a domain name format.
///
/// This is a syntax check only. Single-label names are accepted; they are
/// checked like any other name and simply get no pricing.
pub fn validate_domain(domain: &str) -> Result<(), DomainScoutError> {
    let domain = domain.trim();

    if domain.is_empty() {
        return Err(DomainScoutError::invalid_domain(
            domain,
            "Domain name cannot be empty",
        ));
    }

    if domain.len() > 253 {
        return Err(DomainScoutError::invalid_domain(
            domain,
            "Domain name longer than 253 characters",
        ));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(DomainScoutError::invalid_domain(domain, "Empty label"));
        }

        if label.len() > 63 {
            return Err(DomainScoutError::invalid_domain(
                domain,
                format!("Label '{}' longer than 63 characters", label),
            ));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(DomainScoutError::invalid_domain(
                domain,
                format!("Label '{}' cannot start or end with a hyphen", label),
            ));
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(DomainScoutError::invalid_domain(
                domain,
                format!("Label '{}' contains invalid characters", label),
            ));
        }
    }

    Ok(())
}

/// Parse a newline-delimited domain list.
///
/// Blank lines and `#` comments are skipped, as is anything after the first
/// whitespace on a line, so lists can carry trailing notes.
pub fn parse_domain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_whitespace().next())
        .map(normalize_domain)
        .filter(|domain| !domain.is_empty())
        .collect()
}

/// Read a domain list from a file.
pub fn read_domains_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DomainScoutError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        DomainScoutError::file_error(
            path.to_string_lossy(),
            format!("Failed to read domain list: {}", e),
        )
    })?;

    let domains = parse_domain_list(&content);
    tracing::debug!(path = %path.display(), count = domains.len(), "read domain list");
    Ok(domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_domain() {
        assert!(validate_domain("example.com").is_ok());
        assert!(validate_domain("sub.example.co.uk").is_ok());
        assert!(validate_domain("localhost").is_ok());
        assert!(validate_domain("xn--bcher-kva.example").is_ok());

        assert!(validate_domain("").is_err());
        assert!(validate_domain("   ").is_err());
        assert!(validate_domain("example..com").is_err());
        assert!(validate_domain(".com").is_err());
        assert!(validate_domain("-example.com").is_err());
        assert!(validate_domain("example-.com").is_err());
        assert!(validate_domain("exa mple.com").is_err());
        assert!(validate_domain("under_score.com").is_err());
        assert!(validate_domain(&format!("{}.com", "a".repeat(64))).is_err());
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("  Example.COM. "), "example.com");
        assert_eq!(normalize_domain("grove.place"), "grove.place");
    }

    #[test]
    fn test_parse_domain_list() {
        let content = "\
# shortlist
grove.place

Autumn.dev   maybe later
  # indented comment
meadow.io
";
        assert_eq!(
            parse_domain_list(content),
            vec!["grove.place", "autumn.dev", "meadow.io"]
        );
        assert!(parse_domain_list("\n\n# nothing\n").is_empty());
    }

    #[test]
    fn test_read_domains_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"one.com\n# two.com\nthree.dev\n").unwrap();
        temp_file.flush().unwrap();

        let domains = read_domains_file(temp_file.path()).unwrap();
        assert_eq!(domains, vec!["one.com", "three.dev"]);

        let err = read_domains_file("/no/such/list.txt").unwrap_err();
        assert!(matches!(err, DomainScoutError::FileError { .. }));
    }
}
