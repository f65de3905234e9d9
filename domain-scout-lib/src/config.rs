//! Configuration file parsing and management.
//!
//! Settings come from three layers, lowest precedence first: TOML files,
//! `DS_*` environment variables, then whatever the caller applies on top
//! (the CLI applies its flags last). Every layer is resolved into a single
//! [`ScoutConfig`], which is validated before anything touches the network.

use crate::categorize::PricingThresholds;
use crate::error::DomainScoutError;
use crate::pricing::cloudflare::CLOUDFLARE_PRICING_URL;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default pause between successive RDAP lookups, in seconds.
pub const DEFAULT_RDAP_DELAY_SECONDS: f64 = 1.0;

/// Default upper bound for a single registration lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Default upper bound for the pricing catalog request.
pub const DEFAULT_PRICING_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration loaded from TOML files.
///
/// ```toml
/// [rate_limit]
/// rdap_delay_seconds = 1.5
///
/// [pricing]
/// bundled_max_cents = 3000
/// recommended_max_cents = 5000
/// premium_flag_above_cents = 10000
/// timeout = "10s"
///
/// [lookup]
/// timeout = "5s"
/// bootstrap = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup: Option<LookupConfig>,
}

/// `[rate_limit]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RateLimitConfig {
    /// Seconds between successive RDAP lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdap_delay_seconds: Option<f64>,
}

/// `[pricing]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PricingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundled_max_cents: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_max_cents: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_flag_above_cents: Option<u64>,

    /// Override for the pricing endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Request timeout (as string, e.g., "10s", "1m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// `[lookup]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LookupConfig {
    /// Per-domain lookup timeout (as string, e.g., "5s")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Use the IANA bootstrap registry for TLDs missing from the built-in table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<bool>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which config files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// A missing file, unreadable file, invalid TOML, or an invalid value
    /// are all errors.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainScoutError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainScoutError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainScoutError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainScoutError::config(format!(
                "Failed to parse TOML configuration {}: {}",
                path.display(),
                e
            ))
        })?;

        self.validate_config(&config)?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config, then the home directory file, then the current directory
    /// file; later files override earlier ones key by key. A file that
    /// exists but fails to load is an error.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainScoutError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            let config = self.load_file(&path)?;
            merged_config = self.merge_configs(merged_config, config);
            loaded_files.push(path);
        }

        if self.verbose && loaded_files.len() > 1 {
            for (i, path) in loaded_files.iter().enumerate() {
                tracing::info!(
                    path = %path.display(),
                    precedence = i,
                    "merged configuration file"
                );
            }
        }

        Ok(merged_config)
    }

    /// Configuration file in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-scout.toml", "./.domain-scout.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    /// Configuration file in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".domain-scout.toml", "domain-scout.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-scout").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values set in `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            rate_limit: match (lower.rate_limit, higher.rate_limit) {
                (Some(lower_rl), Some(higher_rl)) => Some(RateLimitConfig {
                    rdap_delay_seconds: higher_rl.rdap_delay_seconds.or(lower_rl.rdap_delay_seconds),
                }),
                (lower_rl, higher_rl) => higher_rl.or(lower_rl),
            },
            pricing: match (lower.pricing, higher.pricing) {
                (Some(lower_p), Some(higher_p)) => Some(PricingConfig {
                    bundled_max_cents: higher_p.bundled_max_cents.or(lower_p.bundled_max_cents),
                    recommended_max_cents: higher_p
                        .recommended_max_cents
                        .or(lower_p.recommended_max_cents),
                    premium_flag_above_cents: higher_p
                        .premium_flag_above_cents
                        .or(lower_p.premium_flag_above_cents),
                    api_url: higher_p.api_url.or(lower_p.api_url),
                    timeout: higher_p.timeout.or(lower_p.timeout),
                }),
                (lower_p, higher_p) => higher_p.or(lower_p),
            },
            lookup: match (lower.lookup, higher.lookup) {
                (Some(lower_l), Some(higher_l)) => Some(LookupConfig {
                    timeout: higher_l.timeout.or(lower_l.timeout),
                    bootstrap: higher_l.bootstrap.or(lower_l.bootstrap),
                }),
                (lower_l, higher_l) => higher_l.or(lower_l),
            },
        }
    }

    /// Validate the values a single file sets.
    ///
    /// Threshold ordering is checked here only when the file sets both
    /// bounds; the merged result is checked again by [`ScoutConfig::validate`].
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainScoutError> {
        if let Some(delay) = config.rate_limit.as_ref().and_then(|rl| rl.rdap_delay_seconds) {
            delay_from_seconds(delay)?;
        }

        if let Some(pricing) = &config.pricing {
            if let (Some(bundled), Some(recommended)) =
                (pricing.bundled_max_cents, pricing.recommended_max_cents)
            {
                if bundled > recommended {
                    return Err(DomainScoutError::config(format!(
                        "bundled_max_cents ({}) must not exceed recommended_max_cents ({})",
                        bundled, recommended
                    )));
                }
            }

            if let Some(timeout) = &pricing.timeout {
                timeout_from_str(timeout, "pricing.timeout")?;
            }

            if let Some(url) = &pricing.api_url {
                if url.trim().is_empty() {
                    return Err(DomainScoutError::config("pricing.api_url cannot be empty"));
                }
            }
        }

        if let Some(timeout) = config.lookup.as_ref().and_then(|l| l.timeout.as_ref()) {
            timeout_from_str(timeout, "lookup.timeout")?;
        }

        Ok(())
    }
}

/// Environment variable configuration.
///
/// Mirrors the file settings through `DS_*` variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub rdap_delay_seconds: Option<f64>,
    pub bundled_max_cents: Option<u64>,
    pub recommended_max_cents: Option<u64>,
    pub premium_flag_above_cents: Option<u64>,
    pub lookup_timeout: Option<String>,
    pub pricing_timeout: Option<String>,
    pub bootstrap: Option<bool>,
    /// Explicit configuration file (`DS_CONFIG`)
    pub config: Option<String>,
}

/// Load configuration from the process environment.
///
/// Unlike blank variables, which are ignored, a variable that is set to an
/// unparseable value is a configuration error.
pub fn load_env_config() -> Result<EnvConfig, DomainScoutError> {
    load_env_config_from(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_env_config_from<F>(var: F) -> Result<EnvConfig, DomainScoutError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| var(name).filter(|value| !value.trim().is_empty());
    let mut env_config = EnvConfig::default();

    // DS_RDAP_DELAY - seconds between lookups
    if let Some(val) = get("DS_RDAP_DELAY") {
        let seconds = val.trim().parse::<f64>().map_err(|_| {
            DomainScoutError::config(format!(
                "Invalid DS_RDAP_DELAY='{}', expected a number of seconds",
                val
            ))
        })?;
        delay_from_seconds(seconds)?;
        tracing::debug!(value = seconds, "using DS_RDAP_DELAY");
        env_config.rdap_delay_seconds = Some(seconds);
    }

    // Tier thresholds, in cents
    env_config.bundled_max_cents = parse_cents(&get, "DS_BUNDLED_MAX_CENTS")?;
    env_config.recommended_max_cents = parse_cents(&get, "DS_RECOMMENDED_MAX_CENTS")?;
    env_config.premium_flag_above_cents = parse_cents(&get, "DS_PREMIUM_ABOVE_CENTS")?;

    // Timeouts
    if let Some(val) = get("DS_LOOKUP_TIMEOUT") {
        timeout_from_str(&val, "DS_LOOKUP_TIMEOUT")?;
        tracing::debug!(value = %val, "using DS_LOOKUP_TIMEOUT");
        env_config.lookup_timeout = Some(val);
    }
    if let Some(val) = get("DS_PRICING_TIMEOUT") {
        timeout_from_str(&val, "DS_PRICING_TIMEOUT")?;
        tracing::debug!(value = %val, "using DS_PRICING_TIMEOUT");
        env_config.pricing_timeout = Some(val);
    }

    // DS_BOOTSTRAP - enable/disable IANA bootstrap
    if let Some(val) = get("DS_BOOTSTRAP") {
        let enabled = parse_bool(&val).ok_or_else(|| {
            DomainScoutError::config(format!("Invalid DS_BOOTSTRAP='{}', use true/false", val))
        })?;
        tracing::debug!(value = enabled, "using DS_BOOTSTRAP");
        env_config.bootstrap = Some(enabled);
    }

    // DS_CONFIG - explicit config file
    if let Some(path) = get("DS_CONFIG") {
        env_config.config = Some(path);
    }

    Ok(env_config)
}

fn parse_cents<G>(get: &G, name: &str) -> Result<Option<u64>, DomainScoutError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(val) => {
            let cents = val.trim().parse::<u64>().map_err(|_| {
                DomainScoutError::config(format!(
                    "Invalid {}='{}', expected a whole number of cents",
                    name, val
                ))
            })?;
            tracing::debug!(value = cents, "using {}", name);
            Ok(Some(cents))
        }
        None => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// A bare number is taken as seconds. Returns `None` if parsing fails.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.trim().parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.trim().parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }
}

/// Parse a timeout setting, rejecting bad formats and zero.
fn timeout_from_str(value: &str, setting: &str) -> Result<Duration, DomainScoutError> {
    match parse_timeout_string(value) {
        Some(0) => Err(DomainScoutError::config(format!(
            "{} must be greater than zero",
            setting
        ))),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Err(DomainScoutError::config(format!(
            "Invalid {} '{}'. Use format like '5s', '30s', '2m'",
            setting, value
        ))),
    }
}

/// Convert a delay in seconds, rejecting negative and non-finite values.
pub fn delay_from_seconds(seconds: f64) -> Result<Duration, DomainScoutError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(DomainScoutError::config(format!(
            "RDAP delay must be a finite, non-negative number of seconds (got {})",
            seconds
        )));
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|e| DomainScoutError::config(format!("Invalid RDAP delay {}: {}", seconds, e)))
}

/// Fully resolved settings for a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoutConfig {
    /// Pause between successive registration lookups
    pub rdap_delay: Duration,
    pub thresholds: PricingThresholds,
    pub lookup_timeout: Duration,
    pub enable_bootstrap: bool,
    pub pricing_api_url: String,
    pub pricing_timeout: Duration,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            rdap_delay: Duration::from_secs_f64(DEFAULT_RDAP_DELAY_SECONDS),
            thresholds: PricingThresholds::default(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            enable_bootstrap: true,
            pricing_api_url: CLOUDFLARE_PRICING_URL.to_string(),
            pricing_timeout: DEFAULT_PRICING_TIMEOUT,
        }
    }
}

impl ScoutConfig {
    /// Defaults, overridden by file settings, overridden by environment
    /// settings. The result is validated.
    pub fn resolve(file: &FileConfig, env: &EnvConfig) -> Result<Self, DomainScoutError> {
        let mut config = Self::default();
        config.apply_file(file)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_rdap_delay(mut self, delay: Duration) -> Self {
        self.rdap_delay = delay;
        self
    }

    pub fn with_thresholds(mut self, thresholds: PricingThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_bootstrap(mut self, enabled: bool) -> Self {
        self.enable_bootstrap = enabled;
        self
    }

    pub fn with_pricing_api_url<U: Into<String>>(mut self, url: U) -> Self {
        self.pricing_api_url = url.into();
        self
    }

    pub fn with_pricing_timeout(mut self, timeout: Duration) -> Self {
        self.pricing_timeout = timeout;
        self
    }

    /// Overlay the values a (merged) file config sets.
    pub fn apply_file(&mut self, file: &FileConfig) -> Result<(), DomainScoutError> {
        if let Some(rate_limit) = &file.rate_limit {
            if let Some(delay) = rate_limit.rdap_delay_seconds {
                self.rdap_delay = delay_from_seconds(delay)?;
            }
        }

        if let Some(pricing) = &file.pricing {
            self.apply_thresholds(
                pricing.bundled_max_cents,
                pricing.recommended_max_cents,
                pricing.premium_flag_above_cents,
            );
            if let Some(url) = &pricing.api_url {
                self.pricing_api_url = url.trim().to_string();
            }
            if let Some(timeout) = &pricing.timeout {
                self.pricing_timeout = timeout_from_str(timeout, "pricing.timeout")?;
            }
        }

        if let Some(lookup) = &file.lookup {
            if let Some(timeout) = &lookup.timeout {
                self.lookup_timeout = timeout_from_str(timeout, "lookup.timeout")?;
            }
            if let Some(bootstrap) = lookup.bootstrap {
                self.enable_bootstrap = bootstrap;
            }
        }

        Ok(())
    }

    /// Overlay the values the environment sets.
    pub fn apply_env(&mut self, env: &EnvConfig) -> Result<(), DomainScoutError> {
        if let Some(delay) = env.rdap_delay_seconds {
            self.rdap_delay = delay_from_seconds(delay)?;
        }
        self.apply_thresholds(
            env.bundled_max_cents,
            env.recommended_max_cents,
            env.premium_flag_above_cents,
        );
        if let Some(timeout) = &env.lookup_timeout {
            self.lookup_timeout = timeout_from_str(timeout, "DS_LOOKUP_TIMEOUT")?;
        }
        if let Some(timeout) = &env.pricing_timeout {
            self.pricing_timeout = timeout_from_str(timeout, "DS_PRICING_TIMEOUT")?;
        }
        if let Some(bootstrap) = env.bootstrap {
            self.enable_bootstrap = bootstrap;
        }
        Ok(())
    }

    fn apply_thresholds(
        &mut self,
        bundled_max: Option<u64>,
        recommended_max: Option<u64>,
        premium_above: Option<u64>,
    ) {
        if let Some(cents) = bundled_max {
            self.thresholds.bundled_max_cents = cents;
        }
        if let Some(cents) = recommended_max {
            self.thresholds.recommended_max_cents = cents;
        }
        if let Some(cents) = premium_above {
            self.thresholds.premium_flag_above_cents = cents;
        }
    }

    /// Check the resolved settings as a whole.
    pub fn validate(&self) -> Result<(), DomainScoutError> {
        self.thresholds.validate()?;

        if self.lookup_timeout.is_zero() {
            return Err(DomainScoutError::config("Lookup timeout must be greater than zero"));
        }
        if self.pricing_timeout.is_zero() {
            return Err(DomainScoutError::config("Pricing timeout must be greater than zero"));
        }
        if self.pricing_api_url.trim().is_empty() {
            return Err(DomainScoutError::config("Pricing API URL cannot be empty"));
        }

        Ok(())
    }
}
