// domain-scout/tests/cli_integration.rs
//
// These tests exercise argument handling and configuration errors, which are
// all resolved before any network request is made.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DS_VARS: &[&str] = &[
    "DS_CONFIG",
    "DS_RDAP_DELAY",
    "DS_BUNDLED_MAX_CENTS",
    "DS_RECOMMENDED_MAX_CENTS",
    "DS_PREMIUM_ABOVE_CENTS",
    "DS_LOOKUP_TIMEOUT",
    "DS_PRICING_TIMEOUT",
    "DS_BOOTSTRAP",
];

/// Command isolated from the user's config files and DS_* environment.
fn scout(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domain-scout").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG");
    for var in DS_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_check_command() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_check_help_shows_flags() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-pricing"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--quiet"))
        .stdout(predicate::str::contains("--delay"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_no_domains_fails() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .arg("check")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No domains to check"));
}

#[test]
fn test_only_invalid_domains_fails() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["check", "bad..name", "under_score.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Skipping"))
        .stderr(predicate::str::contains("No domains to check"));
}

#[test]
fn test_empty_domain_file_fails() {
    let home = TempDir::new().unwrap();
    let list = home.path().join("domains.txt");
    fs::write(&list, "# nothing yet\n\n").unwrap();

    scout(&home)
        .arg("check")
        .arg(&list)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No domains to check"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["check", "example.com", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_invalid_config_values_fail() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    fs::write(
        &config,
        "[pricing]\nbundled_max_cents = 9000\nrecommended_max_cents = 1000\n",
    )
    .unwrap();

    scout(&home)
        .arg("check")
        .arg("example.com")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bundled_max_cents"));
}

#[test]
fn test_discovered_local_config_is_validated() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("domain-scout.toml"),
        "[rate_limit]\nrdap_delay_seconds = -3.0\n",
    )
    .unwrap();

    scout(&home)
        .args(["check", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RDAP delay"));
}

#[test]
fn test_config_from_env_var_path() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("env.toml");
    fs::write(&config, "[lookup]\ntimeout = \"never\"\n").unwrap();

    scout(&home)
        .env("DS_CONFIG", &config)
        .args(["check", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lookup.timeout"));
}

#[test]
fn test_invalid_env_value_fails() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .env("DS_RDAP_DELAY", "soon")
        .args(["check", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DS_RDAP_DELAY"));
}

#[test]
fn test_negative_delay_flag_fails() {
    let home = TempDir::new().unwrap();
    scout(&home)
        .args(["check", "example.com", "--delay=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RDAP delay"));
}
