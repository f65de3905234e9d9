//! Domain Scout CLI Application
//!
//! Command-line front end for domain-scout-lib: checks domain availability
//! over RDAP at a steady pace and prices the available ones by TLD.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};
use domain_scout_lib::{
    delay_from_seconds, load_env_config, normalize_domain, read_domains_file, validate_domain,
    BatchOrchestrator, ConfigManager, ProgressObserver, ScoutConfig,
};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-scout
#[derive(Parser, Debug)]
#[command(name = "domain-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check domain availability and registration pricing in bulk")]
#[command(
    long_about = "Check domain availability over RDAP and look up registration pricing.\n\nLookups run one at a time with a configurable delay; available domains are priced once per TLD and sorted into bundled, recommended, standard and premium tiers."
)]
#[command(styles = STYLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check availability (and pricing) for domains or domain-list files
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Domain names, or files with one domain per line
    #[arg(value_name = "DOMAINS|FILES", help_heading = "Domain Selection")]
    pub inputs: Vec<String>,

    /// Skip the pricing lookup
    #[arg(long = "no-pricing", help_heading = "Pricing")]
    pub no_pricing: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Suppress progress output
    #[arg(short = 'q', long = "quiet", help_heading = "Output Format")]
    pub quiet: bool,

    /// Seconds to wait between RDAP lookups
    #[arg(long = "delay", value_name = "SECONDS", help_heading = "Protocol")]
    pub delay: Option<f64>,

    /// Disable IANA bootstrap (use only the built-in RDAP endpoints)
    #[arg(long = "no-bootstrap", help_heading = "Protocol")]
    pub no_bootstrap: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => run_check(args, cli.verbose).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for JSON.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "domain_scout=debug,domain_scout_lib=debug"
    } else {
        "domain_scout=warn,domain_scout_lib=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_check(args: CheckArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args, verbose)?;
    let domains = collect_domains(&args.inputs)?;
    let include_pricing = !args.no_pricing;
    let show_progress = !args.quiet && !args.json;

    tracing::debug!(?config, domains = domains.len(), "starting batch");

    let mut orchestrator = BatchOrchestrator::from_config(&config)?;
    if show_progress {
        ui::print_header(domains.len(), config.rdap_delay, include_pricing);
        let observer: Arc<dyn ProgressObserver> = Arc::new(ui::print_progress);
        orchestrator = orchestrator.with_progress(observer);
    }

    let start = Instant::now();
    let report = orchestrator.check_batch(&domains, include_pricing).await;
    let duration = start.elapsed();

    ui::print_pricing_failures(report.pricing_failures());

    if args.json {
        let entries = ui::json_entries(&report, orchestrator.categorizer());
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    ui::print_grouped_report(&report, orchestrator.categorizer());
    if include_pricing {
        ui::print_tier_summary(&orchestrator.price_tiers(&report));
    }
    ui::print_summary(&report, duration);

    Ok(())
}

/// Resolve configuration: defaults < config files < DS_* env < CLI flags.
fn build_config(args: &CheckArgs, verbose: bool) -> Result<ScoutConfig, Box<dyn std::error::Error>> {
    let env_config = load_env_config()?;
    let config_manager = ConfigManager::new(verbose);

    let explicit_path = args.config.as_ref().or(env_config.config.as_ref());
    let file_config = match explicit_path {
        Some(path) => {
            tracing::debug!(path = %path, "using explicit config file");
            config_manager
                .load_file(path)
                .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?
        }
        None => config_manager.discover_and_load()?,
    };

    let mut config = ScoutConfig::resolve(&file_config, &env_config)?;

    if let Some(delay) = args.delay {
        config = config.with_rdap_delay(delay_from_seconds(delay)?);
    }
    if args.no_bootstrap {
        config = config.with_bootstrap(false);
    }

    config.validate()?;
    Ok(config)
}

/// Expand arguments into the ordered list of domains to check.
///
/// An argument naming an existing file is read as a domain list; anything
/// else is a domain. Invalid names are reported and skipped.
fn collect_domains(inputs: &[String]) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut domains = Vec::new();

    for input in inputs {
        if Path::new(input).is_file() {
            domains.extend(read_domains_file(input)?);
        } else {
            domains.push(normalize_domain(input));
        }
    }

    domains.retain(|domain| match validate_domain(domain) {
        Ok(()) => true,
        Err(e) => {
            ui::print_warning(&format!("Skipping {}", e));
            false
        }
    });

    if domains.is_empty() {
        return Err("No domains to check. Pass domain names or a file with one domain per line.".into());
    }

    Ok(domains)
}
