//! Display logic for the domain-scout CLI.
//!
//! Grouped result sections, pricing tiers, progress counters, summaries, and
//! the JSON output shape. Uses only the `console` crate for styling.
//! Progress and warnings go to stderr so stdout carries only results.

use console::{pad_str, style, Alignment, Term};
use domain_scout_lib::{
    DomainPrice, DomainResult, DomainStatus, PriceCategory, PriceTiers, PricingCategorizer,
    Report, ReportEntry, TldPricingFailure,
};
use serde::Serialize;
use std::time::Duration;

const DOMAIN_WIDTH: usize = 30;

// ── JSON ─────────────────────────────────────────────────────────────────────

/// One element of the `--json` output array.
#[derive(Debug, Serialize)]
pub struct JsonEntry<'a> {
    #[serde(flatten)]
    pub result: &'a DomainResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<JsonPricing<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonPricing<'a> {
    pub price_cents: u64,
    pub price_dollars: f64,
    pub currency: &'a str,
    pub category: PriceCategory,
    pub is_bundled: bool,
    pub is_recommended: bool,
    pub is_premium: bool,
}

pub fn json_entries<'a>(report: &'a Report, categorizer: &PricingCategorizer) -> Vec<JsonEntry<'a>> {
    report
        .iter()
        .map(|entry| JsonEntry {
            result: &entry.result,
            pricing: entry.price.as_ref().map(|price| json_pricing(price, categorizer)),
        })
        .collect()
}

fn json_pricing<'a>(price: &'a DomainPrice, categorizer: &PricingCategorizer) -> JsonPricing<'a> {
    let thresholds = categorizer.thresholds();
    JsonPricing {
        price_cents: price.price_cents,
        price_dollars: price.price_dollars(),
        currency: &price.currency,
        category: categorizer.category_of(price.price_cents),
        is_bundled: thresholds.is_bundled(price.price_cents),
        is_recommended: thresholds.is_recommended(price.price_cents),
        is_premium: thresholds.is_premium(price.price_cents),
    }
}

// ── Header and progress ──────────────────────────────────────────────────────

/// Print a styled header to stderr at the start of a run.
pub fn print_header(domain_count: usize, delay: Duration, include_pricing: bool) {
    let term = Term::stderr();
    let _ = term.write_line(&format!(
        "{} {} {}",
        style("domain-scout").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "· Checking {} domain{}",
            domain_count,
            if domain_count == 1 { "" } else { "s" }
        ))
        .dim(),
    ));
    let _ = term.write_line(
        &style(format!(
            "Delay: {:.1}s | Pricing: {}",
            delay.as_secs_f64(),
            if include_pricing { "on" } else { "off" }
        ))
        .dim()
        .to_string(),
    );
}

/// Progress line after each lookup, e.g. `[3/8] grove.place  AVAILABLE`.
pub fn print_progress(completed: usize, total: usize, result: &DomainResult) {
    let _ = Term::stderr().write_line(&format!(
        "  {} {}  {}",
        style(format!("[{}/{}]", completed, total)).dim(),
        pad_str(&result.domain, DOMAIN_WIDTH, Alignment::Left, Some("..")),
        styled_status(result.status),
    ));
}

pub fn print_warning(message: &str) {
    let _ = Term::stderr().write_line(&format!("{} {}", style("warning:").yellow().bold(), message));
}

/// Warn about TLDs whose pricing could not be fetched.
pub fn print_pricing_failures(failures: &[TldPricingFailure]) {
    for failure in failures {
        print_warning(&format!(
            "pricing unavailable for .{}: {}",
            failure.tld, failure.message
        ));
    }
}

// ── Grouped output ───────────────────────────────────────────────────────────

/// Print entries grouped by status: Available, Registered, Unknown.
/// Empty sections are omitted entirely.
pub fn print_grouped_report(report: &Report, categorizer: &PricingCategorizer) {
    println!();
    for status in [
        DomainStatus::Available,
        DomainStatus::Registered,
        DomainStatus::Unknown,
    ] {
        let entries: Vec<&ReportEntry> = report.with_status(status).collect();
        if entries.is_empty() {
            continue;
        }

        let title = format!("── {} ({}) ", status, entries.len());
        let rule = "─".repeat(50usize.saturating_sub(title.chars().count()));
        println!(
            "  {} {}",
            styled_for(status, &title).bold(),
            styled_for(status, &rule).dim()
        );

        for entry in entries {
            print_grouped_line(entry, categorizer);
        }
        println!();
    }
}

fn print_grouped_line(entry: &ReportEntry, categorizer: &PricingCategorizer) {
    let padded = pad_str(&entry.result.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));

    let detail = match entry.result.status {
        DomainStatus::Available => entry
            .price
            .as_ref()
            .map(|price| format_price(price, categorizer.category_of(price.price_cents)))
            .unwrap_or_default(),
        DomainStatus::Registered => format_registration(&entry.result),
        DomainStatus::Unknown => brief_error(&entry.result).to_string(),
    };

    if detail.is_empty() {
        println!("    {}", style(&padded).white());
    } else {
        println!("    {}  {}", style(&padded).white(), style(detail).dim());
    }
}

/// List the priced domains in each tier. Empty tiers are omitted.
pub fn print_tier_summary(tiers: &PriceTiers) {
    if tiers.total() == 0 {
        return;
    }

    println!("  {}", style("Pricing tiers").bold());
    for (category, domains) in tiers.iter() {
        if domains.is_empty() {
            continue;
        }
        println!(
            "    {}  {}",
            pad_str(category.as_str(), 12, Alignment::Left, None),
            domains.join(", ")
        );
    }
    println!();
}

/// Print the final summary bar with colored counts.
pub fn print_summary(report: &Report, duration: Duration) {
    let total = report.len();
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", report.count(DomainStatus::Available))).green(),
        style("|").dim(),
        style(format!("{} registered", report.count(DomainStatus::Registered))).red(),
        style("|").dim(),
        style(format!("{} unknown", report.count(DomainStatus::Unknown))).yellow(),
    );
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn styled_for(status: DomainStatus, text: &str) -> console::StyledObject<String> {
    let styled = style(text.to_string());
    match status {
        DomainStatus::Available => styled.green(),
        DomainStatus::Registered => styled.red(),
        DomainStatus::Unknown => styled.yellow(),
    }
}

fn styled_status(status: DomainStatus) -> console::StyledObject<String> {
    styled_for(status, &status.to_string()).bold()
}

/// Price and tier, e.g. `$10.44 USD (bundled)`.
pub fn format_price(price: &DomainPrice, category: PriceCategory) -> String {
    let mut text = format!("${:.2} {} ({})", price.price_dollars(), price.currency, category);
    if let Some(renewal) = price.annual_renewal_cents {
        if renewal != price.price_cents {
            text.push_str(&format!(", renews ${:.2}", renewal as f64 / 100.0));
        }
    }
    text
}

/// Registrar and dates for a registered domain.
pub fn format_registration(result: &DomainResult) -> String {
    let mut parts = Vec::new();
    if let Some(registrar) = &result.registrar {
        parts.push(format!("Registrar: {}", registrar));
    }
    if let Some(created) = &result.creation {
        parts.push(format!("Created: {}", created.format("%Y-%m-%d")));
    }
    if let Some(expires) = &result.expiration {
        parts.push(format!("Expires: {}", expires.format("%Y-%m-%d")));
    }
    parts.join(", ")
}

/// Extract a brief error reason from a result with unknown status.
fn brief_error(result: &DomainResult) -> &str {
    match &result.error {
        Some(msg) => {
            let m = msg.to_lowercase();
            if m.contains("timeout") || m.contains("timed out") {
                "(timeout)"
            } else if m.contains("rate limit") || m.contains("429") {
                "(rate limited)"
            } else if m.contains("network") || m.contains("dns") || m.contains("connect") {
                "(network error)"
            } else if m.contains("parse") || m.contains("json") {
                "(parsing error)"
            } else if m.contains("bootstrap") || m.contains("tld") {
                "(unknown TLD)"
            } else {
                "(error)"
            }
        }
        None => "(unknown status)",
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
