//! Terminal output for the `check` and `query` subcommands.
//!
//! Colored result lines and the closing summary. Uses only the `console`
//! crate; everything goes to stdout so `--json` output stays clean.

use crate::client::{Envelope, QueryResult};
use console::{pad_str, style, Alignment};
use std::time::Duration;

const DOMAIN_WIDTH: usize = 30;

/// How a single endpoint answer is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Available,
    Taken,
    Failed,
}

impl Outcome {
    pub fn of(result: &QueryResult) -> Self {
        match &result.response {
            Some(Envelope {
                available: Some(true),
                ..
            }) => Outcome::Available,
            Some(envelope) if envelope.is_success() => Outcome::Taken,
            _ => Outcome::Failed,
        }
    }
}

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print one query result with colors and alignment.
///
/// If `counter` is Some((current, total)), a progress prefix like `[3/8]` is shown.
pub fn print_result(result: &QueryResult, verbose: bool, counter: Option<(usize, usize)>) {
    let padded_domain = pad_str(&result.domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));

    let prefix = match counter {
        Some((cur, total)) => format!("{} ", style(format!("[{}/{}]", cur, total)).dim()),
        None => String::new(),
    };

    match (Outcome::of(result), &result.response) {
        (Outcome::Available, Some(envelope)) => {
            let tier = envelope.tier.as_deref().unwrap_or("standard");
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&padded_domain).white(),
                style("AVAILABLE").green().bold(),
                style(tier).dim(),
            );
        }
        (Outcome::Taken, Some(envelope)) => {
            let reason = envelope.reason.as_deref().unwrap_or("-");
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&padded_domain).white(),
                style("TAKEN").red().bold(),
                style(reason).dim(),
            );
        }
        _ => {
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&padded_domain).white(),
                style("ERROR").yellow(),
                style(brief_error(result)).dim(),
            );
        }
    }

    if verbose {
        println!(
            "    {} Answered in {}ms",
            style("└─").dim(),
            result.elapsed.as_millis(),
        );
    }
}

/// Short, single-line description of why a query did not succeed.
fn brief_error(result: &QueryResult) -> String {
    if let Some(envelope) = &result.response {
        return envelope
            .reason
            .clone()
            .unwrap_or_else(|| "no reason given".to_string());
    }

    match result.error.as_deref() {
        Some(msg) if msg.contains("timed out") => "timeout".to_string(),
        Some(msg) if msg.contains("error sending request") || msg.contains("connect") => {
            "connection failed".to_string()
        }
        Some(msg) if msg.contains("decoding") => "unreadable response".to_string(),
        Some(msg) => msg.to_string(),
        None => "unknown error".to_string(),
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Tally of outcomes over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub available: usize,
    pub taken: usize,
    pub failed: usize,
}

impl Tally {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Available => self.available += 1,
            Outcome::Taken => self.taken += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.available + self.taken + self.failed
    }
}

/// Print the final summary bar with colored counts.
pub fn print_summary(tally: &Tally, duration: Duration) {
    let total = tally.total();
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
        style(format!("{} available", tally.available)).green(),
        style("|").dim(),
        style(format!("{} taken", tally.taken)).red(),
        style("|").dim(),
        style(format!("{} failed", tally.failed)).yellow(),
    );
}
