//! Terminal output for the domainsearch CLI.
//!
//! Result lines go to stdout; the progress line, pattern errors and the
//! summary go to stderr so stdout can be piped. Uses only the `console`
//! crate for styling.

use console::{style, Term};
use domainsearch_lib::{DomainSearchError, Outcome, RunSummary, SearchReporter};

// ── Reporter ─────────────────────────────────────────────────────────────────

/// [`SearchReporter`] that prints every outcome as it arrives.
pub struct CliReporter {
    json: bool,
    debug: bool,
    term: Term,
    /// Width of the progress line currently on screen, 0 when none
    progress_width: usize,
}

impl CliReporter {
    pub fn new(json: bool, debug: bool) -> Self {
        Self {
            json,
            debug,
            term: Term::stderr(),
            progress_width: 0,
        }
    }

    /// Wipe the progress line so the next output starts on a clean line.
    pub fn clear_progress(&mut self) {
        if self.progress_width > 0 {
            let blank = " ".repeat(self.progress_width);
            let _ = self.term.write_str(&format!("\r{}\r", blank));
            self.progress_width = 0;
        }
    }
}

impl SearchReporter for CliReporter {
    fn on_progress(&mut self, count: u128, total: u128) {
        let line = format_progress(count, total);
        let _ = self.term.write_str(&format!("\r{}", line));
        self.progress_width = line.len();
    }

    fn on_outcome(&mut self, outcome: &Outcome) {
        self.clear_progress();
        let line = if self.json {
            format_json(outcome)
        } else {
            format_outcome(outcome, self.debug)
        };
        println!("{}", line);
    }

    fn on_pattern_error(&mut self, pattern: &str, error: &DomainSearchError) {
        self.clear_progress();
        eprintln!(
            "{} {}",
            style("Error:").red().bold().for_stderr(),
            describe_pattern_error(pattern, error)
        );
    }
}

impl Drop for CliReporter {
    fn drop(&mut self) {
        self.clear_progress();
    }
}

// ── Formatting ───────────────────────────────────────────────────────────────

/// `Count: 3 of 26`
pub fn format_progress(count: u128, total: u128) -> String {
    format!("Count: {} of {}", count, total)
}

/// One text line for an outcome.
///
/// Dry-run candidates are printed bare so the output can be piped.
pub fn format_outcome(outcome: &Outcome, debug: bool) -> String {
    match outcome {
        Outcome::Candidate { domain } => domain.clone(),
        Outcome::Available { domain } => {
            format!("{} {}", style("✓").green().bold(), style(domain).green())
        }
        Outcome::Registered { domain } => format!("{} {}", style("-").dim(), domain),
        Outcome::Failed { domain, error } => {
            let reason = if debug {
                error.as_str()
            } else {
                brief_error(error)
            };
            format!(
                "{} {} {}",
                style("!").yellow().bold(),
                domain,
                style(format!("({})", reason)).yellow()
            )
        }
    }
}

/// One JSON object per line.
pub fn format_json(outcome: &Outcome) -> String {
    serde_json::to_string(outcome).unwrap_or_else(|e| {
        format!(
            r#"{{"status":"failed","domain":"{}","error":"{}"}}"#,
            outcome.domain(),
            e
        )
    })
}

/// Compile errors point at the offending character.
pub fn describe_pattern_error(pattern: &str, error: &DomainSearchError) -> String {
    match error {
        DomainSearchError::PatternCompile { index, reason, .. } => {
            format!(
                "invalid pattern '{}': {} (at position {})",
                pattern,
                reason,
                index + 1
            )
        }
        other => other.to_string(),
    }
}

/// Short reason for a failed lookup.
fn brief_error(error: &str) -> &'static str {
    let m = error.to_lowercase();
    if m.contains("timeout") || m.contains("timed out") {
        "timeout"
    } else if m.contains("failed to connect") {
        "connection failed"
    } else if m.contains("utf-8") {
        "invalid response"
    } else {
        "network error"
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// `N candidates | A available | R registered | F failed`
pub fn format_summary(run: &RunSummary) -> String {
    let processed = run.processed();
    format!(
        "{} candidate{} {} {} {} {} {} {}",
        style(processed).bold().for_stderr(),
        if processed == 1 { "" } else { "s" },
        style("|").dim().for_stderr(),
        style(format!("{} available", run.available()))
            .green()
            .for_stderr(),
        style("|").dim().for_stderr(),
        style(format!("{} registered", run.registered()))
            .red()
            .for_stderr(),
        style("|").dim().for_stderr(),
        style(format!("{} failed", run.failed()))
            .yellow()
            .for_stderr(),
    )
}

/// Print the summary to stderr for real runs that covered more than one
/// candidate.
pub fn print_summary(run: &RunSummary, dry_run: bool) {
    if dry_run || run.processed() <= 1 {
        return;
    }
    eprintln!("{}", format_summary(run));
}

// ── Tests ────────────────────────────────────────────────────────────────────
