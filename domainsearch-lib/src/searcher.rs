//! Search orchestration.
//!
//! [`DomainSearcher`] takes patterns one at a time: normalize, compile,
//! enumerate, look up each candidate, report. Everything happens in
//! lockstep, so at most one WHOIS connection is open and the next candidate
//! is only produced after the previous lookup has finished.

use crate::error::DomainSearchError;
use crate::pattern::{compile, CompiledPattern};
use crate::protocols::{DomainLookup, WhoisClient};
use crate::types::{LookupStatus, Outcome, RunSummary, SearchConfig, SearchSummary};
use crate::utils::normalize_pattern;
use futures_util::stream::{self, Stream, StreamExt};
use tracing::{info, warn};

/// Sink for everything a search produces.
///
/// Only [`on_outcome`](SearchReporter::on_outcome) is required; the other
/// hooks default to doing nothing.
pub trait SearchReporter {
    /// A pattern compiled and is about to be enumerated.
    fn on_pattern_start(&mut self, _pattern: &str, _total: u128) {}

    /// Emitted before each candidate when progress is enabled. `count` is
    /// 1-based.
    fn on_progress(&mut self, _count: u128, _total: u128) {}

    fn on_outcome(&mut self, outcome: &Outcome);

    /// A pattern was rejected by the compiler. Only `search_patterns` calls
    /// this; `search_pattern` returns the error instead.
    fn on_pattern_error(&mut self, _pattern: &str, _error: &DomainSearchError) {}
}

/// Reporter that keeps every outcome in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub outcomes: Vec<Outcome>,
    /// `(count, total)` pairs in the order they were reported
    pub progress: Vec<(u128, u128)>,
    pub errors: Vec<String>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Domains of all collected outcomes, in order.
    pub fn domains(&self) -> Vec<String> {
        self.outcomes.iter().map(|o| o.domain().to_string()).collect()
    }
}

impl SearchReporter for CollectingReporter {
    fn on_progress(&mut self, count: u128, total: u128) {
        self.progress.push((count, total));
    }

    fn on_outcome(&mut self, outcome: &Outcome) {
        self.outcomes.push(outcome.clone());
    }

    fn on_pattern_error(&mut self, pattern: &str, error: &DomainSearchError) {
        self.errors.push(format!("{}: {}", pattern, error));
    }
}

/// Drives compile → enumerate → lookup → report for each pattern.
///
/// # Example
///
/// ```rust,no_run
/// use domainsearch_lib::{CollectingReporter, DomainSearcher, SearchConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let searcher = DomainSearcher::new(SearchConfig::default().with_only_available(true));
///     let mut reporter = CollectingReporter::new();
///     let summary = searcher.search_pattern("redCV", &mut reporter).await?;
///     println!("{} of {} available", summary.available, summary.total);
///     Ok(())
/// }
/// ```
pub struct DomainSearcher<L = WhoisClient> {
    config: SearchConfig,
    lookup: L,
}

impl DomainSearcher<WhoisClient> {
    /// Create a searcher that queries the WHOIS server named in `config`.
    pub fn new(config: SearchConfig) -> Self {
        let lookup = WhoisClient::new(config.server.clone()).with_timeout(config.timeout);
        Self { config, lookup }
    }
}

impl<L: DomainLookup> DomainSearcher<L> {
    /// Create a searcher with a custom lookup backend.
    pub fn with_lookup(config: SearchConfig, lookup: L) -> Self {
        Self { config, lookup }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Apply the configured default suffix to a raw pattern.
    pub fn normalize(&self, pattern: &str) -> String {
        normalize_pattern(pattern, &self.config.default_suffix)
    }

    /// Stream `(candidate, lookup result)` pairs for a compiled pattern,
    /// without reporting or tallying.
    ///
    /// Lookups run one after another; the next candidate is not generated
    /// until the previous lookup has completed.
    pub fn lookup_stream<'a>(
        &'a self,
        compiled: &'a CompiledPattern,
    ) -> impl Stream<Item = (String, Result<LookupStatus, DomainSearchError>)> + 'a {
        stream::iter(compiled.candidates()).then(move |domain| async move {
            let result = self.lookup.lookup(&domain).await;
            (domain, result)
        })
    }

    /// Search one pattern.
    ///
    /// # Errors
    ///
    /// - `PatternCompile` if the pattern is malformed; nothing is looked up.
    /// - A transport error, only when `fail_fast` is set. Otherwise failed
    ///   lookups are reported as [`Outcome::Failed`] and the search goes on.
    pub async fn search_pattern<R: SearchReporter + ?Sized>(
        &self,
        pattern: &str,
        reporter: &mut R,
    ) -> Result<SearchSummary, DomainSearchError> {
        let normalized = self.normalize(pattern);
        let compiled = compile(&normalized)?;
        let total = compiled.combination_count();

        info!(pattern = %normalized, total = %total, dry_run = self.config.dry_run, "searching pattern");
        reporter.on_pattern_start(&normalized, total);

        let mut summary = SearchSummary {
            pattern: normalized.clone(),
            total,
            ..Default::default()
        };

        if self.config.dry_run {
            for domain in compiled.candidates() {
                self.tick(&mut summary, reporter);
                reporter.on_outcome(&Outcome::Candidate { domain });
            }
            return Ok(summary);
        }

        for domain in compiled.candidates() {
            self.tick(&mut summary, reporter);
            match self.lookup.lookup(&domain).await {
                Ok(LookupStatus::Available) => {
                    summary.available += 1;
                    reporter.on_outcome(&Outcome::Available { domain });
                }
                Ok(LookupStatus::Registered) => {
                    summary.registered += 1;
                    if !self.config.only_available {
                        reporter.on_outcome(&Outcome::Registered { domain });
                    }
                }
                Err(error) => {
                    warn!(domain = %domain, error = %error, "lookup failed");
                    if self.config.fail_fast {
                        return Err(error);
                    }
                    summary.failed += 1;
                    reporter.on_outcome(&Outcome::Failed {
                        domain,
                        error: error.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }

    /// Search several patterns in order.
    ///
    /// A pattern that fails to compile is reported through
    /// [`SearchReporter::on_pattern_error`] and skipped; the others still run.
    ///
    /// # Errors
    ///
    /// Only a transport error in `fail_fast` mode aborts the run.
    pub async fn search_patterns<R: SearchReporter + ?Sized>(
        &self,
        patterns: &[String],
        reporter: &mut R,
    ) -> Result<RunSummary, DomainSearchError> {
        let mut run = RunSummary::default();

        for pattern in patterns {
            match self.search_pattern(pattern, reporter).await {
                Ok(summary) => run.patterns.push(summary),
                Err(error) if error.is_compile_error() => {
                    warn!(pattern = %pattern, error = %error, "skipping pattern");
                    reporter.on_pattern_error(pattern, &error);
                    run.rejected += 1;
                }
                Err(error) => return Err(error),
            }
        }

        Ok(run)
    }

    fn tick<R: SearchReporter + ?Sized>(&self, summary: &mut SearchSummary, reporter: &mut R) {
        summary.processed += 1;
        if self.config.show_progress {
            reporter.on_progress(summary.processed, summary.total);
        }
    }
}
