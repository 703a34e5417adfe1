//! Core data types for pattern searches.
//!
//! This module defines the search configuration, the result of a single
//! lookup, and the per-candidate outcomes handed to a reporter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// WHOIS server used when nothing else is configured.
pub const DEFAULT_WHOIS_HOST: &str = "whois.crsnic.net";

/// Standard WHOIS port.
pub const DEFAULT_WHOIS_PORT: u16 = 43;

/// Suffix appended to patterns that contain no `.`.
pub const DEFAULT_SUFFIX: &str = ".com";

/// Address of a WHOIS directory server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisServer {
    pub host: String,
    pub port: u16,
}

impl WhoisServer {
    pub fn new<H: Into<String>>(host: H, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for WhoisServer {
    fn default() -> Self {
        Self::new(DEFAULT_WHOIS_HOST, DEFAULT_WHOIS_PORT)
    }
}

impl fmt::Display for WhoisServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Configuration for a search run.
///
/// Built by the caller (usually the CLI after merging config files,
/// environment and flags) and passed to [`crate::DomainSearcher`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// WHOIS server to query
    pub server: WhoisServer,

    /// Appended to patterns without a `.`
    /// Default: ".com"
    pub default_suffix: String,

    /// Only expand patterns; never touch the network
    pub dry_run: bool,

    /// Suppress registered candidates from the report
    pub only_available: bool,

    /// Emit a progress event before every candidate
    pub show_progress: bool,

    /// Abort the whole run on the first transport failure instead of
    /// reporting it and moving on
    pub fail_fast: bool,

    /// Limit for a single lookup. `None` waits as long as the server keeps
    /// the connection open.
    pub timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            server: WhoisServer::default(),
            default_suffix: DEFAULT_SUFFIX.to_string(),
            dry_run: false,
            only_available: false,
            show_progress: false,
            fail_fast: false,
            timeout: None,
        }
    }
}

impl SearchConfig {
    pub fn with_server(mut self, server: WhoisServer) -> Self {
        self.server = server;
        self
    }

    pub fn with_default_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.default_suffix = suffix.into();
        self
    }

    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn with_only_available(mut self, enabled: bool) -> Self {
        self.only_available = enabled;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn with_fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Registration status reported by the directory server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    /// No registration record; the name can be registered
    Available,
    Registered,
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStatus::Available => write!(f, "available"),
            LookupStatus::Registered => write!(f, "registered"),
        }
    }
}

/// What happened to one candidate, as handed to a reporter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Dry run: the candidate was produced but not looked up
    Candidate { domain: String },
    Available { domain: String },
    Registered { domain: String },
    /// The lookup failed; the run carried on
    Failed { domain: String, error: String },
}

impl Outcome {
    pub fn domain(&self) -> &str {
        match self {
            Outcome::Candidate { domain }
            | Outcome::Available { domain }
            | Outcome::Registered { domain }
            | Outcome::Failed { domain, .. } => domain,
        }
    }
}

/// Tally for one pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    /// The pattern after suffix normalization
    pub pattern: String,
    /// Precomputed candidate count
    pub total: u128,
    /// Candidates actually produced
    pub processed: u128,
    pub available: u128,
    pub registered: u128,
    pub failed: u128,
}

/// Tally for a multi-pattern run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub patterns: Vec<SearchSummary>,
    /// Patterns that failed to compile
    pub rejected: usize,
}

impl RunSummary {
    pub fn processed(&self) -> u128 {
        self.patterns.iter().map(|s| s.processed).sum()
    }

    pub fn available(&self) -> u128 {
        self.patterns.iter().map(|s| s.available).sum()
    }

    pub fn registered(&self) -> u128 {
        self.patterns.iter().map(|s| s.registered).sum()
    }

    pub fn failed(&self) -> u128 {
        self.patterns.iter().map(|s| s.failed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.server.host, "whois.crsnic.net");
        assert_eq!(config.server.port, 43);
        assert_eq!(config.default_suffix, ".com");
        assert!(!config.dry_run);
        assert!(!config.fail_fast);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_builder() {
        let config = SearchConfig::default()
            .with_server(WhoisServer::new("127.0.0.1", 4343))
            .with_dry_run(true)
            .with_only_available(true)
            .with_timeout(Some(Duration::from_secs(2)));
        assert_eq!(config.server.to_string(), "127.0.0.1:4343");
        assert!(config.dry_run);
        assert!(config.only_available);
        assert_eq!(config.timeout, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_string(&Outcome::Available {
            domain: "abc.com".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"available","domain":"abc.com"}"#);

        let failed = Outcome::Failed {
            domain: "x.com".to_string(),
            error: "reset".to_string(),
        };
        assert_eq!(failed.domain(), "x.com");
    }

    #[test]
    fn test_run_summary_totals() {
        let run = RunSummary {
            patterns: vec![
                SearchSummary {
                    processed: 3,
                    available: 1,
                    registered: 2,
                    ..Default::default()
                },
                SearchSummary {
                    processed: 2,
                    failed: 1,
                    available: 1,
                    ..Default::default()
                },
            ],
            rejected: 1,
        };
        assert_eq!(run.processed(), 5);
        assert_eq!(run.available(), 2);
        assert_eq!(run.registered(), 2);
        assert_eq!(run.failed(), 1);
    }
}
