//! # domainsearch Library
//!
//! Expand wildcard domain patterns and check every candidate against a WHOIS
//! server.
//!
//! A pattern is a domain name where some characters stand for a whole class:
//! `A` any letter, `C` a consonant, `V` a vowel, `#` a digit, `*` a letter or
//! digit, `[xyz]` one of the listed characters. A `?` after any of those
//! makes it optional.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domainsearch_lib::{CollectingReporter, DomainSearcher, SearchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let searcher = DomainSearcher::new(SearchConfig::default());
//!     let mut reporter = CollectingReporter::new();
//!     searcher.search_pattern("getCV", &mut reporter).await?;
//!
//!     for outcome in &reporter.outcomes {
//!         println!("{:?}", outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Expanding without the network
//!
//! ```rust
//! use domainsearch_lib::compile;
//!
//! let pattern = compile("re[dk].com").unwrap();
//! assert_eq!(pattern.combination_count(), 2);
//! assert_eq!(pattern.candidates().collect::<Vec<_>>(), vec!["red.com", "rek.com"]);
//! ```

// Re-export main public API types and functions
pub use alphabet::{Alphabet, CharClass};
pub use config::{
    load_env_config, load_env_config_from, merge_configs, parse_timeout_string, resolve_server,
    validate_suffix, ConfigManager, EnvConfig, FileConfig, SearchDefaults, ServerConfig,
};
pub use enumerate::Candidates;
pub use error::DomainSearchError;
pub use pattern::{compile, estimate_pattern_count, expand_pattern, CompiledPattern, Slot, SlotKind};
pub use protocols::{classify_response, whois_exchange, DomainLookup, WhoisClient, NO_MATCH_MARKER};
pub use searcher::{CollectingReporter, DomainSearcher, SearchReporter};
pub use types::{
    LookupStatus, Outcome, RunSummary, SearchConfig, SearchSummary, WhoisServer, DEFAULT_SUFFIX,
    DEFAULT_WHOIS_HOST, DEFAULT_WHOIS_PORT,
};
pub use utils::{normalize_pattern, parse_pattern_lines, read_patterns_from_file};

// Public modules
pub mod pattern;

// Internal modules
mod alphabet;
mod config;
mod enumerate;
mod error;
mod protocols;
mod searcher;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainSearchError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Get library information for debugging or display purposes.
pub fn info() -> LibraryInfo {
    LibraryInfo {
        version: VERSION,
        author: AUTHOR,
        default_server: WhoisServer::default().to_string(),
    }
}

/// Information about the library build
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub version: &'static str,
    pub author: &'static str,
    pub default_server: String,
}
