//! Protocol implementations for domain lookups.
//!
//! Only WHOIS is supported: one plain-text request per TCP connection.

/// WHOIS protocol implementation
pub mod whois;

// Re-export commonly used functions and types
pub use whois::{classify_response, whois_exchange, DomainLookup, WhoisClient, NO_MATCH_MARKER};
