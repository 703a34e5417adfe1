//! Error handling for pattern compilation and domain lookups.
//!
//! Every failure the library can produce is a variant of [`DomainSearchError`],
//! from a malformed pattern to a dropped WHOIS connection.

use std::fmt;
use std::time::Duration;

/// Main error type for domainsearch operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainSearchError {
    /// The pattern could not be compiled.
    PatternCompile {
        pattern: String,
        /// Character (not byte) index of the offending character
        index: usize,
        reason: String,
    },

    /// Connecting to, writing to or reading from the WHOIS server failed
    Transport {
        domain: String,
        message: String,
    },

    /// A lookup exceeded the configured timeout
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Configuration errors (invalid settings, unparsable config file, etc.)
    ConfigError {
        message: String,
    },

    /// File I/O errors when reading pattern lists or config files
    FileError {
        path: String,
        message: String,
    },
}

impl DomainSearchError {
    /// Create a new pattern compile error.
    pub fn pattern_compile<P: Into<String>, R: Into<String>>(
        pattern: P,
        index: usize,
        reason: R,
    ) -> Self {
        Self::PatternCompile {
            pattern: pattern.into(),
            index,
            reason: reason.into(),
        }
    }

    /// Create a new transport error.
    pub fn transport<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::Transport {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from a single lookup and leaves the rest of
    /// the run unaffected.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Whether this error rejected a pattern before any lookup happened.
    pub fn is_compile_error(&self) -> bool {
        matches!(self, Self::PatternCompile { .. })
    }
}

impl fmt::Display for DomainSearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternCompile {
                pattern,
                index,
                reason,
            } => {
                write!(
                    f,
                    "Pattern compile error in '{}' at {}: {}",
                    pattern, index, reason
                )
            }
            Self::Transport { domain, message } => {
                write!(f, "WHOIS transport error for '{}': {}", domain, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for DomainSearchError {}

impl From<toml::de::Error> for DomainSearchError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}
