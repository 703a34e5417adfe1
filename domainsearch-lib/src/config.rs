//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DS_*`
//! environment variables, and merging them into a [`SearchConfig`] with
//! proper precedence rules: CLI > environment > config files > defaults.

use crate::error::DomainSearchError;
use crate::types::{SearchConfig, WhoisServer};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [server]
/// host = "whois.verisign-grs.com"
/// port = 43
/// timeout = "10s"
///
/// [search]
/// default_suffix = ".net"
/// only_available = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// WHOIS server settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Search behavior defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchDefaults>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Per-lookup timeout (as string, e.g., "5s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SearchDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_suffix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_available: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_progress: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,
}

impl FileConfig {
    /// Apply every value set in this file on top of `config`.
    pub fn apply_to(&self, mut config: SearchConfig) -> SearchConfig {
        if let Some(server) = &self.server {
            if let Some(host) = &server.host {
                config.server.host = host.clone();
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
            if let Some(timeout) = server.timeout.as_deref().and_then(parse_timeout_string) {
                config.timeout = Some(timeout);
            }
        }
        if let Some(search) = &self.search {
            if let Some(suffix) = &search.default_suffix {
                config.default_suffix = suffix.clone();
            }
            if let Some(only_available) = search.only_available {
                config.only_available = only_available;
            }
            if let Some(show_progress) = search.show_progress {
                config.show_progress = show_progress;
            }
            if let Some(fail_fast) = search.fail_fast {
                config.fail_fast = fail_fast;
            }
        }
        config
    }
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Directory searched for local config files; the working directory when
    /// unset
    local_dir: Option<PathBuf>,
    /// `$HOME`
    home_dir: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME`, or `~/.config`
    xdg_config_dir: Option<PathBuf>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a manager that searches the user's real home and XDG config
    /// directories.
    pub fn new() -> Self {
        let home_dir = env::var_os("HOME").map(PathBuf::from);
        let xdg_config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| home_dir.as_ref().map(|home| home.join(".config")));

        Self {
            local_dir: None,
            home_dir,
            xdg_config_dir,
        }
    }

    /// Look for local config files in `dir` instead of the working directory.
    pub fn with_local_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.local_dir = Some(dir.into());
        self
    }

    /// Look for the global config file in `dir` instead of `$HOME`.
    pub fn with_home_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Look for `domainsearch/config.toml` under `dir` instead of
    /// `$XDG_CONFIG_HOME`.
    pub fn with_xdg_config_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.xdg_config_dir = Some(dir.into());
        self
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// `FileError` when the file is missing or unreadable, `ConfigError` when
    /// it is not valid TOML or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainSearchError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainSearchError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainSearchError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Files that exist but fail to parse are skipped with a warning.
    pub fn discover_and_load(&self) -> FileConfig {
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        let mut merged = FileConfig::default();
        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => merged = merge_configs(merged, config),
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring config file"),
            }
        }
        merged
    }

    /// `./domainsearch.toml` or `./.domainsearch.toml`.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let dir = self
            .local_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        ["domainsearch.toml", ".domainsearch.toml"]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// `~/.domainsearch.toml` or `~/domainsearch.toml`.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = self.home_dir.as_ref()?;
        [".domainsearch.toml", "domainsearch.toml"]
            .iter()
            .map(|name| home.join(name))
            .find(|path| path.exists())
    }

    /// `$XDG_CONFIG_HOME/domainsearch/config.toml`, falling back to
    /// `~/.config`.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let path = self
            .xdg_config_dir
            .as_ref()?
            .join("domainsearch")
            .join("config.toml");
        path.exists().then_some(path)
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainSearchError> {
        if let Some(server) = &config.server {
            if let Some(host) = &server.host {
                if host.trim().is_empty() {
                    return Err(DomainSearchError::config("Server host cannot be empty"));
                }
            }
            if server.port == Some(0) {
                return Err(DomainSearchError::config("Server port must be between 1 and 65535"));
            }
            if let Some(timeout) = &server.timeout {
                if parse_timeout_string(timeout).is_none() {
                    return Err(DomainSearchError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout
                    )));
                }
            }
        }

        if let Some(search) = &config.search {
            if let Some(suffix) = &search.default_suffix {
                validate_suffix(suffix)?;
            }
        }

        Ok(())
    }
}

/// Merge two configurations; values set in `higher` win.
pub fn merge_configs(lower: FileConfig, higher: FileConfig) -> FileConfig {
    FileConfig {
        server: match (lower.server, higher.server) {
            (Some(lower), Some(higher)) => Some(ServerConfig {
                host: higher.host.or(lower.host),
                port: higher.port.or(lower.port),
                timeout: higher.timeout.or(lower.timeout),
            }),
            (lower, higher) => higher.or(lower),
        },
        search: match (lower.search, higher.search) {
            (Some(lower), Some(higher)) => Some(SearchDefaults {
                default_suffix: higher.default_suffix.or(lower.default_suffix),
                only_available: higher.only_available.or(lower.only_available),
                show_progress: higher.show_progress.or(lower.show_progress),
                fail_fast: higher.fail_fast.or(lower.fail_fast),
            }),
            (lower, higher) => higher.or(lower),
        },
    }
}

/// A default suffix must start with `.` and name something after it.
pub fn validate_suffix(suffix: &str) -> Result<(), DomainSearchError> {
    if suffix.len() < 2 || !suffix.starts_with('.') {
        return Err(DomainSearchError::config(format!(
            "Invalid default suffix '{}'. Use a form like '.com'",
            suffix
        )));
    }
    Ok(())
}

/// Configuration values read from `DS_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout: Option<Duration>,
    pub default_suffix: Option<String>,
    pub only_available: Option<bool>,
    pub show_progress: Option<bool>,
    pub fail_fast: Option<bool>,
    pub config: Option<String>,
    pub file: Option<String>,
}

impl EnvConfig {
    /// Apply every value set in the environment on top of `config`.
    pub fn apply_to(&self, mut config: SearchConfig) -> SearchConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.timeout.is_some() {
            config.timeout = self.timeout;
        }
        if let Some(suffix) = &self.default_suffix {
            config.default_suffix = suffix.clone();
        }
        if let Some(only_available) = self.only_available {
            config.only_available = only_available;
        }
        if let Some(show_progress) = self.show_progress {
            config.show_progress = show_progress;
        }
        if let Some(fail_fast) = self.fail_fast {
            config.fail_fast = fail_fast;
        }
        config
    }
}

/// Load configuration from the process environment.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    load_env_config_from(|key| env::var(key).ok())
}

/// Same as [`load_env_config`], reading variables through `lookup`.
pub fn load_env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    // DS_HOST - WHOIS server
    if let Some(host) = lookup("DS_HOST") {
        if !host.trim().is_empty() {
            env_config.host = Some(host.trim().to_string());
        }
    }

    // DS_PORT - WHOIS port
    if let Some(val) = lookup("DS_PORT") {
        match val.trim().parse::<u16>() {
            Ok(port) if port > 0 => env_config.port = Some(port),
            _ => warn!("Invalid DS_PORT='{}', must be 1-65535", val),
        }
    }

    // DS_TIMEOUT - per-lookup timeout
    if let Some(val) = lookup("DS_TIMEOUT") {
        match parse_timeout_string(&val) {
            Some(timeout) => env_config.timeout = Some(timeout),
            None => warn!("Invalid DS_TIMEOUT='{}', use format like '5s', '30s', '2m'", val),
        }
    }

    // DS_SUFFIX - default suffix
    if let Some(val) = lookup("DS_SUFFIX") {
        match validate_suffix(val.trim()) {
            Ok(()) => env_config.default_suffix = Some(val.trim().to_string()),
            Err(_) => warn!("Invalid DS_SUFFIX='{}', use a form like '.com'", val),
        }
    }

    env_config.only_available = lookup_bool(&lookup, "DS_ONLY_AVAILABLE");
    env_config.show_progress = lookup_bool(&lookup, "DS_PROGRESS");
    env_config.fail_fast = lookup_bool(&lookup, "DS_FAIL_FAST");

    // DS_CONFIG - explicit config file
    if let Some(path) = lookup("DS_CONFIG") {
        if !path.trim().is_empty() {
            env_config.config = Some(path);
        }
    }

    // DS_FILE - default patterns file
    if let Some(path) = lookup("DS_FILE") {
        if !path.trim().is_empty() {
            env_config.file = Some(path);
        }
    }

    debug!(?env_config, "loaded environment config");
    env_config
}

fn lookup_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let val = lookup(key)?;
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => {
            warn!("Invalid {}='{}', use true/false", key, val);
            None
        }
    }
}

/// Parse a timeout string like "5s", "30s", "2m" or a bare number of
/// seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let secs = if let Some(s) = timeout_str.strip_suffix('s') {
        s.parse::<u64>().ok()
    } else if let Some(m) = timeout_str.strip_suffix('m') {
        m.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }?;

    Some(Duration::from_secs(secs))
}

/// Resolve the final server address from an explicit host/port pair,
/// keeping the configured values for whichever is missing.
pub fn resolve_server(base: &WhoisServer, host: Option<&str>, port: Option<u16>) -> WhoisServer {
    WhoisServer {
        host: host.map(str::to_string).unwrap_or_else(|| base.host.clone()),
        port: port.unwrap_or(base.port),
    }
}
