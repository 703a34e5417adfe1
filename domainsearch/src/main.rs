//! domainsearch CLI Application
//!
//! Expands wildcard domain patterns and checks every candidate against a
//! WHOIS server. This binary is a thin shell over domainsearch-lib: argument
//! parsing, config precedence, logging setup and terminal output.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domainsearch_lib::{
    load_env_config, parse_timeout_string, read_patterns_from_file, resolve_server,
    validate_suffix, ConfigManager, DomainSearcher, EnvConfig, FileConfig, SearchConfig,
};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domainsearch
#[derive(Parser, Debug)]
#[command(name = "domainsearch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Jerko Steiner <jerko.steiner@gmail.com>")]
#[command(about = "Search for unregistered domains using wildcard patterns")]
#[command(
    long_about = "Search for unregistered domains using wildcard patterns.\n\nPattern tokens: A = any letter, C = consonant, V = vowel, # = digit,\n* = letter or digit, [xyz] = one of x, y, z, ? = previous token is optional.\nPatterns without a '.' get the default suffix (.com) appended."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain patterns to expand (e.g. getCV, re[dk], A?b.io)
    #[arg(value_name = "PATTERN", help_heading = "Pattern Selection")]
    pub patterns: Vec<String>,

    /// Read patterns from a file (one per line, '//' comments)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Pattern Selection"
    )]
    pub file: Option<String>,

    /// Suffix appended to patterns without a '.' (default: .com)
    #[arg(long = "suffix", value_name = "SUFFIX", help_heading = "Pattern Selection")]
    pub suffix: Option<String>,

    /// Only print candidates, do not look them up
    #[arg(short = 'n', long = "dry-run", help_heading = "Pattern Selection")]
    pub dry_run: bool,

    /// WHOIS server to query (default: whois.crsnic.net)
    #[arg(long = "host", value_name = "HOST", help_heading = "Server")]
    pub host: Option<String>,

    /// WHOIS server port (default: 43)
    #[arg(long = "port", value_name = "PORT", help_heading = "Server")]
    pub port: Option<u16>,

    /// Per-lookup timeout, e.g. 10s or 2m (default: none)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Server")]
    pub timeout: Option<String>,

    /// Abort the whole run on the first failed lookup
    #[arg(long = "fail-fast", help_heading = "Server")]
    pub fail_fast: bool,

    /// Print only available domains
    #[arg(short = 'o', long = "only", help_heading = "Output Format")]
    pub only: bool,

    /// Show a "Count: i of N" progress line on stderr
    #[arg(long = "progress", help_heading = "Output Format")]
    pub progress: bool,

    /// Print one JSON object per result line
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show detailed debug information and error messages
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    init_logging(&args);
    info!("domainsearch v{} starting", env!("CARGO_PKG_VERSION"));

    match run_search(args).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.port == Some(0) {
        return Err("Port must be between 1 and 65535".to_string());
    }

    if let Some(host) = &args.host {
        if host.trim().is_empty() {
            return Err("Host cannot be empty".to_string());
        }
    }

    if let Some(timeout) = &args.timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    if let Some(suffix) = &args.suffix {
        validate_suffix(suffix).map_err(|e| e.to_string())?;
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level(args)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn log_level(args: &Args) -> &'static str {
    if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    }
}

/// Run the search and return the process exit code.
async fn run_search(args: Args) -> Result<i32, Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let config = build_config(&args, &env_config)?;
    let patterns = collect_patterns(&args, &env_config)?;

    debug!(?config, patterns = patterns.len(), "resolved configuration");

    let dry_run = config.dry_run;
    let searcher = DomainSearcher::new(config);
    let mut reporter = ui::CliReporter::new(args.json, args.debug);

    let run = searcher.search_patterns(&patterns, &mut reporter).await;
    reporter.clear_progress();
    let run = run?;

    ui::print_summary(&run, dry_run);

    Ok(if run.rejected > 0 { 1 } else { 0 })
}

/// Build the search configuration with proper precedence:
/// CLI > environment > config file > defaults.
fn build_config(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<SearchConfig, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new();

    // Step 1: Explicit config file (CLI, then DS_CONFIG) or discovery
    let file_config = if let Some(path) = &args.config {
        debug!("Using explicit config file (CLI --config): {}", path);
        load_explicit_config(&config_manager, path)?
    } else if let Some(path) = &env_config.config {
        debug!("Using explicit config file (DS_CONFIG env var): {}", path);
        load_explicit_config(&config_manager, path)?
    } else {
        debug!("Discovering config files...");
        config_manager.discover_and_load()
    };
    let config = file_config.apply_to(SearchConfig::default());

    // Step 2: Environment variables (DS_*)
    let config = env_config.apply_to(config);

    // Step 3: CLI arguments (highest precedence)
    Ok(apply_cli_args_to_config(config, args))
}

fn load_explicit_config(
    config_manager: &ConfigManager,
    path: &str,
) -> Result<FileConfig, Box<dyn std::error::Error>> {
    config_manager
        .load_file(path)
        .map_err(|e| format!("Failed to load config file '{}': {}", path, e).into())
}

/// Apply CLI arguments to config (highest precedence).
///
/// Boolean flags only ever switch a setting on, so an absent flag leaves the
/// config or environment value alone.
fn apply_cli_args_to_config(config: SearchConfig, args: &Args) -> SearchConfig {
    let server = resolve_server(&config.server, args.host.as_deref(), args.port);
    let mut config = config.with_server(server);

    if let Some(suffix) = &args.suffix {
        config = config.with_default_suffix(suffix.clone());
    }
    if let Some(timeout) = args.timeout.as_deref().and_then(parse_timeout_string) {
        config = config.with_timeout(Some(timeout));
    }
    if args.dry_run {
        config = config.with_dry_run(true);
    }
    if args.only {
        config = config.with_only_available(true);
    }
    if args.progress {
        config = config.with_progress(true);
    }
    if args.fail_fast {
        config = config.with_fail_fast(true);
    }
    config
}

/// Patterns from the command line followed by those from `--file` (or
/// `DS_FILE` when no file flag is given).
fn collect_patterns(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut patterns = args.patterns.clone();

    if let Some(path) = args.file.as_ref().or(env_config.file.as_ref()) {
        patterns.extend(read_patterns_from_file(path)?);
    }

    if patterns.is_empty() {
        return Err("You must specify patterns or a file with --file".into());
    }
    Ok(patterns)
}
