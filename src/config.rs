//! Global configuration management for bobmenu
//!
//! Configuration can be loaded from:
//! - JSON files or inline JSON strings (via --config / BOB_CONFIG)
//! - CLI flags, each with an environment variable fallback
//!   (DATA_SOURCE_URL, DATA_CACHE_DIR, DATA_CACHE_FILENAME, DEFAULT_FLOOR, ...)
//!
//! CLI flags and env vars take precedence over the config file, which takes
//! precedence over built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;
use crate::mcp::tool::selects_all_floors;

/// Default cache directory (relative to the working directory)
pub const DEFAULT_CACHE_DIR: &str = "data";

/// Default cache file name inside the cache directory
pub const DEFAULT_CACHE_FILENAME: &str = "meals.json";

/// Default total request timeout for the remote feed, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Configuration Arguments
// ============================================================================

/// Which data source adapter to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Remote URL when one is configured, local cache file otherwise
    #[default]
    Auto,
    /// Always fetch from the remote URL
    Remote,
    /// Always read the local cache file
    Cache,
}

/// Common configuration arguments (flattened into the top-level CLI)
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// Configuration file (JSON file path or JSON string).
    ///
    /// - A file path: --config bob.json
    ///
    /// - Inline JSON: --config '{"source_url":"https://...","default_floor":"10F"}'
    ///
    #[arg(long = "config", short = 'c', env = "BOB_CONFIG", value_name = "file.json or {json}")]
    pub config: Option<String>,

    /// Remote menu feed URL (JSON keyed by YYYY-MM-DD)
    #[arg(long, short = 'u', env = "DATA_SOURCE_URL", value_name = "http(s)://...")]
    pub source_url: Option<String>,

    /// Directory holding the local feed cache
    #[arg(long, env = "DATA_CACHE_DIR", value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// File name of the local feed cache inside --cache-dir
    #[arg(long, env = "DATA_CACHE_FILENAME", value_name = "NAME")]
    pub cache_filename: Option<String>,

    /// Floor to show when a query does not name one (e.g. 10F)
    #[arg(long, short = 'F', env = "DEFAULT_FLOOR")]
    pub default_floor: Option<String>,

    /// Data source selection
    #[arg(long, value_enum, env = "BOB_SOURCE")]
    pub source: Option<SourceMode>,

    /// Connection timeout for the remote feed, in seconds
    #[arg(long, env = "BOB_CONNECT_TIMEOUT", value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Total request timeout for the remote feed, in seconds
    #[arg(long, env = "BOB_REQUEST_TIMEOUT", value_name = "SECS")]
    pub request_timeout: Option<u64>,

    // -------------------------------------------------------------------------
    // Logging/Tracing Options
    // -------------------------------------------------------------------------

    /// Enable verbose output (INFO level logging)
    ///
    /// Default is WARN level. Use -v for INFO, -d for DEBUG.
    ///
    #[arg(short = 'v', long, env = "BOB_VERBOSE")]
    pub verbose: bool,

    /// Enable debug output (DEBUG level logging)
    #[arg(short = 'd', long, env = "BOB_DEBUG", conflicts_with = "verbose")]
    pub debug: bool,

    /// Quiet mode - only show errors
    #[arg(short = 'q', long, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    /// Silent mode - suppress all terminal log output
    ///
    /// Log file output (if configured) is unaffected.
    ///
    #[arg(long, short = 's', conflicts_with_all = ["verbose", "debug", "quiet"])]
    pub silent: bool,

    /// Log output format (logs always go to stderr)
    #[arg(long, short = 'L', value_enum, env = "BOB_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Write debug logs to file
    #[arg(long, short = 'l', env = "BOB_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Global Configuration
// ============================================================================

/// Global configuration structure (can be serialized/deserialized from JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Remote menu feed URL
    pub source_url: Option<String>,

    /// Directory holding the local feed cache
    pub cache_dir: PathBuf,

    /// Cache file name inside `cache_dir`
    pub cache_filename: String,

    /// Floor applied when a query does not name one
    pub default_floor: Option<String>,

    /// Data source selection
    pub source: SourceMode,

    /// Connection timeout in seconds
    pub connect_timeout: Option<u64>,

    /// Total request timeout in seconds
    pub request_timeout: Option<u64>,

    pub verbose: bool,
    pub debug: bool,
    pub quiet: bool,
    pub silent: bool,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            cache_filename: DEFAULT_CACHE_FILENAME.to_string(),
            default_floor: None,
            source: SourceMode::Auto,
            connect_timeout: None,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
            verbose: false,
            debug: false,
            quiet: false,
            silent: false,
            log_format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl GlobalConfig {
    /// Load configuration from ConfigArgs
    ///
    /// Merges sources with precedence:
    /// 1. CLI args / env vars (highest priority)
    /// 2. --config
    /// 3. Built-in defaults (lowest priority)
    pub fn from_args(args: &ConfigArgs) -> Result<Self> {
        let mut global = match &args.config {
            Some(input) => {
                let json_str = load_json_string(input)?;
                serde_json::from_str(&json_str).context("Failed to parse config JSON")?
            }
            None => GlobalConfig::default(),
        };

        if let Some(url) = &args.source_url {
            global.source_url = Some(url.clone());
        }
        if let Some(dir) = &args.cache_dir {
            global.cache_dir = dir.clone();
        }
        if let Some(name) = &args.cache_filename {
            global.cache_filename = name.clone();
        }
        if let Some(floor) = &args.default_floor {
            global.default_floor = Some(floor.clone());
        }
        if let Some(source) = args.source {
            global.source = source;
        }
        if let Some(secs) = args.connect_timeout {
            global.connect_timeout = Some(secs);
        }
        if let Some(secs) = args.request_timeout {
            global.request_timeout = Some(secs);
        }

        if args.verbose {
            global.verbose = true;
        }
        if args.debug {
            global.debug = true;
        }
        if args.quiet {
            global.quiet = true;
        }
        if args.silent {
            global.silent = true;
        }
        if let Some(format) = &args.log_format {
            global.log_format = format.clone();
        }
        if let Some(log_file) = &args.log_file {
            global.log_file = Some(log_file.clone());
        }

        // An empty env var (DATA_SOURCE_URL=) means "not set"; a default floor of "all" filters nothing
        global.source_url = global.source_url.filter(|u| !u.trim().is_empty());
        global.default_floor = global.default_floor.filter(|f| !selects_all_floors(f));

        Ok(global)
    }

    /// Full path of the local feed cache
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(&self.cache_filename)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }

    /// Initialize tracing/logging based on configuration
    ///
    /// Call this once early in main() before any logging calls.
    pub fn init_tracing(&self) {
        crate::logging::init_tracing(crate::logging::TracingConfig {
            verbose: self.verbose,
            debug: self.debug,
            quiet: self.quiet,
            silent: self.silent,
            format: self.log_format.clone(),
            log_file: self.log_file.clone(),
        });
    }
}

// ============================================================================
// Configuration Loading
// ============================================================================

/// Load JSON from either a file path or an inline JSON string
fn load_json_string(input: &str) -> Result<String> {
    if input.trim_start().starts_with('{') {
        return Ok(input.to_string());
    }

    let path = std::path::Path::new(input);
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))
}
