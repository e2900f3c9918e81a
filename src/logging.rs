//! Tracing/logging configuration for bobmenu
//!
//! Supports:
//! - Verbosity levels: default (WARN), verbose (INFO), debug (DEBUG), quiet (ERROR), silent (off)
//! - Pretty (colored), JSON or compact output
//! - File logging at DEBUG level while the terminal shows the configured level
//!
//! Terminal output always goes to stderr: stdout carries the MCP protocol.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Crate target used in filter directives
const TARGET: &str = "bobmenu";

/// Log output format
#[derive(Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Colored human-readable output
    #[default]
    Pretty,
    /// Structured JSON output (one JSON object per line)
    Json,
    /// Compact single-line format
    Compact,
}

/// Tracing configuration built from CLI args
#[derive(Debug, Default)]
pub struct TracingConfig {
    pub verbose: bool,
    pub debug: bool,
    pub quiet: bool,
    pub silent: bool,
    pub format: LogFormat,
    /// Optional log file path (writes DEBUG+ regardless of terminal level)
    pub log_file: Option<PathBuf>,
}

impl TracingConfig {
    /// Terminal level, None when silent
    fn terminal_level(&self) -> Option<Level> {
        if self.silent {
            None
        } else if self.quiet {
            Some(Level::ERROR)
        } else if self.debug {
            // DEBUG is compiled out in release (release_max_level_info)
            if cfg!(debug_assertions) {
                Some(Level::DEBUG)
            } else {
                Some(Level::INFO)
            }
        } else if self.verbose {
            Some(Level::INFO)
        } else {
            Some(Level::WARN)
        }
    }

    fn level_flag_set(&self) -> bool {
        self.verbose || self.debug || self.quiet || self.silent
    }
}

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn directive(level: Level) -> String {
    format!("{}={},warn", TARGET, level.as_str().to_lowercase())
}

/// CLI flags win over RUST_LOG; RUST_LOG wins over the default level
fn terminal_filter(level: Level, cli_specified: bool) -> EnvFilter {
    if cli_specified {
        EnvFilter::new(directive(level))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(level)))
    }
}

fn terminal_layer(format: &LogFormat, filter: EnvFilter) -> BoxedLayer {
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_ansi(true)
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(path: &Path) -> Option<BoxedLayer> {
    let file = match std::fs::File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Failed to create log file {:?}: {}", path, e);
            return None;
        }
    };

    let level = if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO };

    Some(
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(file)
            .with_filter(EnvFilter::new(directive(level)))
            .boxed(),
    )
}

/// Initialize tracing with the given configuration.
///
/// Subsequent calls are ignored.
pub fn init_tracing(config: TracingConfig) {
    if TRACING_INITIALIZED.set(()).is_err() {
        return;
    }

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if let Some(layer) = config.log_file.as_deref().and_then(file_layer) {
        layers.push(layer);
    }

    if let Some(level) = config.terminal_level() {
        let filter = terminal_filter(level, config.level_flag_set());
        layers.push(terminal_layer(&config.format, filter));
    }

    if layers.is_empty() {
        let _ = tracing::subscriber::set_global_default(tracing_subscriber::registry());
    } else {
        let _ = tracing_subscriber::registry().with(layers).try_init();
    }
}
