//! Menu feed data sources
//!
//! A [`FeedSource`] produces a fresh [`MenuFeed`] snapshot on every call.
//! Two adapters exist:
//! - [`RemoteSource`]: GET the feed JSON from a URL
//! - [`CacheSource`]: read a previously saved copy from disk
//!
//! [`from_config`] picks one based on [`GlobalConfig`], and [`refresh_cache`]
//! saves a snapshot from any source into the cache file.

pub mod cache;
pub mod remote;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::{GlobalConfig, SourceMode};
use crate::menu::{MenuError, MenuFeed};

pub use cache::CacheSource;
pub use remote::RemoteSource;

// ============================================================================
// FeedSource Trait
// ============================================================================

/// Something that can hand out the current menu feed
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable location (URL or path) for logs
    fn describe(&self) -> String;

    /// Fetch a fresh snapshot of the feed
    async fn fetch(&self) -> Result<MenuFeed, SourceError>;
}

/// Errors from fetching or storing the feed.
///
/// The `Display` text is what the menu tool reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Server configuration error: DATA_SOURCE_URL not set.")]
    NotConfigured,

    #[error("Invalid data source URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to fetch data from URL: {context}: {source}")]
    Http {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch data from URL: HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse JSON from {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode menu feed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Local cache file not found: {}. Run `bobmenu fetch` first.", .0.display())]
    CacheMissing(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SourceError> for MenuError {
    fn from(e: SourceError) -> Self {
        MenuError::Adapter(e.to_string())
    }
}

// ============================================================================
// Source selection
// ============================================================================

/// Build the source selected by configuration.
///
/// In `auto` mode the remote URL wins when one is configured.
pub fn from_config(config: &GlobalConfig) -> Result<Arc<dyn FeedSource>, SourceError> {
    let use_remote = match config.source {
        SourceMode::Remote => true,
        SourceMode::Cache => false,
        SourceMode::Auto => config.source_url.is_some(),
    };

    let source: Arc<dyn FeedSource> = if use_remote {
        Arc::new(remote_from_config(config)?)
    } else {
        Arc::new(CacheSource::new(config.cache_path()))
    };

    tracing::info!(source = %source.describe(), "menu feed source selected");
    Ok(source)
}

/// Build the remote source regardless of the configured mode
pub fn remote_from_config(config: &GlobalConfig) -> Result<RemoteSource, SourceError> {
    let url = config.source_url.as_deref().ok_or(SourceError::NotConfigured)?;
    RemoteSource::new(url, config.connect_timeout(), config.request_timeout())
}

/// Fetch a snapshot from `upstream` and save it at `path`.
///
/// Parent directories are created as needed. The file is pretty-printed
/// UTF-8 JSON with the feed's key order kept. Returns the number of days saved.
pub async fn refresh_cache(upstream: &dyn FeedSource, path: &Path) -> Result<usize, SourceError> {
    tracing::info!(from = %upstream.describe(), to = %path.display(), "refreshing menu cache");

    let feed = upstream.fetch().await?;
    let json = serde_json::to_vec_pretty(&feed).map_err(SourceError::Encode)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(|source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    tokio::fs::write(path, json).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(days = feed.len(), path = %path.display(), "menu cache saved");
    Ok(feed.len())
}
