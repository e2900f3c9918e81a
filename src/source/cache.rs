use std::path::PathBuf;

use async_trait::async_trait;

use super::{FeedSource, SourceError};
use crate::menu::feed::parse_feed;
use crate::menu::MenuFeed;

/// Reads the feed from a local JSON file written by `bobmenu fetch`
#[derive(Debug, Clone)]
pub struct CacheSource {
    path: PathBuf,
}

impl CacheSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeedSource for CacheSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<MenuFeed, SourceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::error!(path = %self.path.display(), "menu cache file not found");
                return Err(SourceError::CacheMissing(self.path.clone()));
            }
            Err(source) => {
                return Err(SourceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let feed = parse_feed(&bytes).map_err(|source| SourceError::Decode {
            origin: self.describe(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), days = feed.len(), "menu feed loaded from cache");
        Ok(feed)
    }
}
