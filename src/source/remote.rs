use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{FeedSource, SourceError};
use crate::menu::feed::parse_feed;
use crate::menu::MenuFeed;

/// Longest slice of an error body kept in the error message
const MAX_ERROR_BODY: usize = 200;

/// Fetches the feed JSON over HTTP(S) on every call
#[derive(Clone, Debug)]
pub struct RemoteSource {
    url: Url,
    client: Client,
}

impl RemoteSource {
    /// Create a remote source for `url` with optional timeouts
    pub fn new(
        url: &str,
        connect_timeout: Option<Duration>,
        request_timeout: Option<Duration>,
    ) -> Result<Self, SourceError> {
        let url = parse_source_url(url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| SourceError::Http {
            context: "Failed to build HTTP client",
            source,
        })?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

fn parse_source_url(input: &str) -> Result<Url, SourceError> {
    let url = Url::parse(input.trim()).map_err(|e| SourceError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(SourceError::InvalidUrl {
            url: input.to_string(),
            reason: format!("unsupported scheme '{}', expected http or https", scheme),
        }),
    }
}

#[async_trait]
impl FeedSource for RemoteSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<MenuFeed, SourceError> {
        tracing::debug!(url = %self.url, "fetching menu feed");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|source| SourceError::Http {
                context: "GET menu feed",
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            tracing::error!(url = %self.url, %status, "menu feed request failed");
            return Err(SourceError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(|source| SourceError::Http {
            context: "Failed to read response body",
            source,
        })?;

        let feed = parse_feed(&bytes).map_err(|source| {
            tracing::error!(url = %self.url, error = %source, "menu feed is not valid JSON");
            SourceError::Decode {
                origin: self.url.to_string(),
                source,
            }
        })?;

        tracing::debug!(url = %self.url, days = feed.len(), "menu feed fetched");
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        let source = RemoteSource::new("https://soonga00.github.io/ssafy-meal-data/meals.json", None, None).unwrap();
        assert_eq!(source.url().host_str(), Some("soonga00.github.io"));
        assert!(RemoteSource::new("http://localhost:8080/meals.json", None, Some(Duration::from_secs(5))).is_ok());
    }

    #[test]
    fn test_rejects_bad_urls() {
        for bad in ["not a url", "ftp://example.com/meals.json", "file:///tmp/meals.json"] {
            match RemoteSource::new(bad, None, None) {
                Err(SourceError::InvalidUrl { url, .. }) => assert_eq!(url, bad),
                other => panic!("{}: unexpected {:?}", bad, other.map(|s| s.describe())),
            }
        }
    }
}
