//! Gateway retrieval for content-addressed objects
//!
//! The fetcher never returns an error: a timeout, transport failure, or
//! non-2xx response degrades to [`FetchedContent::Unavailable`], which the
//! similarity gate treats as "no content to compare". The two cases stay
//! distinguishable so callers and tests can tell an empty object from a
//! failed fetch.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Outcome of a gateway fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedContent {
    /// 2xx response body (may legitimately be empty)
    Available(String),
    /// Timeout, transport error, or non-2xx status
    Unavailable { reason: String },
}

impl FetchedContent {
    /// Content text, with unavailable content reading as empty
    pub fn text(&self) -> &str {
        match self {
            FetchedContent::Available(text) => text,
            FetchedContent::Unavailable { .. } => "",
        }
    }

    /// True when there is nothing to compare against
    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }
}

/// Source of content-addressed text
///
/// The duplicate gate depends on this seam rather than on a concrete HTTP
/// client, so checks can run against an in-memory source in tests.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, address: &str) -> FetchedContent;
}

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Retrieval gateway base URL, e.g. `http://127.0.0.1:8080`
    pub gateway_url: String,
    /// Client-side timeout per request
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:8080".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// HTTP fetcher over a content-addressed store gateway
pub struct GatewayFetcher {
    config: FetcherConfig,
    client: reqwest::Client,
}

impl GatewayFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn content_url(&self, address: &str) -> String {
        format!(
            "{}/ipfs/{}",
            self.config.gateway_url.trim_end_matches('/'),
            address
        )
    }
}

#[async_trait]
impl ContentSource for GatewayFetcher {
    async fn fetch(&self, address: &str) -> FetchedContent {
        let url = self.content_url(address);
        debug!(address = %address, url = %url, "Fetching content from gateway");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(address = %address, error = %e, "Gateway fetch failed");
                return FetchedContent::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            warn!(address = %address, status = %status, "Gateway returned error status");
            return FetchedContent::Unavailable {
                reason: format!("gateway returned {}", status),
            };
        }

        match response.text().await {
            Ok(text) => FetchedContent::Available(text),
            Err(e) => {
                warn!(address = %address, error = %e, "Failed to read gateway response body");
                FetchedContent::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_reads_as_empty() {
        let content = FetchedContent::Unavailable {
            reason: "gateway returned 404 Not Found".to_string(),
        };
        assert_eq!(content.text(), "");
        assert!(content.is_empty());
    }

    #[test]
    fn test_available_empty_is_still_empty() {
        // An empty object and a failed fetch read the same downstream,
        // but remain distinguishable by variant.
        let empty = FetchedContent::Available(String::new());
        assert!(empty.is_empty());
        assert_ne!(
            empty,
            FetchedContent::Unavailable {
                reason: String::new()
            }
        );
    }

    #[test]
    fn test_content_url_strips_trailing_slash() {
        let fetcher = GatewayFetcher::new(FetcherConfig {
            gateway_url: "http://127.0.0.1:8080/".to_string(),
            ..FetcherConfig::default()
        });
        assert_eq!(
            fetcher.content_url("QmExample"),
            "http://127.0.0.1:8080/ipfs/QmExample"
        );
    }
}
