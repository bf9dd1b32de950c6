//! Ingest into the content-addressed store
//!
//! Uploads go to the store's HTTP API (`POST /api/v0/add`, multipart). The
//! store assigns the content address; callers never choose it.

use bytes::Bytes;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::types::HallmarkError;

/// Ingest configuration
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Store API base URL, e.g. `http://127.0.0.1:5001`
    pub api_url: String,
    /// Timeout for the upload request
    pub timeout: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5001".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Reply from the store's add endpoint
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Name")]
    #[allow(dead_code)]
    name: Option<String>,
    #[serde(rename = "Size")]
    #[allow(dead_code)]
    size: Option<String>,
}

/// Client for the content-addressed store ingest API
pub struct StoreIngest {
    config: IngestConfig,
    client: reqwest::Client,
}

impl StoreIngest {
    pub fn new(config: IngestConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Upload a blob and return the store-assigned content address
    pub async fn add(&self, data: Bytes, filename: &str) -> Result<String, HallmarkError> {
        let url = format!("{}/api/v0/add", self.config.api_url.trim_end_matches('/'));

        debug!(url = %url, size = data.len(), filename = %filename, "Uploading to content store");

        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| HallmarkError::Storage(format!("Store upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HallmarkError::Storage(format!(
                "Store returned {}: {}",
                status, body
            )));
        }

        let reply: AddResponse = response
            .json()
            .await
            .map_err(|e| HallmarkError::Storage(format!("Invalid store reply: {}", e)))?;

        info!(address = %reply.hash, filename = %filename, "Content stored");

        Ok(reply.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_response_parses_store_reply() {
        let reply: AddResponse = serde_json::from_str(
            r#"{"Name":"work.txt","Hash":"QmZ4tDuvesekSs4qM5ZBKpXiZGun7S2CYtEZRB3DYXkjGx","Size":"42"}"#,
        )
        .unwrap();
        assert_eq!(reply.hash, "QmZ4tDuvesekSs4qM5ZBKpXiZGun7S2CYtEZRB3DYXkjGx");
    }

    #[test]
    fn test_add_response_tolerates_minimal_reply() {
        let reply: AddResponse = serde_json::from_str(r#"{"Hash":"QmExample"}"#).unwrap();
        assert_eq!(reply.hash, "QmExample");
    }
}
