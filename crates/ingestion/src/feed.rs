//! Warning feed retrieval.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Public feed of current meteorological warnings.
pub const DEFAULT_FEED_URL: &str = "https://danepubliczne.imgw.pl/api/data/warningsmeteo";

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed endpoint URL.
    pub url: String,
    /// HTTP request timeout.
    pub request_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            request_timeout: Duration::from_secs(20),
        }
    }
}

/// Fetches raw warning records from the external feed.
pub struct FeedClient {
    client: Client,
    config: FeedConfig,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| IngestError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Fetch the current batch of raw warning records.
    ///
    /// One attempt, no retry. Any failure (network, HTTP status, malformed
    /// JSON) is logged and absorbed into an empty batch; the caller cannot
    /// distinguish a failed fetch from an empty feed.
    pub async fn fetch(&self) -> Vec<Value> {
        match self.try_fetch().await {
            Ok(records) => records,
            Err(e) => {
                warn!(url = %self.config.url, error = %e, "Feed fetch failed, treating as empty batch");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| IngestError::Fetch(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| IngestError::FeedStatus(e.to_string()))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| IngestError::FeedPayload(e.to_string()))?;

        let records = records_from_payload(payload);
        debug!(records = records.len(), "Parsed feed payload");
        Ok(records)
    }
}

/// Extract the record list from a feed payload.
///
/// The feed serves either a top-level array or an object with a
/// `warnings` array; anything else counts as empty.
pub fn records_from_payload(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(records) => records,
        Value::Object(mut map) => match map.remove("warnings") {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_top_level_list() {
        let records = records_from_payload(json!([{"id": "a"}, {"id": "b"}]));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_payload_warnings_object() {
        let records = records_from_payload(json!({"warnings": [{"id": "a"}]}));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_payload_object_without_warnings_is_empty() {
        assert!(records_from_payload(json!({"items": [1, 2]})).is_empty());
    }

    #[test]
    fn test_payload_warnings_not_a_list_is_empty() {
        assert!(records_from_payload(json!({"warnings": "soon"})).is_empty());
    }

    #[test]
    fn test_payload_scalar_is_empty() {
        assert!(records_from_payload(json!("unexpected")).is_empty());
        assert!(records_from_payload(json!(null)).is_empty());
    }
}
