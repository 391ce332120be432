//! Remote metadata retrieval.

use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::DefaultRetryableStrategy;
use serde_json::Value;

use crate::utils::http::{create_base_http_client, create_retryable_http_client, HttpRetryConfig};

/// Fetches logos and metadata documents
///
/// Failures are outcomes, never errors: an unreachable URI simply does not exist.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
	/// Whether a GET on `uri` succeeds
	async fn exists(&self, uri: &str) -> bool;

	/// The JSON document at `uri`, if it can be fetched and decoded
	async fn fetch_json(&self, uri: &str) -> Option<Value>;
}

/// [`MetadataFetcher`] over HTTP(S) with retries on transient failures
#[derive(Clone, Debug)]
pub struct HttpMetadataFetcher {
	client: ClientWithMiddleware,
}

impl HttpMetadataFetcher {
	pub fn new(retry_config: &HttpRetryConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
		let base_client = create_base_http_client(timeout)?;
		let client = create_retryable_http_client(
			retry_config,
			base_client,
			None::<DefaultRetryableStrategy>,
		);
		Ok(Self { client })
	}

	async fn get(&self, uri: &str) -> Option<reqwest::Response> {
		if url::Url::parse(uri).is_err() {
			tracing::debug!(uri, "Not probing malformed URI");
			return None;
		}

		match self.client.get(uri).send().await {
			Ok(response) if response.status().is_success() => Some(response),
			Ok(response) => {
				tracing::debug!(uri, status = %response.status(), "Metadata not available");
				None
			}
			Err(e) => {
				tracing::debug!(uri, error = %e, "Metadata fetch failed");
				None
			}
		}
	}
}

#[async_trait]
impl MetadataFetcher for HttpMetadataFetcher {
	async fn exists(&self, uri: &str) -> bool {
		self.get(uri).await.is_some()
	}

	async fn fetch_json(&self, uri: &str) -> Option<Value> {
		let response = self.get(uri).await?;
		match response.json::<Value>().await {
			Ok(document) => Some(document),
			Err(e) => {
				tracing::debug!(uri, error = %e, "Metadata is not valid JSON");
				None
			}
		}
	}
}
