//! HTTP transport for JSON-RPC nodes.
//!
//! Picks the highest weighted endpoint that answers a connection test and keeps
//! the remaining ones as fallbacks for the [`EndpointManager`].

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Serialize;
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use url::Url;

use crate::{
	models::Network,
	services::blockchain::transports::{
		BlockchainTransport, EndpointManager, RotatingTransport, TransientErrorRetryStrategy,
		TransportError,
	},
	utils::http::{create_base_http_client, create_retryable_http_client, HttpRetryConfig},
};

/// Total time allowed for a single JSON-RPC request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON-RPC transport over HTTP with endpoint rotation
///
/// Cloning is cheap, clones share the connection pool and the active endpoint.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Plain client used for connection tests
	pub client: Arc<Client>,
	endpoint_manager: EndpointManager,
	/// JSON-RPC payload sent when testing an endpoint
	test_connection_payload: Value,
}

impl HttpTransportClient {
	/// Connects to the first reachable endpoint of `network`, by descending weight
	///
	/// # Arguments
	/// * `network` - Network configuration containing RPC URLs and weights
	/// * `test_connection_payload` - Optional JSON-RPC payload used to test endpoints
	///   (defaults to `net_version`)
	pub async fn new(
		network: &Network,
		test_connection_payload: Option<String>,
	) -> Result<Self, anyhow::Error> {
		let rpc_urls = network.weighted_rpc_urls();

		let test_connection_payload = match test_connection_payload {
			Some(payload) => {
				serde_json::from_str(&payload).context("Failed to parse test payload as JSON")?
			}
			None => json!({
				"jsonrpc": "2.0",
				"id": 1,
				"method": "net_version",
				"params": []
			}),
		};

		let http_client =
			create_base_http_client(REQUEST_TIMEOUT).context("Failed to create HTTP client")?;
		let retrying_client = create_retryable_http_client(
			&HttpRetryConfig::default(),
			http_client.clone(),
			Some(TransientErrorRetryStrategy),
		);

		for rpc_url in rpc_urls.iter() {
			let Ok(url) = Url::parse(&rpc_url.url) else {
				tracing::warn!(url = %rpc_url.url, "Skipping malformed RPC URL");
				continue;
			};

			match http_client
				.post(url)
				.json(&test_connection_payload)
				.send()
				.await
			{
				Ok(response) if response.status().is_success() => {
					let fallback_urls: Vec<String> = rpc_urls
						.iter()
						.filter(|other| other.url != rpc_url.url)
						.map(|other| other.url.clone())
						.collect();

					tracing::info!(
						network = %network.slug,
						url = %rpc_url.url,
						fallbacks = fallback_urls.len(),
						"Connected to RPC endpoint"
					);

					return Ok(Self {
						client: Arc::new(http_client),
						endpoint_manager: EndpointManager::new(
							retrying_client,
							rpc_url.url.as_ref(),
							fallback_urls,
						),
						test_connection_payload,
					});
				}
				Ok(response) => {
					tracing::warn!(url = %rpc_url.url, status = %response.status(), "RPC endpoint rejected connection test");
				}
				Err(e) => {
					tracing::warn!(url = %rpc_url.url, error = %e, "RPC endpoint unreachable");
				}
			}
		}

		Err(anyhow::anyhow!(
			"All RPC URLs of network {} failed to connect",
			network.slug
		))
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.endpoint_manager.active_url.read().await.clone()
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.endpoint_manager
			.send_raw_request(self, method, params)
			.await
	}

	fn set_retry_policy(
		&mut self,
		retry_policy: ExponentialBackoff,
		retry_strategy: Option<TransientErrorRetryStrategy>,
	) -> Result<(), anyhow::Error> {
		self.endpoint_manager
			.set_retry_policy(retry_policy, retry_strategy.unwrap_or_default());
		Ok(())
	}

	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		self.endpoint_manager.update_client(client);
		Ok(())
	}
}

#[async_trait]
impl RotatingTransport for HttpTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		let url = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;

		let response = self
			.client
			.post(url.clone())
			.json(&self.test_connection_payload)
			.send()
			.await
			.map_err(|e| anyhow::anyhow!("Failed to connect to {}: {}", url, e))?;

		if response.status().is_success() {
			Ok(())
		} else {
			Err(anyhow::anyhow!(
				"Failed to connect to {}: {}",
				url,
				response.status().as_u16()
			))
		}
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL: {}", url))?;
		// The middleware client is endpoint agnostic, only the manager's active URL moves
		Ok(())
	}
}
