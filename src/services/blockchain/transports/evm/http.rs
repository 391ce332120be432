//! EVM flavoured HTTP transport.
//!
//! Wraps [`HttpTransportClient`] and tests endpoints with `eth_chainId`, which
//! every EVM node answers without touching state.

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Serialize;
use serde_json::Value;

use crate::{
	models::Network,
	services::blockchain::transports::{
		BlockchainTransport, HttpTransportClient, RotatingTransport, TransientErrorRetryStrategy,
		TransportError,
	},
};

/// Connection test sent to every candidate endpoint
const EVM_TEST_CONNECTION_PAYLOAD: &str =
	r#"{"id":1,"jsonrpc":"2.0","method":"eth_chainId","params":[]}"#;

/// A client for interacting with EVM-compatible blockchain nodes
#[derive(Clone, Debug)]
pub struct EVMTransportClient {
	http_client: HttpTransportClient,
}

impl EVMTransportClient {
	/// Connects to the best reachable endpoint of `network`
	pub async fn new(network: &Network) -> Result<Self, anyhow::Error> {
		let http_client =
			HttpTransportClient::new(network, Some(EVM_TEST_CONNECTION_PAYLOAD.to_string()))
				.await?;
		Ok(Self { http_client })
	}
}

#[async_trait::async_trait]
impl BlockchainTransport for EVMTransportClient {
	async fn get_current_url(&self) -> String {
		self.http_client.get_current_url().await
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.http_client.send_raw_request(method, params).await
	}

	fn set_retry_policy(
		&mut self,
		retry_policy: ExponentialBackoff,
		retry_strategy: Option<TransientErrorRetryStrategy>,
	) -> Result<(), anyhow::Error> {
		self.http_client
			.set_retry_policy(retry_policy, retry_strategy)
	}

	fn update_endpoint_manager_client(
		&mut self,
		client: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		self.http_client.update_endpoint_manager_client(client)
	}
}

#[async_trait::async_trait]
impl RotatingTransport for EVMTransportClient {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		self.http_client.try_connect(url).await
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		self.http_client.update_client(url).await
	}
}
