//! Mock transport used to exercise the endpoint manager and the EVM client.

use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use token_list_sync::services::blockchain::{
	BlockchainTransport, RotatingTransport, TransientErrorRetryStrategy, TransportError,
};

/// Transport whose connection test is a plain GET on the candidate URL
#[derive(Clone)]
pub struct MockRotatingTransport {
	client: reqwest::Client,
	pub current_url: Arc<RwLock<String>>,
}

impl MockRotatingTransport {
	pub fn new() -> Self {
		Self {
			client: reqwest::Client::new(),
			current_url: Arc::new(RwLock::new(String::new())),
		}
	}
}

#[async_trait::async_trait]
impl BlockchainTransport for MockRotatingTransport {
	async fn get_current_url(&self) -> String {
		self.current_url.read().await.clone()
	}

	async fn send_raw_request<P>(
		&self,
		_method: &str,
		_params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		Err(TransportError::network("not used by the tests", None, None))
	}

	fn set_retry_policy(
		&mut self,
		_: ExponentialBackoff,
		_: Option<TransientErrorRetryStrategy>,
	) -> Result<(), anyhow::Error> {
		Ok(())
	}

	fn update_endpoint_manager_client(
		&mut self,
		_: ClientWithMiddleware,
	) -> Result<(), anyhow::Error> {
		Ok(())
	}
}

#[async_trait::async_trait]
impl RotatingTransport for MockRotatingTransport {
	async fn try_connect(&self, url: &str) -> Result<(), anyhow::Error> {
		match self.client.get(url).send().await {
			Ok(_) => Ok(()),
			Err(e) => Err(anyhow::anyhow!("Failed to connect: {}", e)),
		}
	}

	async fn update_client(&self, url: &str) -> Result<(), anyhow::Error> {
		*self.current_url.write().await = url.to_string();
		Ok(())
	}
}
