//! Rotation between the configured RPC endpoints.
//!
//! Requests go to the active endpoint. Network failures and rate limiting
//! statuses move the active endpoint to the back of the fallback list and retry
//! on the next one, visiting each endpoint at most once per request.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware, RetryableStrategy};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::services::blockchain::transports::{
	RotatingTransport, TransportError, ROTATE_ON_ERROR_CODES,
};

/// Active RPC endpoint plus the fallbacks it can rotate to
#[derive(Clone, Debug)]
pub struct EndpointManager {
	pub active_url: Arc<RwLock<String>>,
	pub fallback_urls: Arc<RwLock<Vec<String>>>,
	client: ClientWithMiddleware,
	rotation_lock: Arc<Mutex<()>>,
}

/// Outcome of sending a request to a single endpoint
#[derive(Debug)]
enum AttemptOutcome {
	/// A response came back, its status may still be an error
	Response(reqwest::Response),
	/// No response, e.g. connection refused or timeout
	NetworkError(reqwest_middleware::Error),
	/// The request body could not be built, retrying elsewhere cannot help
	SerializationError(TransportError),
}

impl EndpointManager {
	pub fn new(client: ClientWithMiddleware, active_url: &str, fallback_urls: Vec<String>) -> Self {
		Self {
			active_url: Arc::new(RwLock::new(active_url.to_string())),
			fallback_urls: Arc::new(RwLock::new(fallback_urls)),
			rotation_lock: Arc::new(Mutex::new(())),
			client,
		}
	}

	/// Replaces the middleware client used for requests
	pub fn update_client(&mut self, client: ClientWithMiddleware) {
		self.client = client;
	}

	/// Wraps the current client with a new retry policy and strategy
	pub fn set_retry_policy<R: RetryableStrategy + Send + Sync + 'static>(
		&mut self,
		retry_policy: ExponentialBackoff,
		retry_strategy: R,
	) {
		let updated_client = ClientBuilder::from_client(self.client.clone())
			.with(RetryTransientMiddleware::new_with_policy_and_strategy(
				retry_policy,
				retry_strategy,
			))
			.build();
		self.update_client(updated_client);
	}

	/// Number of endpoints known to the manager, the active one included
	async fn endpoint_count(&self) -> usize {
		self.fallback_urls.read().await.len() + 1
	}

	/// Rotates to the first reachable fallback URL
	///
	/// A fallback that fails the connection test stays at the back of the list.
	pub async fn rotate_url<T: RotatingTransport>(
		&self,
		transport: &T,
	) -> Result<(), TransportError> {
		let _guard = self.rotation_lock.lock().await;

		let current_active = self.active_url.read().await.clone();

		let candidate = {
			let mut fallback_urls = self.fallback_urls.write().await;
			match fallback_urls.iter().position(|url| url != &current_active) {
				Some(pos) => fallback_urls.remove(pos),
				None => {
					return Err(TransportError::url_rotation(
						format!("No fallback URL available, active URL: {}", current_active),
						None,
						None,
					));
				}
			}
		};

		if let Err(e) = transport.try_connect(&candidate).await {
			self.fallback_urls.write().await.push(candidate.clone());
			return Err(TransportError::url_rotation(
				format!("Failed to connect to fallback URL {}", candidate),
				Some(e.into()),
				None,
			));
		}

		transport.update_client(&candidate).await.map_err(|e| {
			TransportError::url_rotation(
				"Failed to update transport client with new URL",
				Some(e.into()),
				None,
			)
		})?;

		let mut active_url = self.active_url.write().await;
		let mut fallback_urls = self.fallback_urls.write().await;
		tracing::debug!(from = %current_active, to = %candidate, "Rotated RPC endpoint");
		fallback_urls.push(current_active);
		*active_url = candidate;
		Ok(())
	}

	async fn attempt_request_on_url<P>(
		&self,
		url: &str,
		transport: &impl RotatingTransport,
		method: &str,
		params: Option<P>,
	) -> AttemptOutcome
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let request_body = transport.customize_request(method, params).await;

		let body = match serde_json::to_string(&request_body) {
			Ok(body) => body,
			Err(e) => {
				return AttemptOutcome::SerializationError(TransportError::request_serialization(
					format!("Failed to serialize {} request", method),
					Some(Box::new(e)),
					None,
				));
			}
		};

		match self
			.client
			.post(url)
			.header("Content-Type", "application/json")
			.body(body)
			.send()
			.await
		{
			Ok(response) => AttemptOutcome::Response(response),
			Err(e) => AttemptOutcome::NetworkError(e),
		}
	}

	/// Sends a JSON-RPC request, rotating endpoints on network errors and
	/// rate limiting
	///
	/// Every endpoint is tried at most once per call. The first successful
	/// response is parsed and returned, otherwise the last failure is.
	pub async fn send_raw_request<
		T: RotatingTransport,
		P: Into<Value> + Send + Clone + Serialize,
	>(
		&self,
		transport: &T,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError> {
		let max_attempts = self.endpoint_count().await;
		let mut attempt = 0;

		loop {
			attempt += 1;
			let current_url = self.active_url.read().await.clone();

			let failure = match self
				.attempt_request_on_url(&current_url, transport, method, params.clone())
				.await
			{
				AttemptOutcome::Response(response) => {
					let status = response.status();
					if status.is_success() {
						return response.json().await.map_err(|e| {
							TransportError::response_parse(
								format!("Invalid JSON returned by {}", current_url),
								Some(Box::new(e)),
								None,
							)
						});
					}

					let body = response.text().await.unwrap_or_default();
					tracing::warn!(url = %current_url, %status, method, "RPC request failed");

					let error = TransportError::http(status, current_url.clone(), body, None, None);
					if !ROTATE_ON_ERROR_CODES.contains(&status.as_u16()) {
						return Err(error);
					}
					error
				}
				AttemptOutcome::NetworkError(e) => {
					tracing::warn!(url = %current_url, method, error = %e, "RPC endpoint unreachable");
					TransportError::network(
						format!("Failed to send request to {}", current_url),
						Some(e.into()),
						None,
					)
				}
				AttemptOutcome::SerializationError(e) => return Err(e),
			};

			if attempt >= max_attempts || self.fallback_urls.read().await.is_empty() {
				return Err(failure);
			}

			if let Err(e) = self.rotate_url(transport).await {
				tracing::warn!(error = %e, "Endpoint rotation failed");
				return Err(failure);
			}
		}
	}
}
