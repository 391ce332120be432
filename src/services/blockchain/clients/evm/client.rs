//! EVM-compatible blockchain client implementation.
//!
//! Provides the three JSON-RPC reads the synchronizer needs: the chain head,
//! event logs and read-only contract calls.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::{
	models::{EVMLog, EVMLogFilter, Network},
	services::blockchain::{
		client::BlockChainClient,
		transports::{BlockchainTransport, EVMTransportClient},
		BlockChainError,
	},
};

/// Client implementation for Ethereum Virtual Machine (EVM) compatible blockchains
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying transport client for RPC communication
	http_client: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}
}

impl EvmClient<EVMTransportClient> {
	/// Creates a new EVM client connected to the best reachable endpoint of `network`
	pub async fn new(network: &Network) -> Result<Self, BlockChainError> {
		let http_client = EVMTransportClient::new(network).await?;
		Ok(Self::new_with_transport(http_client))
	}
}

/// Extended functionality specific to EVM-compatible blockchains
#[async_trait]
pub trait EvmClientTrait: BlockChainClient {
	/// Retrieves the logs matching `filter`
	async fn get_logs(&self, filter: &EVMLogFilter) -> Result<Vec<EVMLog>, BlockChainError>;

	/// Executes a read-only call against the latest block
	///
	/// # Arguments
	/// * `to` - The contract to call
	/// * `data` - ABI encoded call data
	///
	/// # Returns
	/// The raw return data; a reverted call is a [`BlockChainError::ContractError`]
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, BlockChainError>;
}

/// Extracts the `result` of a JSON-RPC response, surfacing node side errors
fn extract_result(response: Value, method: &str) -> Result<Value, BlockChainError> {
	if let Some(error) = response.get("error").filter(|error| !error.is_null()) {
		let message = error
			.get("message")
			.and_then(Value::as_str)
			.unwrap_or("unknown error");
		return Err(if method == "eth_call" {
			BlockChainError::contract_error(format!("{} failed: {}", method, message))
		} else {
			BlockChainError::request_error(format!("{} failed: {}", method, message))
		});
	}

	match response {
		Value::Object(mut body) => body
			.remove("result")
			.ok_or_else(|| BlockChainError::request_error("Missing 'result' field".to_string())),
		_ => Err(BlockChainError::request_error(format!(
			"{} returned a non-object response",
			method
		))),
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> EvmClientTrait for EvmClient<T> {
	async fn get_logs(&self, filter: &EVMLogFilter) -> Result<Vec<EVMLog>, BlockChainError> {
		let params = vec![filter.to_rpc_params()];

		let response = self
			.http_client
			.send_raw_request("eth_getLogs", Some(params))
			.await?;

		let logs = extract_result(response, "eth_getLogs")?;
		serde_json::from_value(logs)
			.map_err(|e| BlockChainError::request_error(format!("Failed to parse logs: {}", e)))
	}

	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, BlockChainError> {
		let params = vec![json!({ "to": to, "data": data }), json!("latest")];

		let response = self
			.http_client
			.send_raw_request("eth_call", Some(params))
			.await?;

		let output = extract_result(response, "eth_call")?;
		serde_json::from_value(output).map_err(|e| {
			BlockChainError::request_error(format!("Failed to parse call output: {}", e))
		})
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BlockChainClient for EvmClient<T> {
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError> {
		let response = self
			.http_client
			.send_raw_request::<Value>("eth_blockNumber", None)
			.await?;

		let result = extract_result(response, "eth_blockNumber")?;
		let hex_str = result
			.as_str()
			.ok_or_else(|| BlockChainError::request_error("Block number is not a string"))?;

		u64::from_str_radix(hex_str.trim_start_matches("0x"), 16).map_err(|e| {
			BlockChainError::request_error(format!("Failed to parse block number: {}", e))
		})
	}
}
