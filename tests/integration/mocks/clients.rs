//! Mock implementation of the EVM client.
//!
//! Lets the scanner, the collection source and the synchronizer run against
//! scripted chain responses instead of a node.

use std::{
	collections::{HashMap, HashSet},
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc, Mutex,
	},
};

use alloy::{
	primitives::{Address, Bytes},
	sol_types::{SolCall, SolValue},
};
use async_trait::async_trait;
use mockall::mock;

use token_list_sync::{
	models::{EVMLog, EVMLogFilter},
	services::blockchain::{BlockChainClient, BlockChainError, EvmClientTrait},
};

mock! {
	/// Mock implementation of the EVM client trait.
	pub EvmClientTrait {}

	#[async_trait]
	impl BlockChainClient for EvmClientTrait {
		async fn get_latest_block_number(&self) -> Result<u64, BlockChainError>;
	}

	#[async_trait]
	impl EvmClientTrait for EvmClientTrait {
		async fn get_logs(&self, filter: &EVMLogFilter) -> Result<Vec<EVMLog>, BlockChainError>;
		async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, BlockChainError>;
	}
}

/// Scripted chain answering the mock client
///
/// Logs are matched against the filter addresses, topic 0 and block range.
/// Contract calls are answered from the registered responses and revert
/// otherwise. Calls registered with [`ChainState::fail`] fail like an
/// unreachable node.
#[derive(Default)]
pub struct ChainState {
	pub latest_block: AtomicU64,
	pub logs: Mutex<Vec<EVMLog>>,
	pub responses: Mutex<HashMap<(Address, Bytes), Bytes>>,
	pub failing_calls: Mutex<HashSet<(Address, Bytes)>>,
	pub log_requests: AtomicU64,
}

impl ChainState {
	pub fn new(latest_block: u64) -> Arc<Self> {
		let state = Self::default();
		state.latest_block.store(latest_block, Ordering::SeqCst);
		Arc::new(state)
	}

	pub fn add_log(&self, log: EVMLog) {
		self.logs.lock().unwrap().push(log);
	}

	/// Answers `call` on `to` with the ABI encoding of `output`
	pub fn respond<T: SolValue>(&self, to: Address, call: impl SolCall, output: T) {
		self.responses.lock().unwrap().insert(
			(to, Bytes::from(call.abi_encode())),
			Bytes::from(output.abi_encode()),
		);
	}

	/// Makes `call` on `to` fail with a request error instead of reverting
	pub fn fail(&self, to: Address, call: impl SolCall) {
		self.failing_calls
			.lock()
			.unwrap()
			.insert((to, Bytes::from(call.abi_encode())));
	}

	fn logs_matching(&self, filter: &EVMLogFilter) -> Vec<EVMLog> {
		self.logs
			.lock()
			.unwrap()
			.iter()
			.filter(|log| filter.addresses.contains(&log.address))
			.filter(|log| {
				log.signature_topic()
					.is_some_and(|topic| filter.signature_topics.contains(topic))
			})
			.filter(|log| {
				log.block_number().is_some_and(|block| {
					block >= filter.range.from_block && block <= filter.range.to_block
				})
			})
			.cloned()
			.collect()
	}
}

/// A mock client backed by `state`
pub fn create_chain_client(state: Arc<ChainState>) -> MockEvmClientTrait {
	let mut client = MockEvmClientTrait::new();

	let latest = state.clone();
	client
		.expect_get_latest_block_number()
		.returning(move || Ok(latest.latest_block.load(Ordering::SeqCst)));

	let logs = state.clone();
	client.expect_get_logs().returning(move |filter| {
		logs.log_requests.fetch_add(1, Ordering::SeqCst);
		Ok(logs.logs_matching(filter))
	});

	client.expect_call().returning(move |to, data| {
		let key = (to, data);
		if state.failing_calls.lock().unwrap().contains(&key) {
			return Err(BlockChainError::request_error("connection reset"));
		}
		state
			.responses
			.lock()
			.unwrap()
			.get(&key)
			.cloned()
			.ok_or_else(|| BlockChainError::contract_error("execution reverted"))
	});

	client
}
