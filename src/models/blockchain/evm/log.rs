//! EVM log data structures.

use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// An event log as returned by `eth_getLogs`
///
/// Only the fields needed to decode factory and collection events are kept; every
/// other field of the node response is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
	pub address: Address,
	pub topics: Vec<B256>,
	#[serde(default)]
	pub data: Bytes,
	/// Hex encoded block number, absent for pending logs
	#[serde(default)]
	pub block_number: Option<String>,
	#[serde(default)]
	pub transaction_hash: Option<B256>,
}

impl Log {
	/// Get the block number the log was emitted in
	pub fn block_number(&self) -> Option<u64> {
		self.block_number
			.as_deref()
			.and_then(|hex| u64::from_str_radix(hex.trim_start_matches("0x"), 16).ok())
	}

	/// Get the event signature hash (topic 0)
	pub fn signature_topic(&self) -> Option<&B256> {
		self.topics.first()
	}
}
