//! `eth_getLogs` filter construction.

use alloy::primitives::{Address, B256};
use serde_json::{json, Value};

use crate::models::BlockRange;

/// Filter for a single `eth_getLogs` request
///
/// `signature_topics` are OR-ed together at topic position 0; `indexed_topics`
/// (when set) constrain the following topic positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
	pub addresses: Vec<Address>,
	pub signature_topics: Vec<B256>,
	pub indexed_topics: Vec<Option<B256>>,
	pub range: BlockRange,
}

impl LogFilter {
	pub fn new(addresses: Vec<Address>, signature_topics: Vec<B256>, range: BlockRange) -> Self {
		Self {
			addresses,
			signature_topics,
			indexed_topics: Vec::new(),
			range,
		}
	}

	/// Encodes the filter as the single JSON-RPC parameter object
	pub fn to_rpc_params(&self) -> Value {
		let mut topics = vec![json!(self.signature_topics)];
		topics.extend(self.indexed_topics.iter().map(|topic| json!(topic)));

		json!({
			"address": self.addresses,
			"topics": topics,
			"fromBlock": format!("0x{:x}", self.range.from_block),
			"toBlock": format!("0x{:x}", self.range.to_block),
		})
	}
}
