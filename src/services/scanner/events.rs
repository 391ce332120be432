//! Factory creation events and their decoding into collections.

use std::collections::{BTreeMap, HashSet};

use alloy::primitives::{keccak256, Address, B256};

use crate::models::{Collection, EVMLog};

/// Signature hash of every watched factory event, mapped to the category of the
/// collections it creates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactoryEventMap {
	categories: BTreeMap<B256, String>,
}

impl FactoryEventMap {
	/// Hashes each `signature -> category` entry, e.g.
	/// `NewERC20Collection(address,address) -> ERC20`
	pub fn new(events: &BTreeMap<String, String>) -> Self {
		let categories = events
			.iter()
			.map(|(signature, category)| (keccak256(signature.trim().as_bytes()), category.clone()))
			.collect();

		Self { categories }
	}

	/// Topic 0 values OR-ed together in the factory log filter
	pub fn topic_filter(&self) -> Vec<B256> {
		self.categories.keys().copied().collect()
	}

	pub fn category(&self, topic: &B256) -> Option<&str> {
		self.categories.get(topic).map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.categories.is_empty()
	}
}

/// Decodes a factory creation log into an empty collection
///
/// The model address is read from topic 1 and the collection address from the
/// last topic. Returns `None` for malformed logs, unknown events and collections
/// outside `allowed`.
pub fn decode_creation_log(
	log: &EVMLog,
	events: &FactoryEventMap,
	allowed: &HashSet<Address>,
) -> Option<Collection> {
	if log.topics.len() < 2 {
		tracing::warn!(
			factory = %log.address,
			tx = ?log.transaction_hash,
			"Skipping factory log with fewer than two topics"
		);
		return None;
	}

	let Some(category) = log.signature_topic().and_then(|topic| events.category(topic)) else {
		tracing::warn!(
			factory = %log.address,
			topic = ?log.signature_topic(),
			"Skipping factory log with an unknown event signature"
		);
		return None;
	};

	let model_address = Address::from_word(log.topics[1]);
	let collection_address = Address::from_word(*log.topics.last()?);

	if !allowed.contains(&collection_address) {
		tracing::trace!(collection = %collection_address, "Collection not allow-listed");
		return None;
	}

	Some(Collection::new(
		collection_address,
		category,
		model_address,
		log.block_number(),
	))
}
