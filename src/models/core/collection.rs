//! Collections discovered from factory events and their items.

use std::collections::BTreeMap;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::models::SemVer;

/// A contiguous range of blocks searched by a single log request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct BlockRange {
	pub from_block: u64,
	pub to_block: u64,
}

impl BlockRange {
	pub const fn new(from_block: u64, to_block: u64) -> Self {
		Self {
			from_block,
			to_block,
		}
	}

	/// Number of blocks covered by the range (both ends included)
	pub fn len(&self) -> u64 {
		self.to_block.saturating_sub(self.from_block) + 1
	}

	pub fn is_empty(&self) -> bool {
		self.to_block < self.from_block
	}
}

/// A raw item record as read from the chain, before cleaning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawItem {
	pub object_id: U256,
	pub address: Address,
	pub name: Option<String>,
	pub symbol: Option<String>,
	/// Undecoded decimals, coerced when the token is built
	pub decimals: serde_json::Value,
	pub image: Option<String>,
	pub trust_wallet_uri: Option<String>,
	pub category: Option<String>,
}

/// A collection contract created by the factory
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
	pub address: Address,
	pub category: String,
	pub model_address: Address,
	/// Block of the creation event, when the node reported it
	pub creation_block: Option<u64>,
	pub items: BTreeMap<U256, RawItem>,
}

impl Collection {
	pub fn new(
		address: Address,
		category: impl Into<String>,
		model_address: Address,
		creation_block: Option<u64>,
	) -> Self {
		Self {
			address,
			category: category.into(),
			model_address,
			creation_block,
			items: BTreeMap::new(),
		}
	}

	/// EIP-55 form of the collection address
	pub fn checksum_address(&self) -> String {
		self.address.to_checksum(None)
	}
}

/// Collection level fields read from the collection contract
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CollectionInfo {
	pub name: String,
	pub symbol: Option<String>,
	pub standard_version: Option<U256>,
	pub interoperable_interface_model_version: Option<U256>,
	pub model_version: Option<U256>,
	pub image: Option<String>,
	pub trust_wallet_uri: Option<String>,
}

/// Cleaned collection level fields, computed independently of its tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
	pub address: String,
	pub category: String,
	pub name: String,
	pub version: SemVer,
	#[serde(rename = "logoURI")]
	pub logo_uri: String,
	pub item_count: usize,
}
