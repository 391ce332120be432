//! Published token list data structures.
//!
//! The field names follow the token list JSON schema, so the serialized form of
//! [`Catalog`] is exactly the file consumers download.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Semantic version of a published token list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct SemVer {
	pub major: u64,
	pub minor: u64,
	pub patch: u64,
}

impl SemVer {
	pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
		Self {
			major,
			minor,
			patch,
		}
	}
}

impl Default for SemVer {
	fn default() -> Self {
		Self::new(1, 0, 0)
	}
}

impl fmt::Display for SemVer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
	}
}

/// A single entry of the token list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Token {
	pub address: String,
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	#[serde(rename = "chainId")]
	pub chain_id: u64,
	#[serde(rename = "logoURI")]
	pub logo_uri: String,
}

/// The token list document
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Catalog {
	pub name: String,
	#[serde(default)]
	pub keywords: Vec<String>,
	#[serde(default)]
	pub tags: BTreeMap<String, serde_json::Value>,
	#[serde(rename = "logoURI")]
	pub logo_uri: String,
	pub tokens: Vec<Token>,
	pub version: SemVer,
	pub timestamp: String,
}
