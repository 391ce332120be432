use std::{
	collections::BTreeMap,
	path::{Path, PathBuf},
	str::FromStr,
};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
	models::{ConfigLoader, Network, RpcUrl, Token},
	utils::constants::{
		DEFAULT_IPFS_GATEWAY, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_OUTPUT_DIR,
		DEFAULT_TRANCHE_SIZE, DEFAULT_TRUST_WALLET_URI_TEMPLATE, DEFAULT_WORD_LIMIT,
	},
};

use super::error::ConfigError;

/// Environment variable replacing the configured RPC URLs with a single endpoint
pub const ENV_CONNECTION_STRING: &str = "BLOCKCHAIN_CONNECTION_STRING";
/// Environment variable overriding the output directory
pub const ENV_OUTPUT_DIR: &str = "TOKEN_LIST_OUTPUT_DIR";
/// Environment variable overriding the loop interval; `0` or empty disables looping
pub const ENV_LOOP_INTERVAL_MS: &str = "TOKEN_LIST_LOOP_INTERVAL_MS";

/// Configuration of the token list synchronizer
///
/// Loaded once at startup and shared read-only by every component for the whole
/// process lifetime.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SyncConfig {
	/// Display name of the list
	pub list_name: String,
	/// Stem of the output file (`<list_file_name>.json`)
	pub list_file_name: String,
	#[serde(default = "default_output_dir")]
	pub output_dir: PathBuf,
	#[serde(default)]
	pub keywords: Vec<String>,
	pub logo_uri: String,
	/// Maximum number of characters kept from names and symbols, 0 disables truncation
	#[serde(default = "default_word_limit")]
	pub word_limit: usize,
	/// Fallback logo, with `{category}` and `{role}` placeholders
	pub logo_uri_template: String,
	/// Trust Wallet asset logo, with an `{address}` placeholder
	#[serde(default = "default_trust_wallet_uri_template")]
	pub trust_wallet_uri_template: String,
	#[serde(default = "default_ipfs_gateway")]
	pub ipfs_gateway: String,
	#[serde(default)]
	pub default_tokens: Vec<Token>,
	/// Item addresses never published
	#[serde(default)]
	pub except_for: Vec<String>,
	/// Collections allowed in the list
	#[serde(default)]
	pub allowed_addresses: Vec<String>,
	/// Factory event signature to collection category
	pub factory_events: BTreeMap<String, String>,
	/// Orchestrator queried for the factory addresses when none are configured
	#[serde(default)]
	pub orchestrator_address: Option<String>,
	#[serde(default)]
	pub factory_addresses: Vec<String>,
	/// First block searched for factory events
	#[serde(default)]
	pub deployment_block: u64,
	#[serde(default = "default_tranche_size")]
	pub tranche_size: u64,
	/// Delay between the end of an iteration and the start of the next one
	#[serde(default)]
	pub loop_interval_ms: Option<u64>,
	#[serde(default = "default_max_concurrent_requests")]
	pub max_concurrent_requests: usize,
	pub network: Network,
}

fn default_output_dir() -> PathBuf {
	PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_word_limit() -> usize {
	DEFAULT_WORD_LIMIT
}

fn default_trust_wallet_uri_template() -> String {
	DEFAULT_TRUST_WALLET_URI_TEMPLATE.to_string()
}

fn default_ipfs_gateway() -> String {
	DEFAULT_IPFS_GATEWAY.to_string()
}

fn default_tranche_size() -> u64 {
	DEFAULT_TRANCHE_SIZE
}

fn default_max_concurrent_requests() -> usize {
	DEFAULT_MAX_CONCURRENT_REQUESTS
}

impl SyncConfig {
	/// Applies environment overrides read through `lookup`
	///
	/// Split from [`SyncConfig::apply_env_overrides`] so the override rules can be
	/// exercised without touching the process environment.
	pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(url) = lookup(ENV_CONNECTION_STRING).filter(|url| !url.trim().is_empty()) {
			self.network.rpc_urls = vec![RpcUrl {
				type_: "rpc".to_string(),
				url: url.trim().to_string(),
				weight: 100,
			}];
		}

		if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|dir| !dir.trim().is_empty()) {
			self.output_dir = PathBuf::from(dir.trim());
		}

		if let Some(interval) = lookup(ENV_LOOP_INTERVAL_MS) {
			let interval = interval.trim();
			self.loop_interval_ms = if interval.is_empty() {
				None
			} else {
				let ms = interval.parse::<u64>().map_err(|e| {
					ConfigError::parse_error(format!(
						"{} must be a number of milliseconds: {}",
						ENV_LOOP_INTERVAL_MS, e
					))
				})?;
				(ms > 0).then_some(ms)
			};
		}

		Ok(())
	}

	/// Applies overrides from the process environment
	pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
		self.apply_overrides(|key| std::env::var(key).ok())
	}

	pub fn parsed_except_for(&self) -> Result<Vec<Address>, ConfigError> {
		parse_addresses(&self.except_for)
	}

	pub fn parsed_allowed_addresses(&self) -> Result<Vec<Address>, ConfigError> {
		parse_addresses(&self.allowed_addresses)
	}

	pub fn parsed_factory_addresses(&self) -> Result<Vec<Address>, ConfigError> {
		parse_addresses(&self.factory_addresses)
	}

	pub fn parsed_orchestrator_address(&self) -> Result<Option<Address>, ConfigError> {
		self.orchestrator_address
			.as_deref()
			.map(|address| Address::from_str(address.trim()).map_err(ConfigError::from))
			.transpose()
	}
}

fn parse_addresses(addresses: &[String]) -> Result<Vec<Address>, ConfigError> {
	addresses
		.iter()
		.map(|address| Address::from_str(address.trim()).map_err(ConfigError::from))
		.collect()
}

impl ConfigLoader for SyncConfig {
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(format!(
				"{} is not a JSON file",
				path.display()
			)));
		}

		if !path.exists() {
			return Err(ConfigError::file_error(format!(
				"{} not found",
				path.display()
			)));
		}

		let file = std::fs::File::open(path)?;
		let config: SyncConfig = serde_json::from_reader(file)?;

		// Validate the config after loading
		config.validate()?;

		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.list_name.trim().is_empty() {
			return Err(ConfigError::validation_error("list_name must not be empty"));
		}

		if self.list_file_name.trim().is_empty()
			|| self
				.list_file_name
				.contains(|c: char| c == '/' || c == '\\')
		{
			return Err(ConfigError::validation_error(
				"list_file_name must be a non-empty file stem",
			));
		}

		if self.factory_events.is_empty() {
			return Err(ConfigError::validation_error(
				"factory_events must map at least one event signature to a category",
			));
		}

		if self.factory_addresses.is_empty() && self.orchestrator_address.is_none() {
			return Err(ConfigError::validation_error(
				"Either factory_addresses or orchestrator_address must be set",
			));
		}

		self.parsed_except_for()?;
		self.parsed_allowed_addresses()?;
		self.parsed_factory_addresses()?;
		self.parsed_orchestrator_address()?;

		if let Some(token) = self
			.default_tokens
			.iter()
			.find(|token| Address::from_str(&token.address).is_err())
		{
			return Err(ConfigError::validation_error(format!(
				"default token {} has an invalid address",
				token.address
			)));
		}

		if self.tranche_size == 0 {
			return Err(ConfigError::validation_error(
				"tranche_size must be greater than 0",
			));
		}

		if self.max_concurrent_requests == 0 {
			return Err(ConfigError::validation_error(
				"max_concurrent_requests must be greater than 0",
			));
		}

		if !self.logo_uri_template.contains("{category}") || !self.logo_uri_template.contains("{role}")
		{
			return Err(ConfigError::validation_error(
				"logo_uri_template must contain the {category} and {role} placeholders",
			));
		}

		if !self.trust_wallet_uri_template.contains("{address}") {
			return Err(ConfigError::validation_error(
				"trust_wallet_uri_template must contain the {address} placeholder",
			));
		}

		// Validate RPC URL types
		let supported_types = ["rpc"];
		if !self
			.network
			.rpc_urls
			.iter()
			.all(|rpc_url| supported_types.contains(&rpc_url.type_.as_str()))
		{
			return Err(ConfigError::validation_error(format!(
				"RPC URL type must be one of: {}",
				supported_types.join(", ")
			)));
		}

		// Validate RPC URLs format
		if !self.network.rpc_urls.iter().all(|rpc_url| {
			rpc_url.url.starts_with("http://") || rpc_url.url.starts_with("https://")
		}) {
			return Err(ConfigError::validation_error(
				"All RPC URLs must start with http:// or https://",
			));
		}

		// Validate RPC URL weights
		if !self.network.rpc_urls.iter().all(|rpc_url| rpc_url.weight <= 100) {
			return Err(ConfigError::validation_error(
				"All RPC URL weights must be between 0 and 100",
			));
		}

		Ok(())
	}
}
