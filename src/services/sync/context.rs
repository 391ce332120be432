//! Immutable state shared by every iteration.

use std::{collections::HashSet, str::FromStr};

use alloy::primitives::Address;

use crate::{
	models::{ConfigError, SyncConfig, Token},
	services::scanner::FactoryEventMap,
};

/// The loaded configuration plus everything derived from it once at startup
#[derive(Debug, Clone)]
pub struct SyncContext {
	pub config: SyncConfig,
	/// Factories scanned every iteration; when empty they are read from the orchestrator
	pub factories: Vec<Address>,
	pub orchestrator: Option<Address>,
	pub events: FactoryEventMap,
	pub allowed: HashSet<Address>,
	pub except_for: HashSet<Address>,
	/// Default tokens with checksummed addresses, merged after discovered ones
	pub default_tokens: Vec<Token>,
}

impl SyncContext {
	/// Parses everything `config` references once
	pub fn new(config: SyncConfig) -> Result<Self, ConfigError> {
		let factories = config.parsed_factory_addresses()?;
		let orchestrator = config.parsed_orchestrator_address()?;
		let allowed: HashSet<Address> = config.parsed_allowed_addresses()?.into_iter().collect();
		let except_for: HashSet<Address> = config.parsed_except_for()?.into_iter().collect();
		let events = FactoryEventMap::new(&config.factory_events);

		let default_tokens = config
			.default_tokens
			.iter()
			.map(|token| {
				let address = Address::from_str(token.address.trim())?;
				Ok(Token {
					address: address.to_checksum(None),
					..token.clone()
				})
			})
			.collect::<Result<Vec<_>, ConfigError>>()?;

		if allowed.is_empty() {
			tracing::warn!("No allowed collection address configured, no collection will be listed");
		}
		if factories.is_empty() && orchestrator.is_none() {
			return Err(ConfigError::validation_error(
				"Either factory_addresses or orchestrator_address must be set",
			));
		}

		Ok(Self {
			config,
			factories,
			orchestrator,
			events,
			allowed,
			except_for,
			default_tokens,
		})
	}
}
