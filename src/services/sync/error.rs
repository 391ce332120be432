//! Synchronization error types.

use log::error;

use crate::{
	models::ConfigError,
	services::{blockchain::BlockChainError, catalog::CatalogError},
};

/// Errors that abort a synchronization iteration
#[derive(Debug)]
pub enum SyncError {
	/// The configuration cannot drive a synchronization
	ConfigurationError(String),

	/// Scanning logs or calling a contract failed
	ChainError(String),

	/// The token list could not be published
	PublishError(String),
}

impl SyncError {
	fn format_message(&self) -> String {
		match self {
			Self::ConfigurationError(msg) => format!("Configuration error: {}", msg),
			Self::ChainError(msg) => format!("Chain error: {}", msg),
			Self::PublishError(msg) => format!("Publish error: {}", msg),
		}
	}

	/// Creates a new configuration error with logging
	pub fn configuration_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigurationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new chain error with logging
	pub fn chain_error(msg: impl Into<String>) -> Self {
		let error = Self::ChainError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new publish error with logging
	pub fn publish_error(msg: impl Into<String>) -> Self {
		let error = Self::PublishError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl std::fmt::Display for SyncError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for SyncError {}

impl From<BlockChainError> for SyncError {
	fn from(err: BlockChainError) -> Self {
		Self::chain_error(err.to_string())
	}
}

impl From<CatalogError> for SyncError {
	fn from(err: CatalogError) -> Self {
		Self::publish_error(err.to_string())
	}
}

impl From<ConfigError> for SyncError {
	fn from(err: ConfigError) -> Self {
		Self::configuration_error(err.to_string())
	}
}
