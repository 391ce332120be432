//! Blockchain error types and handling.
//!
//! Errors raised by the blockchain clients: failures to reach a node, node side
//! JSON-RPC errors and responses that do not decode.

use log::error;

use crate::services::blockchain::transports::TransportError;

/// Represents possible errors that can occur during blockchain operations
#[derive(Debug)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	ConnectionError(String),

	/// Errors related to malformed requests or invalid responses
	RequestError(String),

	/// A contract call that could not be encoded or decoded
	ContractError(String),

	/// Internal errors within the blockchain client
	InternalError(String),
}

impl BlockChainError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::ConnectionError(msg) => format!("Connection error: {}", msg),
			Self::RequestError(msg) => format!("Request error: {}", msg),
			Self::ContractError(msg) => format!("Contract error: {}", msg),
			Self::InternalError(msg) => format!("Internal error: {}", msg),
		}
	}

	/// Creates a new connection error with logging
	pub fn connection_error(msg: impl Into<String>) -> Self {
		let error = Self::ConnectionError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new request error with logging
	pub fn request_error(msg: impl Into<String>) -> Self {
		let error = Self::RequestError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new contract error
	///
	/// Not logged: reverted view calls are expected for contracts that do not
	/// implement an optional method, callers decide how loud to be.
	pub fn contract_error(msg: impl Into<String>) -> Self {
		Self::ContractError(msg.into())
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

// Standard error trait implementations
impl std::fmt::Display for BlockChainError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for BlockChainError {}

impl From<TransportError> for BlockChainError {
	fn from(err: TransportError) -> Self {
		match err {
			TransportError::Network { .. } | TransportError::UrlRotation { .. } => {
				Self::connection_error(err.to_string())
			}
			_ => Self::request_error(err.to_string()),
		}
	}
}

impl From<anyhow::Error> for BlockChainError {
	fn from(err: anyhow::Error) -> Self {
		Self::connection_error(err.to_string())
	}
}
