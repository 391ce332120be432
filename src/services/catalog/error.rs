//! Catalog persistence error types.

use log::error;

/// Errors raised while persisting the token list
#[derive(Debug)]
pub enum CatalogError {
	/// Reading or writing the output directory failed
	StorageError(String),

	/// The catalog could not be serialized
	SerializationError(String),
}

impl CatalogError {
	fn format_message(&self) -> String {
		match self {
			Self::StorageError(msg) => format!("Storage error: {}", msg),
			Self::SerializationError(msg) => format!("Serialization error: {}", msg),
		}
	}

	/// Creates a new storage error with logging
	pub fn storage_error(msg: impl Into<String>) -> Self {
		let error = Self::StorageError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new serialization error with logging
	pub fn serialization_error(msg: impl Into<String>) -> Self {
		let error = Self::SerializationError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl std::fmt::Display for CatalogError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for CatalogError {}

impl From<std::io::Error> for CatalogError {
	fn from(err: std::io::Error) -> Self {
		Self::storage_error(err.to_string())
	}
}

impl From<serde_json::Error> for CatalogError {
	fn from(err: serde_json::Error) -> Self {
		Self::serialization_error(err.to_string())
	}
}
