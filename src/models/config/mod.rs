//! Configuration loading and validation.
//!
//! The synchronizer is configured by a single JSON document (by default
//! `config/token_list.json`) with a handful of environment overrides applied on top.

use std::path::Path;

mod error;
mod sync_config;

pub use error::ConfigError;
pub use sync_config::SyncConfig;

/// Common interface for loading configuration files
pub trait ConfigLoader: Sized {
	/// Loads and validates a configuration file
	fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Checks the semantic constraints serde cannot express
	fn validate(&self) -> Result<(), ConfigError>;

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
