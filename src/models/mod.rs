//! Domain models and data structures for the token list synchronizer.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: EVM specific types (logs and log filters)
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Catalog, Token, Collection, Network)

mod blockchain;
mod config;
mod core;

pub use blockchain::evm::{EVMLog, EVMLogFilter};

// Re-export core types
pub use core::{
	BlockRange, Catalog, Collection, CollectionInfo, CollectionSummary, Network, RawItem, RpcUrl,
	SemVer, Token,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader, SyncConfig};
