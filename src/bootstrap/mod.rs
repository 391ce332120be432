//! Bootstrap module for loading the configuration and wiring the services.
//!
//! The synchronizer depends on:
//! - `EvmClient`: JSON-RPC access to the network
//! - `EvmCollectionSource`: collection and item reads
//! - `HttpMetadataFetcher`: logo reachability and metadata documents
//! - `FileCatalogStorage`: the published list

use std::{error::Error, path::Path, sync::Arc, time::Duration};

use crate::{
	models::{ConfigLoader, SyncConfig},
	services::{
		blockchain::{EVMTransportClient, EvmClient},
		catalog::FileCatalogStorage,
		collection::EvmCollectionSource,
		metadata::HttpMetadataFetcher,
		sync::{SyncContext, TokenListSynchronizer},
	},
	utils::http::HttpRetryConfig,
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

type Client = EvmClient<EVMTransportClient>;

/// The synchronizer wired with its production adapters
pub type Synchronizer = TokenListSynchronizer<
	Client,
	EvmCollectionSource<Client, HttpMetadataFetcher>,
	HttpMetadataFetcher,
	FileCatalogStorage,
>;

/// Time allowed for a single metadata request
const METADATA_TIMEOUT: Duration = Duration::from_secs(15);

/// Loads the configuration at `path`, applies the environment overrides and
/// validates the result
pub fn load_config(path: &Path) -> Result<SyncConfig> {
	let mut config = SyncConfig::load_from_path(path)?;
	config.apply_env_overrides()?;
	config.validate()?;
	Ok(config)
}

/// Connects to the network and builds the synchronizer for `config`
pub async fn initialize_services(config: SyncConfig) -> Result<Synchronizer> {
	let client = Arc::new(EvmClient::new(&config.network).await?);
	let fetcher = Arc::new(HttpMetadataFetcher::new(
		&HttpRetryConfig::default(),
		METADATA_TIMEOUT,
	)?);

	let source = Arc::new(EvmCollectionSource::new(
		client.clone(),
		fetcher.clone(),
		config.trust_wallet_uri_template.clone(),
		config.ipfs_gateway.clone(),
		config.max_concurrent_requests,
	));
	let storage = Arc::new(FileCatalogStorage::new(
		config.output_dir.clone(),
		&config.list_file_name,
	));

	let context = Arc::new(SyncContext::new(config)?);

	Ok(TokenListSynchronizer::new(
		context, client, source, fetcher, storage,
	))
}
