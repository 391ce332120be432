use std::{
	path::Path,
	sync::{atomic::Ordering, Arc},
};

use alloy::primitives::{Address, U256};
use tempfile::tempdir;

use token_list_sync::{
	models::{Catalog, SemVer, SyncConfig},
	services::{
		catalog::{CatalogError, CatalogStorage, FileCatalogStorage},
		collection::{
			abi::{IERC20Metadata, IEthItemMainInterface, IEthItemOrchestrator},
			EvmCollectionSource,
		},
		sync::{IterationOutcome, SyncContext, SyncError, TokenListSynchronizer},
	},
};

use crate::integration::mocks::{
	create_chain_client, create_creation_log, create_new_item_log, create_offline_fetcher,
	create_test_config, ChainState, MockCatalogStorage, MockEvmClientTrait, MockMetadataFetcher,
	ERC20_COLLECTION_EVENT,
};

const FACTORY: Address = Address::repeat_byte(0xfa);
const COLLECTION_A: Address = Address::repeat_byte(0xa1);
const COLLECTION_B: Address = Address::repeat_byte(0xb1);
const GOLD: Address = Address::repeat_byte(0x01);
const EXCLUDED: Address = Address::repeat_byte(0x02);
const SILVER: Address = Address::repeat_byte(0x03);

/// Registers a collection created at `block` with one item per `(id, address, block)`
fn add_collection(state: &ChainState, collection: Address, name: &str, block: u64, items: &[(u64, Address, u64)]) {
	add_collection_from(state, FACTORY, collection, name, block, items);
}

fn add_collection_from(
	state: &ChainState,
	factory: Address,
	collection: Address,
	name: &str,
	block: u64,
	items: &[(u64, Address, u64)],
) {
	state.add_log(create_creation_log(
		factory,
		ERC20_COLLECTION_EVENT,
		Address::ZERO,
		collection,
		block,
	));
	state.respond(collection, IEthItemMainInterface::nameCall {}, name.to_string());

	for (id, item, item_block) in items {
		state.add_log(create_new_item_log(collection, *id, *item, *item_block));
		state.respond(
			collection,
			IEthItemMainInterface::asInteroperableCall {
				objectId: U256::from(*id),
			},
			*item,
		);
		state.respond(*item, IERC20Metadata::decimalsCall {}, U256::from(18));
	}
}

type TestSynchronizer<St> = TokenListSynchronizer<
	MockEvmClientTrait,
	EvmCollectionSource<MockEvmClientTrait, MockMetadataFetcher>,
	MockMetadataFetcher,
	St,
>;

fn test_config(output_dir: &Path) -> SyncConfig {
	create_test_config(output_dir, FACTORY, &[COLLECTION_A, COLLECTION_B], &[EXCLUDED])
}

/// Same configuration, with factories read from `orchestrator`
fn orchestrated_config(output_dir: &Path, orchestrator: Address) -> SyncConfig {
	let mut config = test_config(output_dir);
	config.factory_addresses.clear();
	config.orchestrator_address = Some(orchestrator.to_string());
	config
}

fn synchronizer<St: CatalogStorage>(
	state: Arc<ChainState>,
	output_dir: &Path,
	storage: St,
) -> TestSynchronizer<St> {
	synchronizer_with(test_config(output_dir), state, storage)
}

fn synchronizer_with<St: CatalogStorage>(
	config: SyncConfig,
	state: Arc<ChainState>,
	storage: St,
) -> TestSynchronizer<St> {
	let fetcher = Arc::new(create_offline_fetcher());
	let source = Arc::new(EvmCollectionSource::new(
		Arc::new(create_chain_client(state.clone())),
		fetcher.clone(),
		config.trust_wallet_uri_template.clone(),
		config.ipfs_gateway.clone(),
		config.max_concurrent_requests,
	));
	let context = Arc::new(SyncContext::new(config).unwrap());

	TokenListSynchronizer::new(
		context,
		Arc::new(create_chain_client(state)),
		source,
		fetcher,
		Arc::new(storage),
	)
}

fn read_catalog(path: &Path) -> Catalog {
	serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_publishes_only_on_change() {
	let dir = tempdir().unwrap();
	let output_dir = dir.path().join("dist");
	let file = output_dir.join("materia.json");

	let state = ChainState::new(20);
	add_collection(&state, COLLECTION_A, "Alpha", 3, &[(1, GOLD, 5), (2, EXCLUDED, 6)]);
	state.respond(GOLD, IERC20Metadata::nameCall {}, "Gold".to_string());
	state.respond(GOLD, IERC20Metadata::symbolCall {}, "GLD".to_string());

	let sync = synchronizer(
		state.clone(),
		&output_dir,
		FileCatalogStorage::new(&output_dir, "materia"),
	);

	// First run publishes the initial version
	let report = sync.run_iteration().await.unwrap();
	assert_eq!(report.outcome, IterationOutcome::Published);
	assert_eq!(report.version, SemVer::new(1, 0, 0));
	assert_eq!(report.discovered_tokens, 1);
	assert_eq!(report.total_tokens, 2);
	assert_eq!(report.collections.len(), 1);
	assert_eq!(report.collections[0].name, "Alpha");

	let published = read_catalog(&file);
	let addresses: Vec<&str> = published.tokens.iter().map(|t| t.address.as_str()).collect();
	assert_eq!(
		addresses,
		vec![
			GOLD.to_checksum(None).as_str(),
			"0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"
		]
	);
	assert_eq!(published.tokens[0].name, "Gold");
	assert_eq!(published.tokens[0].logo_uri, "https://example.com/ERC20/item.png");
	assert_eq!(published.name, "Materia");
	assert_eq!(published.version, SemVer::new(1, 0, 0));
	let first_content = std::fs::read(&file).unwrap();

	// Nothing changed on chain, nothing is written
	let report = sync.run_iteration().await.unwrap();
	assert_eq!(report.outcome, IterationOutcome::Unchanged);
	assert_eq!(report.version, SemVer::new(1, 0, 0));
	assert_eq!(std::fs::read(&file).unwrap(), first_content);

	// A new collection bumps the major version
	add_collection(&state, COLLECTION_B, "Beta", 30, &[(3, SILVER, 31)]);
	state.latest_block.store(40, Ordering::SeqCst);

	let report = sync.run_iteration().await.unwrap();
	assert_eq!(report.outcome, IterationOutcome::Published);
	assert_eq!(report.version, SemVer::new(2, 0, 0));
	assert_eq!(report.discovered_tokens, 2);
	assert_eq!(report.total_tokens, 3);
	assert_eq!(
		report
			.collections
			.iter()
			.map(|c| c.name.as_str())
			.collect::<Vec<_>>(),
		vec!["Alpha", "Beta"]
	);

	let published = read_catalog(&file);
	assert_eq!(published.version, SemVer::new(2, 0, 0));
	assert!(published
		.tokens
		.iter()
		.all(|token| !token.address.eq_ignore_ascii_case(&EXCLUDED.to_string())));
	// Items without on-chain metadata borrow their collection's name
	assert!(published
		.tokens
		.iter()
		.any(|token| token.address == SILVER.to_checksum(None) && token.name == "Beta"));
}

#[tokio::test]
async fn test_only_default_tokens_without_collections() {
	let dir = tempdir().unwrap();
	let output_dir = dir.path().join("dist");

	let sync = synchronizer(
		ChainState::new(5),
		&output_dir,
		FileCatalogStorage::new(&output_dir, "materia"),
	);

	let report = sync.run_iteration().await.unwrap();
	assert_eq!(report.outcome, IterationOutcome::Published);
	assert_eq!(report.discovered_tokens, 0);
	assert_eq!(report.total_tokens, 1);
	assert!(report.collections.is_empty());
}

#[tokio::test]
async fn test_discovered_token_wins_over_default() {
	let dir = tempdir().unwrap();
	let weth: Address = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2".parse().unwrap();

	let state = ChainState::new(20);
	add_collection(&state, COLLECTION_A, "Alpha", 3, &[(1, weth, 5)]);
	state.respond(weth, IERC20Metadata::nameCall {}, "Wrapped Item".to_string());

	let output_dir = dir.path().join("dist");
	let sync = synchronizer(
		state,
		&output_dir,
		FileCatalogStorage::new(&output_dir, "materia"),
	);

	let report = sync.run_iteration().await.unwrap();
	assert_eq!(report.total_tokens, 1);

	let published = read_catalog(&output_dir.join("materia.json"));
	assert_eq!(published.tokens[0].name, "Wrapped Item");
}

#[tokio::test]
async fn test_reset_failure_is_not_fatal() {
	let dir = tempdir().unwrap();

	let mut storage = MockCatalogStorage::new();
	storage.expect_load().returning(|| None);
	storage
		.expect_reset()
		.times(1)
		.returning(|| Err(CatalogError::storage_error("read-only file system")));
	storage
		.expect_save()
		.withf(|catalog| catalog.version == SemVer::new(1, 0, 0))
		.times(1)
		.returning(|_| Ok(()));

	let sync = synchronizer(ChainState::new(5), dir.path(), storage);
	let report = sync.run_iteration().await.unwrap();

	assert_eq!(report.outcome, IterationOutcome::Published);
}

#[tokio::test]
async fn test_save_failure_fails_the_iteration() {
	let dir = tempdir().unwrap();

	let mut storage = MockCatalogStorage::new();
	storage.expect_load().returning(|| None);
	storage.expect_reset().returning(|| Ok(()));
	storage
		.expect_save()
		.returning(|_| Err(CatalogError::storage_error("disk full")));

	let sync = synchronizer(ChainState::new(5), dir.path(), storage);
	let result = sync.run_iteration().await;

	assert!(matches!(result, Err(SyncError::PublishError(_))));
}

#[tokio::test]
async fn test_chain_failure_writes_nothing() {
	let dir = tempdir().unwrap();
	let output_dir = dir.path().join("dist");

	let state = ChainState::new(20);
	// Allow-listed collection whose name() reverts
	state.add_log(create_creation_log(
		FACTORY,
		ERC20_COLLECTION_EVENT,
		Address::ZERO,
		COLLECTION_A,
		3,
	));
	state.add_log(create_new_item_log(COLLECTION_A, 1, GOLD, 4));

	let sync = synchronizer(
		state,
		&output_dir,
		FileCatalogStorage::new(&output_dir, "materia"),
	);

	let result = sync.run_iteration().await;
	assert!(matches!(result, Err(SyncError::ChainError(_))));
	assert!(!output_dir.join("materia.json").exists());
}

#[tokio::test]
async fn test_run_once_without_interval() {
	let dir = tempdir().unwrap();

	let mut storage = MockCatalogStorage::new();
	storage.expect_load().times(1).returning(|| None);
	storage.expect_reset().times(1).returning(|| Ok(()));
	storage.expect_save().times(1).returning(|_| Ok(()));

	let sync = synchronizer(ChainState::new(5), dir.path(), storage);
	assert_eq!(sync.context().config.loop_interval_ms, None);

	sync.run().await.unwrap();
}

#[tokio::test]
async fn test_transient_read_failure_fails_the_iteration() {
	let dir = tempdir().unwrap();
	let output_dir = dir.path().join("dist");

	let state = ChainState::new(20);
	add_collection(&state, COLLECTION_A, "Alpha", 3, &[(1, GOLD, 5)]);
	state.respond(GOLD, IERC20Metadata::nameCall {}, "Gold".to_string());
	// The node drops the connection instead of reverting
	state.fail(GOLD, IERC20Metadata::decimalsCall {});

	let sync = synchronizer(
		state,
		&output_dir,
		FileCatalogStorage::new(&output_dir, "materia"),
	);

	let result = sync.run_iteration().await;
	assert!(matches!(result, Err(SyncError::ChainError(_))));
	assert!(!output_dir.join("materia.json").exists());
}

#[tokio::test]
async fn test_collection_announced_in_two_tranches_is_aggregated_once() {
	let dir = tempdir().unwrap();
	let output_dir = dir.path().join("dist");

	let state = ChainState::new(20);
	// The item is minted after both announcements, whichever tranche wins
	add_collection(&state, COLLECTION_A, "Alpha", 3, &[(1, GOLD, 16)]);
	state.add_log(create_creation_log(
		FACTORY,
		ERC20_COLLECTION_EVENT,
		Address::ZERO,
		COLLECTION_A,
		15,
	));

	let sync = synchronizer(
		state,
		&output_dir,
		FileCatalogStorage::new(&output_dir, "materia"),
	);

	let report = sync.run_iteration().await.unwrap();
	assert_eq!(report.collections.len(), 1);
	assert_eq!(report.discovered_tokens, 1);
}

#[tokio::test]
async fn test_configured_factories_skip_the_orchestrator() {
	let dir = tempdir().unwrap();
	let orchestrator = Address::repeat_byte(0x0c);

	let state = ChainState::new(1);
	// Asking the orchestrator would fail the iteration
	state.fail(orchestrator, IEthItemOrchestrator::factoriesCall {});

	let mut config = test_config(dir.path());
	config.orchestrator_address = Some(orchestrator.to_string());
	let sync = synchronizer_with(config, state, FileCatalogStorage::new(dir.path(), "materia"));

	let factories = sync.resolve_factories().await.unwrap();
	assert_eq!(factories.to_vec(), vec![FACTORY]);
	assert!(sync.run_iteration().await.is_ok());
}

#[tokio::test]
async fn test_orchestrator_factories_are_read_every_iteration() {
	let dir = tempdir().unwrap();
	let output_dir = dir.path().join("dist");
	let file = output_dir.join("materia.json");
	let orchestrator = Address::repeat_byte(0x0c);
	let first_factory = Address::repeat_byte(0xf1);
	let second_factory = Address::repeat_byte(0xf2);

	let state = ChainState::new(20);
	state.respond(orchestrator, IEthItemOrchestrator::factoriesCall {}, vec![first_factory]);
	add_collection_from(&state, first_factory, COLLECTION_A, "Alpha", 3, &[(1, GOLD, 5)]);
	// Created by a factory the orchestrator does not know about yet
	add_collection_from(&state, second_factory, COLLECTION_B, "Beta", 8, &[(2, SILVER, 9)]);

	let sync = synchronizer_with(
		orchestrated_config(&output_dir, orchestrator),
		state.clone(),
		FileCatalogStorage::new(&output_dir, "materia"),
	);

	let report = sync.run_iteration().await.unwrap();
	assert_eq!(report.version, SemVer::new(1, 0, 0));
	assert_eq!(report.collections.len(), 1);
	assert_eq!(report.collections[0].name, "Alpha");

	// The orchestrator registers a second factory while the process runs
	state.respond(
		orchestrator,
		IEthItemOrchestrator::factoriesCall {},
		vec![first_factory, second_factory],
	);

	let report = sync.run_iteration().await.unwrap();
	assert_eq!(report.outcome, IterationOutcome::Published);
	assert_eq!(report.version, SemVer::new(2, 0, 0));
	assert_eq!(
		report
			.collections
			.iter()
			.map(|c| c.name.as_str())
			.collect::<Vec<_>>(),
		vec!["Alpha", "Beta"]
	);

	let published = read_catalog(&file);
	assert_eq!(published.version, SemVer::new(2, 0, 0));
	assert!(published
		.tokens
		.iter()
		.any(|token| token.address == SILVER.to_checksum(None)));
}

#[tokio::test]
async fn test_orchestrator_failure_is_a_chain_error() {
	let dir = tempdir().unwrap();
	let output_dir = dir.path().join("dist");
	let orchestrator = Address::repeat_byte(0x0c);

	let state = ChainState::new(20);
	state.fail(orchestrator, IEthItemOrchestrator::factoriesCall {});

	let sync = synchronizer_with(
		orchestrated_config(&output_dir, orchestrator),
		state,
		FileCatalogStorage::new(&output_dir, "materia"),
	);

	let result = sync.run_iteration().await;
	assert!(matches!(result, Err(SyncError::ChainError(_))));
	assert!(!output_dir.join("materia.json").exists());
}

#[test]
fn test_context_requires_a_factory_source() {
	let dir = tempdir().unwrap();
	let mut config = test_config(dir.path());
	config.factory_addresses.clear();

	assert!(SyncContext::new(config).is_err());
}
