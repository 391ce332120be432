use std::collections::{BTreeMap, HashSet};

use alloy::primitives::Address;
use futures::TryStreamExt;

use token_list_sync::{
	models::{BlockRange, Collection},
	services::{
		blockchain::{BlockChainError, EvmClientTrait},
		scanner::{plan_block_tranches, CollectionScanner, FactoryEventMap},
	},
};

use crate::integration::mocks::{
	create_chain_client, create_creation_log, ChainState, ERC20_COLLECTION_EVENT,
};

const ERC1155_COLLECTION_EVENT: &str = "NewERC1155Collection(address,address)";

/// Every collection of every tranche, in completion order
async fn scan_all<C: EvmClientTrait>(
	scanner: &CollectionScanner<'_, C>,
	tranches: Vec<BlockRange>,
	concurrency: usize,
) -> Result<Vec<Collection>, BlockChainError> {
	let batches: Vec<Vec<Collection>> = scanner
		.scan_tranches(tranches, concurrency)
		.try_collect()
		.await?;
	Ok(batches.into_iter().flatten().collect())
}

fn factory_events() -> FactoryEventMap {
	FactoryEventMap::new(&BTreeMap::from([
		(ERC20_COLLECTION_EVENT.to_string(), "ERC20".to_string()),
		(ERC1155_COLLECTION_EVENT.to_string(), "ERC1155".to_string()),
	]))
}

#[tokio::test]
async fn test_scan_discovers_allowed_collections() {
	let factory = Address::repeat_byte(0xfa);
	let model = Address::repeat_byte(0x01);
	let first = Address::repeat_byte(0xa1);
	let second = Address::repeat_byte(0xa2);
	let not_allowed = Address::repeat_byte(0xa3);

	let state = ChainState::new(45);
	state.add_log(create_creation_log(factory, ERC20_COLLECTION_EVENT, model, first, 3));
	state.add_log(create_creation_log(factory, ERC1155_COLLECTION_EVENT, model, second, 27));
	state.add_log(create_creation_log(factory, ERC20_COLLECTION_EVENT, model, not_allowed, 40));
	// Unknown events and foreign emitters never reach the scanner's output
	state.add_log(create_creation_log(factory, "Unrelated(address)", model, first, 5));
	state.add_log(create_creation_log(Address::repeat_byte(0xee), ERC20_COLLECTION_EVENT, model, second, 6));

	let client = create_chain_client(state.clone());
	let factories = vec![factory];
	let events = factory_events();
	let allowed: HashSet<Address> = [first, second].into_iter().collect();

	let scanner = CollectionScanner::new(&client, &factories, &events, &allowed);
	let tranches = plan_block_tranches(0, 45, 10);
	let mut collections = scan_all(&scanner, tranches, 2).await.unwrap();
	collections.sort_by_key(|collection| collection.address);

	assert_eq!(collections.len(), 2);
	assert_eq!(collections[0].address, first);
	assert_eq!(collections[0].category, "ERC20");
	assert_eq!(collections[0].model_address, model);
	assert_eq!(collections[0].creation_block, Some(3));
	assert_eq!(collections[1].address, second);
	assert_eq!(collections[1].category, "ERC1155");
	assert_eq!(collections[1].creation_block, Some(27));

	// One request per tranche
	assert_eq!(state.log_requests.load(std::sync::atomic::Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_scan_yields_one_batch_per_tranche() {
	let factory = Address::repeat_byte(0xfa);
	let collection = Address::repeat_byte(0xa1);

	let state = ChainState::new(20);
	state.add_log(create_creation_log(factory, ERC20_COLLECTION_EVENT, Address::ZERO, collection, 2));
	state.add_log(create_creation_log(factory, ERC20_COLLECTION_EVENT, Address::ZERO, collection, 15));

	let client = create_chain_client(state);
	let factories = vec![factory];
	let events = factory_events();
	let allowed: HashSet<Address> = [collection].into_iter().collect();

	let scanner = CollectionScanner::new(&client, &factories, &events, &allowed);
	let mut batches: Vec<Vec<Collection>> = scanner
		.scan_tranches(plan_block_tranches(0, 20, 10), 4)
		.try_collect()
		.await
		.unwrap();
	batches.sort_by_key(|batch| batch.first().and_then(|c| c.creation_block));

	// Repeated announcements are left to the consumer
	let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
	assert_eq!(sizes, vec![0, 1, 1]);
}

#[tokio::test]
async fn test_scan_without_factories_sends_no_request() {
	let state = ChainState::new(100);
	let client = create_chain_client(state.clone());
	let events = factory_events();
	let allowed = HashSet::new();

	let scanner = CollectionScanner::new(&client, &[], &events, &allowed);
	let collections = scanner
		.scan_tranche(BlockRange::new(0, 100))
		.await
		.unwrap();

	assert!(collections.is_empty());
	assert_eq!(state.log_requests.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scan_propagates_client_errors() {
	use crate::integration::mocks::MockEvmClientTrait;

	let mut client = MockEvmClientTrait::new();
	client
		.expect_get_logs()
		.returning(|_| Err(BlockChainError::request_error("boom")));

	let factories = vec![Address::repeat_byte(0xfa)];
	let events = factory_events();
	let allowed = HashSet::new();

	let scanner = CollectionScanner::new(&client, &factories, &events, &allowed);
	let result = scan_all(&scanner, plan_block_tranches(0, 30, 10), 2).await;

	assert!(matches!(result, Err(BlockChainError::RequestError(_))));
}
