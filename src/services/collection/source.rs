//! Reading collections and their items from the chain.

use std::{collections::BTreeSet, sync::Arc};

use alloy::{
	primitives::{Address, Bytes, U256},
	sol_types::{SolCall, SolEvent, SolType, SolValue},
};
use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use serde_json::Value;

use crate::{
	models::{BlockRange, Collection, CollectionInfo, EVMLogFilter, RawItem},
	services::{
		blockchain::{BlockChainError, EvmClientTrait},
		collection::abi::{
			IERC1155MetadataURI, IERC20Metadata, IEthItemMainInterface, IEthItemOrchestrator,
		},
		metadata::MetadataFetcher,
		scanner::tranches_from,
	},
	utils::text::{format_link_for_expose, render_template},
};

/// Provider of collection level data and item records
#[async_trait]
pub trait CollectionSource: Send + Sync {
	/// Reads the collection level fields
	async fn load_collection_info(
		&self,
		collection: &Collection,
	) -> Result<CollectionInfo, BlockChainError>;

	/// Enumerates the item ids of `collection`, unique and ascending
	async fn load_item_ids(
		&self,
		collection: &Collection,
		tranches: &[BlockRange],
	) -> Result<Vec<U256>, BlockChainError>;

	/// Reads a single item record
	async fn load_item(
		&self,
		collection: &Collection,
		object_id: U256,
	) -> Result<RawItem, BlockChainError>;
}

/// Reads an ABI encoded return value of `call` on `to`
async fn read<C, T>(
	client: &C,
	to: Address,
	call: impl SolCall + Send,
) -> Result<T, BlockChainError>
where
	C: EvmClientTrait + ?Sized,
	T: SolValue + From<<T::SolType as SolType>::RustType>,
{
	let output = client.call(to, Bytes::from(call.abi_encode())).await?;
	T::abi_decode(&output).map_err(|e| {
		BlockChainError::contract_error(format!("Failed to decode output of {}: {}", to, e))
	})
}

/// Like [`read`] for values a contract may legitimately not expose
///
/// Only a reverted or undecodable call reads as `None`. Transport and node
/// failures are returned, a flaky endpoint must not drop data from the list.
async fn read_optional<C, T>(
	client: &C,
	to: Address,
	call: impl SolCall + Send,
) -> Result<Option<T>, BlockChainError>
where
	C: EvmClientTrait + ?Sized,
	T: SolValue + From<<T::SolType as SolType>::RustType>,
{
	match read(client, to, call).await {
		Ok(value) => Ok(Some(value)),
		Err(BlockChainError::ContractError(e)) => {
			tracing::debug!(contract = %to, error = %e, "Optional contract read failed");
			Ok(None)
		}
		Err(e) => Err(e),
	}
}

/// Reads the factory addresses registered in the orchestrator
pub async fn load_factories<C: EvmClientTrait + ?Sized>(
	client: &C,
	orchestrator: Address,
) -> Result<Vec<Address>, BlockChainError> {
	read(client, orchestrator, IEthItemOrchestrator::factoriesCall {}).await
}

/// [`CollectionSource`] reading collection contracts through an EVM client
pub struct EvmCollectionSource<C, F> {
	client: Arc<C>,
	fetcher: Arc<F>,
	trust_wallet_uri_template: String,
	ipfs_gateway: String,
	max_concurrent_requests: usize,
}

impl<C: EvmClientTrait, F: MetadataFetcher> EvmCollectionSource<C, F> {
	pub fn new(
		client: Arc<C>,
		fetcher: Arc<F>,
		trust_wallet_uri_template: impl Into<String>,
		ipfs_gateway: impl Into<String>,
		max_concurrent_requests: usize,
	) -> Self {
		Self {
			client,
			fetcher,
			trust_wallet_uri_template: trust_wallet_uri_template.into(),
			ipfs_gateway: ipfs_gateway.into(),
			max_concurrent_requests: max_concurrent_requests.max(1),
		}
	}

	fn trust_wallet_uri(&self, address: &Address) -> String {
		render_template(
			&self.trust_wallet_uri_template,
			&[("address", &address.to_checksum(None))],
		)
	}

	/// Follows a metadata URI and returns the `image` it advertises
	async fn metadata_image(&self, uri: Option<String>) -> Option<String> {
		let uri = uri.filter(|uri| !uri.trim().is_empty())?;
		let document = self
			.fetcher
			.fetch_json(&format_link_for_expose(&uri, &self.ipfs_gateway))
			.await?;

		document
			.get("image")
			.and_then(Value::as_str)
			.map(str::to_string)
	}

	async fn item_ids_in(
		&self,
		collection: Address,
		range: BlockRange,
	) -> Result<Vec<U256>, BlockChainError> {
		let filter = EVMLogFilter::new(
			vec![collection],
			vec![IEthItemMainInterface::NewItem::SIGNATURE_HASH],
			range,
		);

		let logs = self.client.get_logs(&filter).await?;
		Ok(logs
			.iter()
			.filter_map(|log| log.topics.get(1))
			.map(|topic| U256::from_be_bytes(topic.0))
			.collect())
	}
}

#[async_trait]
impl<C: EvmClientTrait, F: MetadataFetcher> CollectionSource for EvmCollectionSource<C, F> {
	async fn load_collection_info(
		&self,
		collection: &Collection,
	) -> Result<CollectionInfo, BlockChainError> {
		let client = self.client.as_ref();
		let address = collection.address;

		let name: String = read(client, address, IEthItemMainInterface::nameCall {}).await?;
		let symbol = read_optional(client, address, IEthItemMainInterface::symbolCall {}).await?;
		let uri: Option<String> =
			read_optional(client, address, IEthItemMainInterface::uriCall {}).await?;
		let model_version =
			read_optional(client, address, IEthItemMainInterface::modelVersionCall {}).await?;
		let standard_version = read_optional(
			client,
			address,
			IEthItemMainInterface::mainInterfaceVersionCall {},
		)
		.await?;
		let interoperable_interface_model_version = read_optional::<_, (Address, U256)>(
			client,
			address,
			IEthItemMainInterface::interoperableInterfaceModelCall {},
		)
		.await?
		.map(|(_, version)| version);

		Ok(CollectionInfo {
			name,
			symbol,
			standard_version,
			interoperable_interface_model_version,
			model_version,
			image: self.metadata_image(uri).await,
			trust_wallet_uri: Some(self.trust_wallet_uri(&address)),
		})
	}

	async fn load_item_ids(
		&self,
		collection: &Collection,
		tranches: &[BlockRange],
	) -> Result<Vec<U256>, BlockChainError> {
		let ranges = tranches_from(tranches, collection.creation_block.unwrap_or_default());

		let batches: Vec<Vec<U256>> = stream::iter(ranges)
			.map(|range| self.item_ids_in(collection.address, range))
			.buffer_unordered(self.max_concurrent_requests)
			.try_collect()
			.await?;

		let ids: BTreeSet<U256> = batches.into_iter().flatten().collect();
		Ok(ids.into_iter().collect())
	}

	async fn load_item(
		&self,
		collection: &Collection,
		object_id: U256,
	) -> Result<RawItem, BlockChainError> {
		let client = self.client.as_ref();

		let address: Address = read(
			client,
			collection.address,
			IEthItemMainInterface::asInteroperableCall { objectId: object_id },
		)
		.await?;

		let name = read_optional(client, address, IERC20Metadata::nameCall {}).await?;
		let symbol = read_optional(client, address, IERC20Metadata::symbolCall {}).await?;
		// Kept undecoded so a token with broken decimals can be rejected on its own
		let decimals = read_optional::<_, U256>(client, address, IERC20Metadata::decimalsCall {})
			.await?
			.map(|decimals| match u64::try_from(decimals) {
				Ok(small) => Value::from(small),
				Err(_) => Value::String(decimals.to_string()),
			})
			.unwrap_or(Value::Null);
		let uri: Option<String> = read_optional(
			client,
			collection.address,
			IERC1155MetadataURI::uriCall { id: object_id },
		)
		.await?;

		Ok(RawItem {
			object_id,
			address,
			name,
			symbol,
			decimals,
			image: self.metadata_image(uri).await,
			trust_wallet_uri: Some(self.trust_wallet_uri(&address)),
			category: None,
		})
	}
}
