//! Turns a discovered collection into cleaned tokens.

use std::collections::HashSet;

use alloy::primitives::{Address, U256};
use futures::{stream, StreamExt};

use crate::{
	models::{BlockRange, Collection, CollectionInfo, CollectionSummary, RawItem, SemVer, Token},
	services::{
		blockchain::BlockChainError,
		collection::CollectionSource,
		metadata::{LogoResolver, LogoSubject, MetadataFetcher},
	},
	utils::text::{clean_display_string, coerce_decimals},
};

/// Tokens of a collection together with its collection level fields
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCollection {
	pub summary: CollectionSummary,
	pub tokens: Vec<Token>,
}

/// Per collection settings shared by every aggregation of an iteration
#[derive(Debug, Clone, Copy)]
pub struct AggregationSettings<'a> {
	pub chain_id: u64,
	pub word_limit: usize,
	pub max_concurrent_requests: usize,
	pub except_for: &'a HashSet<Address>,
	/// Tranches the item creation logs are searched in
	pub tranches: &'a [BlockRange],
}

/// Loads the items of a collection and shapes them into tokens
pub struct CollectionAggregator<'a, S, F> {
	source: &'a S,
	logos: LogoResolver<'a, F>,
	settings: AggregationSettings<'a>,
}

/// A token whose logo is not resolved yet
struct PendingToken {
	address: Address,
	name: String,
	symbol: String,
	decimals: u8,
	item: RawItem,
}

/// Saturating conversion of an on-chain version component, absent reads count as 0
fn version_component(value: Option<U256>) -> u64 {
	value.map_or(0, |value| u64::try_from(value).unwrap_or(u64::MAX))
}

fn collection_version(info: &CollectionInfo) -> SemVer {
	SemVer::new(
		version_component(info.standard_version),
		version_component(info.interoperable_interface_model_version),
		version_component(info.model_version),
	)
}

impl<'a, S: CollectionSource, F: MetadataFetcher> CollectionAggregator<'a, S, F> {
	pub fn new(source: &'a S, logos: LogoResolver<'a, F>, settings: AggregationSettings<'a>) -> Self {
		Self {
			source,
			logos,
			settings,
		}
	}

	/// Aggregates `collection`
	///
	/// Returns `None` when the collection has no items. Items are read one after
	/// the other; logos are resolved concurrently while keeping item order.
	pub async fn aggregate(
		&self,
		mut collection: Collection,
	) -> Result<Option<AggregatedCollection>, BlockChainError> {
		let ids = self
			.source
			.load_item_ids(&collection, self.settings.tranches)
			.await?;

		if ids.is_empty() {
			tracing::debug!(collection = %collection.address, "Collection has no items");
			return Ok(None);
		}

		let info = self.source.load_collection_info(&collection).await?;

		for object_id in ids {
			let item = self.source.load_item(&collection, object_id).await?;
			collection.items.insert(object_id, item);
		}

		let pending: Vec<PendingToken> = collection
			.items
			.values()
			.filter_map(|item| self.prepare_token(&collection, &info, item))
			.collect();

		let category = collection.category.as_str();
		let tokens: Vec<Token> = stream::iter(pending)
			.map(|token| async move {
				let subject = LogoSubject {
					trust_wallet_uri: token.item.trust_wallet_uri.as_deref(),
					image: token.item.image.as_deref(),
					category: token.item.category.as_deref(),
					parent_category: Some(category),
				};
				let logo_uri = self.logos.resolve(&subject).await;

				Token {
					address: token.address.to_checksum(None),
					name: token.name,
					symbol: token.symbol,
					decimals: token.decimals,
					chain_id: self.settings.chain_id,
					logo_uri,
				}
			})
			.buffered(self.settings.max_concurrent_requests.max(1))
			.collect()
			.await;

		let logo_uri = self
			.logos
			.resolve(&LogoSubject {
				trust_wallet_uri: info.trust_wallet_uri.as_deref(),
				image: info.image.as_deref(),
				category: Some(category),
				parent_category: None,
			})
			.await;

		let summary = CollectionSummary {
			address: collection.checksum_address(),
			category: collection.category.clone(),
			name: clean_display_string(&info.name, self.settings.word_limit),
			version: collection_version(&info),
			logo_uri,
			item_count: collection.items.len(),
		};

		tracing::info!(
			collection = %summary.address,
			name = %summary.name,
			items = summary.item_count,
			tokens = tokens.len(),
			"Aggregated collection"
		);

		Ok(Some(AggregatedCollection { summary, tokens }))
	}

	/// Applies the exclusion set and shapes the display fields of an item
	fn prepare_token(
		&self,
		collection: &Collection,
		info: &CollectionInfo,
		item: &RawItem,
	) -> Option<PendingToken> {
		if self.settings.except_for.contains(&item.address) {
			tracing::debug!(item = %item.address, "Item excluded");
			return None;
		}

		let Some(decimals) = coerce_decimals(&item.decimals) else {
			tracing::warn!(
				collection = %collection.address,
				item = %item.address,
				decimals = %item.decimals,
				"Skipping item with invalid decimals"
			);
			return None;
		};

		let limit = self.settings.word_limit;
		let name = item.name.as_deref().unwrap_or(&info.name);
		let symbol = item
			.symbol
			.as_deref()
			.or(info.symbol.as_deref())
			.unwrap_or_default();

		Some(PendingToken {
			address: item.address,
			name: clean_display_string(name, limit),
			symbol: clean_display_string(symbol, limit),
			decimals,
			item: item.clone(),
		})
	}
}
