//! Discovery of factory-created collections over block tranches.

use std::collections::HashSet;

use alloy::primitives::Address;
use futures::{stream, Stream, StreamExt};

use crate::{
	models::{BlockRange, Collection, EVMLogFilter},
	services::{
		blockchain::{BlockChainError, EvmClientTrait},
		scanner::events::{decode_creation_log, FactoryEventMap},
	},
};

/// Scans factory logs for collection creation events
///
/// Borrowed for the length of one synchronization iteration.
pub struct CollectionScanner<'a, C> {
	client: &'a C,
	factories: &'a [Address],
	events: &'a FactoryEventMap,
	allowed: &'a HashSet<Address>,
}

impl<'a, C: EvmClientTrait> CollectionScanner<'a, C> {
	pub fn new(
		client: &'a C,
		factories: &'a [Address],
		events: &'a FactoryEventMap,
		allowed: &'a HashSet<Address>,
	) -> Self {
		Self {
			client,
			factories,
			events,
			allowed,
		}
	}

	/// Returns the allow-listed collections created within `range`
	pub async fn scan_tranche(&self, range: BlockRange) -> Result<Vec<Collection>, BlockChainError> {
		// An empty address list would match every contract of the chain
		if self.factories.is_empty() || self.events.is_empty() {
			return Ok(Vec::new());
		}

		let filter = EVMLogFilter::new(self.factories.to_vec(), self.events.topic_filter(), range);
		let logs = self.client.get_logs(&filter).await?;

		let collections: Vec<Collection> = logs
			.iter()
			.filter_map(|log| decode_creation_log(log, self.events, self.allowed))
			.collect();

		tracing::debug!(
			from_block = range.from_block,
			to_block = range.to_block,
			logs = logs.len(),
			collections = collections.len(),
			"Scanned factory tranche"
		);

		Ok(collections)
	}

	/// Scans `tranches` with at most `concurrency` requests in flight
	///
	/// Each item is the collection subset of one tranche, yielded as soon as that
	/// tranche completes, so downstream work can start before the scan is over.
	pub fn scan_tranches<'s>(
		&'s self,
		tranches: Vec<BlockRange>,
		concurrency: usize,
	) -> impl Stream<Item = Result<Vec<Collection>, BlockChainError>> + 's {
		stream::iter(tranches)
			.map(move |range| self.scan_tranche(range))
			.buffer_unordered(concurrency.max(1))
	}
}
