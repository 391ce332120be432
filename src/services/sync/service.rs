//! The synchronization loop.
//!
//! One iteration loads the published list, scans the factories, aggregates the
//! discovered collections as their tranches complete, merges the defaults and
//! publishes a new major version only when the set of token addresses changed.

use std::{borrow::Cow, collections::HashSet, sync::Arc, time::Duration};

use alloy::primitives::Address;
use chrono::{SecondsFormat, Utc};
use futures::{future, stream, TryFutureExt, TryStreamExt};
use serde::Serialize;
use tracing::instrument;

use crate::{
	models::{Catalog, CollectionSummary, SemVer},
	services::{
		blockchain::EvmClientTrait,
		catalog::{are_catalogs_equal, bump_version, CatalogStorage, TokenAccumulator},
		collection::{load_factories, AggregationSettings, CollectionAggregator, CollectionSource},
		metadata::{LogoResolver, MetadataFetcher},
		scanner::{plan_block_tranches, CollectionScanner},
		sync::{SyncContext, SyncError},
	},
};

/// What an iteration did with the rebuilt list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IterationOutcome {
	/// A new version was written
	Published,
	/// The token addresses did not change, nothing was written
	Unchanged,
}

/// Summary of a single synchronization iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationReport {
	pub outcome: IterationOutcome,
	/// Version of the list on disk after the iteration
	pub version: SemVer,
	/// Tokens contributed by the scanned collections
	pub discovered_tokens: usize,
	/// Tokens of the rebuilt list, defaults included
	pub total_tokens: usize,
	/// Collections with at least one item, ordered by address
	pub collections: Vec<CollectionSummary>,
}

/// Rebuilds and publishes the token list
pub struct TokenListSynchronizer<C, S, F, St> {
	context: Arc<SyncContext>,
	client: Arc<C>,
	source: Arc<S>,
	fetcher: Arc<F>,
	storage: Arc<St>,
}

impl<C, S, F, St> TokenListSynchronizer<C, S, F, St>
where
	C: EvmClientTrait,
	S: CollectionSource,
	F: MetadataFetcher,
	St: CatalogStorage,
{
	pub fn new(
		context: Arc<SyncContext>,
		client: Arc<C>,
		source: Arc<S>,
		fetcher: Arc<F>,
		storage: Arc<St>,
	) -> Self {
		Self {
			context,
			client,
			source,
			fetcher,
			storage,
		}
	}

	pub fn context(&self) -> &SyncContext {
		&self.context
	}

	/// Factories to scan in this iteration
	///
	/// Configured factories win. Otherwise the orchestrator is asked on every
	/// iteration, so factories registered while the process runs get scanned.
	pub async fn resolve_factories(&self) -> Result<Cow<'_, [Address]>, SyncError> {
		if !self.context.factories.is_empty() {
			return Ok(Cow::Borrowed(&self.context.factories));
		}

		let Some(orchestrator) = self.context.orchestrator else {
			return Err(SyncError::configuration_error(
				"Neither factory_addresses nor orchestrator_address is configured",
			));
		};

		let factories = load_factories(self.client.as_ref(), orchestrator).await?;
		tracing::info!(
			orchestrator = %orchestrator,
			factories = factories.len(),
			"Loaded factories from the orchestrator"
		);
		if factories.is_empty() {
			tracing::warn!("No factory address to scan, only default tokens will be listed");
		}
		Ok(Cow::Owned(factories))
	}

	/// Runs iterations until one fails, or once when no loop interval is set
	///
	/// The interval is measured from the end of an iteration to the start of the
	/// next one.
	pub async fn run(&self) -> Result<(), SyncError> {
		loop {
			let report = self.run_iteration().await?;
			tracing::info!(
				outcome = ?report.outcome,
				version = %report.version,
				discovered_tokens = report.discovered_tokens,
				total_tokens = report.total_tokens,
				collections = report.collections.len(),
				"Synchronization iteration completed"
			);

			let Some(interval_ms) = self.context.config.loop_interval_ms else {
				return Ok(());
			};

			tracing::debug!(interval_ms, "Waiting for the next iteration");
			tokio::time::sleep(Duration::from_millis(interval_ms)).await;
		}
	}

	/// Rebuilds the list once and publishes it if it changed
	#[instrument(skip(self), fields(list = %self.context.config.list_name))]
	pub async fn run_iteration(&self) -> Result<IterationReport, SyncError> {
		let config = &self.context.config;
		let previous = self.storage.load().await;

		let factories = self.resolve_factories().await?;
		let latest_block = self.client.get_latest_block_number().await?;
		let tranches =
			plan_block_tranches(config.deployment_block, latest_block, config.tranche_size);
		tracing::info!(
			from_block = config.deployment_block,
			to_block = latest_block,
			tranches = tranches.len(),
			"Scanning factories"
		);

		let concurrency = config.max_concurrent_requests.max(1);
		let scanner = CollectionScanner::new(
			self.client.as_ref(),
			&factories,
			&self.context.events,
			&self.context.allowed,
		);
		let aggregator = CollectionAggregator::new(
			self.source.as_ref(),
			LogoResolver::new(
				self.fetcher.as_ref(),
				&config.ipfs_gateway,
				&config.logo_uri_template,
			),
			AggregationSettings {
				chain_id: config.network.chain_id,
				word_limit: config.word_limit,
				max_concurrent_requests: concurrency,
				except_for: &self.context.except_for,
				tranches: &tranches,
			},
		);

		// Collections are aggregated as soon as their tranche is scanned
		let mut seen = HashSet::new();
		let (mut accumulator, mut collections) = scanner
			.scan_tranches(tranches.clone(), concurrency)
			.map_err(SyncError::from)
			.map_ok(|batch| stream::iter(batch.into_iter().map(Ok::<_, SyncError>)))
			.try_flatten()
			.try_filter(move |collection| future::ready(seen.insert(collection.address)))
			.map_ok(|collection| aggregator.aggregate(collection).map_err(SyncError::from))
			.try_buffer_unordered(concurrency)
			.try_fold(
				(TokenAccumulator::new(), Vec::new()),
				|(mut accumulator, mut collections), aggregated| async move {
					if let Some(aggregated) = aggregated {
						accumulator.merge(aggregated.tokens);
						collections.push(aggregated.summary);
					}
					Ok::<_, SyncError>((accumulator, collections))
				},
			)
			.await?;

		let discovered_tokens = accumulator.len();
		accumulator.merge(self.context.default_tokens.iter().cloned());
		collections.sort_by(|a, b| a.address.cmp(&b.address));

		let mut catalog = Catalog {
			name: config.list_name.clone(),
			keywords: config.keywords.clone(),
			tags: Default::default(),
			logo_uri: config.logo_uri.clone(),
			tokens: accumulator.into_tokens(),
			version: SemVer::default(),
			timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
		};
		let total_tokens = catalog.tokens.len();

		if let Some(previous) = previous
			.as_ref()
			.filter(|previous| are_catalogs_equal(Some(*previous), &catalog))
		{
			tracing::info!(version = %previous.version, "Token list unchanged");
			return Ok(IterationReport {
				outcome: IterationOutcome::Unchanged,
				version: previous.version,
				discovered_tokens,
				total_tokens,
				collections,
			});
		}

		catalog.version = bump_version(previous.as_ref().map(|previous| &previous.version));

		if let Err(e) = self.storage.reset().await {
			tracing::error!(error = %e, "Failed to reset the output directory, writing anyway");
		}
		self.storage.save(&catalog).await?;

		tracing::info!(
			version = %catalog.version,
			tokens = total_tokens,
			"Published token list"
		);

		Ok(IterationReport {
			outcome: IterationOutcome::Published,
			version: catalog.version,
			discovered_tokens,
			total_tokens,
			collections,
		})
	}
}
