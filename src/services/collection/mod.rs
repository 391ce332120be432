//! Collection contents: contract bindings, on-chain item reads and token shaping.

pub mod abi;
mod aggregator;
mod source;

pub use aggregator::{AggregatedCollection, AggregationSettings, CollectionAggregator};
pub use source::{load_factories, CollectionSource, EvmCollectionSource};
