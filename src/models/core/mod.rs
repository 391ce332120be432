//! Core domain models of the token list synchronizer.
//!
//! This module contains the fundamental data structures that represent:
//! - Catalogs: the published token list and its entries
//! - Collections: factory-created contracts and their raw items
//! - Networks: chain connection details

mod catalog;
mod collection;
mod network;

pub use catalog::{Catalog, SemVer, Token};
pub use collection::{BlockRange, Collection, CollectionInfo, CollectionSummary, RawItem};
pub use network::{Network, RpcUrl};
