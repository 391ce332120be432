//! Catalog assembly and publication.
//!
//! - `merge`: address based de-duplication
//! - `diff`: order insensitive equality
//! - `version`: semantic version bumping
//! - `storage`: the published file

mod diff;
mod error;
mod merge;
mod storage;
mod version;

pub use diff::are_catalogs_equal;
pub use error::CatalogError;
pub use merge::TokenAccumulator;
pub use storage::{to_pretty_json, CatalogStorage, FileCatalogStorage};
pub use version::bump_version;
