//! Logo and metadata resolution.

mod fetcher;
mod logo;

pub use fetcher::{HttpMetadataFetcher, MetadataFetcher};
pub use logo::{LogoResolver, LogoSubject};
