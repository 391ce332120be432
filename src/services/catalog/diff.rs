//! Content equality of two catalogs.

use crate::models::{Catalog, Token};

fn sorted_addresses(tokens: &[Token]) -> Vec<String> {
	let mut addresses: Vec<String> = tokens
		.iter()
		.map(|token| token.address.to_lowercase())
		.collect();
	addresses.sort_unstable();
	addresses
}

/// Whether `next` lists the same token addresses as `previous`
///
/// Token order and metadata are ignored. Without a previous catalog the two are
/// never equal, so the first run always publishes.
pub fn are_catalogs_equal(previous: Option<&Catalog>, next: &Catalog) -> bool {
	let Some(previous) = previous else {
		return false;
	};

	previous.tokens.len() == next.tokens.len()
		&& sorted_addresses(&previous.tokens) == sorted_addresses(&next.tokens)
}
