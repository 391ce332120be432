//! De-duplicating accumulation of tokens.

use std::collections::HashSet;

use crate::models::Token;

/// Running token sequence, unique by address
///
/// Addresses are compared case-insensitively. The first token seen for an
/// address is kept and later ones are dropped, so merge order decides which
/// metadata wins but never which addresses end up in the list.
#[derive(Debug, Clone, Default)]
pub struct TokenAccumulator {
	tokens: Vec<Token>,
	seen: HashSet<String>,
}

impl TokenAccumulator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends the tokens of `batch` whose address is not present yet
	///
	/// Returns the number of tokens appended.
	pub fn merge<I>(&mut self, batch: I) -> usize
	where
		I: IntoIterator<Item = Token>,
	{
		let before = self.tokens.len();
		for token in batch {
			if self.seen.insert(token.address.to_lowercase()) {
				self.tokens.push(token);
			}
		}
		self.tokens.len() - before
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn into_tokens(self) -> Vec<Token> {
		self.tokens
	}
}
