//! Logo URI resolution through a chain of fallbacks.

use crate::{
	services::metadata::MetadataFetcher,
	utils::{
		constants::UNKNOWN_CATEGORY,
		text::{format_link_for_expose, render_template},
	},
};

/// The logo related fields of a collection or an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogoSubject<'a> {
	pub trust_wallet_uri: Option<&'a str>,
	pub image: Option<&'a str>,
	pub category: Option<&'a str>,
	/// Category of the owning collection, set for items only
	pub parent_category: Option<&'a str>,
}

impl<'a> LogoSubject<'a> {
	fn role(&self) -> &'static str {
		if self.parent_category.is_some() {
			"item"
		} else {
			"collection"
		}
	}

	fn fallback_category(&self) -> &'a str {
		self.category
			.filter(|category| !category.trim().is_empty())
			.or(self.parent_category)
			.unwrap_or(UNKNOWN_CATEGORY)
	}
}

/// Resolves the best available logo of a subject, never failing
///
/// Order: the trust wallet asset, then the subject's own image, then the
/// templated default for its category and role. Every candidate is exposed
/// through the IPFS gateway before being checked.
pub struct LogoResolver<'a, F> {
	fetcher: &'a F,
	ipfs_gateway: &'a str,
	logo_uri_template: &'a str,
}

impl<'a, F: MetadataFetcher> LogoResolver<'a, F> {
	pub fn new(fetcher: &'a F, ipfs_gateway: &'a str, logo_uri_template: &'a str) -> Self {
		Self {
			fetcher,
			ipfs_gateway,
			logo_uri_template,
		}
	}

	async fn reachable(&self, candidate: Option<&str>) -> Option<String> {
		let candidate = candidate.map(str::trim).filter(|uri| !uri.is_empty())?;
		let exposed = format_link_for_expose(candidate, self.ipfs_gateway);
		self.fetcher.exists(&exposed).await.then_some(exposed)
	}

	/// Templated default logo for `subject`
	pub fn fallback(&self, subject: &LogoSubject<'_>) -> String {
		let rendered = render_template(
			self.logo_uri_template,
			&[
				("category", subject.fallback_category()),
				("role", subject.role()),
			],
		);
		format_link_for_expose(&rendered, self.ipfs_gateway)
	}

	pub async fn resolve(&self, subject: &LogoSubject<'_>) -> String {
		if let Some(uri) = self.reachable(subject.trust_wallet_uri).await {
			return uri;
		}

		if let Some(uri) = self.reachable(subject.image).await {
			return uri;
		}

		self.fallback(subject)
	}
}
