use serde::{Deserialize, Serialize};

/// A single JSON-RPC endpoint with its selection weight
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpcUrl {
	pub type_: String,
	pub url: String,
	pub weight: u32,
}

/// Connection details of the chain the token list is built from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Network {
	pub slug: String,
	pub name: String,
	pub chain_id: u64,
	pub rpc_urls: Vec<RpcUrl>,
}

impl Network {
	/// Returns the RPC URLs usable for requests, highest weight first
	pub fn weighted_rpc_urls(&self) -> Vec<&RpcUrl> {
		let mut rpc_urls: Vec<_> = self
			.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == "rpc" && rpc_url.weight > 0)
			.collect();

		rpc_urls.sort_by(|a, b| b.weight.cmp(&a.weight));
		rpc_urls
	}
}
