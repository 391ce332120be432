//! Constants shared across the application.

/// Configuration file read when no `--config` flag is given
pub const DEFAULT_CONFIG_PATH: &str = "config/token_list.json";

/// Directory the token list is published to
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Maximum number of characters kept from item names and symbols
pub const DEFAULT_WORD_LIMIT: usize = 32;

/// Number of blocks searched by a single `eth_getLogs` request
pub const DEFAULT_TRANCHE_SIZE: u64 = 100_000;

/// Upper bound of in-flight requests at every fan-out point
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

pub const DEFAULT_TRUST_WALLET_URI_TEMPLATE: &str =
	"https://raw.githubusercontent.com/trustwallet/assets/master/blockchains/ethereum/assets/{address}/logo.png";

pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.io/ipfs/";

/// Category used in the fallback logo when neither an item nor its collection has one
pub const UNKNOWN_CATEGORY: &str = "unknown";
