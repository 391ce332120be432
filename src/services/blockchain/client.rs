//! Core blockchain client interface.

use async_trait::async_trait;

use crate::services::blockchain::BlockChainError;

/// Defines the core interface for blockchain clients
#[async_trait]
pub trait BlockChainClient: Send + Sync {
	/// Retrieves the latest block number from the blockchain
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError>;
}
