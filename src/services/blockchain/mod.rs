//! Blockchain client interfaces and implementations.
//!
//! Provides abstractions and concrete implementations for reading an EVM
//! network over JSON-RPC. Includes:
//!
//! - Generic blockchain client trait
//! - The EVM client
//! - HTTP transport with endpoint rotation
//! - Error handling for blockchain operations

mod client;
mod clients;
mod error;
mod transports;

pub use client::BlockChainClient;
pub use clients::{EvmClient, EvmClientTrait};
pub use error::BlockChainError;
pub use transports::{
	BlockchainTransport, EVMTransportClient, EndpointManager, HttpTransportClient,
	RotatingTransport, TransientErrorRetryStrategy, TransportError, ROTATE_ON_ERROR_CODES,
};
