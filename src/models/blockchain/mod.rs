//! Blockchain-specific model implementations.
//!
//! Only EVM chains are supported: factories and collections are EVM contracts.

pub mod evm;
