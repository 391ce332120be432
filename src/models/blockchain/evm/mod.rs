//! Ethereum Virtual Machine (EVM) blockchain specific implementations.
//!
//! This module contains data structures specific to EVM-based blockchains that the
//! token list is built from.

mod log;
mod log_filter;

pub use log::Log as EVMLog;
pub use log_filter::LogFilter as EVMLogFilter;
