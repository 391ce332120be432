//! Token list synchronizer.
//!
//! Builds a versioned token list from the collections an EVM factory created:
//! factory events are scanned over block tranches, the items of every
//! allow-listed collection are read and shaped into tokens, default tokens are
//! merged in and a new major version is published whenever the set of token
//! addresses changes.
//!
//! - `bootstrap`: configuration loading and service wiring
//! - `models`: domain and configuration types
//! - `services`: chain access, scanning, aggregation, publication and the loop
//! - `utils`: logging, HTTP and text helpers

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
