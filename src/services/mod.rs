//! Core services implementing the token list synchronizer.
//!
//! This module contains the main business logic services:
//! - `blockchain`: JSON-RPC clients and transports
//! - `scanner`: discovery of collections from factory events
//! - `collection`: item reads and token shaping
//! - `metadata`: metadata fetching and logo resolution
//! - `catalog`: merge, diff, versioning and persistence of the list
//! - `sync`: the synchronization loop

pub mod blockchain;
pub mod catalog;
pub mod collection;
pub mod metadata;
pub mod scanner;
pub mod sync;
