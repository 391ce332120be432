//! Token list synchronization loop.

mod context;
mod error;
mod service;

pub use context::SyncContext;
pub use error::SyncError;
pub use service::{IterationOutcome, IterationReport, TokenListSynchronizer};
