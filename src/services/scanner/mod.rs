//! Block tranche scanning of factory creation events.
//!
//! - `events`: signature hashing and creation log decoding
//! - `scanner`: tranche by tranche log retrieval
//! - `tranches`: partition of the block window

mod events;
mod scanner;
mod tranches;

pub use events::{decode_creation_log, FactoryEventMap};
pub use scanner::CollectionScanner;
pub use tranches::{plan_block_tranches, tranches_from};
