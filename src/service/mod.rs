//! Resource workflows on top of the storage adapter.

pub mod enrich;
mod manager;
pub mod validation;

pub use enrich::{ContactManager, ContactResolver, NameLookup, StoreNames};
pub use manager::{create_in_tx, ResourceManager};
pub use validation::Validate;
