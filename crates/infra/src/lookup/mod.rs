//! Product lookup boundary.
//!
//! Carts never read the catalog directly; they go through a [`ProductLookup`],
//! which models the round trip to a product data store.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{CatalogLookup, LookupConfig};
pub use r#trait::ProductLookup;
