//! Infrastructure for running carts: product lookup and command dispatch.
//!
//! Domain crates stay pure; this crate owns the async lookup and the
//! sequencing of catalog stock moves against cart state.

pub mod cart_dispatcher;
pub mod lookup;

pub use cart_dispatcher::{CartDispatcher, RemoveOutcome};
pub use lookup::{CatalogLookup, LookupConfig, ProductLookup};
