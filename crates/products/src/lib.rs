//! Product catalog module.
//!
//! Holds the product records a store sells and the stock each one has left.
//! The catalog is shared by every cart; carts only touch it through
//! [`Catalog::adjust_stock`].

pub mod catalog;
pub mod product;

pub use catalog::Catalog;
pub use product::{DEFAULT_STOCK, Product};
