//! Shopping cart domain module.
//!
//! The cart is an aggregate: commands carry a looked-up product snapshot,
//! `handle` decides which events follow, `apply` folds them into state. Stock
//! bookkeeping on the catalog is left to the caller, driven by
//! [`CartEvent::stock_delta`].

pub mod cart;
pub mod display;
pub mod line_item;

pub use cart::{
    AddProduct, Cart, CartCommand, CartEvent, ItemAdded, ItemReduced, ItemRemoved, RemoveProduct,
};
pub use display::CartSnapshot;
pub use line_item::CartLineItem;
