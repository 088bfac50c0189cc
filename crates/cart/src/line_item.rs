use serde::{Deserialize, Serialize};

use shopcart_core::{Sku, ValueObject};

/// One SKU's accumulated quantity inside a cart.
///
/// Name and category are copied from the catalog when the SKU is first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    sku: Sku,
    name: String,
    category: String,
    quantity: u64,
}

impl CartLineItem {
    pub(crate) fn new(sku: Sku, name: String, category: String, quantity: u64) -> Self {
        Self {
            sku,
            name,
            category,
            quantity,
        }
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Always positive while the line is in a cart.
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub(crate) fn increase(&mut self, by: u64) {
        self.quantity = self.quantity.saturating_add(by);
    }

    pub(crate) fn decrease(&mut self, by: u64) {
        self.quantity = self.quantity.saturating_sub(by);
    }
}

impl ValueObject for CartLineItem {}
