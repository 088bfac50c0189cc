//! Read-side rendering of a cart.

use serde::Serialize;

use shopcart_core::{AggregateRoot, CartId};

use crate::cart::Cart;
use crate::line_item::CartLineItem;

const RULE_WIDTH: usize = 64;

/// Serializable point-in-time view of a cart, for structured logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub cart_id: CartId,
    pub version: u64,
    pub items: Vec<CartLineItem>,
    pub categories: Vec<String>,
    pub total: u64,
}

impl Cart {
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            cart_id: self.id_typed(),
            version: self.version(),
            items: self.lines().to_vec(),
            categories: self.categories().to_vec(),
            total: self.total(),
        }
    }

    /// Human-readable rendering of line items, categories and total.
    pub fn display(&self) -> String {
        self.to_string()
    }

    /// The snapshot as a JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }
}

impl core::fmt::Display for Cart {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let title = " CART ";
        let side = (RULE_WIDTH - title.len()) / 2;
        writeln!(f, "{}{title}{}", "-".repeat(side), "-".repeat(side))?;

        if self.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for line in self.lines() {
            writeln!(
                f,
                "  {:<10} {:<12} {:<10} x{}",
                line.sku(),
                line.name(),
                line.category(),
                line.quantity()
            )?;
        }

        writeln!(f, "  categories: [{}]", self.categories().join(", "))?;
        writeln!(f, "  total: {}", self.total())?;
        write!(f, "{}", "-".repeat(RULE_WIDTH))
    }
}
