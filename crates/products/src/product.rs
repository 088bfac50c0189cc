use serde::{Deserialize, Serialize};

use shopcart_core::{DomainError, DomainResult, Entity, Sku};

/// Stock assigned to a product created without an explicit stock level.
pub const DEFAULT_STOCK: u64 = 10;

/// Entity: Product.
///
/// Identity is the SKU. Everything but `stock` is fixed once the product is
/// in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    sku: Sku,
    name: String,
    category: String,
    /// Price in smallest currency unit.
    unit_price: u64,
    stock: u64,
}

impl Product {
    /// Create a product.
    ///
    /// A missing or zero `stock` falls back to [`DEFAULT_STOCK`].
    pub fn new(
        sku: &str,
        name: &str,
        unit_price: u64,
        category: &str,
        stock: Option<u64>,
    ) -> DomainResult<Self> {
        let sku = Sku::parse(sku)?;
        if name.trim().is_empty() {
            return Err(DomainError::validation(format!("{sku}: name cannot be empty")));
        }
        if category.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "{sku}: category cannot be empty"
            )));
        }

        Ok(Self {
            sku,
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            unit_price,
            stock: stock.filter(|s| *s > 0).unwrap_or(DEFAULT_STOCK),
        })
    }

    /// Build a product from trusted constant data, skipping validation.
    ///
    /// Only the seed table goes through here; its rows are checked against
    /// [`Product::new`] by the catalog tests.
    pub(crate) fn from_row(
        sku: &str,
        name: &str,
        unit_price: u64,
        category: &str,
        stock: Option<u64>,
    ) -> Self {
        Self {
            sku: Sku::from(sku),
            name: name.to_string(),
            category: category.to_string(),
            unit_price,
            stock: stock.filter(|s| *s > 0).unwrap_or(DEFAULT_STOCK),
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

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn stock(&self) -> u64 {
        self.stock
    }

    /// Apply a signed stock delta, refusing to go below zero.
    pub(crate) fn adjust_stock(&mut self, delta: i64) -> DomainResult<u64> {
        let next = if delta >= 0 {
            self.stock.checked_add(delta.unsigned_abs())
        } else {
            self.stock.checked_sub(delta.unsigned_abs())
        };

        let next = next.ok_or_else(|| {
            DomainError::invariant(format!(
                "stock of {} cannot go from {} by {delta}",
                self.sku, self.stock
            ))
        })?;
        self.stock = next;
        Ok(next)
    }
}

impl Entity for Product {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_zero_stock_defaults_to_ten() {
        let p = Product::new("FN312PPE", "Gaseosa", 5, "bebidas", None).unwrap();
        assert_eq!(p.stock(), DEFAULT_STOCK);

        let p = Product::new("FN312PPE", "Gaseosa", 5, "bebidas", Some(0)).unwrap();
        assert_eq!(p.stock(), DEFAULT_STOCK);

        let p = Product::new("KS944RUR", "Queso", 10, "lacteos", Some(4)).unwrap();
        assert_eq!(p.stock(), 4);
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(matches!(
            Product::new("", "Queso", 10, "lacteos", None),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Product::new("KS944RUR", " ", 10, "lacteos", None),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            Product::new("KS944RUR", "Queso", 10, "", None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn stock_cannot_go_negative() {
        let mut p = Product::new("WE328NJ", "Jabon", 4, "higiene", Some(3)).unwrap();
        assert_eq!(p.adjust_stock(-3).unwrap(), 0);

        let err = p.adjust_stock(-1).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(p.stock(), 0);

        assert_eq!(p.adjust_stock(2).unwrap(), 2);
    }

    #[test]
    fn entity_id_is_the_sku() {
        let p = Product::new("RT324GD", "Lavandina", 9, "limpieza", None).unwrap();
        assert_eq!(p.id().as_str(), "RT324GD");
    }
}
