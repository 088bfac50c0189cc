//! Shared, stock-tracking product catalog.

use std::collections::HashSet;
use std::sync::RwLock;

use shopcart_core::{DomainError, DomainResult, Sku};

use crate::product::Product;

type SeedRow = (&'static str, &'static str, u64, &'static str, Option<u64>);

/// SKU, name, unit price, category and stock (`None` takes the default).
const SEED: [SeedRow; 8] = [
    ("KS944RUR", "Queso", 10, "lacteos", Some(4)),
    ("FN312PPE", "Gaseosa", 5, "bebidas", None),
    ("PV332MJ", "Cerveza", 20, "bebidas", None),
    ("XX92LKI", "Arroz", 7, "alimentos", Some(20)),
    ("UI999TY", "Fideos", 5, "alimentos", None),
    ("RT324GD", "Lavandina", 9, "limpieza", None),
    ("OL883YE", "Shampoo", 3, "higiene", Some(50)),
    ("WE328NJ", "Jabon", 4, "higiene", Some(3)),
];

/// In-memory product catalog.
///
/// Products keep their seed order. Stock is the only mutable field and is
/// changed through [`Catalog::adjust_stock`]; the lock is never held across an
/// `.await`, so readers only ever wait for a single adjustment.
#[derive(Debug)]
pub struct Catalog {
    products: RwLock<Vec<Product>>,
}

impl Catalog {
    /// Build a catalog from a list of products. SKUs must be unique.
    pub fn new(products: Vec<Product>) -> DomainResult<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.sku().clone()) {
                return Err(DomainError::validation(format!(
                    "duplicate sku in catalog: {}",
                    product.sku()
                )));
            }
        }

        Ok(Self {
            products: RwLock::new(products),
        })
    }

    /// The store's fixed product range.
    pub fn seeded() -> Self {
        let products = SEED
            .iter()
            .map(|&(sku, name, price, category, stock)| {
                Product::from_row(sku, name, price, category, stock)
            })
            .collect();

        Self {
            products: RwLock::new(products),
        }
    }

    /// Snapshot of the product with this SKU.
    pub fn get(&self, sku: &Sku) -> DomainResult<Option<Product>> {
        let products = self.read()?;
        Ok(products.iter().find(|p| p.sku() == sku).cloned())
    }

    /// Snapshot of every product, in seed order.
    pub fn products(&self) -> DomainResult<Vec<Product>> {
        Ok(self.read()?.clone())
    }

    /// Current stock of a product.
    pub fn stock_of(&self, sku: &Sku) -> DomainResult<u64> {
        self.get(sku)?
            .map(|p| p.stock())
            .ok_or_else(|| DomainError::not_found(sku.clone()))
    }

    /// Apply a signed stock delta to one product and return its new stock.
    ///
    /// This is the only way stock changes: carts take stock with a negative
    /// delta and give it back with a positive one.
    pub fn adjust_stock(&self, sku: &Sku, delta: i64) -> DomainResult<u64> {
        let mut products = self
            .products
            .write()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))?;

        let product = products
            .iter_mut()
            .find(|p| p.sku() == sku)
            .ok_or_else(|| DomainError::not_found(sku.clone()))?;

        let stock = product.adjust_stock(delta)?;
        tracing::debug!(sku = %sku, delta, stock, "stock adjusted");
        Ok(stock)
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, Vec<Product>>> {
        self.products
            .read()
            .map_err(|_| DomainError::invariant("catalog lock poisoned"))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}
