use std::sync::Arc;

use shopcart_core::{DomainResult, Sku};
use shopcart_products::Product;

/// Async product lookup by SKU.
///
/// Implementations must not serialize independent lookups behind a single
/// lock while they wait; concurrent calls are expected to interleave.
#[async_trait::async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch a snapshot of the product, or `DomainError::NotFound`.
    async fn find_by_sku(&self, sku: &Sku) -> DomainResult<Product>;
}

#[async_trait::async_trait]
impl<T> ProductLookup for Arc<T>
where
    T: ProductLookup + ?Sized,
{
    async fn find_by_sku(&self, sku: &Sku) -> DomainResult<Product> {
        (**self).find_by_sku(sku).await
    }
}
