use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use shopcart_core::{DomainError, DomainResult, Sku};
use shopcart_products::{Catalog, Product};

use super::r#trait::ProductLookup;

/// Lookup configuration.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Simulated data-store round trip applied to every lookup.
    pub latency: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1500),
        }
    }
}

impl LookupConfig {
    /// No simulated latency (tests, benchmarks).
    pub fn immediate() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// Lookup against the in-memory [`Catalog`].
///
/// The latency is awaited before the catalog lock is taken, so concurrent
/// lookups sleep side by side.
#[derive(Debug, Clone)]
pub struct CatalogLookup {
    catalog: Arc<Catalog>,
    config: LookupConfig,
}

impl CatalogLookup {
    pub fn new(catalog: Arc<Catalog>, config: LookupConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl ProductLookup for CatalogLookup {
    async fn find_by_sku(&self, sku: &Sku) -> DomainResult<Product> {
        debug!(
            sku = %sku,
            latency_ms = self.config.latency.as_millis() as u64,
            "looking up product"
        );

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        self.catalog
            .get(sku)?
            .ok_or_else(|| DomainError::not_found(sku.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_seeded_product() {
        let lookup = CatalogLookup::new(Arc::new(Catalog::seeded()), LookupConfig::immediate());
        let product = lookup.find_by_sku(&Sku::from("PV332MJ")).await.unwrap();

        assert_eq!(product.name(), "Cerveza");
        assert_eq!(product.unit_price(), 20);
        assert_eq!(product.category(), "bebidas");
    }

    #[tokio::test]
    async fn unknown_sku_is_not_found() {
        let lookup = CatalogLookup::new(Arc::new(Catalog::seeded()), LookupConfig::immediate());
        let err = lookup.find_by_sku(&Sku::from("AAABBB")).await.unwrap_err();

        assert_eq!(err, DomainError::not_found("AAABBB"));
    }

    #[tokio::test]
    async fn returns_a_snapshot_of_current_stock() {
        let catalog = Arc::new(Catalog::seeded());
        let lookup = CatalogLookup::new(catalog, LookupConfig::immediate());
        let sku = Sku::from("KS944RUR");

        lookup.catalog().adjust_stock(&sku, -1).unwrap();
        assert_eq!(lookup.find_by_sku(&sku).await.unwrap().stock(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_lookups_wait_side_by_side() {
        let latency = Duration::from_millis(1500);
        let lookup = CatalogLookup::new(
            Arc::new(Catalog::seeded()),
            LookupConfig::default().with_latency(latency),
        );

        let (cheese, soda, unknown) = (
            Sku::from("KS944RUR"),
            Sku::from("FN312PPE"),
            Sku::from("AAABBB"),
        );

        let started = tokio::time::Instant::now();
        let (a, b, c) = tokio::join!(
            lookup.find_by_sku(&cheese),
            lookup.find_by_sku(&soda),
            lookup.find_by_sku(&unknown),
        );

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert!(c.is_err());
        // Three lookups, one latency.
        assert!(started.elapsed() >= lookup.config().latency);
        assert!(started.elapsed() < latency * 2);
    }

    #[test]
    fn default_latency_matches_store_round_trip() {
        assert_eq!(LookupConfig::default().latency, Duration::from_millis(1500));
        assert!(LookupConfig::immediate().latency.is_zero());
    }
}
