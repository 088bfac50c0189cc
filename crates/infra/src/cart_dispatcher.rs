//! Cart command execution (application-level orchestration).
//!
//! ```text
//! sku, quantity
//!   ↓
//! 1. Look up the product (async, may fail with NotFound)
//!   ↓
//! 2. Handle command on the cart (pure decision, produces events)
//!   ↓
//! 3. Adjust catalog stock for the event (fallible)
//!   ↓
//! 4. Apply the event to the cart (infallible)
//! ```
//!
//! The cart is borrowed mutably for the whole sequence, so operations on one
//! cart are serialized by the caller. Stock is adjusted before the cart is
//! touched: a failure at any step leaves both untouched.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use shopcart_cart::{AddProduct, Cart, CartCommand, CartEvent, RemoveProduct};
use shopcart_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Sku};
use shopcart_events::Event;
use shopcart_products::Catalog;

use crate::lookup::{CatalogLookup, LookupConfig, ProductLookup};

/// What a successful removal did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The line stays in the cart with `remaining` units.
    Partial {
        sku: Sku,
        removed: u64,
        remaining: u64,
    },
    /// The line is gone; `restored` units went back to stock.
    Full { sku: Sku, restored: u64 },
}

impl RemoveOutcome {
    pub fn sku(&self) -> &Sku {
        match self {
            RemoveOutcome::Partial { sku, .. } | RemoveOutcome::Full { sku, .. } => sku,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, RemoveOutcome::Full { .. })
    }
}

impl core::fmt::Display for RemoveOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RemoveOutcome::Partial {
                sku,
                removed,
                remaining,
            } => write!(
                f,
                "partially removed {removed} units of {sku} from the cart ({remaining} left)"
            ),
            RemoveOutcome::Full { sku, restored } => write!(
                f,
                "fully removed {sku} from the cart ({restored} units back in stock)"
            ),
        }
    }
}

/// Runs add/remove operations against a cart and the shared catalog.
#[derive(Debug, Clone)]
pub struct CartDispatcher<L> {
    lookup: L,
    catalog: Arc<Catalog>,
}

impl CartDispatcher<CatalogLookup> {
    /// Dispatcher whose lookups read the same catalog it adjusts.
    pub fn in_memory(catalog: Arc<Catalog>, config: LookupConfig) -> Self {
        let lookup = CatalogLookup::new(catalog.clone(), config);
        Self::new(lookup, catalog)
    }
}

impl<L> CartDispatcher<L> {
    pub fn new(lookup: L, catalog: Arc<Catalog>) -> Self {
        Self { lookup, catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

impl<L> CartDispatcher<L>
where
    L: ProductLookup,
{
    /// Add `quantity` units of `sku` to the cart.
    ///
    /// Failures are logged here and also returned; callers that treat adds as
    /// fire-and-forget may drop the result.
    pub async fn add_product(
        &self,
        cart: &mut Cart,
        sku: impl Into<Sku>,
        quantity: i64,
    ) -> DomainResult<CartEvent> {
        let sku = sku.into();
        info!(cart_id = %cart.id_typed(), sku = %sku, quantity, "adding product to cart");

        match self.try_add(cart, &sku, quantity).await {
            Ok(event) => {
                info!(
                    cart_id = %cart.id_typed(),
                    total = cart.total(),
                    "cart updated\n{cart}"
                );
                Ok(event)
            }
            Err(err) => {
                warn!(sku = %sku, error = %err, "failed to add product {sku} to cart");
                Err(err)
            }
        }
    }

    /// Remove up to `quantity` units of `sku` from the cart.
    ///
    /// Asking for at least what the line holds removes the whole line.
    pub async fn remove_product(
        &self,
        cart: &mut Cart,
        sku: impl Into<Sku>,
        quantity: i64,
    ) -> DomainResult<RemoveOutcome> {
        let sku = sku.into();
        let product = self.lookup.find_by_sku(&sku).await?;
        info!(cart_id = %cart.id_typed(), sku = %sku, quantity, "removing product from cart");

        let command = CartCommand::RemoveProduct(RemoveProduct {
            product,
            quantity,
            occurred_at: Utc::now(),
        });
        let outcome = match self.execute(cart, &command)? {
            CartEvent::ItemReduced(e) => RemoveOutcome::Partial {
                remaining: cart.line(&e.sku).map(|l| l.quantity()).unwrap_or(0),
                sku: e.sku,
                removed: e.quantity,
            },
            CartEvent::ItemRemoved(e) => RemoveOutcome::Full {
                sku: e.sku,
                restored: e.quantity,
            },
            CartEvent::ItemAdded(_) => {
                return Err(DomainError::invariant(format!("removal of {sku} produced an add event")));
            }
        };

        info!(cart_id = %cart.id_typed(), "{outcome}");
        Ok(outcome)
    }

    async fn try_add(
        &self,
        cart: &mut Cart,
        sku: &Sku,
        quantity: i64,
    ) -> DomainResult<CartEvent> {
        let product = self.lookup.find_by_sku(sku).await?;
        info!(
            sku = %product.sku(),
            name = product.name(),
            category = product.category(),
            unit_price = product.unit_price(),
            stock = product.stock(),
            "product found"
        );

        if let Some(line) = cart.line(sku) {
            info!(
                sku = %sku,
                held = line.quantity(),
                "repeated product {}, increasing its quantity",
                line.name()
            );
        }

        let command = CartCommand::AddProduct(AddProduct {
            product,
            quantity,
            occurred_at: Utc::now(),
        });
        self.execute(cart, &command)
    }

    /// Decide, move stock, then apply.
    ///
    /// Every cart command decides exactly one event.
    fn execute(&self, cart: &mut Cart, command: &CartCommand) -> DomainResult<CartEvent> {
        let event = match cart.handle(command)?.as_slice() {
            [event] => event.clone(),
            other => {
                return Err(DomainError::invariant(format!(
                    "cart command decided {} events, expected one",
                    other.len()
                )));
            }
        };

        self.catalog.adjust_stock(event.sku(), event.stock_delta())?;

        cart.apply(&event);
        debug!(
            cart_id = %cart.id_typed(),
            event_type = event.event_type(),
            version = cart.version(),
            "event applied"
        );

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> CartDispatcher<CatalogLookup> {
        CartDispatcher::in_memory(Arc::new(Catalog::seeded()), LookupConfig::immediate())
    }

    fn stock(d: &CartDispatcher<CatalogLookup>, sku: &str) -> u64 {
        d.catalog().stock_of(&Sku::from(sku)).unwrap()
    }

    #[tokio::test]
    async fn add_takes_stock_and_grows_total() {
        let d = dispatcher();
        let mut cart = Cart::default();

        d.add_product(&mut cart, "KS944RUR", 1).await.unwrap();

        assert_eq!(stock(&d, "KS944RUR"), 3);
        assert_eq!(cart.total(), 10);
        assert_eq!(cart.categories(), ["lacteos".to_string()]);
    }

    #[tokio::test]
    async fn repeated_add_merges_into_existing_line() {
        let d = dispatcher();
        let mut cart = Cart::default();

        d.add_product(&mut cart, "PV332MJ", 2).await.unwrap();
        let event = d.add_product(&mut cart, "PV332MJ", 3).await.unwrap();

        assert_eq!(event.stock_delta(), -3);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&Sku::from("PV332MJ")).unwrap().quantity(), 5);
        assert_eq!(cart.total(), 100);
        assert_eq!(stock(&d, "PV332MJ"), 5);
    }

    #[tokio::test]
    async fn failed_add_changes_nothing() {
        let d = dispatcher();
        let mut cart = Cart::default();
        d.add_product(&mut cart, "UI999TY", 3).await.unwrap();
        let before = cart.clone();

        let err = d.add_product(&mut cart, "OL883YE", 50).await.unwrap_err();
        assert!(matches!(err, DomainError::StockExceeded { .. }));
        assert_eq!(stock(&d, "OL883YE"), 50);

        let err = d.add_product(&mut cart, "AAABBB", 4).await.unwrap_err();
        assert_eq!(err, DomainError::not_found("AAABBB"));

        let err = d.add_product(&mut cart, "UI999TY", 0).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity { .. }));
        assert_eq!(stock(&d, "UI999TY"), 7);

        assert_eq!(cart, before);
    }

    #[tokio::test]
    async fn stock_boundary_moves_with_previous_adds() {
        let d = dispatcher();
        let mut cart = Cart::default();

        d.add_product(&mut cart, "WE328NJ", 2).await.unwrap();
        // One left: asking for it equals the stock and is refused.
        assert!(d.add_product(&mut cart, "WE328NJ", 1).await.is_err());
        assert_eq!(stock(&d, "WE328NJ"), 1);
        assert_eq!(cart.line(&Sku::from("WE328NJ")).unwrap().quantity(), 2);
    }

    #[tokio::test]
    async fn partial_remove_restores_requested_units() {
        let d = dispatcher();
        let mut cart = Cart::default();
        d.add_product(&mut cart, "FN312PPE", 5).await.unwrap();

        let outcome = d.remove_product(&mut cart, "FN312PPE", 2).await.unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Partial {
                sku: Sku::from("FN312PPE"),
                removed: 2,
                remaining: 3,
            }
        );
        assert!(outcome.to_string().contains("partially removed"));
        assert_eq!(stock(&d, "FN312PPE"), 7);
        assert_eq!(cart.total(), 15);
    }

    #[tokio::test]
    async fn full_remove_restores_held_units() {
        let d = dispatcher();
        let mut cart = Cart::default();
        d.add_product(&mut cart, "KS944RUR", 1).await.unwrap();
        assert_eq!(stock(&d, "KS944RUR"), 3);

        let outcome = d.remove_product(&mut cart, "KS944RUR", 4).await.unwrap();
        assert_eq!(
            outcome,
            RemoveOutcome::Full {
                sku: Sku::from("KS944RUR"),
                restored: 1,
            }
        );
        assert!(outcome.is_full());
        assert!(outcome.to_string().contains("fully removed"));
        assert_eq!(stock(&d, "KS944RUR"), 4);
        assert_eq!(cart.total(), 0);
        assert!(cart.categories().is_empty());
    }

    #[tokio::test]
    async fn remove_failures_change_nothing() {
        let d = dispatcher();
        let mut cart = Cart::default();
        d.add_product(&mut cart, "PV332MJ", 5).await.unwrap();
        let before = cart.clone();

        assert_eq!(
            d.remove_product(&mut cart, "UI999TY", 1).await.unwrap_err(),
            DomainError::not_in_cart("UI999TY")
        );
        assert_eq!(
            d.remove_product(&mut cart, "PV332MJ", 0).await.unwrap_err(),
            DomainError::invalid_quantity("PV332MJ", 0)
        );
        assert_eq!(
            d.remove_product(&mut cart, "AAABBB", 1).await.unwrap_err(),
            DomainError::not_found("AAABBB")
        );

        assert_eq!(cart, before);
        assert_eq!(stock(&d, "PV332MJ"), 5);
        assert_eq!(stock(&d, "UI999TY"), 10);
    }

    #[tokio::test]
    async fn carts_share_catalog_stock() {
        let d = dispatcher();
        let mut first = Cart::default();
        let mut second = Cart::default();

        d.add_product(&mut first, "KS944RUR", 2).await.unwrap();
        // Stock is now 2; asking for 2 is refused.
        assert!(d.add_product(&mut second, "KS944RUR", 2).await.is_err());
        d.add_product(&mut second, "KS944RUR", 1).await.unwrap();
        assert_eq!(stock(&d, "KS944RUR"), 1);

        d.remove_product(&mut first, "KS944RUR", 2).await.unwrap();
        assert_eq!(stock(&d, "KS944RUR"), 3);
        assert_eq!(second.line(&Sku::from("KS944RUR")).unwrap().quantity(), 1);
    }

    /// Lookup whose snapshot is stale: reports more stock than the catalog holds.
    struct StaleLookup(CatalogLookup);

    #[async_trait::async_trait]
    impl ProductLookup for StaleLookup {
        async fn find_by_sku(&self, sku: &Sku) -> DomainResult<shopcart_products::Product> {
            let product = self.0.find_by_sku(sku).await?;
            shopcart_products::Product::new(
                product.sku().as_str(),
                product.name(),
                product.unit_price(),
                product.category(),
                Some(100),
            )
        }
    }

    #[tokio::test]
    async fn stock_shortfall_after_lookup_leaves_cart_untouched() {
        let catalog = Arc::new(Catalog::seeded());
        let lookup = StaleLookup(CatalogLookup::new(catalog.clone(), LookupConfig::immediate()));
        let d = CartDispatcher::new(lookup, catalog.clone());
        let mut cart = Cart::default();

        let err = d.add_product(&mut cart, "WE328NJ", 5).await.unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert!(cart.is_empty());
        assert_eq!(cart.version(), 0);
        assert_eq!(catalog.stock_of(&Sku::from("WE328NJ")).unwrap(), 3);
    }
}
