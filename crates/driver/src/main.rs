use std::sync::Arc;

use shopcart_cart::Cart;
use shopcart_core::CartId;
use shopcart_infra::{CartDispatcher, LookupConfig};
use shopcart_products::Catalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shopcart_observability::init();

    let catalog = Arc::new(Catalog::seeded());
    let dispatcher = CartDispatcher::in_memory(catalog, LookupConfig::default());
    let mut cart = Cart::new(CartId::new());

    tracing::info!(cart_id = %cart.id_typed(), "session started");
    shopcart_driver::run_session(&dispatcher, &mut cart, &shopcart_driver::DEMO_SCRIPT).await;

    let snapshot = cart.to_json()?;
    tracing::info!(snapshot = %snapshot, "session finished\n{cart}");
    Ok(())
}
