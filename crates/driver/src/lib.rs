//! Scripted shopping session: one cart, a fixed run of adds and removes.

use tracing::{info, warn};

use shopcart_cart::Cart;
use shopcart_core::DomainResult;
use shopcart_infra::{CartDispatcher, ProductLookup, RemoveOutcome};

/// One scripted cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Add { sku: &'static str, quantity: i64 },
    Remove { sku: &'static str, quantity: i64 },
}

/// The demo session. `AAABBB` is not in the catalog.
pub const DEMO_SCRIPT: [Step; 8] = [
    Step::Add {
        sku: "KS944RUR",
        quantity: 1,
    },
    Step::Add {
        sku: "AAABBB",
        quantity: 4,
    },
    Step::Add {
        sku: "UI999TY",
        quantity: 3,
    },
    Step::Add {
        sku: "PV332MJ",
        quantity: 5,
    },
    Step::Add {
        sku: "OL883YE",
        quantity: 5,
    },
    Step::Add {
        sku: "FN312PPE",
        quantity: 5,
    },
    Step::Remove {
        sku: "FN312PPE",
        quantity: 2,
    },
    Step::Remove {
        sku: "KS944RUR",
        quantity: 4,
    },
];

/// Run `steps` in order against `cart`.
///
/// Adds are fire-and-forget: the dispatcher already logs their failures.
/// Removal results are logged here and returned in step order.
pub async fn run_session<L>(
    dispatcher: &CartDispatcher<L>,
    cart: &mut Cart,
    steps: &[Step],
) -> Vec<DomainResult<RemoveOutcome>>
where
    L: ProductLookup,
{
    let mut removals = Vec::new();

    for step in steps {
        match *step {
            Step::Add { sku, quantity } => {
                let _ = dispatcher.add_product(cart, sku, quantity).await;
            }
            Step::Remove { sku, quantity } => {
                let result = dispatcher.remove_product(cart, sku, quantity).await;
                match &result {
                    Ok(outcome) => info!("{outcome}\n{cart}"),
                    Err(err) => warn!(sku, error = %err, "failed to remove product {sku}: {err}"),
                }
                removals.push(result);
            }
        }
    }

    removals
}
