use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopcart_core::{Aggregate, AggregateRoot, CartId, DomainError, Sku};
use shopcart_events::Event;
use shopcart_products::Product;

use crate::line_item::CartLineItem;

/// Aggregate root: Cart.
///
/// `total` and `categories` are caches over `lines`; every event keeps them in
/// step with the line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: CartId,
    lines: Vec<CartLineItem>,
    categories: Vec<String>,
    /// Price in smallest currency unit.
    total: u64,
    version: u64,
}

impl Cart {
    /// Create an empty cart for a new customer session.
    pub fn new(id: CartId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            categories: Vec::new(),
            total: 0,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    /// Line items in insertion order.
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn line(&self, sku: &Sku) -> Option<&CartLineItem> {
        self.lines.iter().find(|l| l.sku() == sku)
    }

    /// Distinct categories of the current line items, in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, sku: &Sku) -> Option<&mut CartLineItem> {
        self.lines.iter_mut().find(|l| l.sku() == sku)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(CartId::new())
    }
}

impl AggregateRoot for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddProduct.
///
/// `product` is the catalog snapshot returned by the lookup; its stock is the
/// availability the request is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddProduct {
    pub product: Product,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveProduct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveProduct {
    pub product: Product,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    AddProduct(AddProduct),
    RemoveProduct(RemoveProduct),
}

/// Event: ItemAdded (new line or more of an existing one).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub cart_id: CartId,
    pub sku: Sku,
    pub name: String,
    pub category: String,
    pub quantity: u64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemReduced (line keeps a positive quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReduced {
    pub cart_id: CartId,
    pub sku: Sku,
    pub quantity: u64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved (whole line dropped).
///
/// `quantity` is the full quantity the line held, whatever was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub cart_id: CartId,
    pub sku: Sku,
    pub category: String,
    pub quantity: u64,
    pub unit_price: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    ItemReduced(ItemReduced),
    ItemRemoved(ItemRemoved),
}

impl CartEvent {
    pub fn sku(&self) -> &Sku {
        match self {
            CartEvent::ItemAdded(e) => &e.sku,
            CartEvent::ItemReduced(e) => &e.sku,
            CartEvent::ItemRemoved(e) => &e.sku,
        }
    }

    /// Signed change this event implies for the product's catalog stock.
    pub fn stock_delta(&self) -> i64 {
        match self {
            CartEvent::ItemAdded(e) => -signed(e.quantity),
            CartEvent::ItemReduced(e) => signed(e.quantity),
            CartEvent::ItemRemoved(e) => signed(e.quantity),
        }
    }

    /// Signed change this event implies for the cart total.
    pub fn total_delta(&self) -> i128 {
        let (quantity, unit_price, sign) = match self {
            CartEvent::ItemAdded(e) => (e.quantity, e.unit_price, 1),
            CartEvent::ItemReduced(e) => (e.quantity, e.unit_price, -1),
            CartEvent::ItemRemoved(e) => (e.quantity, e.unit_price, -1),
        };
        sign * i128::from(quantity) * i128::from(unit_price)
    }
}

fn signed(quantity: u64) -> i64 {
    i64::try_from(quantity).unwrap_or(i64::MAX)
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::ItemReduced(_) => "cart.item.reduced",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::ItemReduced(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                if let Some(line) = self.line_mut(&e.sku) {
                    line.increase(e.quantity);
                } else {
                    self.lines.push(CartLineItem::new(
                        e.sku.clone(),
                        e.name.clone(),
                        e.category.clone(),
                        e.quantity,
                    ));
                    if !self.categories.iter().any(|c| *c == e.category) {
                        self.categories.push(e.category.clone());
                    }
                }
                self.total = self
                    .total
                    .saturating_add(e.quantity.saturating_mul(e.unit_price));
            }
            CartEvent::ItemReduced(e) => {
                if let Some(line) = self.line_mut(&e.sku) {
                    line.decrease(e.quantity);
                }
                self.total = self
                    .total
                    .saturating_sub(e.quantity.saturating_mul(e.unit_price));
            }
            CartEvent::ItemRemoved(e) => {
                self.lines.retain(|l| l.sku() != &e.sku);
                self.total = self
                    .total
                    .saturating_sub(e.quantity.saturating_mul(e.unit_price));
                if !self.lines.iter().any(|l| l.category() == e.category) {
                    self.categories.retain(|c| *c != e.category);
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddProduct(cmd) => self.handle_add(cmd),
            CartCommand::RemoveProduct(cmd) => self.handle_remove(cmd),
        }
    }
}

impl Cart {
    fn handle_add(&self, cmd: &AddProduct) -> Result<Vec<CartEvent>, DomainError> {
        let product = &cmd.product;
        let available = product.stock();

        // A request equal to the available stock is refused as well.
        if cmd.quantity > 0 && cmd.quantity.unsigned_abs() >= available {
            return Err(DomainError::stock_exceeded(
                product.sku().clone(),
                cmd.quantity,
                available,
            ));
        }

        if cmd.quantity <= 0 {
            return Err(DomainError::invalid_quantity(
                product.sku().clone(),
                cmd.quantity,
            ));
        }

        // An existing line keeps the name/category it was first added with.
        let (name, category) = match self.line(product.sku()) {
            Some(line) => (line.name().to_string(), line.category().to_string()),
            None => (product.name().to_string(), product.category().to_string()),
        };

        Ok(vec![CartEvent::ItemAdded(ItemAdded {
            cart_id: self.id,
            sku: product.sku().clone(),
            name,
            category,
            quantity: cmd.quantity.unsigned_abs(),
            unit_price: product.unit_price(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveProduct) -> Result<Vec<CartEvent>, DomainError> {
        let product = &cmd.product;

        let line = self
            .line(product.sku())
            .ok_or_else(|| DomainError::not_in_cart(product.sku().clone()))?;

        if cmd.quantity <= 0 {
            return Err(DomainError::invalid_quantity(
                product.sku().clone(),
                cmd.quantity,
            ));
        }

        let requested = cmd.quantity.unsigned_abs();
        if requested < line.quantity() {
            return Ok(vec![CartEvent::ItemReduced(ItemReduced {
                cart_id: self.id,
                sku: product.sku().clone(),
                quantity: requested,
                unit_price: product.unit_price(),
                occurred_at: cmd.occurred_at,
            })]);
        }

        Ok(vec![CartEvent::ItemRemoved(ItemRemoved {
            cart_id: self.id,
            sku: product.sku().clone(),
            category: line.category().to_string(),
            quantity: line.quantity(),
            unit_price: product.unit_price(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
