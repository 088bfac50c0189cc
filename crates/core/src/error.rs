//! Domain error model.

use thiserror::Error;

use crate::id::Sku;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable: a failed cart operation is reported to the
/// caller and leaves both the cart and the catalog untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No product with this SKU exists in the catalog.
    #[error("product {0} not found in catalog")]
    NotFound(Sku),

    /// The requested quantity is not strictly below the available stock.
    #[error("requested quantity {requested} of {sku} exceeds stock ({available} available)")]
    StockExceeded {
        sku: Sku,
        requested: i64,
        available: u64,
    },

    /// The cart holds no line item for this SKU.
    #[error("product {0} is not in the cart")]
    NotInCart(Sku),

    /// Zero or negative quantity.
    #[error("invalid quantity for {sku} (zero or negative): {quantity}")]
    InvalidQuantity { sku: Sku, quantity: i64 },

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn not_found(sku: impl Into<Sku>) -> Self {
        Self::NotFound(sku.into())
    }

    pub fn stock_exceeded(sku: impl Into<Sku>, requested: i64, available: u64) -> Self {
        Self::StockExceeded {
            sku: sku.into(),
            requested,
            available,
        }
    }

    pub fn not_in_cart(sku: impl Into<Sku>) -> Self {
        Self::NotInCart(sku.into())
    }

    pub fn invalid_quantity(sku: impl Into<Sku>, quantity: i64) -> Self {
        Self::InvalidQuantity {
            sku: sku.into(),
            quantity,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// The SKU the failure refers to, when there is one.
    pub fn sku(&self) -> Option<&Sku> {
        match self {
            Self::NotFound(sku) | Self::NotInCart(sku) => Some(sku),
            Self::StockExceeded { sku, .. } | Self::InvalidQuantity { sku, .. } => Some(sku),
            Self::Validation(_) | Self::InvariantViolation(_) => None,
        }
    }
}
