//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Two value objects with the same attribute values are equal. A cart line
/// item is one: it is a (sku, name, category, quantity) record owned by its
/// cart, with no identity of its own.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
