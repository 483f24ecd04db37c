//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity; two with the same attribute values are
/// equal. An inventory `Item { price: 10, count: 4 }` is a value object, while
/// the vending machine that owns it is an aggregate with an id.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Item {
///     price: u64,
///     count: u64,
/// }
///
/// impl ValueObject for Item {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
