//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two tracking
/// codes with the same text are the same code. To "modify" one, build a new
/// one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct LocationCode(String);
///
/// impl ValueObject for LocationCode {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
