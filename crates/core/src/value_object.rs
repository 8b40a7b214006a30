//! Value object trait: equality by value, not identity.
//!
//! Derived results (reorder metrics, seasonality patterns) have no identity of
//! their own; two results with the same numbers are the same result.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// compute a new one. The trait requires `Clone`, `PartialEq` and `Debug` so
/// results can be copied into UI state, compared in tests and logged.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
