//! `reorder-core`: shared building blocks for the reorder calculator.
//!
//! This crate contains **pure domain** primitives (no IO, no storage).

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{IdGenerator, ProductId, SequentialIdGenerator, UuidV7Generator};
pub use value_object::ValueObject;
