//! `smokehouse-core` — storefront domain building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no storage, no UI).

pub mod error;
pub mod id;
pub mod units;

pub use error::{DomainError, DomainResult};
pub use id::{OrderId, ProductId};
pub use units::Grams;
