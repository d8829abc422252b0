//! Weight-based pricing.
//!
//! Catalog prices are quoted for a product's labeled base weight (`"350 г"`,
//! `"1.2 кг"`). This crate turns those labels into grams and scales prices
//! linearly to any selected gram amount. Pure functions, no IO; malformed input
//! degrades to zero instead of failing.

pub mod price;
pub mod weight;

pub use price::{format_grams, price_per_kg, subtotal};
pub use weight::{Weight, WeightParseError, WeightUnit, parse_weight, parse_weight_grams};
