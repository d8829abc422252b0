//! Product catalog.
//!
//! The catalog backend owns product data; this crate only models the records the
//! storefront consumes and offers read-only lookups over them.

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, CatalogError, InMemoryCatalog};
pub use product::{Nutrition, Product};
