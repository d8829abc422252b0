//! Read-only catalog lookups.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use smokehouse_core::{DomainError, DomainResult, ProductId};

use crate::product::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog json is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Source of menu products.
///
/// Products are handed out as `Arc`s so carts can hold them without copying.
pub trait Catalog: Send + Sync {
    /// All products in menu order.
    fn products(&self) -> &[Arc<Product>];

    fn find(&self, id: &ProductId) -> Option<Arc<Product>>;

    fn by_category(&self, category: &str) -> Vec<Arc<Product>> {
        self.products()
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect()
    }

    fn popular(&self) -> Vec<Arc<Product>> {
        self.products()
            .iter()
            .filter(|p| p.is_popular)
            .cloned()
            .collect()
    }

    /// Distinct categories, in the order they first appear.
    fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for p in self.products() {
            if !seen.contains(&p.category.as_str()) {
                seen.push(p.category.as_str());
            }
        }
        seen
    }
}

/// Catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Arc<Product>>,
    index: HashMap<ProductId, usize>,
}

impl InMemoryCatalog {
    /// Build a catalog; product ids must be unique.
    ///
    /// Products whose weight label can't be parsed are accepted (they price at
    /// zero) but logged, so they can be fixed upstream.
    pub fn new(products: Vec<Product>) -> DomainResult<Self> {
        let mut index = HashMap::with_capacity(products.len());
        let mut stored = Vec::with_capacity(products.len());

        for (pos, product) in products.into_iter().enumerate() {
            if index.insert(product.id.clone(), pos).is_some() {
                return Err(DomainError::conflict(format!(
                    "duplicate product id: {}",
                    product.id
                )));
            }
            if !product.is_priced_by_weight() {
                tracing::warn!(
                    product_id = %product.id,
                    weight = %product.weight,
                    "catalog product has unparseable weight label; it will be priced at zero"
                );
            }
            stored.push(Arc::new(product));
        }

        tracing::debug!(products = stored.len(), "catalog loaded");
        Ok(Self {
            products: stored,
            index,
        })
    }

    /// Load from a JSON array of product records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products)?)
    }

    /// Products whose weight label yields no grams.
    pub fn unpriced(&self) -> Vec<Arc<Product>> {
        self.products
            .iter()
            .filter(|p| !p.is_priced_by_weight())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    fn find(&self, id: &ProductId) -> Option<Arc<Product>> {
        self.index.get(id).map(|&pos| Arc::clone(&self.products[pos]))
    }
}
