use std::sync::Arc;

use chrono::Utc;

use smokehouse_catalog::Product;
use smokehouse_core::{Grams, ProductId};

use crate::event::{CartCleared, CartEvent, LineAdded, LineRemoved, QuantityChanged};
use crate::item::CartItem;

/// The live cart: ordered lines, at most one per product.
///
/// Every mutation returns the event it caused, or `None` when nothing changed.
/// Totals are derived on each read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
    revision: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped by every effective change; equal revisions mean equal contents.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines (not the summed grams).
    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    /// Sum of per-line subtotals; each line is rounded on its own.
    pub fn total_price(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.subtotal()))
    }

    /// Grams selected of a product; zero when it has no line.
    pub fn get_item_quantity(&self, product_id: &ProductId) -> Grams {
        self.position(product_id)
            .map(|pos| self.items[pos].quantity())
            .unwrap_or(Grams::ZERO)
    }

    /// Lines whose product can't be priced by weight.
    pub fn unpriced_lines(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|item| !item.is_priced())
    }

    /// Add grams of a product. Adds to an existing line; otherwise appends one.
    pub fn add_to_cart(&mut self, product: Arc<Product>, quantity: Grams) -> Option<CartEvent> {
        if quantity.is_zero() {
            return None;
        }

        match self.position(&product.id) {
            Some(pos) => {
                let line = &mut self.items[pos];
                let previous = line.quantity();
                let updated = previous.saturating_add(quantity);
                if updated == previous {
                    return None;
                }
                line.set_quantity(updated);
                tracing::debug!(product_id = %product.id, %previous, quantity = %updated, "cart line increased");
                self.revision += 1;
                Some(CartEvent::QuantityChanged(QuantityChanged {
                    product_id: product.id.clone(),
                    previous,
                    quantity: updated,
                    occurred_at: Utc::now(),
                }))
            }
            None => {
                if !product.is_priced_by_weight() {
                    tracing::warn!(
                        product_id = %product.id,
                        weight = %product.weight,
                        "adding product with unparseable weight label; line will be priced at zero"
                    );
                }
                let product_id = product.id.clone();
                self.items.push(CartItem::new(product, quantity));
                tracing::debug!(product_id = %product_id, %quantity, "cart line added");
                self.revision += 1;
                Some(CartEvent::LineAdded(LineAdded {
                    product_id,
                    quantity,
                    occurred_at: Utc::now(),
                }))
            }
        }
    }

    /// Remove a product's line. Absent products are ignored.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Option<CartEvent> {
        let pos = self.position(product_id)?;
        self.items.remove(pos);
        tracing::debug!(product_id = %product_id, "cart line removed");
        self.revision += 1;
        Some(CartEvent::LineRemoved(LineRemoved {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        }))
    }

    /// Set a line's grams to an absolute amount.
    ///
    /// A non-positive amount removes the line. Never creates a line; only
    /// [`Cart::add_to_cart`] does.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Option<CartEvent> {
        if quantity <= 0 {
            return self.remove_from_cart(product_id);
        }

        let pos = self.position(product_id)?;
        let line = &mut self.items[pos];
        let previous = line.quantity();
        let updated = Grams::clamp_from_i64(quantity);
        if updated == previous {
            return None;
        }
        line.set_quantity(updated);
        tracing::debug!(product_id = %product_id, %previous, quantity = %updated, "cart line updated");
        self.revision += 1;
        Some(CartEvent::QuantityChanged(QuantityChanged {
            product_id: product_id.clone(),
            previous,
            quantity: updated,
            occurred_at: Utc::now(),
        }))
    }

    pub fn clear_cart(&mut self) -> Option<CartEvent> {
        if self.items.is_empty() {
            return None;
        }
        let lines_removed = self.items.len();
        self.items.clear();
        tracing::debug!(lines_removed, "cart cleared");
        self.revision += 1;
        Some(CartEvent::CartCleared(CartCleared {
            lines_removed,
            occurred_at: Utc::now(),
        }))
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id() == product_id)
    }
}
