use std::sync::Arc;

use smokehouse_catalog::Product;
use smokehouse_core::{Grams, ProductId};
use smokehouse_pricing::subtotal;

/// One cart line: a shared product and the grams selected of it.
///
/// The quantity is always positive; `Cart` removes a line instead of letting it
/// reach zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    product: Arc<Product>,
    quantity: Grams,
}

impl CartItem {
    pub(crate) fn new(product: Arc<Product>, quantity: Grams) -> Self {
        debug_assert!(!quantity.is_zero());
        Self { product, quantity }
    }

    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    pub fn quantity(&self) -> Grams {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: Grams) {
        debug_assert!(!quantity.is_zero());
        self.quantity = quantity;
    }

    /// Price of the selected grams, rounded half-up on its own.
    pub fn subtotal(&self) -> u64 {
        subtotal(
            self.product.price,
            self.product.base_weight(),
            self.quantity,
        )
    }

    /// `false` when the product's weight label is unusable and the line is free.
    pub fn is_priced(&self) -> bool {
        self.product.is_priced_by_weight()
    }
}
