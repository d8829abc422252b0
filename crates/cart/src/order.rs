//! Submitted orders and the hand-off to the order backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use smokehouse_core::{DomainError, DomainResult, Grams, OrderId, ProductId};

use crate::checkout::{CustomerDetails, DeliveryMethod, OrderDraft, normalize_phone};
use crate::item::CartItem;

/// Order line: what was bought, how much, and what it cost at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub grams: Grams,
    pub subtotal: u64,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id().clone(),
            name: item.product().name.clone(),
            grams: item.quantity(),
            subtotal: item.subtotal(),
        }
    }
}

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub lines: Vec<OrderLine>,
    pub total_price: u64,
    pub customer: CustomerDetails,
    pub delivery: DeliveryMethod,
    pub comment: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A freshly submitted (pending) order built from a draft.
    pub fn from_draft(id: OrderId, draft: &OrderDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            lines: draft.lines.clone(),
            total_price: draft.total_price,
            customer: draft.customer.clone(),
            delivery: draft.delivery.clone(),
            comment: draft.comment.clone(),
            status: OrderStatus::Pending,
            created_at,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The backend refused the order (e.g. kitchen closed).
    #[error("order rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or failed internally.
    #[error("order backend unavailable: {0}")]
    Unavailable(String),
}

/// Collaborator that accepts a frozen cart and records it as an order.
///
/// The cart is cleared only after `submit` returns `Ok`.
pub trait OrderSubmitter: Send + Sync {
    fn submit(&self, draft: &OrderDraft) -> Result<Order, SubmitError>;
}

/// Order book held in memory; doubles as the local order-history cache.
#[derive(Debug, Default)]
pub struct InMemoryOrderBook {
    orders: Mutex<Vec<Order>>,
}

impl InMemoryOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn orders(&self) -> MutexGuard<'_, Vec<Order>> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders().iter().find(|o| &o.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.orders().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders().is_empty()
    }

    /// Orders placed with this phone number, newest first.
    ///
    /// Phones are compared without spaces, dashes or parentheses.
    pub fn history_for_phone(&self, phone: &str) -> Vec<Order> {
        let wanted = normalize_phone(phone);
        let mut history: Vec<Order> = self
            .orders()
            .iter()
            .rev()
            .filter(|o| normalize_phone(&o.customer.phone) == wanted)
            .cloned()
            .collect();
        // Stable sort keeps later submissions first among equal timestamps.
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        history
    }

    /// Move an order to a new status. Delivered and cancelled orders are final.
    pub fn set_status(&self, id: &OrderId, status: OrderStatus) -> DomainResult<()> {
        let mut orders = self.orders();
        let order = orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(DomainError::not_found)?;

        if order.status.is_final() && order.status != status {
            return Err(DomainError::invariant(format!(
                "order {id} is already {:?}",
                order.status
            )));
        }

        tracing::info!(order_id = %id, from = ?order.status, to = ?status, "order status changed");
        order.status = status;
        Ok(())
    }

    fn insert(&self, draft: &OrderDraft, created_at: DateTime<Utc>) -> Order {
        let order = Order::from_draft(OrderId::new(), draft, created_at);
        self.orders().push(order.clone());
        order
    }
}

impl OrderSubmitter for InMemoryOrderBook {
    fn submit(&self, draft: &OrderDraft) -> Result<Order, SubmitError> {
        if draft.lines.is_empty() {
            return Err(SubmitError::Rejected("order has no lines".to_string()));
        }
        Ok(self.insert(draft, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(phone: &str) -> OrderDraft {
        OrderDraft {
            lines: vec![OrderLine {
                product_id: ProductId::new("ribs").unwrap(),
                name: "Рёбра".to_string(),
                grams: Grams::new(100),
                subtotal: 198,
            }],
            total_price: 198,
            customer: CustomerDetails::new("Иван", phone),
            delivery: DeliveryMethod::Pickup,
            comment: None,
        }
    }

    #[test]
    fn submit_records_pending_order() {
        let book = InMemoryOrderBook::new();
        let order = book.submit(&draft("9123456789")).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_price, 198);
        assert_eq!(book.get(&order.id), Some(order));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn submit_rejects_empty_draft() {
        let book = InMemoryOrderBook::new();
        let mut empty = draft("9123456789");
        empty.lines.clear();
        assert!(matches!(book.submit(&empty), Err(SubmitError::Rejected(_))));
        assert!(book.is_empty());
    }

    #[test]
    fn history_is_filtered_by_phone_and_newest_first() {
        let book = InMemoryOrderBook::new();
        let t0 = Utc::now();
        let first = book.insert(&draft("+7 912 345-67-89"), t0);
        let _other = book.insert(&draft("9000000000"), t0 + Duration::minutes(1));
        let second = book.insert(&draft("+7(912)3456789"), t0 + Duration::minutes(2));

        let history = book.history_for_phone("+7 912 345 67 89");
        let ids: Vec<_> = history.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn status_transitions_stop_at_final_states() {
        let book = InMemoryOrderBook::new();
        let order = book.submit(&draft("9123456789")).unwrap();

        book.set_status(&order.id, OrderStatus::Confirmed).unwrap();
        book.set_status(&order.id, OrderStatus::Delivered).unwrap();

        let err = book.set_status(&order.id, OrderStatus::Cancelled).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(book.get(&order.id).unwrap().status, OrderStatus::Delivered);
    }

    #[test]
    fn unknown_order_status_change_is_not_found() {
        let book = InMemoryOrderBook::new();
        assert_eq!(
            book.set_status(&OrderId::new(), OrderStatus::Confirmed),
            Err(DomainError::NotFound)
        );
    }
}
