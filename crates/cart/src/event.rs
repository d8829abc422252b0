use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smokehouse_core::{Grams, ProductId};
use smokehouse_events::Event;

/// Event: LineAdded (a product entered the cart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub product_id: ProductId,
    pub quantity: Grams,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged (an existing line got a new gram amount).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub product_id: ProductId,
    pub previous: Grams,
    pub quantity: Grams,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub lines_removed: usize,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
    QuantityChanged(QuantityChanged),
    LineRemoved(LineRemoved),
    CartCleared(CartCleared),
}

impl CartEvent {
    /// Product the event concerns; `None` for a whole-cart event.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartEvent::LineAdded(e) => Some(&e.product_id),
            CartEvent::QuantityChanged(e) => Some(&e.product_id),
            CartEvent::LineRemoved(e) => Some(&e.product_id),
            CartEvent::CartCleared(_) => None,
        }
    }
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "cart.line.added",
            CartEvent::QuantityChanged(_) => "cart.line.quantity_changed",
            CartEvent::LineRemoved(_) => "cart.line.removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineAdded(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::LineRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}
