//! Cart domain module.
//!
//! Holds the live cart of a storefront session: weight-measured lines, derived
//! totals, change notifications and the checkout hand-off to whatever submits
//! orders. Deterministic domain logic only (no HTTP, no storage).

pub mod cart;
pub mod checkout;
pub mod config;
pub mod event;
pub mod item;
pub mod order;
pub mod store;

pub use cart::Cart;
pub use checkout::{
    CheckoutError, CheckoutRequest, CustomerDetails, DeliveryMethod, FieldError, OrderDraft,
};
pub use config::{CartConfig, ConfigError};
pub use event::{CartCleared, CartEvent, LineAdded, LineRemoved, QuantityChanged};
pub use item::CartItem;
pub use order::{InMemoryOrderBook, Order, OrderLine, OrderStatus, OrderSubmitter, SubmitError};
pub use store::{CartSnapshot, CartStore};
