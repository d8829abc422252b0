//! Change notifications for storefront state (mechanics only).
//!
//! Stateful services publish immutable [`Event`]s through an [`EventBus`]; UI
//! layers and other observers receive them through a [`Subscription`].

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
