//! Event publishing/subscription abstraction.
//!
//! The bus is a broadcast channel: every subscription receives a copy of every
//! message published after it subscribed, in publish order. It stores nothing;
//! a subscriber that arrives late only sees what comes next.

use std::sync::mpsc::Receiver;

/// A subscription to an event stream.
///
/// ```ignore
/// let subscription = store.subscribe();
/// store.add_to_cart(ribs, Grams::new(100));
///
/// while let Ok(event) = subscription.try_recv() {
///     redraw_badge(&event);
/// }
/// ```
///
/// Subscriptions are meant for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Collect every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Publish-subscribe abstraction.
///
/// `publish()` can fail (e.g. internal lock poisoning); failures are surfaced to the
/// caller, which decides whether a lost notification matters.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}
