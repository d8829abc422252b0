//! Session-scoped cart service.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smokehouse_catalog::Product;
use smokehouse_core::{Grams, ProductId};
use smokehouse_events::{EventBus, InMemoryEventBus, Subscription};

use crate::cart::Cart;
use crate::checkout::{CheckoutError, CheckoutRequest, OrderDraft};
use crate::config::CartConfig;
use crate::event::CartEvent;
use crate::item::CartItem;
use crate::order::{Order, OrderSubmitter};

/// Immutable copy of the cart and its derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total_items: usize,
    pub total_price: u64,
}

/// The cart of one storefront session.
///
/// Created at session start and passed by reference to whatever needs it.
/// Mutations are serialized through an internal lock, so it can be shared
/// across threads. Each effective change is published before the lock is
/// released, so subscribers see events in the order the changes happened.
#[derive(Debug)]
pub struct CartStore {
    cart: Mutex<Cart>,
    bus: InMemoryEventBus<CartEvent>,
    config: CartConfig,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(CartConfig::default())
    }
}

impl CartStore {
    pub fn new(config: CartConfig) -> Self {
        Self {
            cart: Mutex::new(Cart::new()),
            bus: InMemoryEventBus::new(),
            config,
        }
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    // A panic mid-mutation cannot leave the Vec half-updated, so a poisoned
    // lock still guards a consistent cart.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Callers hold the cart lock; publishing only enqueues on channels.
    fn publish(&self, event: Option<CartEvent>) {
        let Some(event) = event else {
            return;
        };
        if let Err(err) = self.bus.publish(event) {
            tracing::warn!(?err, "failed to publish cart event");
        }
    }

    /// Receive every cart change from now on.
    pub fn subscribe(&self) -> Subscription<CartEvent> {
        self.bus.subscribe()
    }

    pub fn add_to_cart(&self, product: Arc<Product>, quantity: Grams) {
        let mut cart = self.lock();
        let event = cart.add_to_cart(product, quantity);
        self.publish(event);
    }

    /// Add one default increment (see [`CartConfig::default_increment`]).
    pub fn add_default(&self, product: Arc<Product>) {
        self.add_to_cart(product, self.config.default_increment);
    }

    pub fn remove_from_cart(&self, product_id: &ProductId) {
        let mut cart = self.lock();
        let event = cart.remove_from_cart(product_id);
        self.publish(event);
    }

    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) {
        let mut cart = self.lock();
        let event = cart.update_quantity(product_id, quantity);
        self.publish(event);
    }

    pub fn clear_cart(&self) {
        let mut cart = self.lock();
        let event = cart.clear_cart();
        self.publish(event);
    }

    pub fn get_item_quantity(&self, product_id: &ProductId) -> Grams {
        self.lock().get_item_quantity(product_id)
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.lock().items().to_vec()
    }

    pub fn total_items(&self) -> usize {
        self.lock().total_items()
    }

    pub fn total_price(&self) -> u64 {
        self.lock().total_price()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Lines and totals read under one lock, so they agree with each other.
    pub fn snapshot(&self) -> CartSnapshot {
        let cart = self.lock();
        CartSnapshot {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
        }
    }

    /// Validate the request, hand the frozen cart to `submitter`, and remove
    /// what was ordered only if submission succeeds.
    ///
    /// The lock is released while `submitter` runs, so the session stays usable
    /// and the submitter may read the store. If the cart changed meanwhile, only
    /// the submitted grams are taken out and later additions stay.
    pub fn checkout(
        &self,
        request: &CheckoutRequest,
        submitter: &dyn OrderSubmitter,
    ) -> Result<Order, CheckoutError> {
        let (draft, revision) = {
            let cart = self.lock();
            if cart.is_empty() {
                return Err(CheckoutError::EmptyCart);
            }

            let request = request
                .validate(self.config.min_phone_digits)
                .inspect_err(|err| tracing::warn!(%err, "checkout rejected"))?;

            if cart.unpriced_lines().next().is_some() {
                tracing::warn!("checking out cart with zero-priced lines (unparseable weight labels)");
            }
            (OrderDraft::new(&cart, request), cart.revision())
        };

        let order = submitter.submit(&draft).map_err(|err| {
            tracing::warn!(%err, "order submission failed; cart kept");
            CheckoutError::Submission(err)
        })?;

        let mut cart = self.lock();
        if cart.revision() == revision {
            let event = cart.clear_cart();
            self.publish(event);
        } else {
            tracing::debug!("cart changed during submission; removing ordered lines only");
            for line in &draft.lines {
                let remaining = i64::from(cart.get_item_quantity(&line.product_id).get())
                    - i64::from(line.grams.get());
                let event = cart.update_quantity(&line.product_id, remaining);
                self.publish(event);
            }
        }
        drop(cart);

        tracing::info!(
            order_id = %order.id,
            lines = order.lines.len(),
            total_price = order.total_price,
            "order submitted"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    use crate::checkout::CustomerDetails;
    use crate::order::{InMemoryOrderBook, OrderStatus, SubmitError};
    use smokehouse_events::Event;

    fn product(id: &str, price: u64, weight: &str) -> Arc<Product> {
        Arc::new(Product::new(
            ProductId::new(id).unwrap(),
            id,
            price,
            weight,
            "meat",
        ))
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest::pickup(CustomerDetails::new("Иван", "+7 912 345-67-89"))
    }

    /// Reads and changes the store while the order is being submitted.
    struct TopUpSubmitter<'a> {
        store: &'a CartStore,
        book: InMemoryOrderBook,
        seen_total: Mutex<Option<u64>>,
        extra: Arc<Product>,
    }

    impl OrderSubmitter for TopUpSubmitter<'_> {
        fn submit(&self, draft: &OrderDraft) -> Result<Order, SubmitError> {
            *self.seen_total.lock().unwrap() = Some(self.store.total_price());
            self.store.add_to_cart(Arc::clone(&self.extra), Grams::new(100));
            self.book.submit(draft)
        }
    }

    struct FailingSubmitter;

    impl OrderSubmitter for FailingSubmitter {
        fn submit(&self, _draft: &OrderDraft) -> Result<Order, SubmitError> {
            Err(SubmitError::Unavailable("timeout".to_string()))
        }
    }

    #[test]
    fn add_default_uses_configured_increment() {
        let store = CartStore::new(CartConfig {
            default_increment: Grams::new(250),
            ..CartConfig::default()
        });
        let ribs = product("ribs", 990, "500 г");

        store.add_default(Arc::clone(&ribs));
        store.add_default(ribs);

        assert_eq!(store.get_item_quantity(&ProductId::new("ribs").unwrap()), Grams::new(500));
    }

    #[test]
    fn effective_changes_are_published_in_order() {
        let store = CartStore::default();
        let events = store.subscribe();
        let ribs = product("ribs", 990, "500 г");
        let ribs_id = ribs.id.clone();

        store.add_to_cart(Arc::clone(&ribs), Grams::new(100));
        store.add_to_cart(ribs, Grams::new(100));
        store.update_quantity(&ribs_id, 200); // unchanged
        store.remove_from_cart(&ProductId::new("steak").unwrap()); // absent
        store.update_quantity(&ribs_id, 0);
        store.clear_cart(); // already empty

        let types: Vec<_> = events.drain().iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec!["cart.line.added", "cart.line.quantity_changed", "cart.line.removed"]
        );
    }

    #[test]
    fn concurrent_changes_publish_events_in_change_order() {
        let store = Arc::new(CartStore::default());
        let events = store.subscribe();
        let ribs = product("ribs", 990, "500 г");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let ribs = Arc::clone(&ribs);
                thread::spawn(move || {
                    for _ in 0..200 {
                        store.add_to_cart(Arc::clone(&ribs), Grams::new(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut last = Grams::ZERO;
        let mut replayed = 0;
        for event in events.drain() {
            match event {
                CartEvent::LineAdded(e) => last = e.quantity,
                CartEvent::QuantityChanged(e) => {
                    assert_eq!(e.previous, last, "event arrived out of change order");
                    last = e.quantity;
                }
                other => panic!("unexpected event {other:?}"),
            }
            replayed += 1;
        }
        assert_eq!(replayed, 8 * 200);
        assert_eq!(last, Grams::new(8 * 200));
        assert_eq!(store.get_item_quantity(&ribs.id), last);
    }

    #[test]
    fn snapshot_reports_consistent_totals() {
        let store = CartStore::default();
        store.add_to_cart(product("ribs", 990, "500 г"), Grams::new(100));
        store.add_to_cart(product("steak", 1500, "1.2 кг"), Grams::new(300));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_items, 2);
        assert_eq!(snapshot.total_price, 573);
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(store.total_price(), 573);
    }

    #[test]
    fn concurrent_adds_of_same_product_keep_one_line() {
        let store = Arc::new(CartStore::default());
        let ribs = product("ribs", 990, "500 г");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let ribs = Arc::clone(&ribs);
                thread::spawn(move || {
                    for _ in 0..50 {
                        store.add_to_cart(Arc::clone(&ribs), Grams::new(10));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.total_items(), 1);
        assert_eq!(store.get_item_quantity(&ribs.id), Grams::new(8 * 50 * 10));
    }

    #[test]
    fn checkout_of_empty_cart_is_rejected() {
        let store = CartStore::default();
        let book = InMemoryOrderBook::new();
        assert!(matches!(
            store.checkout(&request(), &book),
            Err(CheckoutError::EmptyCart)
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn invalid_details_keep_cart_and_submit_nothing() {
        let store = CartStore::default();
        store.add_to_cart(product("ribs", 990, "500 г"), Grams::new(100));
        let book = InMemoryOrderBook::new();

        let bad = CheckoutRequest::pickup(CustomerDetails::new("", "123"));
        assert!(matches!(
            store.checkout(&bad, &book),
            Err(CheckoutError::InvalidDetails(_))
        ));
        assert!(book.is_empty());
        assert_eq!(store.total_items(), 1);
    }

    #[test]
    fn failed_submission_keeps_cart() {
        let store = CartStore::default();
        store.add_to_cart(product("ribs", 990, "500 г"), Grams::new(100));
        let events = store.subscribe();

        let err = store.checkout(&request(), &FailingSubmitter).unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(SubmitError::Unavailable(_))));
        assert_eq!(store.total_price(), 198);
        assert!(events.drain().is_empty());
    }

    #[test]
    fn submitter_can_use_store_and_later_additions_survive_checkout() {
        let store = CartStore::default();
        let ribs = product("ribs", 990, "500 г");
        store.add_to_cart(Arc::clone(&ribs), Grams::new(100));
        store.add_to_cart(product("steak", 1500, "1.2 кг"), Grams::new(300));

        let submitter = TopUpSubmitter {
            store: &store,
            book: InMemoryOrderBook::new(),
            seen_total: Mutex::new(None),
            extra: Arc::clone(&ribs),
        };
        let order = store.checkout(&request(), &submitter).unwrap();

        assert_eq!(order.total_price, 573);
        assert_eq!(*submitter.seen_total.lock().unwrap(), Some(573));
        assert_eq!(store.total_items(), 1);
        assert_eq!(store.get_item_quantity(&ribs.id), Grams::new(100));
        assert_eq!(store.get_item_quantity(&ProductId::new("steak").unwrap()), Grams::ZERO);
    }

    #[test]
    fn successful_checkout_clears_cart_and_returns_order() {
        let store = CartStore::default();
        store.add_to_cart(product("ribs", 990, "500 г"), Grams::new(100));
        store.add_to_cart(product("steak", 1500, "1.2 кг"), Grams::new(300));
        let events = store.subscribe();
        let book = InMemoryOrderBook::new();

        let order = store.checkout(&request(), &book).unwrap();

        assert_eq!(order.total_price, 573);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(store.is_empty());
        assert_eq!(book.get(&order.id).map(|o| o.total_price), Some(573));

        let drained = events.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].event_type(), "cart.cleared");
    }
}
