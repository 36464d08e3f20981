//! # Cart Store
//!
//! The single source of truth for the active cart.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            set_cart(Some)                                               │
//! │   ┌─────────┐ ───────────────► ┌──────────────┐                         │
//! │   │ No Cart │                  │ Cart Loaded  │◄──┐ add_item            │
//! │   └─────────┘ ◄─────────────── └──────────────┘   │ remove_item         │
//! │     ▲    │     clear_cart /           │           │ update_quantity     │
//! │     └────┘     set_cart(None)         └───────────┘                     │
//! │  (mutations are no-ops)                                                 │
//! │                                                                         │
//! │  Initial state: No Cart                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## UI Operations Flow
//! ```text
//! Page Action              Store Operation          Then
//! ───────────              ───────────────          ────
//! Cart fetched ──────────► set_cart(Some(cart)) ──► notify
//! Add to Cart ───────────► add_item(item) ────────► recompute? → notify
//! Quantity input ────────► update_quantity(id, n) ► recompute? → notify
//! Remove button ─────────► remove_item(id) ───────► recompute? → notify
//! Logout ────────────────► clear_cart() ──────────► notify
//! ```
//!
//! ## Threading
//! `Rc<RefCell<..>>`: the store lives on the UI thread and is `!Send`.
//! Subscribers run after the borrow is released, so they may call back
//! into the store.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use storefront_core::cart;
use storefront_core::validation::validate_quantity;
use storefront_core::{Cart, CartItem, CoreError, CoreResult, Product};
use tracing::{debug, trace};

use crate::config::StoreConfig;

type Callback = dyn Fn(Option<&Cart>);

struct Inner {
    cart: Option<Cart>,
    /// Bumped once per state change.
    version: u64,
    subscribers: Vec<Weak<Callback>>,
}

/// Observable holder of `Option<Cart>`.
///
/// Cloning gives another handle to the same state. Build one at startup
/// and hand it to the components that need it.
#[derive(Clone)]
pub struct CartStore {
    inner: Rc<RefCell<Inner>>,
    config: Rc<StoreConfig>,
}

/// Keeps a subscriber registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Rc<Callback>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl CartStore {
    /// Creates a store in the "No Cart" state.
    pub fn new(config: StoreConfig) -> Self {
        CartStore {
            inner: Rc::new(RefCell::new(Inner {
                cart: None,
                version: 0,
                subscribers: Vec::new(),
            })),
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Snapshot of the current state.
    pub fn cart(&self) -> Option<Cart> {
        self.inner.borrow().cart.clone()
    }

    /// Executes a function with read access to the current state.
    ///
    /// ## Usage
    /// ```rust
    /// # use storefront_state::{CartStore, StoreConfig};
    /// let store = CartStore::new(StoreConfig::default());
    /// let lines = store.with_cart(|cart| cart.map_or(0, |c| c.items.len()));
    /// assert_eq!(lines, 0);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&Cart>) -> R,
    {
        let inner = self.inner.borrow();
        f(inner.cart.as_ref())
    }

    /// Whether a cart (possibly empty) is loaded.
    pub fn is_loaded(&self) -> bool {
        self.inner.borrow().cart.is_some()
    }

    /// Number of state changes since the store was created.
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Live subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Registers `callback` to run after every state change.
    ///
    /// Callbacks run synchronously, in registration order, with the new
    /// state. Operations that leave the state equal to what it was do not
    /// notify, unlike a zustand-style store that notifies on every `set`.
    /// A no-op `remove_item`, `clear_cart` on "No Cart", or any mutation
    /// with no cart loaded is silent.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Cart>) + 'static,
    {
        let callback: Rc<Callback> = Rc::new(callback);
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|w| w.strong_count() > 0);
        inner.subscribers.push(Rc::downgrade(&callback));
        Subscription {
            _callback: callback,
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Replaces the whole state. No validation and no recompute.
    pub fn set_cart(&self, cart: Option<Cart>) {
        debug!(
            loaded = cart.is_some(),
            lines = cart.as_ref().map_or(0, |c| c.items.len()),
            "set_cart"
        );
        self.commit(|_| cart);
    }

    /// Adds a line item, merging on `product_id`.
    ///
    /// No-op when no cart is loaded.
    pub fn add_item(&self, item: CartItem) {
        let recompute = self.config.recompute_totals;
        self.commit(|state| {
            let mut cart = state?;
            let product_id = item.product_id.clone();
            let quantity = item.quantity;
            let outcome = cart::merge_item(&mut cart, item);
            debug!(%product_id, quantity, ?outcome, "add_item");
            Some(if recompute { cart::recompute(cart) } else { cart })
        });
    }

    /// Removes the line whose `id` equals `item_id`.
    ///
    /// No-op when no cart is loaded or nothing matches.
    pub fn remove_item(&self, item_id: &str) {
        let recompute = self.config.recompute_totals;
        self.commit(|state| {
            let mut cart = state?;
            let removed = cart::remove_line(&mut cart, item_id);
            debug!(item_id, removed, "remove_item");
            Some(if recompute && removed {
                cart::recompute(cart)
            } else {
                cart
            })
        });
    }

    /// Sets the quantity of the line whose `id` equals `item_id`.
    ///
    /// The value is stored as given; zero and negative are the caller's call.
    pub fn update_quantity(&self, item_id: &str, quantity: i64) {
        let recompute = self.config.recompute_totals;
        self.commit(|state| {
            let mut cart = state?;
            let matched = cart::set_line_quantity(&mut cart, item_id, quantity);
            debug!(item_id, quantity, matched, "update_quantity");
            Some(if recompute && matched {
                cart::recompute(cart)
            } else {
                cart
            })
        });
    }

    /// Drops the cart, back to "No Cart".
    pub fn clear_cart(&self) {
        debug!("clear_cart");
        self.commit(|_| None);
    }

    /// Checked add-to-cart from a catalog product.
    ///
    /// ## Flow
    /// ```text
    /// add_product(product, qty)
    ///      │
    ///      ├── qty <= 0?                    → Validation error
    ///      ├── no cart loaded?              → CartNotLoaded
    ///      ├── stock < in_cart + qty?       → InsufficientStock
    ///      │
    ///      └── add_item(CartItem::from_product(product, qty))
    /// ```
    pub fn add_product(&self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let in_cart = self
            .with_cart(|cart| {
                cart.map(|c| c.find_by_product(&product.id).map_or(0, |i| i.quantity))
            })
            .ok_or(CoreError::CartNotLoaded)?;

        let requested = in_cart.saturating_add(quantity);
        if !product.can_fulfil(requested) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested,
            });
        }

        self.add_item(CartItem::from_product(product, quantity));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Applies a transition and notifies if the state changed.
    fn commit<F>(&self, transition: F)
    where
        F: FnOnce(Option<Cart>) -> Option<Cart>,
    {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let next = transition(inner.cart.clone());
            if next == inner.cart {
                false
            } else {
                inner.cart = next;
                inner.version += 1;
                true
            }
        };

        if changed {
            self.notify();
        }
    }

    fn notify(&self) {
        let (snapshot, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<Rc<Callback>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.cart.clone(), callbacks)
        };

        trace!(subscribers = callbacks.len(), "notifying");
        for callback in callbacks {
            callback(snapshot.as_ref());
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("CartStore")
            .field("cart", &inner.cart)
            .field("version", &inner.version)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::cell::Cell;
    use storefront_core::Money;

    fn line(id: &str, product_id: &str, quantity: i64) -> CartItem {
        CartItem {
            id: id.to_string(),
            product_id: product_id.to_string(),
            product_name: format!("Product {}", product_id),
            product_price: Money::from_cents(500),
            product_image: String::new(),
            quantity,
            subtotal: Money::from_cents(500 * quantity),
        }
    }

    fn product(id: &str, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            price: Money::from_cents(500),
            category: "misc".to_string(),
            stock,
            images: Vec::new(),
            specifications: serde_json::Map::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn loaded_store(config: StoreConfig) -> CartStore {
        let store = CartStore::new(config);
        store.set_cart(Some(Cart::empty("u1", Utc::now())));
        store
    }

    fn quantities(store: &CartStore) -> Vec<(String, i64)> {
        store.with_cart(|c| {
            c.map(|c| c.items.iter().map(|i| (i.id.clone(), i.quantity)).collect())
                .unwrap_or_default()
        })
    }

    #[test]
    fn test_initial_state_is_no_cart() {
        let store = CartStore::default();
        assert!(!store.is_loaded());
        assert_eq!(store.cart(), None);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_mutations_without_cart_are_noops() {
        let store = CartStore::default();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let _sub = store.subscribe(move |_| seen.set(seen.get() + 1));

        store.add_item(line("a", "p1", 1));
        store.remove_item("a");
        store.update_quantity("a", 3);
        store.clear_cart();

        assert_eq!(store.cart(), None);
        assert_eq!(store.version(), 0);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_set_cart_does_not_recompute() {
        let store = CartStore::default();
        let mut cart = Cart::empty("u1", Utc::now());
        cart.items.push(line("a", "p1", 2));
        cart.total = Money::from_cents(1);

        store.set_cart(Some(cart.clone()));
        assert_eq!(store.cart(), Some(cart));
    }

    fn recomputing() -> StoreConfig {
        StoreConfig {
            recompute_totals: true,
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_add_keeps_appended_item_verbatim_by_default() {
        let store = loaded_store(StoreConfig::default());
        let mut odd = line("a", "p1", 2);
        odd.subtotal = Money::from_cents(123);

        store.add_item(odd.clone());

        let cart = store.cart().unwrap();
        assert_eq!(cart.items, vec![odd]);
        assert!(cart.total.is_zero());
        assert_eq!(cart.item_count, 0);
    }

    #[test]
    fn test_add_merges_and_recomputes() {
        let store = loaded_store(recomputing());

        store.add_item(line("a", "p1", 2));
        store.add_item(line("b", "p1", 3));

        assert_eq!(quantities(&store), vec![("a".to_string(), 5)]);
        let cart = store.cart().unwrap();
        assert_eq!(cart.items[0].subtotal.cents(), 2500);
        assert_eq!(cart.total.cents(), 2500);
        assert_eq!(cart.item_count, 1);
    }

    #[test]
    fn test_aggregates_stay_stale_when_recompute_disabled() {
        let store = loaded_store(StoreConfig::default());

        store.add_item(line("a", "p1", 2));
        store.add_item(line("b", "p1", 3));

        let cart = store.cart().unwrap();
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].subtotal.cents(), 1000);
        assert!(cart.total.is_zero());
        assert_eq!(cart.item_count, 0);
    }

    #[test]
    fn test_update_quantity_accepts_zero_and_negative() {
        let store = loaded_store(recomputing());
        store.add_item(line("x", "p1", 1));

        store.update_quantity("x", 0);
        assert_eq!(quantities(&store), vec![("x".to_string(), 0)]);

        store.update_quantity("x", -2);
        assert_eq!(quantities(&store), vec![("x".to_string(), -2)]);
        assert_eq!(store.cart().unwrap().total.cents(), -1000);
    }

    #[test]
    fn test_huge_quantities_do_not_panic() {
        for config in [StoreConfig::default(), recomputing()] {
            let store = loaded_store(config);
            store.add_item(line("x", "p1", 1));

            store.update_quantity("x", i64::MAX);
            store.add_item(line("y", "p1", 1));
            assert_eq!(quantities(&store), vec![("x".to_string(), i64::MAX)]);
        }

        let store = loaded_store(recomputing());
        store.add_item(line("x", "p1", 1));
        store.update_quantity("x", i64::MAX);
        assert_eq!(store.cart().unwrap().total.cents(), i64::MAX);

        let mug = product("p1", 4);
        assert!(matches!(
            store.add_product(&mug, 1),
            Err(CoreError::InsufficientStock { requested: i64::MAX, .. })
        ));
    }

    #[test]
    fn test_remove_and_update_key_on_line_id_not_product() {
        let store = loaded_store(StoreConfig::default());
        store.add_item(line("x", "p1", 1));

        store.remove_item("p1");
        store.update_quantity("p1", 7);

        assert_eq!(quantities(&store), vec![("x".to_string(), 1)]);
    }

    #[test]
    fn test_clear_cart_from_any_state() {
        let store = loaded_store(StoreConfig::default());
        store.add_item(line("x", "p1", 1));

        store.clear_cart();
        assert!(!store.is_loaded());

        store.clear_cart();
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_notifies_once_per_change_with_new_state() {
        let store = CartStore::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _sub = store.subscribe(move |cart| {
            sink.borrow_mut().push(cart.map(|c| c.items.len()));
        });

        store.set_cart(Some(Cart::empty("u1", Utc::now())));
        store.add_item(line("x", "p1", 1));
        store.remove_item("missing");
        store.remove_item("x");
        store.clear_cart();

        assert_eq!(*log.borrow(), vec![Some(0), Some(1), Some(0), None]);
        assert_eq!(store.version(), 4);
    }

    #[test]
    fn test_subscribers_run_in_registration_order() {
        let store = CartStore::default();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&order);
        let _a = store.subscribe(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&order);
        let _b = store.subscribe(move |_| second.borrow_mut().push("second"));

        store.set_cart(Some(Cart::empty("u1", Utc::now())));
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_dropped_subscription_is_not_called() {
        let store = CartStore::default();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let sub = store.subscribe(move |_| seen.set(seen.get() + 1));
        assert_eq!(store.subscriber_count(), 1);

        store.set_cart(Some(Cart::empty("u1", Utc::now())));
        drop(sub);
        store.clear_cart();

        assert_eq!(calls.get(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_may_call_back_into_store() {
        let store = CartStore::default();
        let handle = store.clone();
        let _sub = store.subscribe(move |cart| {
            if let Some(cart) = cart {
                if cart.items.iter().any(|i| i.quantity <= 0) {
                    let dead: Vec<String> = cart
                        .items
                        .iter()
                        .filter(|i| i.quantity <= 0)
                        .map(|i| i.id.clone())
                        .collect();
                    for id in dead {
                        handle.remove_item(&id);
                    }
                }
            }
        });

        store.set_cart(Some(Cart::empty("u1", Utc::now())));
        store.add_item(line("x", "p1", 1));
        store.update_quantity("x", 0);

        assert_eq!(store.cart().map(|c| c.items.len()), Some(0));
    }

    #[test]
    fn test_clones_share_state() {
        let store = CartStore::default();
        let other = store.clone();
        other.set_cart(Some(Cart::empty("u1", Utc::now())));
        assert!(store.is_loaded());
    }

    #[test]
    fn test_add_product_checks() {
        let store = CartStore::default();
        let mug = product("p1", 4);

        assert!(matches!(
            store.add_product(&mug, 1),
            Err(CoreError::CartNotLoaded)
        ));

        store.set_cart(Some(Cart::empty("u1", Utc::now())));
        assert!(matches!(
            store.add_product(&mug, 0),
            Err(CoreError::Validation(_))
        ));

        store.add_product(&mug, 3).unwrap();
        match store.add_product(&mug, 2) {
            Err(CoreError::InsufficientStock {
                available,
                requested,
                ..
            }) => {
                assert_eq!(available, 4);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }

        store.add_product(&mug, 1).unwrap();
        assert_eq!(quantities(&store), vec![("p1".to_string(), 4)]);
    }
}
