//! # storefront-state: Observable Cart Store
//!
//! Holds the active cart for the presentation layer and notifies it on
//! every change.
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App start                                                              │
//! │    init_tracing()                                                       │
//! │    let store = CartStore::new(StoreConfig::from_env());                 │
//! │          │                                                              │
//! │          ├──► Header (subscribes: badge count)                          │
//! │          ├──► Product page (add_product / add_item)                     │
//! │          └──► Cart page (subscribes, update_quantity, remove_item)      │
//! │                                                                         │
//! │  Cart fetched from backend ──► store.set_cart(Some(cart))               │
//! │  Logout ─────────────────────► store.clear_cart()                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is passed to components explicitly; there is no global.

pub mod config;
pub mod store;
pub mod telemetry;

pub use config::StoreConfig;
pub use store::{CartStore, Subscription};
pub use telemetry::init_tracing;
