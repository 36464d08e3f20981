//! # storefront-core: Pure Domain Logic for the Storefront
//!
//! This crate holds the shared data model and every piece of cart logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Pages (TypeScript)                           │   │
//! │  │    Product List ──► Product Page ──► Cart Page ──► Checkout     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ subscribe / operations                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    storefront-state                             │   │
//! │  │    CartStore: set_cart, add_item, remove_item, ...              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  merge    │  │   rules   │  │   │
//! │  │   │  Order    │  │           │  │ recompute │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Cart, Order, etc.)
//! - [`money`] - Integer-cents Money, decimal on the wire
//! - [`cart`] - Pure cart operations (merge-on-add, filter, recompute)
//! - [`error`] - Domain error types
//! - [`validation`] - Input rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use storefront_core::{cart, Cart, CartItem, Money};
//!
//! let mut basket = Cart::empty("user-1", Utc::now());
//! let item = CartItem {
//!     id: "a".to_string(),
//!     product_id: "p1".to_string(),
//!     product_name: "Mug".to_string(),
//!     product_price: Money::from_cents(1250),
//!     product_image: String::new(),
//!     quantity: 2,
//!     subtotal: Money::from_cents(2500),
//! };
//!
//! cart::merge_item(&mut basket, item);
//! let basket = cart::recompute(basket);
//! assert_eq!(basket.total.cents(), 2500);
//! assert_eq!(basket.item_count, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Money` instead of
// `use storefront_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest page size the backend accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
