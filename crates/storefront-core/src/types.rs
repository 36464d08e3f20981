//! # Domain Types
//!
//! The shared data model: the same shapes the backend returns as JSON and
//! the pages read through the generated TypeScript bindings.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Cart       │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  user_id        │   │  id             │       │
//! │  │  name           │──►│  items[]  ──────┼──►│  items[]        │       │
//! │  │  price          │   │  total          │   │  status         │       │
//! │  │  stock          │   │  item_count     │   │  shipping_addr  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │          │                     │                     │                 │
//! │          ▼                     ▼                     ▼                 │
//! │   CartItem::from_product   CartItem            OrderItem (snapshot)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Line Items
//! A `CartItem` has its own line `id` and a `product_id`. Adding merges on
//! `product_id`; removing and updating key on the line `id`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// A registered shopper (or admin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub phone: Option<String>,
    pub is_active: bool,
    pub is_admin: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown in the account menu and on shipping labels.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Unit price.
    pub price: Money,
    pub category: String,
    /// Units available to sell.
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    /// Free-form attributes (size, material, ...).
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub specifications: Map<String, Value>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// First image, or an empty string when the product has none.
    pub fn primary_image(&self) -> &str {
        self.images.first().map(String::as_str).unwrap_or("")
    }

    /// Checks whether `quantity` units can be sold from current stock.
    pub fn can_fulfil(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One line of a cart.
///
/// Product fields are denormalized so the cart page renders without a
/// catalog lookup. `subtotal` is stored, not derived; see
/// [`crate::cart::recompute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Line-item identifier.
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_price: Money,
    pub product_image: String,
    /// Accepted verbatim, including zero or negative values.
    pub quantity: i64,
    pub subtotal: Money,
}

impl CartItem {
    /// Builds a line item from a catalog product.
    ///
    /// The line id is the product id, the same convention the backend uses
    /// when it expands a stored cart.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            id: product.id.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_price: product.price,
            product_image: product.primary_image().to_string(),
            quantity,
            subtotal: product.price.multiply_quantity(quantity),
        }
    }

    /// Price × quantity, computed fresh (ignores the stored `subtotal`).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.product_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A user's in-progress cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub user_id: String,
    /// Insertion order.
    pub items: Vec<CartItem>,
    pub total: Money,
    /// Number of distinct lines.
    pub item_count: i64,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// An empty cart, as the backend creates on a user's first visit.
    pub fn empty(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Cart {
            user_id: user_id.into(),
            items: Vec::new(),
            total: Money::zero(),
            item_count: 0,
            updated_at: now,
        }
    }

    /// Looks up a line by its line-item id.
    pub fn find_item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Looks up a line by the product it references.
    pub fn find_by_product(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Sum of all line quantities (the badge number on the cart icon).
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |acc, i| acc.saturating_add(i.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Shipping Address
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

// =============================================================================
// Order Item
// =============================================================================

/// A line of a placed order. Snapshot of the cart line at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: Money,
    pub subtotal: Money,
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        OrderItem {
            id: item.id.clone(),
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.product_price,
            subtotal: item.line_total(),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Wire value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders never change again.
    pub const fn is_final(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::ALL
                    .iter()
                    .map(|status| status.as_str().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Order
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a listing (products, orders, users).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total matching records across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    pub pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Builds a page, deriving `pages` as `ceil(total / per_page)`.
    ///
    /// A `per_page` of zero is treated as one so the division is defined.
    pub fn new(items: Vec<T>, total: u64, page: u32, per_page: u32) -> Self {
        let per_page = u64::from(per_page.max(1));
        let pages = total.div_ceil(per_page);
        PaginatedResponse {
            items,
            total,
            page,
            pages: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    /// Whether a page after this one exists.
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
