//! # Cart Operations
//!
//! Pure functions over [`Cart`]. The observable store in
//! `storefront-state` is a thin shell that calls these and notifies.
//!
//! ## Keying Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation            Matches on        Missing key                     │
//! │  ─────────────────    ──────────────    ─────────────────────────       │
//! │  merge_item           product_id        append new line                 │
//! │  remove_line          line id           unchanged                       │
//! │  set_line_quantity    line id           unchanged                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these touch `total`, `item_count` or `subtotal`. Call
//! [`recompute`] when those need to follow the items.

use crate::money::Money;
use crate::types::{Cart, CartItem};

/// Outcome of [`merge_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// An existing line for the same product absorbed the quantity.
    Merged,
    /// The item became a new line at the end.
    Appended,
}

/// Adds a line item, merging on `product_id`.
///
/// On a match only `item.quantity` is applied to the existing line; the
/// incoming `id`, `subtotal` and product fields are dropped. Otherwise the
/// item is appended exactly as given. The summed quantity saturates at
/// `i64::MAX`.
pub fn merge_item(cart: &mut Cart, item: CartItem) -> MergeOutcome {
    if let Some(existing) = cart
        .items
        .iter_mut()
        .find(|i| i.product_id == item.product_id)
    {
        existing.quantity = existing.quantity.saturating_add(item.quantity);
        return MergeOutcome::Merged;
    }

    cart.items.push(item);
    MergeOutcome::Appended
}

/// Removes every line whose `id` equals `item_id`.
///
/// Returns `true` if something was removed.
pub fn remove_line(cart: &mut Cart, item_id: &str) -> bool {
    let before = cart.items.len();
    cart.items.retain(|i| i.id != item_id);
    cart.items.len() != before
}

/// Sets the quantity of the line(s) whose `id` equals `item_id`.
///
/// No bounds checks. Returns `true` if a line matched.
pub fn set_line_quantity(cart: &mut Cart, item_id: &str, quantity: i64) -> bool {
    let mut matched = false;
    for line in cart.items.iter_mut().filter(|i| i.id == item_id) {
        line.quantity = quantity;
        matched = true;
    }
    matched
}

/// Brings derived fields in line with the items.
///
/// - each `subtotal` = `product_price × quantity`
/// - `total` = sum of subtotals
/// - `item_count` = number of lines
///
/// `updated_at` is left alone; only the backend stamps it.
pub fn recompute(mut cart: Cart) -> Cart {
    for line in &mut cart.items {
        line.subtotal = line.line_total();
    }
    cart.total = cart.items.iter().map(|i| i.subtotal).sum::<Money>();
    cart.item_count = i64::try_from(cart.items.len()).unwrap_or(i64::MAX);
    cart
}

/// Whether the stored aggregates already match what [`recompute`] would
/// produce.
pub fn is_consistent(cart: &Cart) -> bool {
    let lines_ok = cart.items.iter().all(|i| i.subtotal == i.line_total());
    let total: Money = cart.items.iter().map(|i| i.subtotal).sum();
    lines_ok
        && cart.total == total
        && usize::try_from(cart.item_count).ok() == Some(cart.items.len())
}

// =============================================================================
// Unit Tests
// =============================================================================
