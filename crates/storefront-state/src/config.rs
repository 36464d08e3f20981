//! # Store Configuration
//!
//! Behaviour switches for the cart store, loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_*`)
//! 2. Defaults (this file)
//!
//! Read-only after the store is built.

use serde::{Deserialize, Serialize};
use storefront_core::Money;
use tracing::warn;

/// Environment variable toggling aggregate recomputation.
pub const ENV_RECOMPUTE_TOTALS: &str = "STOREFRONT_RECOMPUTE_TOTALS";

/// Environment variable overriding the currency symbol.
pub const ENV_CURRENCY_SYMBOL: &str = "STOREFRONT_CURRENCY_SYMBOL";

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Recompute `subtotal`, `total` and `item_count` after every item
    /// mutation. Off by default: those fields keep whatever the last
    /// `set_cart` delivered until the backend is asked again, and an
    /// appended item keeps its own `subtotal`.
    pub recompute_totals: bool,

    /// Currency symbol for display strings.
    pub currency_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            recompute_totals: false,
            currency_symbol: "$".to_string(),
        }
    }
}

impl StoreConfig {
    /// Creates a StoreConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOREFRONT_RECOMPUTE_TOTALS`: `true`/`false`/`1`/`0`
    /// - `STOREFRONT_CURRENCY_SYMBOL`: e.g. `€`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable variable source.
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(raw) = lookup(ENV_RECOMPUTE_TOTALS) {
            match parse_flag(&raw) {
                Some(flag) => config.recompute_totals = flag,
                None => warn!(
                    var = ENV_RECOMPUTE_TOTALS,
                    value = %raw,
                    "Ignoring unrecognised boolean"
                ),
            }
        }

        if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                warn!(var = ENV_CURRENCY_SYMBOL, "Ignoring empty currency symbol");
            } else {
                config.currency_symbol = symbol.to_string();
            }
        }

        config
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::Money;
    /// use storefront_state::StoreConfig;
    ///
    /// let config = StoreConfig::default();
    /// assert_eq!(config.format_money(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part()
        )
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
