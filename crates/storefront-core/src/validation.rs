//! # Validation Module
//!
//! Input validation for values the storefront sends to the backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Forms (TypeScript)                                           │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Same rules the backend enforces, checked before the request       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── Authoritative (stock, ownership, ...)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart store's core operations deliberately skip these checks; only
//! the checked entry points run them.
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_object_id, validate_quantity};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_object_id("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
//! ```

use crate::error::ValidationError;
use crate::{MAX_PAGE_SIZE, MAX_PRODUCT_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Length of a hex-encoded document identifier.
const OBJECT_ID_LEN: usize = 24;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Structural check only: one `@`, non-empty local part, and a dotted
/// domain. Deliverability is the backend's problem.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');

    if local.is_empty() || !domain_ok || email.contains(char::is_whitespace) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a document identifier (24 hex characters).
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_object_id;
///
/// assert!(validate_object_id("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
/// assert!(validate_object_id("not-an-id").is_err());
/// ```
pub fn validate_object_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() != OBJECT_ID_LEN || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: format!("must be {} hexadecimal characters", OBJECT_ID_LEN),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity being added to, or set on, a cart line.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product Page: Add to Cart                                              │
/// │                                                                         │
/// │  Shopper picks quantity: 0                                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       └── OK → CartStore::add_product                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a product price in cents. Free products are not sold.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level (zero means sold out, negative is invalid).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates listing parameters: 1-based page and a page size of 1..=100.
pub fn validate_page_request(page: u32, per_page: u32) -> ValidationResult<()> {
    if page == 0 {
        return Err(ValidationError::MustBePositive {
            field: "page".to_string(),
        });
    }

    if per_page == 0 || per_page > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: i64::from(MAX_PAGE_SIZE),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Ceramic Mug").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(200)).is_ok());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("ada.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@localhost").is_err());
        assert!(validate_email("ada@@example.com").is_err());
        assert!(validate_email("a da@example.com").is_err());
    }

    #[test]
    fn test_validate_object_id() {
        assert!(validate_object_id("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
        assert!(validate_object_id("").is_err());
        assert!(validate_object_id("65a1f0c2e4b0a1b2c3d4e5f").is_err());
        assert!(validate_object_id("zza1f0c2e4b0a1b2c3d4e5f6").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents(1).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_page_request() {
        assert!(validate_page_request(1, 20).is_ok());
        assert!(validate_page_request(3, 100).is_ok());
        assert!(validate_page_request(0, 20).is_err());
        assert!(validate_page_request(1, 0).is_err());
        assert!(validate_page_request(1, 101).is_err());
    }
}
