//! # Validation Module
//!
//! Input validation for Stockroom.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin panel form                                             │
//! │  ├── Required fields, numeric inputs                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command layer (Rust)                                         │
//! │  ├── Type validation (deserialization / clap)                          │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                         │
//! │  ├── Accepts whatever it is given (no validation)                      │
//! │  └── SQLite: NOT NULL, CHECK (quantity >= 0), UNIQUE category name     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_sku, validate_new_product};
//! use stockroom_core::NewProduct;
//!
//! validate_sku("WID-001").unwrap();
//!
//! let product = NewProduct {
//!     sku: "WID-001".into(),
//!     name: "Blue Widget".into(),
//!     category: "Widgets".into(),
//!     price_cents: 1299,
//!     quantity: 20,
//!     low_stock_threshold: 5,
//! };
//! validate_new_product(&product).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{NewCategory, NewProduct, ProductPatch};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_SKU_LEN: usize = 50;
pub const MAX_NAME_LEN: usize = 200;
pub const MAX_CATEGORY_LEN: usize = 100;
pub const MAX_REASON_LEN: usize = 500;
pub const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ```rust
/// use stockroom_core::validation::validate_sku;
///
/// assert!(validate_sku("WID-001").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    required_text("sku", sku, MAX_SKU_LEN)?;

    if !sku
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required_text("name", name, MAX_NAME_LEN)
}

/// Validates a category name, either on a product or a category record.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    required_text("category", name, MAX_CATEGORY_LEN)
}

/// Validates an adjustment reason.
///
/// ## Returns
/// The trimmed reason.
pub fn validate_reason(reason: &str) -> ValidationResult<String> {
    required_text("reason", reason, MAX_REASON_LEN)?;
    Ok(reason.trim().to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (no filter)
/// - Maximum 100 characters
///
/// ## Returns
/// The query as typed, or `""` when it is only whitespace. Inner and edge
/// spaces are part of the substring.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    if query.trim().is_empty() {
        return Ok(String::new());
    }

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price in cents. Zero is allowed.
///
/// ```rust
/// use stockroom_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Converts a signed quantity coming off the wire into a stock count.
pub fn validate_stock_count(field: &str, value: i64) -> ValidationResult<u32> {
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    })
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates every field of a product draft.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_sku(&product.sku)?;
    validate_product_name(&product.name)?;
    validate_category_name(&product.category)?;
    validate_price_cents(product.price_cents)?;
    Ok(())
}

/// Validates only the fields a patch supplies.
pub fn validate_product_patch(patch: &ProductPatch) -> ValidationResult<()> {
    if let Some(sku) = &patch.sku {
        validate_sku(sku)?;
    }
    if let Some(name) = &patch.name {
        validate_product_name(name)?;
    }
    if let Some(category) = &patch.category {
        validate_category_name(category)?;
    }
    if let Some(price_cents) = patch.price_cents {
        validate_price_cents(price_cents)?;
    }
    Ok(())
}

pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_category_name(&category.name)
}

// =============================================================================
// Unit Tests
// =============================================================================
