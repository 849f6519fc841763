//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── CoreError        - Domain errors (missing ids, bad requests)      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockroom-db errors (separate crate)                                  │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  Command layer errors (in app)                                         │
//! │  └── ApiError         - What the admin panel sees (serialized)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Frontend     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::{AdjustmentId, CategoryId, ProductId};

// =============================================================================
// Core Error
// =============================================================================

/// Core inventory errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product has the given id.
    ///
    /// ## When This Occurs
    /// - get/update/delete on an id that was never assigned
    /// - Stock adjustment against a product deleted in the meantime
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No category has the given id.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// No stock adjustment has the given id.
    #[error("Stock adjustment not found: {0}")]
    AdjustmentNotFound(AdjustmentId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the command layer before anything reaches a store, and by
/// [`AdjustmentRequest::new`](crate::adjustment::AdjustmentRequest::new)
/// which guards the history log's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed SKU or price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::ProductNotFound(42).to_string(),
            "Product not found: 42"
        );
        assert_eq!(
            CoreError::AdjustmentNotFound(7).to_string(),
            "Stock adjustment not found: 7"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("reason").to_string(), "reason is required");

        let err = ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        };
        assert_eq!(err.to_string(), "sku must be at most 50 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("sku").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
