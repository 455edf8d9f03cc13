//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule / conversion failures            │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures, contention timeouts          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, quantities, field names)
//! 3. Errors are enum variants, never String
//! 4. Every variant is rejected before any state mutation

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unit name is not one of piece / sheet / box.
    #[error("Unknown unit: '{unit}'")]
    InvalidUnit { unit: String },

    /// Movement quantity does not satisfy the rules for its movement type.
    ///
    /// ## When This Occurs
    /// - Zero or negative magnitude for a directional movement
    /// - Zero magnitude for an adjustment
    /// - Magnitude so large the base-unit conversion overflows
    #[error("Invalid quantity {quantity}: {reason}")]
    InvalidQuantity { quantity: i64, reason: String },

    /// Packaging configuration is unusable for conversion.
    ///
    /// ## When This Occurs
    /// - `pieces_per_sheet < 1`
    /// - `sheets_per_box < 1`
    #[error("Invalid packaging configuration: {field} = {value}")]
    InvalidConfiguration { field: String, value: i64 },

    /// Insufficient stock to cover a deduction.
    ///
    /// ## When This Occurs
    /// - A sale, stock-out, damage, expiry write-off or outbound transfer
    ///   would bring the balance below zero
    ///
    /// ## User Workflow
    /// ```text
    /// Sell 1 box (= 50 pieces)
    ///      │
    ///      ▼
    /// Ledger reads balance: 5 pieces
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "PARA-500", available: 5, requested: 50 }
    ///      │
    ///      ▼
    /// UI shows: "Not enough stock" — balance unchanged, nothing logged
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Alert threshold configuration is invalid.
    ///
    /// ## When This Occurs
    /// - Negative `expiry_warning_days`
    /// - Negative `reorder_level` or `min_stock_level` on a product
    #[error("Invalid threshold: {field} = {value}")]
    InvalidThreshold { field: String, value: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidQuantity error.
    pub fn invalid_quantity(quantity: i64, reason: impl Into<String>) -> Self {
        CoreError::InvalidQuantity {
            quantity,
            reason: reason.into(),
        }
    }

    /// Creates an InvalidConfiguration error.
    pub fn invalid_configuration(field: impl Into<String>, value: i64) -> Self {
        CoreError::InvalidConfiguration {
            field: field.into(),
            value,
        }
    }

    /// Creates an InvalidThreshold error.
    pub fn invalid_threshold(field: impl Into<String>, value: i64) -> Self {
        CoreError::InvalidThreshold {
            field: field.into(),
            value,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., disallowed characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "PARA-500".to_string(),
            available: 5,
            requested: 50,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for PARA-500: available 5, requested 50"
        );

        let err = CoreError::invalid_configuration("pieces_per_sheet", 0);
        assert_eq!(
            err.to_string(),
            "Invalid packaging configuration: pieces_per_sheet = 0"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
