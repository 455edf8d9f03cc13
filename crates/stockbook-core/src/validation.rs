//! # Validation Module
//!
//! Input validation utilities for Stockbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (forms, import tooling)                               │
//! │  ├── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Runs before any state mutation                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE / CHECK constraints                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{MovementDirection, MovementType, Packaging};
use crate::MAX_MOVEMENT_MAGNITUDE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_sku;
///
/// assert!(validate_sku("PARA-500").is_ok());
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
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

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an actor id accompanying a movement.
pub fn validate_actor_id(actor_id: &str) -> ValidationResult<()> {
    if actor_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "actor_id".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Packaging & Threshold Validators
// =============================================================================

/// Validates a packaging configuration.
///
/// Both factors must be >= 1. A loose-pieces product uses 1 / 1.
pub fn validate_packaging(packaging: &Packaging) -> CoreResult<()> {
    if packaging.pieces_per_sheet < 1 {
        return Err(CoreError::invalid_configuration(
            "pieces_per_sheet",
            packaging.pieces_per_sheet,
        ));
    }

    if packaging.sheets_per_box < 1 {
        return Err(CoreError::invalid_configuration(
            "sheets_per_box",
            packaging.sheets_per_box,
        ));
    }

    Ok(())
}

/// Validates a product's stock threshold configuration.
///
/// Thresholds are expressed in base units and must be non-negative.
/// Zero is allowed (the threshold simply never fires above out-of-stock).
pub fn validate_stock_thresholds(reorder_level: i64, min_stock_level: i64) -> CoreResult<()> {
    if reorder_level < 0 {
        return Err(CoreError::invalid_threshold("reorder_level", reorder_level));
    }

    if min_stock_level < 0 {
        return Err(CoreError::invalid_threshold(
            "min_stock_level",
            min_stock_level,
        ));
    }

    Ok(())
}

// =============================================================================
// Movement Validators
// =============================================================================

/// Validates a movement magnitude for its movement type.
///
/// ## Rules
/// - Directional movements (sale, stock-in, ...): magnitude must be > 0
/// - Adjustments: magnitude is signed and must be nonzero
/// - Absolute magnitude must not exceed [`MAX_MOVEMENT_MAGNITUDE`]
///
/// ## User Workflow
/// ```text
/// Submit movement (sale, qty: -3)
///      │
///      ▼
/// validate_magnitude(Sale, -3) ← THIS FUNCTION
///      │
///      └── Error: "magnitude must be positive" — nothing applied
/// ```
pub fn validate_magnitude(movement_type: MovementType, quantity: i64) -> CoreResult<()> {
    match movement_type.direction() {
        MovementDirection::Inbound | MovementDirection::Outbound => {
            if quantity <= 0 {
                return Err(CoreError::invalid_quantity(
                    quantity,
                    "magnitude must be positive",
                ));
            }
        }
        MovementDirection::Signed => {
            if quantity == 0 {
                return Err(CoreError::invalid_quantity(
                    quantity,
                    "adjustment magnitude must be nonzero",
                ));
            }
        }
    }

    if quantity.saturating_abs() > MAX_MOVEMENT_MAGNITUDE {
        return Err(CoreError::invalid_quantity(
            quantity,
            "magnitude exceeds the per-movement maximum",
        ));
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
    fn test_validate_sku() {
        assert!(validate_sku("PARA-500").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Paracetamol 500mg").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_actor_id() {
        assert!(validate_actor_id("cashier-1").is_ok());
        assert!(validate_actor_id("  ").is_err());
    }

    #[test]
    fn test_validate_packaging() {
        assert!(validate_packaging(&Packaging::new(10, 5)).is_ok());
        assert!(validate_packaging(&Packaging::new(1, 1)).is_ok());

        assert!(validate_packaging(&Packaging::new(0, 5)).is_err());
        assert!(validate_packaging(&Packaging::new(10, 0)).is_err());
        assert!(validate_packaging(&Packaging::new(-2, 5)).is_err());
    }

    #[test]
    fn test_validate_stock_thresholds() {
        assert!(validate_stock_thresholds(15, 20).is_ok());
        assert!(validate_stock_thresholds(0, 0).is_ok());

        assert!(validate_stock_thresholds(-1, 20).is_err());
        assert!(validate_stock_thresholds(15, -5).is_err());
    }

    #[test]
    fn test_validate_magnitude_directional() {
        assert!(validate_magnitude(MovementType::Sale, 3).is_ok());
        assert!(validate_magnitude(MovementType::StockIn, 1).is_ok());

        assert!(validate_magnitude(MovementType::Sale, 0).is_err());
        assert!(validate_magnitude(MovementType::Sale, -3).is_err());
        assert!(validate_magnitude(MovementType::Purchase, MAX_MOVEMENT_MAGNITUDE + 1).is_err());
    }

    #[test]
    fn test_validate_magnitude_adjustment() {
        assert!(validate_magnitude(MovementType::Adjustment, 5).is_ok());
        assert!(validate_magnitude(MovementType::Adjustment, -5).is_ok());
        assert!(validate_magnitude(MovementType::Adjustment, 0).is_err());
    }
}
