//! # Unit Conversion
//!
//! Converts caller-facing quantities (piece / sheet / box) to and from base
//! units for a product's packaging configuration.
//!
//! ## How Conversion Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │          Packaging: 10 pieces per sheet, 5 sheets per box              │
//! │                                                                         │
//! │  Caller enters: 2 box                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  to_base_units(2, Box) = 2 × 10 × 5 = 100 pieces                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Ledger stores the delta in pieces (the only stored form)              │
//! │                                                                         │
//! │  Display: from_base_units(100, Sheet) = 10.0 sheets                    │
//! │           from_base_units(105, Box)   = 2.1 boxes (fractional is fine) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No side effects; pure and deterministic. Rounding of fractional display
//! values is the caller's policy, never applied here.

use crate::error::{CoreError, CoreResult};
use crate::types::{Packaging, Unit};
use crate::validation::validate_packaging;

// =============================================================================
// Unit Size
// =============================================================================

/// Returns how many base units (pieces) one `unit` holds under `packaging`.
///
/// ## Errors
/// `InvalidConfiguration` if either packaging factor is < 1 or the derived
/// box size overflows.
pub fn unit_size(unit: Unit, packaging: &Packaging) -> CoreResult<i64> {
    validate_packaging(packaging)?;

    match unit {
        Unit::Piece => Ok(1),
        Unit::Sheet => Ok(packaging.pieces_per_sheet),
        Unit::Box => packaging
            .pieces_per_sheet
            .checked_mul(packaging.sheets_per_box)
            .ok_or_else(|| {
                CoreError::invalid_configuration("sheets_per_box", packaging.sheets_per_box)
            }),
    }
}

// =============================================================================
// Forward Conversion (caller units → pieces)
// =============================================================================

/// Converts a positive caller-unit quantity into base units (pieces).
///
/// The magnitude must be positive: the sign of a movement comes from its
/// movement type, never from the converted quantity.
///
/// ## Arguments
/// * `quantity` - Magnitude in `unit`, must be > 0
/// * `unit` - The unit the caller entered
/// * `packaging` - The product's packaging configuration
///
/// ## Errors
/// * `InvalidQuantity` - `quantity <= 0`, or the conversion overflows i64
/// * `InvalidConfiguration` - packaging factor < 1
///
/// ## Example
/// ```rust
/// use stockbook_core::types::{Packaging, Unit};
/// use stockbook_core::units::to_base_units;
///
/// let packaging = Packaging::new(10, 5);
/// assert_eq!(to_base_units(3, Unit::Piece, &packaging).unwrap(), 3);
/// assert_eq!(to_base_units(3, Unit::Sheet, &packaging).unwrap(), 30);
/// assert_eq!(to_base_units(2, Unit::Box, &packaging).unwrap(), 100);
/// ```
pub fn to_base_units(quantity: i64, unit: Unit, packaging: &Packaging) -> CoreResult<i64> {
    if quantity <= 0 {
        return Err(CoreError::invalid_quantity(
            quantity,
            "magnitude must be positive",
        ));
    }

    let size = unit_size(unit, packaging)?;

    quantity
        .checked_mul(size)
        .ok_or_else(|| CoreError::invalid_quantity(quantity, "conversion overflows"))
}

// =============================================================================
// Reverse Conversion (pieces → caller units, display only)
// =============================================================================

/// Converts a base-unit quantity into `unit` for display.
///
/// May be fractional when `base_quantity` is not an exact multiple of the
/// unit size; this function never rounds. Negative inputs are allowed so
/// signed deltas can be displayed.
///
/// ## Example
/// ```rust
/// use stockbook_core::types::{Packaging, Unit};
/// use stockbook_core::units::from_base_units;
///
/// let packaging = Packaging::new(10, 5);
/// assert_eq!(from_base_units(100, Unit::Box, &packaging).unwrap(), 2.0);
/// assert_eq!(from_base_units(105, Unit::Box, &packaging).unwrap(), 2.1);
/// assert_eq!(from_base_units(-30, Unit::Sheet, &packaging).unwrap(), -3.0);
/// ```
pub fn from_base_units(base_quantity: i64, unit: Unit, packaging: &Packaging) -> CoreResult<f64> {
    let size = unit_size(unit, packaging)?;
    Ok(base_quantity as f64 / size as f64)
}

// =============================================================================
// Unit Tests
// =============================================================================
