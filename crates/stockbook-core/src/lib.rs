//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the **heart** of the Stockbook inventory engine. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stockbook Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Callers (external collaborators)               │   │
//! │  │   sale completion ── stock-in forms ── bulk import ── dashboards│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ MovementRequest / queries              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockbook-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   units   │  │  alerts   │  │ validation│  │   │
//! │  │   │  Product  │  │ to_base   │  │ evaluate  │  │   rules   │  │   │
//! │  │   │  Movement │  │ from_base │  │ sort      │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO HIDDEN CLOCKS • PURE FUNCTIONS     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  stockbook-db (Database Layer)                  │   │
//! │  │       StockLedger, SQLite repositories, migrations              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, StockMovement, Unit, AlertCondition)
//! - [`units`] - Packaging unit conversion (piece / sheet / box)
//! - [`alerts`] - Alert evaluation against configured thresholds
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Base Units**: All stored balances are integer pieces (i64); sheet/box
//!    figures are always derived, never stored
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use stockbook_core::types::{Packaging, Unit};
//! use stockbook_core::units;
//!
//! // A product packed 10 pieces to a sheet, 5 sheets to a box
//! let packaging = Packaging::new(10, 5);
//!
//! // 2 boxes = 100 pieces
//! let base = units::to_base_units(2, Unit::Box, &packaging).unwrap();
//! assert_eq!(base, 100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod error;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockbook_core::Product` instead of
// `use stockbook_core::types::Product`

pub use alerts::AlertThresholds;
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default number of days before expiry at which a product starts reporting
/// an expiring-soon alert. Deployments override this via [`AlertThresholds`].
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// Maximum magnitude accepted for a single movement, in caller units.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 100000 instead of 100).
/// Large restocks are still possible by splitting into several movements.
pub const MAX_MOVEMENT_MAGNITUDE: i64 = 1_000_000;
