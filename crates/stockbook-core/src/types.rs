//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Product      │   │  StockMovement   │   │ AlertCondition  │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id (UUID)      │   │  seq (monotonic) │   │  alert_type     │      │
//! │  │  sku (business) │   │  id (UUID)       │   │  severity       │      │
//! │  │  stock_quantity │   │  quantity_change │   │  message        │      │
//! │  │  packaging      │   │  before / after  │   │  computed_at    │      │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │     Unit        │   │   MovementType   │   │ MovementRequest │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  Piece          │   │  Sale, StockIn,  │   │  inbound        │      │
//! │  │  Sheet          │   │  Adjustment, ... │   │  boundary type  │      │
//! │  │  Box            │   │  + direction()   │   │                 │      │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Base Unit Rule
//! Every stored balance is an integer count of **pieces**. Sheet and box
//! figures only exist at the caller boundary and are converted on the way in
//! ([`crate::units::to_base_units`]) or on the way out for display
//! ([`crate::units::from_base_units`]). The balance is never stored twice.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// =============================================================================
// Unit
// =============================================================================

/// Caller-facing packaging granularity for data entry and display.
///
/// The authoritative balance is always in pieces; `Sheet` and `Box` are
/// convertible multiples defined per product by its [`Packaging`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// The base unit. One piece = one tracked item.
    Piece,
    /// A strip/sheet of pieces (`pieces_per_sheet` pieces).
    Sheet,
    /// A box of sheets (`pieces_per_sheet * sheets_per_box` pieces).
    Box,
}

impl Unit {
    /// Returns the lowercase wire name of the unit.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Piece => "piece",
            Unit::Sheet => "sheet",
            Unit::Box => "box",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "piece" => Ok(Unit::Piece),
            "sheet" => Ok(Unit::Sheet),
            "box" => Ok(Unit::Box),
            other => Err(CoreError::InvalidUnit {
                unit: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Movement Type
// =============================================================================

/// The business reason for a balance change.
///
/// The movement type determines the sign of the delta (see [`direction`]);
/// callers always submit a positive magnitude, except for [`Adjustment`]
/// which carries an explicit signed quantity.
///
/// [`direction`]: MovementType::direction
/// [`Adjustment`]: MovementType::Adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Manual stock intake.
    StockIn,
    /// Manual stock removal.
    StockOut,
    /// Deduction from a completed sale.
    Sale,
    /// Intake from a supplier purchase.
    Purchase,
    /// Correction with caller-supplied sign.
    Adjustment,
    /// Customer return back into stock.
    Return,
    /// Write-off for damaged goods.
    Damage,
    /// Write-off for expired goods.
    Expired,
    /// Outbound transfer to another location.
    Transfer,
}

/// How a movement type maps its magnitude onto a signed delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    /// Magnitude increases the balance.
    Inbound,
    /// Magnitude decreases the balance.
    Outbound,
    /// Caller supplies the sign (adjustments only).
    Signed,
}

impl MovementType {
    /// Classifies the movement type by balance effect.
    pub const fn direction(&self) -> MovementDirection {
        match self {
            MovementType::StockIn | MovementType::Purchase | MovementType::Return => {
                MovementDirection::Inbound
            }
            MovementType::StockOut
            | MovementType::Sale
            | MovementType::Damage
            | MovementType::Expired
            | MovementType::Transfer => MovementDirection::Outbound,
            MovementType::Adjustment => MovementDirection::Signed,
        }
    }

    /// Returns the snake_case wire name of the movement type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementType::StockIn => "stock_in",
            MovementType::StockOut => "stock_out",
            MovementType::Sale => "sale",
            MovementType::Purchase => "purchase",
            MovementType::Adjustment => "adjustment",
            MovementType::Return => "return",
            MovementType::Damage => "damage",
            MovementType::Expired => "expired",
            MovementType::Transfer => "transfer",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Packaging
// =============================================================================

/// Per-product packaging configuration used for unit conversion.
///
/// Both factors must be >= 1; a product sold only as loose pieces uses
/// `Packaging::new(1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packaging {
    /// How many base units (pieces) make one sheet.
    pub pieces_per_sheet: i64,
    /// How many sheets make one box.
    pub sheets_per_box: i64,
}

impl Packaging {
    /// Creates a packaging configuration.
    pub const fn new(pieces_per_sheet: i64, sheets_per_box: i64) -> Self {
        Packaging {
            pieces_per_sheet,
            sheets_per_box,
        }
    }

    /// Derived: how many pieces make one box.
    pub const fn pieces_per_box(&self) -> i64 {
        self.pieces_per_sheet * self.sheets_per_box
    }
}

// =============================================================================
// Product
// =============================================================================

/// A tracked product, referenced by the ledger and the alert evaluator.
///
/// `stock_quantity` is the **only** authoritative balance, in base units
/// (pieces). It is owned and mutated exclusively by the stock ledger; all
/// other components read snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown in alerts and history views.
    pub name: String,

    /// How many pieces make one sheet (>= 1).
    pub pieces_per_sheet: i64,

    /// How many sheets make one box (>= 1).
    pub sheets_per_box: i64,

    /// Current balance in base units (pieces). Never negative.
    pub stock_quantity: i64,

    /// Restocking should be triggered at or below this level (base units).
    pub reorder_level: i64,

    /// Low-stock warning threshold (base units).
    pub min_stock_level: i64,

    /// Expiry date of the current batch, if tracked.
    pub expiry_date: Option<NaiveDate>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the packaging configuration for unit conversion.
    #[inline]
    pub fn packaging(&self) -> Packaging {
        Packaging::new(self.pieces_per_sheet, self.sheets_per_box)
    }

    /// Derived: how many pieces make one box.
    #[inline]
    pub fn pieces_per_box(&self) -> i64 {
        self.packaging().pieces_per_box()
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// An immutable ledger entry recording one atomic balance change.
///
/// Movements are append-only: they are created exactly once by the stock
/// ledger and never updated or deleted. Corrections are new compensating
/// movements, never edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    /// Monotonic log sequence number, assigned on append.
    /// Total order of the log; per product it matches the order in which
    /// balance updates became visible.
    pub seq: i64,

    /// Unique identifier (UUID v4).
    pub id: String,

    /// The product whose balance changed.
    pub product_id: String,

    /// Business reason for the change.
    pub movement_type: MovementType,

    /// Signed change in base units (positive = increase).
    pub quantity_change: i64,

    /// Balance immediately before this entry (base units).
    pub quantity_before: i64,

    /// Balance immediately after this entry (base units).
    /// Always `quantity_before + quantity_change`, and never negative.
    pub quantity_after: i64,

    /// Unit the caller entered the quantity in. Retained for display and
    /// audit; the balance itself is normalized to pieces.
    pub unit_used: Unit,

    /// Short reason text, optional.
    pub reason: Option<String>,

    /// Free-form notes, optional.
    pub notes: Option<String>,

    /// External correlation id (e.g., a sale id), optional.
    pub reference_number: Option<String>,

    /// Who performed the movement.
    pub actor_id: String,

    /// When the movement was written. Immutable.
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Checks the ledger arithmetic invariant for this entry.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.quantity_after == self.quantity_before + self.quantity_change
            && self.quantity_after >= 0
    }
}

// =============================================================================
// Movement Request
// =============================================================================

/// Inbound boundary type: what a caller submits to change a balance.
///
/// `quantity` is a positive magnitude in `unit`; the sign of the resulting
/// delta comes from `movement_type`. Adjustments are the exception and carry
/// an explicit signed quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementRequest {
    pub product_id: String,
    pub movement_type: MovementType,
    /// Magnitude in caller units; signed only for adjustments.
    pub quantity: i64,
    pub unit: Unit,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub reference_number: Option<String>,
    pub actor_id: String,
}

impl MovementRequest {
    /// Creates a request with the required fields; optional audit fields
    /// default to `None` and can be set with the builder methods.
    pub fn new(
        product_id: impl Into<String>,
        movement_type: MovementType,
        quantity: i64,
        unit: Unit,
        actor_id: impl Into<String>,
    ) -> Self {
        MovementRequest {
            product_id: product_id.into(),
            movement_type,
            quantity,
            unit,
            reason: None,
            notes: None,
            reference_number: None,
            actor_id: actor_id.into(),
        }
    }

    /// Sets the reason text.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Sets the external correlation id.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }
}

// =============================================================================
// Alerts
// =============================================================================

/// Alert classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    OutOfStock,
    LowStock,
    ReorderNeeded,
    ExpiringSoon,
    Expired,
}

/// Alert severity. Declaration order is the display order:
/// critical before warning before info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

/// A derived alert condition.
///
/// Not an owned entity: this is a pure projection of current product state
/// at evaluation time, recomputable at any cadence. Read/dismissed status is
/// a presentation concern outside this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertCondition {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub product_id: String,
    pub message: String,
    pub computed_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
