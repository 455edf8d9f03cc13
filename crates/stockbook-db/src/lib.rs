//! # stockbook-db: Database Layer for Stockbook
//!
//! This crate provides storage and the stock ledger for the Stockbook
//! inventory engine. It uses SQLite for local storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Stockbook Data Flow                               │
//! │                                                                         │
//! │  Caller (sale completion, stock-in form, bulk import)                  │
//! │       │ MovementRequest                                                │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockbook-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐    │   │
//! │  │   │  StockLedger  │   │ Repositories  │   │  Migrations  │    │   │
//! │  │   │  (ledger.rs)  │   │ product.rs    │   │  (embedded)  │    │   │
//! │  │   │               │   │ movement.rs   │   │              │    │   │
//! │  │   │ apply()       │   │ AlertService  │   │ 001_init.sql │    │   │
//! │  │   │ bulk_apply()  │   │ (read side)   │   │              │    │   │
//! │  │   └───────┬───────┘   └───────┬───────┘   └──────────────┘    │   │
//! │  │           │ writes            │ reads                          │   │
//! │  └───────────┼───────────────────┼────────────────────────────────┘   │
//! │              ▼                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │        products (balance) + stock_movements (append-only)      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`ledger`] - The stock ledger (the only write path for balances)
//! - [`repository`] - Product catalog and movement log queries
//! - [`alerts`] - Alert projection over current product rows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockbook_db::{Database, DbConfig};
//! use stockbook_core::{MovementRequest, MovementType, Unit};
//!
//! let db = Database::new(DbConfig::new("path/to/stockbook.db")).await?;
//!
//! // Every balance change goes through the ledger
//! let request = MovementRequest::new(product_id, MovementType::Sale, 2, Unit::Box, "cashier-1");
//! let movement = db.ledger().apply(&request).await?;
//! println!("new balance: {}", movement.quantity_after);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger::{LedgerConfig, StockLedger};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use alerts::AlertService;
pub use repository::movement::{MovementFilter, MovementPage, MovementRepository, MovementSummary};
pub use repository::product::ProductRepository;
