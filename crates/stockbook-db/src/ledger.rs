//! # Stock Ledger
//!
//! The single authority for product balances. Every balance change in the
//! system - sales, stock-in, corrections, write-offs - passes through
//! [`StockLedger::apply`], which updates the balance and appends the
//! movement record as one atomic unit.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     StockLedger::apply                                  │
//! │                                                                         │
//! │  MovementRequest { product, type, quantity, unit, ... }                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate magnitude for the movement type (no lock yet)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Acquire per-product mutex (bounded wait → Contention)              │
//! │       │                                                                 │
//! │       ▼  ┌──────────────── transaction ────────────────┐               │
//! │  3.      │ read product row (balance + packaging)      │               │
//! │  4.      │ convert to base units, derive signed delta  │               │
//! │  5.      │ after < 0? → InsufficientStock, rollback    │               │
//! │  6.      │ UPDATE products.stock_quantity              │               │
//! │  7.      │ INSERT stock_movements (seq assigned)       │               │
//! │          └──────────────── commit ─────────────────────┘               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StockMovement { quantity_before, quantity_after, seq, ... }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Contract
//! Calls against the same product serialize on a per-product
//! `tokio::sync::Mutex`; calls against different products never block each
//! other. Two simultaneous sales reading the same pre-sale balance is the
//! one failure mode this module exists to prevent. The read-modify-write
//! plus the movement insert is the only critical section in the engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::validation::{validate_actor_id, validate_magnitude};
use stockbook_core::{
    units, CoreError, MovementDirection, MovementRequest, Product, StockMovement,
};

// =============================================================================
// Configuration
// =============================================================================

/// Stock ledger tuning.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// How long `apply` may wait to enter a product's critical section
    /// before failing with [`DbError::Contention`].
    /// Default: 5 seconds
    pub lock_timeout: Duration,
}

impl LedgerConfig {
    /// Sets the critical-section acquisition timeout.
    pub fn lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            lock_timeout: Duration::from_secs(5),
        }
    }
}

// =============================================================================
// Per-Product Lock Registry
// =============================================================================

/// Maps product ids to their write mutexes.
///
/// The outer std mutex only guards the map itself and is held for the
/// duration of a lookup/insert, never across an await point.
#[derive(Debug, Default)]
struct LockRegistry {
    locks: StdMutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl LockRegistry {
    /// Returns the mutex for a product, creating it on first use.
    fn lock_for(&self, product_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        locks
            .entry(product_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// The single write path for product balances.
///
/// Cloning shares the pool, the configuration and the lock registry, so
/// clones still serialize writes per product.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
    config: LedgerConfig,
    locks: Arc<LockRegistry>,
}

impl StockLedger {
    /// Creates a new stock ledger over a pool.
    pub fn new(pool: SqlitePool, config: LedgerConfig) -> Self {
        StockLedger {
            pool,
            config,
            locks: Arc::new(LockRegistry::default()),
        }
    }

    /// Applies one movement atomically and returns the written record.
    ///
    /// The returned movement carries the `quantity_before` / `quantity_after`
    /// snapshots, so callers can show the new balance without a second read.
    ///
    /// ## Errors
    /// * `Core(InvalidQuantity | InvalidUnit | InvalidConfiguration)` -
    ///   rejected before any state change
    /// * `Core(InsufficientStock)` - the delta would take the balance below
    ///   zero; nothing is written
    /// * `NotFound` - unknown or soft-deleted product
    /// * `Contention` - the product's critical section stayed busy past the
    ///   configured timeout; safe to retry
    pub async fn apply(&self, request: &MovementRequest) -> DbResult<StockMovement> {
        debug!(
            product_id = %request.product_id,
            movement_type = %request.movement_type,
            quantity = request.quantity,
            unit = %request.unit,
            "Applying movement"
        );

        // Cheap rejections before touching the lock or the pool.
        validate_magnitude(request.movement_type, request.quantity)?;
        validate_actor_id(&request.actor_id).map_err(CoreError::from)?;

        let lock = self.locks.lock_for(&request.product_id);
        let _guard = match timeout(self.config.lock_timeout, lock.lock()).await {
            Ok(guard) => guard,
            Err(_) => {
                let waited_ms = self.config.lock_timeout.as_millis() as u64;
                warn!(
                    product_id = %request.product_id,
                    waited_ms,
                    "Could not enter critical section"
                );
                return Err(DbError::Contention {
                    product_id: request.product_id.clone(),
                    waited_ms,
                });
            }
        };

        let mut tx = self.pool.begin().await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, sku, name,
                pieces_per_sheet, sheets_per_box,
                stock_quantity, reorder_level, min_stock_level,
                expiry_date, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(&request.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", &request.product_id))?;

        // Normalize the magnitude to base units, then apply the sign the
        // movement type dictates. Adjustments carry their own sign.
        let packaging = product.packaging();
        let base_magnitude = units::to_base_units(request.quantity.abs(), request.unit, &packaging)?;
        let quantity_change = match request.movement_type.direction() {
            MovementDirection::Inbound => base_magnitude,
            MovementDirection::Outbound => -base_magnitude,
            MovementDirection::Signed => {
                if request.quantity < 0 {
                    -base_magnitude
                } else {
                    base_magnitude
                }
            }
        };

        let quantity_before = product.stock_quantity;
        let quantity_after = quantity_before.checked_add(quantity_change).ok_or_else(|| {
            CoreError::invalid_quantity(request.quantity, "balance would overflow")
        })?;

        if quantity_after < 0 {
            // Dropping the transaction rolls it back: no balance change,
            // no movement row.
            return Err(CoreError::InsufficientStock {
                sku: product.sku,
                available: quantity_before,
                requested: -quantity_change,
            }
            .into());
        }

        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE products SET
                stock_quantity = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(quantity_after)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let movement_id = Uuid::new_v4().to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id, product_id, movement_type,
                quantity_change, quantity_before, quantity_after,
                unit_used, reason, notes, reference_number,
                actor_id, created_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12
            )
            "#,
        )
        .bind(&movement_id)
        .bind(&request.product_id)
        .bind(request.movement_type)
        .bind(quantity_change)
        .bind(quantity_before)
        .bind(quantity_after)
        .bind(request.unit)
        .bind(request.reason.as_deref())
        .bind(request.notes.as_deref())
        .bind(request.reference_number.as_deref())
        .bind(&request.actor_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let seq = result.last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            seq,
            product_id = %request.product_id,
            movement_type = %request.movement_type,
            quantity_change,
            balance = quantity_after,
            "Movement applied"
        );

        Ok(StockMovement {
            seq,
            id: movement_id,
            product_id: request.product_id.clone(),
            movement_type: request.movement_type,
            quantity_change,
            quantity_before,
            quantity_after,
            unit_used: request.unit,
            reason: request.reason.clone(),
            notes: request.notes.clone(),
            reference_number: request.reference_number.clone(),
            actor_id: request.actor_id.clone(),
            created_at: now,
        })
    }

    /// Applies a batch of movements, each independently and atomically.
    ///
    /// Requests are applied in submission order, never reordered. One
    /// failure does not roll back movements already committed; the caller
    /// receives a per-request outcome for partial-success reporting.
    /// Invalid rows fail with explicit typed errors - they are never
    /// silently skipped.
    pub async fn bulk_apply(
        &self,
        requests: &[MovementRequest],
    ) -> Vec<DbResult<StockMovement>> {
        let mut outcomes = Vec::with_capacity(requests.len());

        for request in requests {
            outcomes.push(self.apply(request).await);
        }

        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        info!(
            total = requests.len(),
            succeeded,
            failed = requests.len() - succeeded,
            "Bulk apply finished"
        );

        outcomes
    }

    /// Reads a product's current balance in base units.
    pub async fn current_balance(&self, product_id: &str) -> DbResult<i64> {
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await?;

        balance.ok_or_else(|| DbError::not_found("Product", product_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
