//! # Movement Query Service
//!
//! Read-side filtering and aggregation over the append-only movement log.
//! Never mutates: movements are written by the stock ledger only.
//!
//! ## Query Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Movement Log Reads                                  │
//! │                                                                         │
//! │  list(filter, limit)          → newest-first history view              │
//! │  list_page(filter, cursor)    → restartable keyset pagination          │
//! │  summarize(filter)            → per-type {count, Σ|quantity_change|}   │
//! │  count(filter)                → dashboard tiles                        │
//! │                                                                         │
//! │  filter = product? × movement_type? × date range?                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ordering is by `seq` descending - the log's total order - so a page
//! boundary never splits or repeats entries even while new movements are
//! being appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use crate::error::DbResult;
use stockbook_core::{MovementType, StockMovement};

// =============================================================================
// Filter
// =============================================================================

/// Filter for movement log queries. All fields optional; an empty filter
/// matches the whole log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementFilter {
    pub product_id: Option<String>,
    pub movement_type: Option<MovementType>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl MovementFilter {
    /// Restricts to one product.
    pub fn for_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Restricts to one movement type.
    pub fn of_type(mut self, movement_type: MovementType) -> Self {
        self.movement_type = Some(movement_type);
        self
    }

    /// Keeps movements created at or after this instant.
    pub fn since(mut self, date_from: DateTime<Utc>) -> Self {
        self.date_from = Some(date_from);
        self
    }

    /// Keeps movements created at or before this instant.
    pub fn until(mut self, date_to: DateTime<Utc>) -> Self {
        self.date_to = Some(date_to);
        self
    }
}

// =============================================================================
// Aggregation Types
// =============================================================================

/// Per-movement-type aggregate for dashboard tiles.
///
/// `total_quantity_magnitude` sums absolute deltas so inbound and outbound
/// volumes are comparable instead of cancelling out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSummary {
    pub count: i64,
    pub total_quantity_magnitude: i64,
}

/// One page of movement history plus the cursor for the next page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementPage {
    /// Newest-first page contents.
    pub movements: Vec<StockMovement>,
    /// Pass as `before_seq` to fetch the next (older) page; `None` when the
    /// log is exhausted.
    pub next_cursor: Option<i64>,
}

// =============================================================================
// Repository
// =============================================================================

/// Read-only repository over the movement log.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Lists movements matching the filter, newest first, bounded by `limit`.
    pub async fn list(&self, filter: &MovementFilter, limit: u32) -> DbResult<Vec<StockMovement>> {
        debug!(?filter, limit, "Listing movements");

        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT
                seq, id, product_id, movement_type,
                quantity_change, quantity_before, quantity_after,
                unit_used, reason, notes, reference_number,
                actor_id, created_at
            FROM stock_movements
            WHERE (?1 IS NULL OR product_id = ?1)
              AND (?2 IS NULL OR movement_type = ?2)
              AND (?3 IS NULL OR created_at >= ?3)
              AND (?4 IS NULL OR created_at <= ?4)
            ORDER BY seq DESC
            LIMIT ?5
            "#,
        )
        .bind(filter.product_id.as_deref())
        .bind(filter.movement_type)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Fetches one page of movement history.
    ///
    /// ## Keyset Pagination
    /// The cursor is the `seq` of the last entry of the previous page; only
    /// strictly older entries are returned. Restartable: a caller can resume
    /// from any stored cursor.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let mut cursor = None;
    /// loop {
    ///     let page = repo.list_page(&filter, 100, cursor).await?;
    ///     render(&page.movements);
    ///     match page.next_cursor {
    ///         Some(next) => cursor = Some(next),
    ///         None => break,
    ///     }
    /// }
    /// ```
    pub async fn list_page(
        &self,
        filter: &MovementFilter,
        limit: u32,
        before_seq: Option<i64>,
    ) -> DbResult<MovementPage> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT
                seq, id, product_id, movement_type,
                quantity_change, quantity_before, quantity_after,
                unit_used, reason, notes, reference_number,
                actor_id, created_at
            FROM stock_movements
            WHERE (?1 IS NULL OR product_id = ?1)
              AND (?2 IS NULL OR movement_type = ?2)
              AND (?3 IS NULL OR created_at >= ?3)
              AND (?4 IS NULL OR created_at <= ?4)
              AND (?5 IS NULL OR seq < ?5)
            ORDER BY seq DESC
            LIMIT ?6
            "#,
        )
        .bind(filter.product_id.as_deref())
        .bind(filter.movement_type)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(before_seq)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        // A short page means the log is exhausted.
        let next_cursor = if movements.len() == limit as usize {
            movements.last().map(|m| m.seq)
        } else {
            None
        };

        Ok(MovementPage {
            movements,
            next_cursor,
        })
    }

    /// Aggregates matching movements per type.
    ///
    /// Totals use `ABS(quantity_change)` so a day with +100 in and -100 out
    /// reports 100 in both tiles rather than zero.
    pub async fn summarize(
        &self,
        filter: &MovementFilter,
    ) -> DbResult<HashMap<MovementType, MovementSummary>> {
        debug!(?filter, "Summarizing movements");

        let rows = sqlx::query_as::<_, (MovementType, i64, i64)>(
            r#"
            SELECT
                movement_type,
                COUNT(*),
                COALESCE(SUM(ABS(quantity_change)), 0)
            FROM stock_movements
            WHERE (?1 IS NULL OR product_id = ?1)
              AND (?2 IS NULL OR movement_type = ?2)
              AND (?3 IS NULL OR created_at >= ?3)
              AND (?4 IS NULL OR created_at <= ?4)
            GROUP BY movement_type
            "#,
        )
        .bind(filter.product_id.as_deref())
        .bind(filter.movement_type)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_all(&self.pool)
        .await?;

        let summary = rows
            .into_iter()
            .map(|(movement_type, count, total_quantity_magnitude)| {
                (
                    movement_type,
                    MovementSummary {
                        count,
                        total_quantity_magnitude,
                    },
                )
            })
            .collect();

        Ok(summary)
    }

    /// Counts matching movements.
    pub async fn count(&self, filter: &MovementFilter) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM stock_movements
            WHERE (?1 IS NULL OR product_id = ?1)
              AND (?2 IS NULL OR movement_type = ?2)
              AND (?3 IS NULL OR created_at >= ?3)
              AND (?4 IS NULL OR created_at <= ?4)
            "#,
        )
        .bind(filter.product_id.as_deref())
        .bind(filter.movement_type)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use chrono::Duration;
    use stockbook_core::{MovementRequest, Product, Unit};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, sku: &str, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: format!("Test {}", sku),
            pieces_per_sheet: 10,
            sheets_per_box: 5,
            stock_quantity: stock,
            reorder_level: 15,
            min_stock_level: 20,
            expiry_date: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await.unwrap()
    }

    /// Writes a small movement mix across two products through the ledger.
    async fn seed_history(db: &Database) -> (Product, Product) {
        let para = seed_product(db, "PARA-500", 1000).await;
        let amox = seed_product(db, "AMOX-250", 500).await;
        let actor = "tester";

        let requests = vec![
            MovementRequest::new(&para.id, MovementType::StockIn, 2, Unit::Box, actor),
            MovementRequest::new(&para.id, MovementType::Sale, 3, Unit::Sheet, actor),
            MovementRequest::new(&para.id, MovementType::Sale, 2, Unit::Piece, actor),
            MovementRequest::new(&amox.id, MovementType::Sale, 1, Unit::Box, actor),
            MovementRequest::new(&para.id, MovementType::Damage, 4, Unit::Piece, actor),
        ];
        for outcome in db.ledger().bulk_apply(&requests).await {
            outcome.unwrap();
        }

        (para, amox)
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_bounded() {
        let db = test_db().await;
        let (para, _) = seed_history(&db).await;

        let all = db.movements().list(&MovementFilter::default(), 100).await.unwrap();
        assert_eq!(all.len(), 5);
        for pair in all.windows(2) {
            assert!(pair[0].seq > pair[1].seq);
        }
        // Newest entry is the damage write-off.
        assert_eq!(all[0].movement_type, MovementType::Damage);

        let limited = db.movements().list(&MovementFilter::default(), 2).await.unwrap();
        assert_eq!(limited.len(), 2);

        let for_para = db
            .movements()
            .list(&MovementFilter::default().for_product(&para.id), 100)
            .await
            .unwrap();
        assert_eq!(for_para.len(), 4);
        assert!(for_para.iter().all(|m| m.product_id == para.id));
    }

    #[tokio::test]
    async fn test_filter_by_type_and_date() {
        let db = test_db().await;
        seed_history(&db).await;
        let repo = db.movements();

        let sales = repo
            .list(&MovementFilter::default().of_type(MovementType::Sale), 100)
            .await
            .unwrap();
        assert_eq!(sales.len(), 3);

        let now = Utc::now();
        let recent = repo
            .list(
                &MovementFilter::default()
                    .since(now - Duration::hours(1))
                    .until(now + Duration::hours(1)),
                100,
            )
            .await
            .unwrap();
        assert_eq!(recent.len(), 5);

        let ancient = repo
            .list(&MovementFilter::default().until(now - Duration::hours(1)), 100)
            .await
            .unwrap();
        assert!(ancient.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_walks_the_whole_log_once() {
        let db = test_db().await;
        seed_history(&db).await;
        let repo = db.movements();

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = repo
                .list_page(&MovementFilter::default(), 2, cursor)
                .await
                .unwrap();
            seen.extend(page.movements.iter().map(|m| m.seq));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(seen.len(), 5);
        // Strictly descending: no entry repeated or skipped across pages.
        for pair in seen.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[tokio::test]
    async fn test_summarize_uses_absolute_magnitudes() {
        let db = test_db().await;
        let (para, _) = seed_history(&db).await;
        let repo = db.movements();

        let summary = repo
            .summarize(&MovementFilter::default().for_product(&para.id))
            .await
            .unwrap();

        // stock_in: 2 boxes = +100; sales: 30 + 2 pieces; damage: 4 pieces
        assert_eq!(
            summary[&MovementType::StockIn],
            MovementSummary {
                count: 1,
                total_quantity_magnitude: 100
            }
        );
        assert_eq!(
            summary[&MovementType::Sale],
            MovementSummary {
                count: 2,
                total_quantity_magnitude: 32
            }
        );
        assert_eq!(
            summary[&MovementType::Damage],
            MovementSummary {
                count: 1,
                total_quantity_magnitude: 4
            }
        );
        assert!(!summary.contains_key(&MovementType::Return));
    }

    #[tokio::test]
    async fn test_count() {
        let db = test_db().await;
        let (_, amox) = seed_history(&db).await;
        let repo = db.movements();

        assert_eq!(repo.count(&MovementFilter::default()).await.unwrap(), 5);
        assert_eq!(
            repo.count(&MovementFilter::default().for_product(&amox.id))
                .await
                .unwrap(),
            1
        );
    }
}
