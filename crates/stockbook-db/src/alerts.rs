//! # Alert Projection Service
//!
//! Projects current product rows through the pure evaluator in
//! `stockbook_core::alerts`.
//!
//! Stateless: alerts are recomputed from scratch on every call, so an
//! external scheduler can re-invoke this at any cadence without drift.
//! Read/dismissed bookkeeping belongs to the presentation layer, not here.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use stockbook_core::alerts::{evaluate, sort_for_display, AlertThresholds};
use stockbook_core::AlertCondition;

/// Limit for a full-catalog evaluation pass.
const EVALUATE_ALL_LIMIT: u32 = 10_000;

/// Derives alert conditions from current product state.
#[derive(Debug, Clone)]
pub struct AlertService {
    pool: SqlitePool,
}

impl AlertService {
    /// Creates a new AlertService.
    pub fn new(pool: SqlitePool) -> Self {
        AlertService { pool }
    }

    /// Evaluates one product against the thresholds.
    ///
    /// ## Returns
    /// The product's current alert set (possibly empty).
    pub async fn evaluate_product(
        &self,
        product_id: &str,
        thresholds: &AlertThresholds,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<AlertCondition>> {
        let product = ProductRepository::new(self.pool.clone())
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        Ok(evaluate(&product, thresholds, now)?)
    }

    /// Evaluates every active product and returns the combined alert list,
    /// sorted for display (critical first, newest first within severity).
    pub async fn evaluate_all(
        &self,
        thresholds: &AlertThresholds,
        now: DateTime<Utc>,
    ) -> DbResult<Vec<AlertCondition>> {
        let products = ProductRepository::new(self.pool.clone())
            .list_active(EVALUATE_ALL_LIMIT)
            .await?;

        let mut alerts = Vec::new();
        for product in &products {
            alerts.extend(evaluate(product, thresholds, now)?);
        }
        sort_for_display(&mut alerts);

        debug!(
            products = products.len(),
            alerts = alerts.len(),
            "Evaluated alerts"
        );

        Ok(alerts)
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
    use stockbook_core::{AlertType, Product, Severity};

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

    #[tokio::test]
    async fn test_evaluate_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let empty = seed_product(&db, "PARA-500", 0).await;

        let alerts = db
            .alerts()
            .evaluate_product(&empty.id, &AlertThresholds::default(), Utc::now())
            .await
            .unwrap();

        assert!(alerts
            .iter()
            .any(|a| a.alert_type == AlertType::OutOfStock && a.severity == Severity::Critical));

        let err = db
            .alerts()
            .evaluate_product("missing", &AlertThresholds::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_evaluate_all_sorts_by_severity() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        seed_product(&db, "HEALTHY", 500).await;
        seed_product(&db, "EMPTY", 0).await;
        seed_product(&db, "LOW", 10).await;
        let expiring = seed_product(&db, "EXPIRING", 500).await;
        db.products()
            .set_expiry_date(&expiring.id, Some(now.date_naive() + Duration::days(5)))
            .await
            .unwrap();

        let alerts = db
            .alerts()
            .evaluate_all(&AlertThresholds::default(), now)
            .await
            .unwrap();

        // EMPTY: out_of_stock + reorder_needed; LOW: low_stock + reorder_needed;
        // EXPIRING: expiring_soon; HEALTHY: nothing.
        assert_eq!(alerts.len(), 5);
        assert_eq!(alerts[0].severity, Severity::Critical);
        for pair in alerts.windows(2) {
            assert!(pair[0].severity <= pair[1].severity);
        }

        // Same inputs, same projection.
        let again = db
            .alerts()
            .evaluate_all(&AlertThresholds::default(), now)
            .await
            .unwrap();
        assert_eq!(alerts.len(), again.len());
    }
}
