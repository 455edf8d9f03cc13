//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD on catalog fields (sku, name, packaging, thresholds, expiry)
//! - Lookup by id / sku, active listing
//!
//! ## What Is NOT Here
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stock_quantity is NEVER written through this repository.              │
//! │                                                                         │
//! │  Every balance change flows through StockLedger::apply, which holds    │
//! │  the per-product critical section and appends the movement record in   │
//! │  the same transaction. A repository-level stock setter would bypass    │
//! │  the ledger and break reconstructability.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockbook_core::validation::{
    validate_packaging, validate_product_name, validate_sku, validate_stock_thresholds,
};
use stockbook_core::{CoreError, Product};

/// Repository for product catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo.get_by_sku("PARA-500").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, sku, name,
                pieces_per_sheet, sheets_per_box,
                stock_quantity, reorder_level, min_stock_level,
                expiry_date, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, sku, name,
                pieces_per_sheet, sheets_per_box,
                stock_quantity, reorder_level, min_stock_level,
                expiry_date, is_active, created_at, updated_at
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products, sorted by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, sku, name,
                pieces_per_sheet, sheets_per_box,
                stock_quantity, reorder_level, min_stock_level,
                expiry_date, is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1
            ORDER BY name
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// Catalog fields are validated before any write: sku/name format,
    /// packaging factors >= 1, non-negative thresholds and balance.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(sku = %product.sku, "Inserting product");

        validate_sku(&product.sku).map_err(CoreError::from)?;
        validate_product_name(&product.name).map_err(CoreError::from)?;
        validate_packaging(&product.packaging())?;
        validate_stock_thresholds(product.reorder_level, product.min_stock_level)?;
        if product.stock_quantity < 0 {
            return Err(CoreError::invalid_quantity(
                product.stock_quantity,
                "initial balance cannot be negative",
            )
            .into());
        }

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name,
                pieces_per_sheet, sheets_per_box,
                stock_quantity, reorder_level, min_stock_level,
                expiry_date, is_active, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3,
                ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10, ?11, ?12
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.pieces_per_sheet)
        .bind(product.sheets_per_box)
        .bind(product.stock_quantity)
        .bind(product.reorder_level)
        .bind(product.min_stock_level)
        .bind(product.expiry_date)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Updates a product's alert thresholds (base units).
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn set_thresholds(
        &self,
        id: &str,
        reorder_level: i64,
        min_stock_level: i64,
    ) -> DbResult<()> {
        debug!(id = %id, reorder_level, min_stock_level, "Updating thresholds");

        validate_stock_thresholds(reorder_level, min_stock_level)?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                reorder_level = ?2,
                min_stock_level = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(reorder_level)
        .bind(min_stock_level)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Sets or clears the expiry date of the current batch.
    pub async fn set_expiry_date(&self, id: &str, expiry_date: Option<NaiveDate>) -> DbResult<()> {
        debug!(id = %id, ?expiry_date, "Updating expiry date");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                expiry_date = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(expiry_date)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical movements still reference this product, so rows are never
    /// physically deleted.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                is_active = 0,
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;

    fn sample_product(sku: &str) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: format!("Sample {}", sku),
            pieces_per_sheet: 10,
            sheets_per_box: 5,
            stock_quantity: 0,
            reorder_level: 15,
            min_stock_level: 20,
            expiry_date: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = test_db().await;
        let repo = db.products();

        let product = sample_product("PARA-500");
        repo.insert(&product).await.unwrap();

        let by_id = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(by_id.sku, "PARA-500");
        assert_eq!(by_id.pieces_per_sheet, 10);
        assert_eq!(by_id.sheets_per_box, 5);
        assert_eq!(by_id.stock_quantity, 0);

        let by_sku = repo.get_by_sku("PARA-500").await.unwrap().unwrap();
        assert_eq!(by_sku.id, product.id);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&sample_product("AMOX-250")).await.unwrap();
        let err = repo.insert(&sample_product("AMOX-250")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_invalid_catalog_fields_rejected() {
        let db = test_db().await;
        let repo = db.products();

        let mut bad_packaging = sample_product("BAD-1");
        bad_packaging.pieces_per_sheet = 0;
        assert!(matches!(
            repo.insert(&bad_packaging).await.unwrap_err(),
            DbError::Core(CoreError::InvalidConfiguration { .. })
        ));

        let mut bad_threshold = sample_product("BAD-2");
        bad_threshold.reorder_level = -1;
        assert!(matches!(
            repo.insert(&bad_threshold).await.unwrap_err(),
            DbError::Core(CoreError::InvalidThreshold { .. })
        ));

        let mut bad_sku = sample_product("");
        bad_sku.sku = "".to_string();
        assert!(matches!(
            repo.insert(&bad_sku).await.unwrap_err(),
            DbError::Core(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_set_thresholds_and_expiry() {
        let db = test_db().await;
        let repo = db.products();

        let product = sample_product("IBU-400");
        repo.insert(&product).await.unwrap();

        repo.set_thresholds(&product.id, 30, 50).await.unwrap();
        let expiry = Utc::now().date_naive() + Duration::days(120);
        repo.set_expiry_date(&product.id, Some(expiry)).await.unwrap();

        let updated = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(updated.reorder_level, 30);
        assert_eq!(updated.min_stock_level, 50);
        assert_eq!(updated.expiry_date, Some(expiry));

        assert!(matches!(
            repo.set_thresholds("missing", 1, 1).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            repo.set_thresholds(&product.id, -1, 1).await.unwrap_err(),
            DbError::Core(CoreError::InvalidThreshold { .. })
        ));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_active_list() {
        let db = test_db().await;
        let repo = db.products();

        let product = sample_product("OLD-1");
        repo.insert(&product).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.soft_delete(&product.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.list_active(10).await.unwrap().is_empty());

        // Row still exists for history
        assert!(repo.get_by_id(&product.id).await.unwrap().is_some());
    }
}
