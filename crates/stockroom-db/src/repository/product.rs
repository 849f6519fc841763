//! # Product Repository
//!
//! SQLite operations for products, including the atomic stock adjustment.
//!
//! ## Adjustment Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN IMMEDIATE                                                        │
//! │    SELECT product WHERE id = ?        ── none? → rollback, NotFound     │
//! │    StockMovement::plan(quantity, delta)     (stockroom-core)            │
//! │    UPDATE products SET quantity, last_updated                           │
//! │    INSERT INTO stock_adjustments ... RETURNING                          │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction → both writes undone     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ordering, search and category filtering are not pushed into SQL; see
//! [`stockroom_core::query`].

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use stockroom_core::adjustment::StockMovement;
use stockroom_core::query::sort_products;
use stockroom_core::{
    AdjustmentOutcome, AdjustmentRequest, NewProduct, Product, ProductId, ProductPatch,
    ProductSort,
};

use super::adjustment;
use crate::error::{DbError, DbResult};
use crate::pool::begin_write;
use crate::store::{AdjustmentRetention, DeletedProduct};

const SELECT_PRODUCT: &str = r#"
    SELECT id, sku, name, category, price_cents, quantity, low_stock_threshold, last_updated
    FROM products
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let all = repo.list().await?;
/// let one = repo.get_by_id(7).await?;
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

    /// Lists every product by name (case-folded), then id.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let mut products = sqlx::query_as::<_, Product>(SELECT_PRODUCT)
            .fetch_all(&self.pool)
            .await?;

        sort_products(&mut products, ProductSort::default());

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_product(&mut conn, id).await
    }

    /// Inserts a new product.
    ///
    /// The id is one past the highest id held by a product or named by a
    /// surviving history entry, so a deleted product's retained history is
    /// never attributed to a newcomer. 1 when both tables are empty.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                id, sku, name, category, price_cents, quantity, low_stock_threshold, last_updated
            ) VALUES (
                (SELECT COALESCE(MAX(id), 0) + 1 FROM (
                    SELECT id FROM products
                    UNION ALL
                    SELECT product_id FROM stock_adjustments
                )),
                ?1, ?2, ?3, ?4, ?5, ?6, ?7
            )
            RETURNING id, sku, name, category, price_cents, quantity, low_stock_threshold, last_updated
            "#,
        )
        .bind(&new.sku)
        .bind(&new.name)
        .bind(&new.category)
        .bind(new.price_cents)
        .bind(new.quantity)
        .bind(new.low_stock_threshold)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        debug!(id = %product.id, sku = %product.sku, "Inserted product");
        Ok(product)
    }

    /// Merges `patch` into a product.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> DbResult<Product> {
        let mut tx = begin_write(&self.pool).await?;

        let mut product = fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;
        product.apply_patch(patch, Utc::now());
        write_product(&mut tx, &product).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id = %id, "Updated product");
        Ok(product)
    }

    /// Deletes a product, and under `Cascade` its history, in one
    /// transaction.
    pub async fn delete(
        &self,
        id: ProductId,
        retention: AdjustmentRetention,
    ) -> DbResult<DeletedProduct> {
        let mut tx = begin_write(&self.pool).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            DELETE FROM products WHERE id = ?1
            RETURNING id, sku, name, category, price_cents, quantity, low_stock_threshold, last_updated
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))?;

        let adjustments_removed = match retention {
            AdjustmentRetention::Retain => 0,
            AdjustmentRetention::Cascade => adjustment::delete_for_product(&mut tx, id).await?,
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id = %id, %retention, adjustments_removed, "Deleted product");
        Ok(DeletedProduct {
            product,
            adjustments_removed,
        })
    }

    /// Applies a stock adjustment and records it, atomically.
    pub async fn adjust(
        &self,
        id: ProductId,
        request: &AdjustmentRequest,
    ) -> DbResult<AdjustmentOutcome> {
        let mut tx = begin_write(&self.pool).await?;

        let mut product = fetch_product(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        let now = Utc::now();
        let delta = request.effective_delta();
        let movement = StockMovement::plan(product.quantity, delta);

        product.quantity = movement.new_quantity;
        product.touch(now);
        write_product(&mut tx, &product).await?;

        let entry = adjustment::append(
            &mut tx,
            id,
            request.kind(),
            delta,
            request.reason(),
            now,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        if movement.was_clamped() {
            warn!(
                product_id = %id,
                kind = %request.kind(),
                absorbed = movement.absorbed,
                "Adjustment exceeded stock on hand; clamped at zero"
            );
        }
        debug!(
            product_id = %id,
            delta,
            new_quantity = movement.new_quantity,
            "Applied stock adjustment"
        );

        Ok(AdjustmentOutcome {
            product,
            adjustment: entry,
            movement,
        })
    }
}

async fn fetch_product(conn: &mut SqliteConnection, id: ProductId) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(product)
}

async fn write_product(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE products SET
            sku = ?1,
            name = ?2,
            category = ?3,
            price_cents = ?4,
            quantity = ?5,
            low_stock_threshold = ?6,
            last_updated = ?7
        WHERE id = ?8
        "#,
    )
    .bind(&product.sku)
    .bind(&product.name)
    .bind(&product.category)
    .bind(product.price_cents)
    .bind(product.quantity)
    .bind(product.low_stock_threshold)
    .bind(product.last_updated)
    .bind(product.id)
    .execute(conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use stockroom_core::AdjustmentKind;

    fn draft(sku: &str, name: &str, quantity: u32) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            category: "Widgets".to_string(),
            price_cents: 1299,
            quantity,
            low_stock_threshold: 5,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();

        let created = repo.insert(&draft("WID-001", "Blue Widget", 20)).await.unwrap();
        assert_eq!(created.id, 1);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(repo.get_by_id(99).await.unwrap().is_none());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();
        repo.insert(&draft("Z-1", "zebra clip", 1)).await.unwrap();
        repo.insert(&draft("A-1", "Anchor", 1)).await.unwrap();
        repo.insert(&draft("M-1", "magnet", 1)).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Anchor", "magnet", "zebra clip"]);
    }

    #[tokio::test]
    async fn test_adjust_writes_both_rows() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.products();
        let product = repo.insert(&draft("WID-001", "Blue Widget", 3)).await.unwrap();

        let sale = AdjustmentRequest::new(AdjustmentKind::Sale, 5, "Walk-in").unwrap();
        let outcome = repo.adjust(product.id, &sale).await.unwrap();

        assert_eq!(outcome.product.quantity, 0);
        assert_eq!(outcome.adjustment.quantity, -5);
        assert_eq!(outcome.movement.absorbed, 2);
        assert_eq!(repo.get_by_id(product.id).await.unwrap().unwrap().quantity, 0);

        let history = db.adjustments().list_for_product(product.id).await.unwrap();
        assert_eq!(history, vec![outcome.adjustment]);
    }

    #[tokio::test]
    async fn test_adjust_missing_product_leaves_no_history() {
        let db = Database::in_memory().await.unwrap();
        let restock = AdjustmentRequest::new(AdjustmentKind::Restock, 4, "Delivery").unwrap();

        let err = db.products().adjust(12, &restock).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(db.adjustments().list().await.unwrap().is_empty());
    }
}
