//! # Stock Adjustment Repository
//!
//! Reads and deletes over the `stock_adjustments` history. Entries are only
//! ever created inside the product adjustment transaction (see
//! [`ProductRepository::adjust`](super::product::ProductRepository::adjust)),
//! which is why [`append`] takes a connection rather than the pool.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use stockroom_core::adjustment::sort_newest_first;
use stockroom_core::{AdjustmentId, AdjustmentKind, ProductId, StockAdjustment};

use crate::error::{DbError, DbResult};

const SELECT_ADJUSTMENT: &str = r#"
    SELECT id, product_id, kind, quantity, reason, timestamp
    FROM stock_adjustments
"#;

#[derive(Debug, Clone)]
pub struct AdjustmentRepository {
    pool: SqlitePool,
}

impl AdjustmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AdjustmentRepository { pool }
    }

    /// Every entry, newest first (ties by id descending).
    pub async fn list(&self) -> DbResult<Vec<StockAdjustment>> {
        let mut adjustments = sqlx::query_as::<_, StockAdjustment>(SELECT_ADJUSTMENT)
            .fetch_all(&self.pool)
            .await?;

        sort_newest_first(&mut adjustments);
        Ok(adjustments)
    }

    /// Entries for one product id, newest first.
    pub async fn list_for_product(&self, product_id: ProductId) -> DbResult<Vec<StockAdjustment>> {
        let mut adjustments = sqlx::query_as::<_, StockAdjustment>(&format!(
            "{SELECT_ADJUSTMENT} WHERE product_id = ?1"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        sort_newest_first(&mut adjustments);
        debug!(product_id = %product_id, count = adjustments.len(), "Loaded product history");
        Ok(adjustments)
    }

    pub async fn get_by_id(&self, id: AdjustmentId) -> DbResult<Option<StockAdjustment>> {
        let adjustment =
            sqlx::query_as::<_, StockAdjustment>(&format!("{SELECT_ADJUSTMENT} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(adjustment)
    }

    /// Removes one history entry.
    pub async fn delete(&self, id: AdjustmentId) -> DbResult<StockAdjustment> {
        let adjustment = sqlx::query_as::<_, StockAdjustment>(
            r#"
            DELETE FROM stock_adjustments WHERE id = ?1
            RETURNING id, product_id, kind, quantity, reason, timestamp
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Stock adjustment", id))?;

        debug!(id = %id, "Deleted stock adjustment");
        Ok(adjustment)
    }
}

/// Appends a history entry on an open connection (normally a transaction).
pub(crate) async fn append(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    kind: AdjustmentKind,
    quantity: i64,
    reason: &str,
    timestamp: DateTime<Utc>,
) -> DbResult<StockAdjustment> {
    let adjustment = sqlx::query_as::<_, StockAdjustment>(
        r#"
        INSERT INTO stock_adjustments (product_id, kind, quantity, reason, timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id, product_id, kind, quantity, reason, timestamp
        "#,
    )
    .bind(product_id)
    .bind(kind)
    .bind(quantity)
    .bind(reason)
    .bind(timestamp)
    .fetch_one(conn)
    .await?;

    Ok(adjustment)
}

/// Deletes every entry for `product_id`; returns how many went.
pub(crate) async fn delete_for_product(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM stock_adjustments WHERE product_id = ?1")
        .bind(product_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn seed_history(db: &Database) {
        let mut conn = db.pool().acquire().await.unwrap();
        let base = Utc::now();
        for (product_id, kind, quantity, seconds) in [
            (1, AdjustmentKind::Restock, 10, 0),
            (2, AdjustmentKind::Sale, -1, 5),
            (1, AdjustmentKind::Damage, -2, 10),
        ] {
            append(
                &mut conn,
                product_id,
                kind,
                quantity,
                "test",
                base + chrono::Duration::seconds(seconds),
            )
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let db = Database::in_memory().await.unwrap();
        seed_history(&db).await;

        let ids: Vec<i64> = db.adjustments().list().await.unwrap().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let for_one: Vec<i64> = db
            .adjustments()
            .list_for_product(1)
            .await
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(for_one, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_kind_round_trips_as_text() {
        let db = Database::in_memory().await.unwrap();
        seed_history(&db).await;

        let stored: String = sqlx::query_scalar("SELECT kind FROM stock_adjustments WHERE id = 3")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(stored, "damage");

        let entry = db.adjustments().get_by_id(3).await.unwrap().unwrap();
        assert_eq!(entry.kind, AdjustmentKind::Damage);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::in_memory().await.unwrap();
        seed_history(&db).await;

        let removed = db.adjustments().delete(2).await.unwrap();
        assert_eq!(removed.product_id, 2);
        assert!(db.adjustments().delete(2).await.unwrap_err().is_not_found());
        assert!(db.adjustments().get_by_id(2).await.unwrap().is_none());
    }
}
