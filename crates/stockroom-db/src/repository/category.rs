//! # Category Repository
//!
//! Categories are stored without a product count. Every read computes it
//! with a correlated subquery; `=` on TEXT uses SQLite's BINARY collation,
//! so the match is exact and case-sensitive, same as the in-memory store.

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use stockroom_core::query::sort_categories;
use stockroom_core::{Category, CategoryId, CategoryRecord};

use crate::error::{DbError, DbResult};

const SELECT_CATEGORY: &str = r#"
    SELECT
        c.id,
        c.name,
        (SELECT COUNT(*) FROM products p WHERE p.category = c.name) AS product_count
    FROM categories c
"#;

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    product_count: i64,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            product_count: row.product_count.max(0) as usize,
        }
    }
}

/// Maps the UNIQUE(name) failure onto the offending name.
fn name_conflict(err: sqlx::Error, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("category name", name),
        other => other,
    }
}

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// All categories with fresh counts, by name then id.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(SELECT_CATEGORY)
            .fetch_all(&self.pool)
            .await?;

        let mut categories: Vec<Category> = rows.into_iter().map(Category::from).collect();
        sort_categories(&mut categories);
        Ok(categories)
    }

    pub async fn get_by_id(&self, id: CategoryId) -> DbResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!("{SELECT_CATEGORY} WHERE c.id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Category::from))
    }

    async fn require(&self, id: CategoryId) -> DbResult<Category> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    pub async fn insert(&self, name: &str) -> DbResult<Category> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "INSERT INTO categories (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| name_conflict(e, name))?;

        debug!(id = %record.id, name = %record.name, "Inserted category");
        self.require(record.id).await
    }

    /// Renames a category. Products keep whatever category string they had.
    pub async fn rename(&self, id: CategoryId, name: &str) -> DbResult<Category> {
        sqlx::query_as::<_, CategoryRecord>(
            "UPDATE categories SET name = ?1 WHERE id = ?2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| name_conflict(e, name))?
        .ok_or_else(|| DbError::not_found("Category", id))?;

        debug!(id = %id, name = %name, "Renamed category");
        self.require(id).await
    }

    pub async fn delete(&self, id: CategoryId) -> DbResult<CategoryRecord> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            "DELETE FROM categories WHERE id = ?1 RETURNING id, name",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Category", id))?;

        debug!(id = %id, "Deleted category");
        Ok(record)
    }
}
