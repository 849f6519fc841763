//! # Repository Module
//!
//! SQLite repository implementations, and the glue that makes
//! [`Database`] an [`InventoryStore`].
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Inventory facade                                                       │
//! │       │  store.apply_adjustment(7, &request)                            │
//! │       ▼                                                                 │
//! │  impl ProductStore for Database (this file)                             │
//! │       │  self.products().adjust(7, &request)                            │
//! │       ▼                                                                 │
//! │  ProductRepository / CategoryRepository / AdjustmentRepository          │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and stock adjustment
//! - [`CategoryRepository`](category::CategoryRepository) - Categories with derived counts
//! - [`AdjustmentRepository`](adjustment::AdjustmentRepository) - Stock history

pub mod adjustment;
pub mod category;
pub mod product;

use async_trait::async_trait;

use stockroom_core::{
    AdjustmentId, AdjustmentOutcome, AdjustmentRequest, Category, CategoryId, CategoryPatch,
    CategoryRecord, NewCategory, NewProduct, Product, ProductId, ProductPatch, StockAdjustment,
};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::store::{
    AdjustmentLog, AdjustmentRetention, CategoryStore, DeletedProduct, InventoryStore,
    ProductStore,
};

#[async_trait]
impl ProductStore for Database {
    async fn list_products(&self) -> DbResult<Vec<Product>> {
        self.products().list().await
    }

    async fn find_product(&self, id: ProductId) -> DbResult<Option<Product>> {
        self.products().get_by_id(id).await
    }

    async fn insert_product(&self, new: NewProduct) -> DbResult<Product> {
        self.products().insert(&new).await
    }

    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> DbResult<Product> {
        self.products().update(id, patch).await
    }

    async fn delete_product(
        &self,
        id: ProductId,
        retention: AdjustmentRetention,
    ) -> DbResult<DeletedProduct> {
        self.products().delete(id, retention).await
    }

    async fn apply_adjustment(
        &self,
        id: ProductId,
        request: &AdjustmentRequest,
    ) -> DbResult<AdjustmentOutcome> {
        self.products().adjust(id, request).await
    }
}

#[async_trait]
impl CategoryStore for Database {
    async fn list_categories(&self) -> DbResult<Vec<Category>> {
        self.categories().list().await
    }

    async fn find_category(&self, id: CategoryId) -> DbResult<Option<Category>> {
        self.categories().get_by_id(id).await
    }

    async fn insert_category(&self, new: NewCategory) -> DbResult<Category> {
        self.categories().insert(&new.name).await
    }

    async fn update_category(&self, id: CategoryId, patch: CategoryPatch) -> DbResult<Category> {
        let repo = self.categories();
        match patch.name {
            Some(name) => repo.rename(id, &name).await,
            None => repo
                .get_by_id(id)
                .await?
                .ok_or_else(|| DbError::not_found("Category", id)),
        }
    }

    async fn delete_category(&self, id: CategoryId) -> DbResult<CategoryRecord> {
        self.categories().delete(id).await
    }
}

#[async_trait]
impl AdjustmentLog for Database {
    async fn list_adjustments(&self) -> DbResult<Vec<StockAdjustment>> {
        self.adjustments().list().await
    }

    async fn adjustments_for_product(
        &self,
        product_id: ProductId,
    ) -> DbResult<Vec<StockAdjustment>> {
        self.adjustments().list_for_product(product_id).await
    }

    async fn find_adjustment(&self, id: AdjustmentId) -> DbResult<Option<StockAdjustment>> {
        self.adjustments().get_by_id(id).await
    }

    async fn delete_adjustment(&self, id: AdjustmentId) -> DbResult<StockAdjustment> {
        self.adjustments().delete(id).await
    }
}

impl InventoryStore for Database {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
