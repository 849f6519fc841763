//! # In-Memory Store
//!
//! Process-local inventory state behind a single `tokio::sync::Mutex`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ MemoryStore                                          │
//! │  Mutex<MemoryState>                                  │
//! │   ├── products:    Vec<Product>                      │
//! │   ├── categories:  Vec<CategoryRecord>               │
//! │   └── adjustments: Vec<StockAdjustment>  (append)    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes the lock for its whole duration, so operations
//! never interleave and an adjustment's two writes are seen together or
//! not at all.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use stockroom_core::adjustment::{sort_newest_first, StockMovement};
use stockroom_core::query::{sort_categories, sort_products};
use stockroom_core::{
    AdjustmentId, AdjustmentOutcome, AdjustmentRequest, Category, CategoryId, CategoryPatch,
    CategoryRecord, NewCategory, NewProduct, Product, ProductId, ProductPatch, ProductSort,
    StockAdjustment,
};

use super::{
    AdjustmentLog, AdjustmentRetention, CategoryStore, DeletedProduct, InventoryStore,
    ProductStore,
};
use crate::error::{DbError, DbResult};

#[derive(Debug, Default)]
struct MemoryState {
    products: Vec<Product>,
    categories: Vec<CategoryRecord>,
    adjustments: Vec<StockAdjustment>,
}

/// Next id for a collection: `max + 1`, or 1 when empty.
fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().map_or(1, |max| max + 1)
}

impl MemoryState {
    /// Product ids named by retained history count as taken.
    fn next_product_id(&self) -> ProductId {
        let held = self.products.iter().map(|p| p.id);
        let logged = self.adjustments.iter().map(|a| a.product_id);
        next_id(held.chain(logged))
    }

    fn product_index(&self, id: ProductId) -> DbResult<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    fn category_index(&self, id: CategoryId) -> DbResult<usize> {
        self.categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Rejects `name` if a category other than `except` already uses it.
    fn ensure_name_free(&self, name: &str, except: Option<CategoryId>) -> DbResult<()> {
        let taken = self
            .categories
            .iter()
            .any(|c| c.name == name && Some(c.id) != except);

        if taken {
            return Err(DbError::duplicate("category name", name));
        }
        Ok(())
    }

    fn derive(&self, record: CategoryRecord) -> Category {
        Category::derive(record, &self.products)
    }
}

/// In-memory [`InventoryStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

}

// =============================================================================
// Products
// =============================================================================

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> DbResult<Vec<Product>> {
        let state = self.state.lock().await;
        let mut products = state.products.clone();
        sort_products(&mut products, ProductSort::default());
        Ok(products)
    }

    async fn find_product(&self, id: ProductId) -> DbResult<Option<Product>> {
        let state = self.state.lock().await;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, new: NewProduct) -> DbResult<Product> {
        let mut state = self.state.lock().await;

        let id = state.next_product_id();
        let product = Product::from_new(id, new, Utc::now());
        state.products.push(product.clone());

        debug!(id = %id, sku = %product.sku, "Inserted product");
        Ok(product)
    }

    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> DbResult<Product> {
        let mut state = self.state.lock().await;

        let index = state.product_index(id)?;
        let product = &mut state.products[index];
        product.apply_patch(patch, Utc::now());

        debug!(id = %id, "Updated product");
        Ok(product.clone())
    }

    async fn delete_product(
        &self,
        id: ProductId,
        retention: AdjustmentRetention,
    ) -> DbResult<DeletedProduct> {
        let mut state = self.state.lock().await;

        let index = state.product_index(id)?;
        let product = state.products.remove(index);

        let adjustments_removed = match retention {
            AdjustmentRetention::Retain => 0,
            AdjustmentRetention::Cascade => {
                let before = state.adjustments.len();
                state.adjustments.retain(|a| a.product_id != id);
                (before - state.adjustments.len()) as u64
            }
        };

        debug!(id = %id, %retention, adjustments_removed, "Deleted product");
        Ok(DeletedProduct {
            product,
            adjustments_removed,
        })
    }

    async fn apply_adjustment(
        &self,
        id: ProductId,
        request: &AdjustmentRequest,
    ) -> DbResult<AdjustmentOutcome> {
        let mut state = self.state.lock().await;

        let index = state.product_index(id)?;
        let now = Utc::now();
        let delta = request.effective_delta();
        let movement = StockMovement::plan(state.products[index].quantity, delta);

        let adjustment = StockAdjustment {
            id: next_id(state.adjustments.iter().map(|a| a.id)),
            product_id: id,
            kind: request.kind(),
            quantity: delta,
            reason: request.reason().to_string(),
            timestamp: now,
        };

        let product = &mut state.products[index];
        product.quantity = movement.new_quantity;
        product.touch(now);
        let product = product.clone();
        state.adjustments.push(adjustment.clone());

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
            adjustment,
            movement,
        })
    }
}

// =============================================================================
// Categories
// =============================================================================

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state
            .categories
            .iter()
            .cloned()
            .map(|record| state.derive(record))
            .collect();
        sort_categories(&mut categories);
        Ok(categories)
    }

    async fn find_category(&self, id: CategoryId) -> DbResult<Option<Category>> {
        let state = self.state.lock().await;
        Ok(state
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(|record| state.derive(record)))
    }

    async fn insert_category(&self, new: NewCategory) -> DbResult<Category> {
        let mut state = self.state.lock().await;
        state.ensure_name_free(&new.name, None)?;

        let record = CategoryRecord {
            id: next_id(state.categories.iter().map(|c| c.id)),
            name: new.name,
        };
        state.categories.push(record.clone());

        debug!(id = %record.id, name = %record.name, "Inserted category");
        Ok(state.derive(record))
    }

    async fn update_category(&self, id: CategoryId, patch: CategoryPatch) -> DbResult<Category> {
        let mut state = self.state.lock().await;
        let index = state.category_index(id)?;

        if let Some(name) = patch.name {
            state.ensure_name_free(&name, Some(id))?;
            state.categories[index].name = name;
        }

        let record = state.categories[index].clone();
        debug!(id = %id, name = %record.name, "Updated category");
        Ok(state.derive(record))
    }

    async fn delete_category(&self, id: CategoryId) -> DbResult<CategoryRecord> {
        let mut state = self.state.lock().await;
        let index = state.category_index(id)?;
        let record = state.categories.remove(index);

        debug!(id = %id, "Deleted category");
        Ok(record)
    }
}

// =============================================================================
// Adjustment Log
// =============================================================================

#[async_trait]
impl AdjustmentLog for MemoryStore {
    async fn list_adjustments(&self) -> DbResult<Vec<StockAdjustment>> {
        let state = self.state.lock().await;
        let mut adjustments = state.adjustments.clone();
        sort_newest_first(&mut adjustments);
        Ok(adjustments)
    }

    async fn adjustments_for_product(
        &self,
        product_id: ProductId,
    ) -> DbResult<Vec<StockAdjustment>> {
        let state = self.state.lock().await;
        let mut adjustments: Vec<StockAdjustment> = state
            .adjustments
            .iter()
            .filter(|a| a.product_id == product_id)
            .cloned()
            .collect();
        sort_newest_first(&mut adjustments);
        Ok(adjustments)
    }

    async fn find_adjustment(&self, id: AdjustmentId) -> DbResult<Option<StockAdjustment>> {
        let state = self.state.lock().await;
        Ok(state.adjustments.iter().find(|a| a.id == id).cloned())
    }

    async fn delete_adjustment(&self, id: AdjustmentId) -> DbResult<StockAdjustment> {
        let mut state = self.state.lock().await;
        let index = state
            .adjustments
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| DbError::not_found("Stock adjustment", id))?;

        debug!(id = %id, "Deleted stock adjustment");
        Ok(state.adjustments.remove(index))
    }
}

impl InventoryStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::AdjustmentKind;

    fn draft(sku: &str, name: &str, quantity: u32) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            category: "Widgets".to_string(),
            price_cents: 500,
            quantity,
            low_stock_threshold: 5,
        }
    }

    #[tokio::test]
    async fn test_ids_are_max_plus_one() {
        let store = MemoryStore::new();
        let a = store.insert_product(draft("A-1", "A", 1)).await.unwrap();
        let b = store.insert_product(draft("B-1", "B", 1)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        store.delete_product(1, AdjustmentRetention::Retain).await.unwrap();
        let c = store.insert_product(draft("C-1", "C", 1)).await.unwrap();
        assert_eq!(c.id, 3);

        store.delete_product(3, AdjustmentRetention::Retain).await.unwrap();
        store.delete_product(2, AdjustmentRetention::Retain).await.unwrap();
        let d = store.insert_product(draft("D-1", "D", 1)).await.unwrap();
        assert_eq!(d.id, 1);
    }

    #[tokio::test]
    async fn test_retained_history_keeps_its_product_id() {
        let store = MemoryStore::new();
        let old = store.insert_product(draft("OLD-1", "Old", 10)).await.unwrap();
        let damage = AdjustmentRequest::new(AdjustmentKind::Damage, 3, "Broken").unwrap();
        store.apply_adjustment(old.id, &damage).await.unwrap();
        store.delete_product(old.id, AdjustmentRetention::Retain).await.unwrap();

        let new = store.insert_product(draft("NEW-1", "New", 1)).await.unwrap();
        assert_eq!(new.id, 2);
        assert!(store.adjustments_for_product(new.id).await.unwrap().is_empty());
        assert_eq!(store.adjustments_for_product(old.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cascaded_id_is_reusable() {
        let store = MemoryStore::new();
        let old = store.insert_product(draft("OLD-1", "Old", 10)).await.unwrap();
        let sale = AdjustmentRequest::new(AdjustmentKind::Sale, 1, "Counter").unwrap();
        store.apply_adjustment(old.id, &sale).await.unwrap();
        store.delete_product(old.id, AdjustmentRetention::Cascade).await.unwrap();

        let new = store.insert_product(draft("NEW-1", "New", 1)).await.unwrap();
        assert_eq!(new.id, 1);
    }

    #[tokio::test]
    async fn test_cascade_removes_history() {
        let store = MemoryStore::new();
        let product = store.insert_product(draft("A-1", "A", 10)).await.unwrap();
        let request = AdjustmentRequest::new(AdjustmentKind::Sale, 2, "Counter").unwrap();
        store.apply_adjustment(product.id, &request).await.unwrap();
        store.apply_adjustment(product.id, &request).await.unwrap();

        let deleted = store
            .delete_product(product.id, AdjustmentRetention::Cascade)
            .await
            .unwrap();
        assert_eq!(deleted.adjustments_removed, 2);
        assert!(store.list_adjustments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_allowed() {
        let store = MemoryStore::new();
        let widgets = store
            .insert_category(NewCategory { name: "Widgets".to_string() })
            .await
            .unwrap();

        let renamed = store
            .update_category(
                widgets.id,
                CategoryPatch {
                    name: Some("Widgets".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Widgets");
    }
}
