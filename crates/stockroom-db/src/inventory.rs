//! # Inventory Facade
//!
//! The single entry point consumers use. An [`Inventory`] owns a shared
//! handle to one store and hands out thin service views grouped by concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Inventory { store: Arc<dyn InventoryStore>, settings }                 │
//! │                                                                         │
//! │  .products()    get_all · get_by_id · create · update · delete          │
//! │                 search · by_category · low_stock · list(query)          │
//! │                                                                         │
//! │  .stock()       adjust · apply · history · history_for                  │
//! │                 get_adjustment · delete_adjustment · low_stock · alert  │
//! │                                                                         │
//! │  .categories()  get_all · get_by_id · create · update · delete          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Low-stock results are never cached: each call rescans the current
//! product list, so they reflect every write that completed before it.

use std::sync::Arc;

use tracing::{debug, info};

use stockroom_core::low_stock::low_stock_products;
use stockroom_core::query::{filter_by_category, search};
use stockroom_core::{
    AdjustmentId, AdjustmentKind, AdjustmentOutcome, AdjustmentRequest, Category, CategoryId,
    CategoryPatch, CategoryRecord, LowStockSummary, NewCategory, NewProduct, Product, ProductId,
    ProductPatch, ProductQuery, StockAdjustment, DEFAULT_ALERT_PREVIEW,
};

use crate::error::{DbError, DbResult};
use crate::pool::{Database, DbConfig};
use crate::store::{AdjustmentRetention, DeletedProduct, InventoryStore, MemoryStore};

// =============================================================================
// Settings
// =============================================================================

/// Behavior knobs that are not part of any one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySettings {
    /// What deleting a product does to its history.
    pub adjustment_retention: AdjustmentRetention,
    /// Names shown in the low-stock alert before "and N more".
    pub alert_preview: usize,
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            adjustment_retention: AdjustmentRetention::Retain,
            alert_preview: DEFAULT_ALERT_PREVIEW,
        }
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Shared handle to an inventory. Cloning is cheap.
#[derive(Clone)]
pub struct Inventory {
    store: Arc<dyn InventoryStore>,
    settings: InventorySettings,
}

impl std::fmt::Debug for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inventory")
            .field("backend", &self.store.backend_name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl Inventory {
    pub fn new(store: Arc<dyn InventoryStore>, settings: InventorySettings) -> Self {
        info!(backend = store.backend_name(), "Inventory ready");
        Inventory { store, settings }
    }

    /// A fresh, empty, process-local inventory.
    pub fn in_memory(settings: InventorySettings) -> Self {
        Self::new(Arc::new(MemoryStore::new()), settings)
    }

    /// Opens (and migrates) a SQLite-backed inventory.
    pub async fn sqlite(config: DbConfig, settings: InventorySettings) -> DbResult<Self> {
        let db = Database::new(config).await?;
        Ok(Self::new(Arc::new(db), settings))
    }

    pub fn settings(&self) -> &InventorySettings {
        &self.settings
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn products(&self) -> Products<'_> {
        Products { inventory: self }
    }

    pub fn stock(&self) -> Stock<'_> {
        Stock { inventory: self }
    }

    pub fn categories(&self) -> Categories<'_> {
        Categories { inventory: self }
    }

    fn store(&self) -> &dyn InventoryStore {
        self.store.as_ref()
    }
}

// =============================================================================
// Products
// =============================================================================

/// Product operations. Nothing here validates input; callers that accept
/// user data run `stockroom_core::validation` first.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    inventory: &'a Inventory,
}

impl Products<'_> {
    /// Every product, by name.
    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        self.inventory.store().list_products().await
    }

    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Product> {
        self.inventory
            .store()
            .find_product(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    pub async fn create(&self, new: NewProduct) -> DbResult<Product> {
        let product = self.inventory.store().insert_product(new).await?;
        info!(id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> DbResult<Product> {
        self.inventory.store().update_product(id, patch).await
    }

    /// Deletes under the configured [`AdjustmentRetention`].
    pub async fn delete(&self, id: ProductId) -> DbResult<DeletedProduct> {
        let retention = self.inventory.settings.adjustment_retention;
        let deleted = self.inventory.store().delete_product(id, retention).await?;
        info!(
            id = %id,
            %retention,
            adjustments_removed = deleted.adjustments_removed,
            "Product deleted"
        );
        Ok(deleted)
    }

    /// Case-insensitive substring match on name, SKU and category.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let products = search(self.get_all().await?, query);
        debug!(query = ?query, count = products.len(), "Searched products");
        Ok(products)
    }

    /// Case-insensitive exact category match; `None` or blank means all.
    pub async fn by_category(&self, category: Option<&str>) -> DbResult<Vec<Product>> {
        Ok(filter_by_category(self.get_all().await?, category))
    }

    /// Products at or below their threshold (or `threshold_override`).
    pub async fn low_stock(&self, threshold_override: Option<u32>) -> DbResult<Vec<Product>> {
        Ok(low_stock_products(&self.get_all().await?, threshold_override))
    }

    /// Search, category filter and sort in one pass.
    pub async fn list(&self, query: &ProductQuery) -> DbResult<Vec<Product>> {
        Ok(query.apply(self.get_all().await?))
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Stock adjustments, their history, and low-stock reporting.
#[derive(Debug, Clone, Copy)]
pub struct Stock<'a> {
    inventory: &'a Inventory,
}

impl Stock<'_> {
    /// Validates and applies an adjustment. The sign of `magnitude` is
    /// ignored: `kind` decides the direction.
    pub async fn adjust(
        &self,
        product_id: ProductId,
        kind: AdjustmentKind,
        magnitude: i64,
        reason: &str,
    ) -> DbResult<AdjustmentOutcome> {
        let request = AdjustmentRequest::new(kind, magnitude, reason)?;
        self.apply(product_id, &request).await
    }

    pub async fn apply(
        &self,
        product_id: ProductId,
        request: &AdjustmentRequest,
    ) -> DbResult<AdjustmentOutcome> {
        let outcome = self
            .inventory
            .store()
            .apply_adjustment(product_id, request)
            .await?;

        info!(
            product_id = %product_id,
            kind = %request.kind(),
            delta = outcome.movement.delta,
            quantity = outcome.product.quantity,
            "Stock adjusted"
        );
        Ok(outcome)
    }

    /// All history, newest first.
    pub async fn history(&self) -> DbResult<Vec<StockAdjustment>> {
        self.inventory.store().list_adjustments().await
    }

    /// History for one product id, newest first. Works for deleted products
    /// whose history was retained.
    pub async fn history_for(&self, product_id: ProductId) -> DbResult<Vec<StockAdjustment>> {
        self.inventory
            .store()
            .adjustments_for_product(product_id)
            .await
    }

    pub async fn get_adjustment(&self, id: AdjustmentId) -> DbResult<StockAdjustment> {
        self.inventory
            .store()
            .find_adjustment(id)
            .await?
            .ok_or_else(|| DbError::not_found("Stock adjustment", id))
    }

    /// Removes a history entry. The product's quantity is not touched.
    pub async fn delete_adjustment(&self, id: AdjustmentId) -> DbResult<StockAdjustment> {
        self.inventory.store().delete_adjustment(id).await
    }

    pub async fn low_stock(&self, threshold_override: Option<u32>) -> DbResult<Vec<Product>> {
        self.inventory.products().low_stock(threshold_override).await
    }

    /// Summary for the low-stock alert banner.
    pub async fn alert(&self) -> DbResult<LowStockSummary> {
        let low = self.low_stock(None).await?;
        Ok(LowStockSummary::from_low_stock(
            &low,
            self.inventory.settings.alert_preview,
        ))
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Categories<'a> {
    inventory: &'a Inventory,
}

impl Categories<'_> {
    /// Every category with a freshly derived product count.
    pub async fn get_all(&self) -> DbResult<Vec<Category>> {
        self.inventory.store().list_categories().await
    }

    pub async fn get_by_id(&self, id: CategoryId) -> DbResult<Category> {
        self.inventory
            .store()
            .find_category(id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", id))
    }

    pub async fn create(&self, new: NewCategory) -> DbResult<Category> {
        let category = self.inventory.store().insert_category(new).await?;
        info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn update(&self, id: CategoryId, patch: CategoryPatch) -> DbResult<Category> {
        self.inventory.store().update_category(id, patch).await
    }

    /// Products that reference the category keep their category string.
    pub async fn delete(&self, id: CategoryId) -> DbResult<CategoryRecord> {
        let record = self.inventory.store().delete_category(id).await?;
        info!(id = %id, name = %record.name, "Category deleted");
        Ok(record)
    }
}

// =============================================================================
// Tests
// =============================================================================
// Every behavioral test runs against both backends.

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{SortDirection, SortField};

    async fn backends_with(settings: InventorySettings) -> Vec<Inventory> {
        vec![
            Inventory::in_memory(settings),
            Inventory::sqlite(DbConfig::in_memory(), settings)
                .await
                .unwrap(),
        ]
    }

    async fn backends() -> Vec<Inventory> {
        backends_with(InventorySettings::default()).await
    }

    fn draft(sku: &str, name: &str, category: &str, quantity: u32, threshold: u32) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price_cents: 999,
            quantity,
            low_stock_threshold: threshold,
        }
    }

    async fn seed(inventory: &Inventory) {
        let products = inventory.products();
        products.create(draft("WID-001", "Blue Widget", "Widgets", 20, 5)).await.unwrap();
        products.create(draft("WID-002", "Widget Mini", "Widgets", 2, 5)).await.unwrap();
        products.create(draft("GAD-001", "Gadget Pro", "Gadgets", 5, 5)).await.unwrap();
        products.create(draft("BLT-004", "Bolt M4", "Hardware", 0, 10)).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        for inventory in backends().await {
            let input = draft("WID-001", "Blue Widget", "Widgets", 20, 5);
            let created = inventory.products().create(input.clone()).await.unwrap();
            let fetched = inventory.products().get_by_id(created.id).await.unwrap();

            assert!(input.matches(&fetched), "{}", inventory.backend_name());
            assert_eq!(fetched, created);
        }
    }

    #[tokio::test]
    async fn test_first_id_is_one_then_max_plus_one() {
        for inventory in backends().await {
            let products = inventory.products();
            let a = products.create(draft("A-1", "A", "X", 1, 0)).await.unwrap();
            let b = products.create(draft("B-1", "B", "X", 1, 0)).await.unwrap();
            assert_eq!((a.id, b.id), (1, 2));

            products.delete(a.id).await.unwrap();
            let c = products.create(draft("C-1", "C", "X", 1, 0)).await.unwrap();
            assert_eq!(c.id, 3);
        }
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_and_changes_nothing() {
        for inventory in backends().await {
            seed(&inventory).await;
            let before = inventory.products().get_all().await.unwrap();

            let patch = ProductPatch {
                name: Some("Ghost".to_string()),
                ..ProductPatch::default()
            };
            let err = inventory.products().update(404, patch).await.unwrap_err();

            assert!(err.is_not_found());
            assert_eq!(inventory.products().get_all().await.unwrap(), before);
        }
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_id() {
        for inventory in backends().await {
            seed(&inventory).await;
            let before = inventory.products().get_by_id(1).await.unwrap();

            let patch = ProductPatch {
                price_cents: Some(1499),
                quantity: Some(7),
                ..ProductPatch::default()
            };
            let updated = inventory.products().update(1, patch).await.unwrap();

            assert_eq!(updated.id, 1);
            assert_eq!(updated.price_cents, 1499);
            assert_eq!(updated.quantity, 7);
            assert_eq!(updated.name, before.name);
            assert!(updated.last_updated >= before.last_updated);
        }
    }

    #[tokio::test]
    async fn test_get_all_is_stable_without_writes() {
        for inventory in backends().await {
            seed(&inventory).await;
            let first = inventory.products().get_all().await.unwrap();
            let second = inventory.products().get_all().await.unwrap();
            assert_eq!(first, second);

            let names: Vec<&str> = first.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["Blue Widget", "Bolt M4", "Gadget Pro", "Widget Mini"]);
        }
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        for inventory in backends().await {
            assert!(inventory.products().delete(1).await.unwrap_err().is_not_found());
            assert!(inventory.products().get_by_id(1).await.unwrap_err().is_not_found());
        }
    }

    #[tokio::test]
    async fn test_sale_beyond_stock_clamps_at_zero() {
        for inventory in backends().await {
            let product = inventory
                .products()
                .create(draft("WID-001", "Blue Widget", "Widgets", 3, 5))
                .await
                .unwrap();

            let outcome = inventory
                .stock()
                .adjust(product.id, AdjustmentKind::Sale, 5, "Walk-in")
                .await
                .unwrap();

            assert_eq!(outcome.product.quantity, 0);
            assert_eq!(outcome.adjustment.quantity, -5);
            assert_eq!(inventory.products().get_by_id(product.id).await.unwrap().quantity, 0);
        }
    }

    #[tokio::test]
    async fn test_restock_adds_and_logs_positive_delta() {
        for inventory in backends().await {
            let product = inventory
                .products()
                .create(draft("WID-001", "Blue Widget", "Widgets", 20, 5))
                .await
                .unwrap();

            let outcome = inventory
                .stock()
                .adjust(product.id, AdjustmentKind::Restock, 10, "Supplier delivery")
                .await
                .unwrap();
            assert_eq!(outcome.product.quantity, 30);

            let history = inventory.stock().history_for(product.id).await.unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].quantity, 10);
            assert_eq!(history[0].kind, AdjustmentKind::Restock);
            assert_eq!(history[0].reason, "Supplier delivery");
            assert!(outcome.product.last_updated >= product.last_updated);
        }
    }

    #[tokio::test]
    async fn test_sign_comes_from_kind() {
        for inventory in backends().await {
            seed(&inventory).await;
            let stock = inventory.stock();

            let damage = stock.adjust(1, AdjustmentKind::Damage, 4, "Crushed").await.unwrap();
            assert_eq!(damage.adjustment.quantity, -4);
            assert_eq!(damage.product.quantity, 16);

            let correction = stock
                .adjust(1, AdjustmentKind::Adjustment, -3, "Cycle count")
                .await
                .unwrap();
            assert_eq!(correction.adjustment.quantity, 3);
            assert_eq!(correction.product.quantity, 19);
        }
    }

    #[tokio::test]
    async fn test_adjust_rejections_leave_no_trace() {
        for inventory in backends().await {
            seed(&inventory).await;
            let stock = inventory.stock();

            let missing = stock.adjust(99, AdjustmentKind::Sale, 1, "Walk-in").await;
            assert!(missing.unwrap_err().is_not_found());

            let zero = stock.adjust(1, AdjustmentKind::Sale, 0, "Walk-in").await;
            assert!(matches!(zero, Err(DbError::Validation(_))));

            let blank = stock.adjust(1, AdjustmentKind::Sale, 1, "  ").await;
            assert!(matches!(blank, Err(DbError::Validation(_))));

            assert!(stock.history().await.unwrap().is_empty());
            assert_eq!(inventory.products().get_by_id(1).await.unwrap().quantity, 20);
        }
    }

    #[tokio::test]
    async fn test_low_stock_matches_threshold_rule() {
        for inventory in backends().await {
            seed(&inventory).await;
            let all = inventory.products().get_all().await.unwrap();
            let low = inventory.products().low_stock(None).await.unwrap();

            for product in &all {
                let flagged = low.iter().any(|p| p.id == product.id);
                assert_eq!(flagged, product.quantity <= product.low_stock_threshold);
            }

            let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["Bolt M4", "Gadget Pro", "Widget Mini"]);

            let strict = inventory.products().low_stock(Some(0)).await.unwrap();
            assert_eq!(strict.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_low_stock_follows_adjustments() {
        for inventory in backends().await {
            seed(&inventory).await;
            let stock = inventory.stock();

            stock.adjust(1, AdjustmentKind::Sale, 15, "Bulk order").await.unwrap();
            assert!(stock.low_stock(None).await.unwrap().iter().any(|p| p.id == 1));

            stock.adjust(1, AdjustmentKind::Restock, 1, "Return").await.unwrap();
            assert!(!stock.low_stock(None).await.unwrap().iter().any(|p| p.id == 1));
        }
    }

    #[tokio::test]
    async fn test_alert_summary() {
        let settings = InventorySettings {
            alert_preview: 2,
            ..InventorySettings::default()
        };
        for inventory in backends_with(settings).await {
            seed(&inventory).await;
            let alert = inventory.stock().alert().await.unwrap();
            assert_eq!(alert.total, 3);
            assert_eq!(alert.preview, vec!["Bolt M4", "Gadget Pro"]);
            assert_eq!(alert.remaining, 1);
        }
    }

    #[tokio::test]
    async fn test_category_count_follows_products() {
        for inventory in backends().await {
            let widgets = inventory
                .categories()
                .create(NewCategory {
                    name: "Widgets".to_string(),
                })
                .await
                .unwrap();
            seed(&inventory).await;

            let before = inventory.categories().get_by_id(widgets.id).await.unwrap();
            assert_eq!(before.product_count, 2);

            inventory
                .products()
                .create(draft("WID-003", "Widget Max", "Widgets", 9, 1))
                .await
                .unwrap();
            let after = inventory.categories().get_by_id(widgets.id).await.unwrap();
            assert_eq!(after.product_count, before.product_count + 1);

            let listed = inventory.categories().get_all().await.unwrap();
            assert_eq!(listed, vec![after]);
        }
    }

    #[tokio::test]
    async fn test_category_names_are_unique() {
        for inventory in backends().await {
            let categories = inventory.categories();
            categories
                .create(NewCategory { name: "Widgets".to_string() })
                .await
                .unwrap();
            let gadgets = categories
                .create(NewCategory { name: "Gadgets".to_string() })
                .await
                .unwrap();

            let dup = categories
                .create(NewCategory { name: "Widgets".to_string() })
                .await;
            assert!(matches!(dup, Err(DbError::UniqueViolation { .. })));

            let rename = categories
                .update(
                    gadgets.id,
                    CategoryPatch {
                        name: Some("Widgets".to_string()),
                    },
                )
                .await;
            assert!(matches!(rename, Err(DbError::UniqueViolation { .. })));
            assert_eq!(categories.get_by_id(gadgets.id).await.unwrap().name, "Gadgets");
        }
    }

    #[tokio::test]
    async fn test_category_crud() {
        for inventory in backends().await {
            seed(&inventory).await;
            let categories = inventory.categories();
            let tools = categories
                .create(NewCategory { name: "Tools".to_string() })
                .await
                .unwrap();
            assert_eq!(tools.id, 1);
            assert_eq!(tools.product_count, 0);

            let renamed = categories
                .update(
                    tools.id,
                    CategoryPatch {
                        name: Some("Hardware".to_string()),
                    },
                )
                .await
                .unwrap();
            assert_eq!(renamed.product_count, 1);

            let removed = categories.delete(tools.id).await.unwrap();
            assert_eq!(removed.name, "Hardware");
            assert!(categories.get_by_id(tools.id).await.unwrap_err().is_not_found());
            // Products keep their category string
            assert_eq!(inventory.products().get_by_id(4).await.unwrap().category, "Hardware");
        }
    }

    #[tokio::test]
    async fn test_search_ignores_case() {
        for inventory in backends().await {
            seed(&inventory).await;
            let upper = inventory.products().search("WID").await.unwrap();
            let lower = inventory.products().search("wid").await.unwrap();
            assert_eq!(upper, lower);
            assert_eq!(upper.len(), 2);

            let all = inventory.products().search("  ").await.unwrap();
            assert_eq!(all, inventory.products().get_all().await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_by_category() {
        for inventory in backends().await {
            seed(&inventory).await;
            let widgets = inventory.products().by_category(Some("widgets")).await.unwrap();
            assert_eq!(widgets.len(), 2);
            assert_eq!(inventory.products().by_category(None).await.unwrap().len(), 4);
            assert_eq!(inventory.products().by_category(Some("")).await.unwrap().len(), 4);
        }
    }

    #[tokio::test]
    async fn test_list_with_query() {
        for inventory in backends().await {
            seed(&inventory).await;
            let query = ProductQuery {
                search: None,
                category: None,
                sort: stockroom_core::ProductSort::new(SortField::Quantity, SortDirection::Desc),
            };
            let ids: Vec<i64> = inventory
                .products()
                .list(&query)
                .await
                .unwrap()
                .iter()
                .map(|p| p.id)
                .collect();
            assert_eq!(ids, vec![1, 3, 2, 4]);
        }
    }

    #[tokio::test]
    async fn test_history_retained_by_default() {
        for inventory in backends().await {
            seed(&inventory).await;
            inventory
                .stock()
                .adjust(2, AdjustmentKind::Restock, 8, "Delivery")
                .await
                .unwrap();

            let deleted = inventory.products().delete(2).await.unwrap();
            assert_eq!(deleted.adjustments_removed, 0);
            assert_eq!(inventory.stock().history_for(2).await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_new_product_never_inherits_retained_history() {
        for inventory in backends().await {
            let old = inventory
                .products()
                .create(draft("OLD-1", "Old", "Widgets", 10, 2))
                .await
                .unwrap();
            inventory
                .stock()
                .adjust(old.id, AdjustmentKind::Damage, 3, "Broken")
                .await
                .unwrap();
            inventory.products().delete(old.id).await.unwrap();

            let new = inventory
                .products()
                .create(draft("NEW-1", "New", "Widgets", 1, 0))
                .await
                .unwrap();
            assert_ne!(new.id, old.id, "{}", inventory.backend_name());
            assert!(inventory.stock().history_for(new.id).await.unwrap().is_empty());
            assert_eq!(inventory.stock().history_for(old.id).await.unwrap().len(), 1);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adjustments_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("stockroom.db"));
        let inventory = Inventory::sqlite(config, InventorySettings::default())
            .await
            .unwrap();
        let product = inventory
            .products()
            .create(draft("WID-001", "Blue Widget", "Widgets", 0, 5))
            .await
            .unwrap();
        let id = product.id;

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..40 {
            let inventory = inventory.clone();
            tasks.spawn(async move {
                inventory
                    .stock()
                    .adjust(id, AdjustmentKind::Restock, 1, "Delivery")
                    .await
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap().unwrap();
        }

        let stored = inventory.products().get_by_id(id).await.unwrap();
        assert_eq!(stored.quantity, 40);
        assert_eq!(inventory.stock().history_for(id).await.unwrap().len(), 40);
    }

    #[tokio::test]
    async fn test_history_cascades_when_configured() {
        let settings = InventorySettings {
            adjustment_retention: AdjustmentRetention::Cascade,
            ..InventorySettings::default()
        };
        for inventory in backends_with(settings).await {
            seed(&inventory).await;
            let stock = inventory.stock();
            stock.adjust(2, AdjustmentKind::Restock, 8, "Delivery").await.unwrap();
            stock.adjust(1, AdjustmentKind::Sale, 1, "Walk-in").await.unwrap();

            let deleted = inventory.products().delete(2).await.unwrap();
            assert_eq!(deleted.adjustments_removed, 1);
            assert!(stock.history_for(2).await.unwrap().is_empty());
            assert_eq!(stock.history().await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_adjustment_lookup_and_delete() {
        for inventory in backends().await {
            seed(&inventory).await;
            let stock = inventory.stock();
            let first = stock.adjust(1, AdjustmentKind::Sale, 1, "A").await.unwrap();
            let second = stock.adjust(1, AdjustmentKind::Sale, 1, "B").await.unwrap();

            let history = stock.history().await.unwrap();
            assert_eq!(history[0].id, second.adjustment.id);

            assert_eq!(stock.get_adjustment(first.adjustment.id).await.unwrap(), first.adjustment);
            stock.delete_adjustment(first.adjustment.id).await.unwrap();
            assert!(stock.get_adjustment(first.adjustment.id).await.unwrap_err().is_not_found());
            assert!(stock.delete_adjustment(first.adjustment.id).await.unwrap_err().is_not_found());

            // Deleting history does not move stock
            assert_eq!(inventory.products().get_by_id(1).await.unwrap().quantity, 18);
        }
    }
}
