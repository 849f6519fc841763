//! # Storage Traits
//!
//! The capability set every inventory backend provides.
//!
//! ## Variants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                 Arc<dyn InventoryStore>  (held by Inventory)            │
//! │                             │                                           │
//! │        ┌────────────────────┼────────────────────┐                      │
//! │        │ ProductStore       │ CategoryStore      │ AdjustmentLog        │
//! │        └────────────────────┼────────────────────┘                      │
//! │                ┌────────────┴────────────┐                              │
//! │                ▼                         ▼                              │
//! │        ┌───────────────┐         ┌───────────────┐                      │
//! │        │  MemoryStore  │         │   Database    │                      │
//! │        │ one Mutex over│         │ SQLite + sqlx │                      │
//! │        │ all state     │         │ transactions  │                      │
//! │        └───────────────┘         └───────────────┘                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - Stores validate nothing: whatever they are handed is stored.
//! - New ids are `max(existing) + 1`, starting at 1.
//! - `apply_adjustment` writes the quantity and appends the history entry
//!   as one unit. If either half fails, neither is visible.
//! - Category reads carry a product count derived from current products.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use stockroom_core::{
    AdjustmentId, AdjustmentOutcome, AdjustmentRequest, Category, CategoryId, CategoryPatch,
    CategoryRecord, NewCategory, NewProduct, Product, ProductId, ProductPatch, StockAdjustment,
    ValidationError,
};

use crate::error::DbResult;

pub use memory::MemoryStore;

// =============================================================================
// Retention Policy
// =============================================================================

/// What happens to a product's history when the product is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentRetention {
    /// History survives with a dangling `product_id`.
    #[default]
    Retain,
    /// History is removed together with the product.
    Cascade,
}

impl fmt::Display for AdjustmentRetention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentRetention::Retain => f.write_str("retain"),
            AdjustmentRetention::Cascade => f.write_str("cascade"),
        }
    }
}

impl FromStr for AdjustmentRetention {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(AdjustmentRetention::Retain),
            "cascade" => Ok(AdjustmentRetention::Cascade),
            _ => Err(ValidationError::NotAllowed {
                field: "adjustment_retention".to_string(),
                allowed: vec!["retain".to_string(), "cascade".to_string()],
            }),
        }
    }
}

/// Receipt for a deleted product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProduct {
    pub product: Product,
    /// History entries removed alongside (always 0 under `Retain`).
    pub adjustments_removed: u64,
}

// =============================================================================
// Traits
// =============================================================================

/// Product records and the stock movements applied to them.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, by name (case-folded) then id.
    async fn list_products(&self) -> DbResult<Vec<Product>>;

    async fn find_product(&self, id: ProductId) -> DbResult<Option<Product>>;

    /// Stores a new product under the next id.
    async fn insert_product(&self, new: NewProduct) -> DbResult<Product>;

    /// Merges `patch` into the product. `NotFound` leaves the store untouched.
    async fn update_product(&self, id: ProductId, patch: ProductPatch) -> DbResult<Product>;

    async fn delete_product(
        &self,
        id: ProductId,
        retention: AdjustmentRetention,
    ) -> DbResult<DeletedProduct>;

    /// Applies a stock movement and appends its history entry atomically.
    async fn apply_adjustment(
        &self,
        id: ProductId,
        request: &AdjustmentRequest,
    ) -> DbResult<AdjustmentOutcome>;
}

/// Category records. Reads return the derived [`Category`].
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, by name (case-folded) then id.
    async fn list_categories(&self) -> DbResult<Vec<Category>>;

    async fn find_category(&self, id: CategoryId) -> DbResult<Option<Category>>;

    /// `UniqueViolation` if the name is taken.
    async fn insert_category(&self, new: NewCategory) -> DbResult<Category>;

    async fn update_category(&self, id: CategoryId, patch: CategoryPatch) -> DbResult<Category>;

    /// Products referencing the name are left alone.
    async fn delete_category(&self, id: CategoryId) -> DbResult<CategoryRecord>;
}

/// The append-only stock history.
#[async_trait]
pub trait AdjustmentLog: Send + Sync {
    /// Every entry, newest first.
    async fn list_adjustments(&self) -> DbResult<Vec<StockAdjustment>>;

    /// Entries recorded against `product_id`, newest first. The product need
    /// not exist anymore.
    async fn adjustments_for_product(&self, product_id: ProductId)
        -> DbResult<Vec<StockAdjustment>>;

    async fn find_adjustment(&self, id: AdjustmentId) -> DbResult<Option<StockAdjustment>>;

    async fn delete_adjustment(&self, id: AdjustmentId) -> DbResult<StockAdjustment>;
}

/// Everything the [`Inventory`](crate::Inventory) facade needs.
pub trait InventoryStore: ProductStore + CategoryStore + AdjustmentLog {
    /// Short backend label for logs.
    fn backend_name(&self) -> &'static str;
}
