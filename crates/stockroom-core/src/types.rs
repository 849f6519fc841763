//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌──────────────────┐  │
//! │  │      Product        │   │ CategoryRecord  │   │ StockAdjustment  │  │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ──────────────  │  │
//! │  │  id (i64, >0)       │   │  id             │   │  id              │  │
//! │  │  sku                │   │  name (unique)  │   │  product_id ─────┼──┼─► Product.id
//! │  │  name               │   └────────┬────────┘   │  kind            │  │   (weak)
//! │  │  category ──────────┼─ by name ─►│            │  quantity (±)    │  │
//! │  │  price_cents        │   (soft)   ▼            │  reason          │  │
//! │  │  quantity (u32)     │   ┌─────────────────┐   │  timestamp       │  │
//! │  │  low_stock_threshold│   │    Category     │   └──────────────────┘  │
//! │  │  last_updated       │   │  + product_count│   (append-only log)     │
//! │  └─────────────────────┘   │    (derived)    │                         │
//! │                            └─────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stored vs Derived
//! `CategoryRecord` is what a store persists. `Category` is the read model:
//! the record plus a product count recomputed from the current products on
//! every read. The count is never written anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Product identifier, assigned by the store (max existing id + 1).
pub type ProductId = i64;

/// Category identifier.
pub type CategoryId = i64;

/// Stock adjustment identifier.
pub type AdjustmentId = i64;

/// Returns the timestamp to stamp on a mutation.
///
/// `last_updated` must never move backwards for a product, even if the wall
/// clock does, so a mutation stamps the later of the previous value and now.
#[inline]
pub fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    previous.max(now)
}

// =============================================================================
// Product
// =============================================================================

/// A product tracked in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier, immutable after creation.
    pub id: ProductId,

    /// Stock Keeping Unit. Expected to be unique, not enforced.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Name of the category this product belongs to (soft reference).
    pub category: String,

    /// Price in cents.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub quantity: u32,

    /// At or below this quantity the product is flagged for replenishment.
    pub low_stock_threshold: u32,

    /// Set on every mutation; never moves backwards.
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Builds the stored form of a new product.
    pub fn from_new(id: ProductId, new: NewProduct, now: DateTime<Utc>) -> Self {
        Product {
            id,
            sku: new.sku,
            name: new.name,
            category: new.category,
            price_cents: new.price_cents,
            quantity: new.quantity,
            low_stock_threshold: new.low_stock_threshold,
            last_updated: now,
        }
    }

    /// Merges the supplied fields into this product and refreshes
    /// `last_updated`. The id is untouched: a patch cannot carry one.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) {
        if let Some(sku) = patch.sku {
            self.sku = sku;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price_cents) = patch.price_cents {
            self.price_cents = price_cents;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(threshold) = patch.low_stock_threshold {
            self.low_stock_threshold = threshold;
        }
        self.touch(now);
    }

    /// Refreshes `last_updated`.
    #[inline]
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = next_timestamp(self.last_updated, now);
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating a product. The store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub quantity: u32,
    pub low_stock_threshold: u32,
}

impl NewProduct {
    /// True when `product` holds exactly this input (ignores id and
    /// timestamp).
    pub fn matches(&self, product: &Product) -> bool {
        self.sku == product.sku
            && self.name == product.name
            && self.category == product.category
            && self.price_cents == product.price_cents
            && self.quantity == product.quantity
            && self.low_stock_threshold == product.low_stock_threshold
    }
}

/// Partial update for a product. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductPatch {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub low_stock_threshold: Option<u32>,
}

impl ProductPatch {
    /// True when the patch changes nothing but the timestamp.
    pub fn is_empty(&self) -> bool {
        self.sku.is_none()
            && self.name.is_none()
            && self.category.is_none()
            && self.price_cents.is_none()
            && self.quantity.is_none()
            && self.low_stock_threshold.is_none()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A category as persisted: no product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
}

/// A category as read: the record plus a freshly derived product count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Products whose `category` equals this name exactly.
    pub product_count: usize,
}

impl Category {
    /// Derives the read model for `record` from the current products.
    pub fn derive(record: CategoryRecord, products: &[Product]) -> Self {
        let product_count = products
            .iter()
            .filter(|p| p.category == record.name)
            .count();

        Category {
            id: record.id,
            name: record.name,
            product_count,
        }
    }
}

/// Input for creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCategory {
    pub name: String,
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryPatch {
    #[serde(default)]
    pub name: Option<String>,
}

// =============================================================================
// Stock Adjustment
// =============================================================================

/// The reason class of a stock adjustment.
///
/// `Sale` and `Damage` always remove stock; `Adjustment` and `Restock`
/// always add it. See [`crate::adjustment`] for the sign rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AdjustmentKind {
    /// Manual correction.
    Adjustment,
    /// Goods received.
    Restock,
    /// Goods sold.
    Sale,
    /// Damaged or lost goods.
    Damage,
}

/// One immutable entry in a product's stock history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockAdjustment {
    pub id: AdjustmentId,

    /// Product this entry was recorded against. Not a foreign key: the
    /// entry may outlive the product.
    pub product_id: ProductId,

    #[serde(rename = "type")]
    pub kind: AdjustmentKind,

    /// The effective signed delta (already normalized by kind).
    pub quantity: i64,

    pub reason: String,

    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn widget() -> NewProduct {
        NewProduct {
            sku: "WID-001".to_string(),
            name: "Blue Widget".to_string(),
            category: "Widgets".to_string(),
            price_cents: 1299,
            quantity: 20,
            low_stock_threshold: 5,
        }
    }

    #[test]
    fn test_from_new_keeps_input() {
        let now = Utc::now();
        let product = Product::from_new(7, widget(), now);
        assert_eq!(product.id, 7);
        assert_eq!(product.last_updated, now);
        assert!(widget().matches(&product));
    }

    #[test]
    fn test_apply_patch_merges_only_supplied_fields() {
        let created = Utc::now();
        let mut product = Product::from_new(1, widget(), created);

        let patch = ProductPatch {
            name: Some("Red Widget".to_string()),
            quantity: Some(3),
            ..ProductPatch::default()
        };
        product.apply_patch(patch, created + Duration::seconds(5));

        assert_eq!(product.id, 1);
        assert_eq!(product.name, "Red Widget");
        assert_eq!(product.quantity, 3);
        assert_eq!(product.sku, "WID-001");
        assert_eq!(product.last_updated, created + Duration::seconds(5));
    }

    #[test]
    fn test_last_updated_never_moves_backwards() {
        let created = Utc::now();
        let mut product = Product::from_new(1, widget(), created);
        product.touch(created - Duration::minutes(10));
        assert_eq!(product.last_updated, created);
    }

    #[test]
    fn test_category_count_is_exact_match() {
        let now = Utc::now();
        let mut other = widget();
        other.category = "widgets".to_string();
        let products = vec![
            Product::from_new(1, widget(), now),
            Product::from_new(2, widget(), now),
            Product::from_new(3, other, now),
        ];

        let category = Category::derive(
            CategoryRecord {
                id: 1,
                name: "Widgets".to_string(),
            },
            &products,
        );
        assert_eq!(category.product_count, 2);
    }

    #[test]
    fn test_wire_shape() {
        let product = Product::from_new(1, widget(), Utc::now());
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["lowStockThreshold"], 5);
        assert_eq!(json["priceCents"], 1299);
        assert!(json.get("lastUpdated").is_some());

        let adjustment = StockAdjustment {
            id: 1,
            product_id: 1,
            kind: AdjustmentKind::Sale,
            quantity: -5,
            reason: "Walk-in".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&adjustment).unwrap();
        assert_eq!(json["type"], "sale");
        assert_eq!(json["productId"], 1);
        assert_eq!(json["quantity"], -5);
    }

    #[test]
    fn test_patch_deserializes_partial() {
        let patch: ProductPatch = serde_json::from_str(r#"{"quantity": 4}"#).unwrap();
        assert_eq!(patch.quantity, Some(4));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
        assert!(ProductPatch::default().is_empty());
    }
}
