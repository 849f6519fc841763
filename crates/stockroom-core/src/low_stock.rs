//! # Low-Stock Aggregator
//!
//! Derives, on demand, which products need replenishing. Nothing here is
//! cached: every call rescans the product list it is handed.
//!
//! ```text
//! quantity ─┬─ == 0          → OutOfStock ─┐
//!           ├─ <= threshold  → LowStock  ──┴─► is_low_stock() == true
//!           └─ otherwise     → InStock
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Product;

/// How many names an alert banner previews before "and N more".
pub const DEFAULT_ALERT_PREVIEW: usize = 3;

/// True when `product` is at or below its threshold (or `threshold_override`
/// if one is given).
#[inline]
pub fn is_low_stock(product: &Product, threshold_override: Option<u32>) -> bool {
    product.quantity <= threshold_override.unwrap_or(product.low_stock_threshold)
}

/// Filters `products` down to the low-stock ones, preserving input order.
pub fn low_stock_products(products: &[Product], threshold_override: Option<u32>) -> Vec<Product> {
    products
        .iter()
        .filter(|p| is_low_stock(p, threshold_override))
        .cloned()
        .collect()
}

/// Badge state shown next to a product's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn of(product: &Product) -> Self {
        if product.quantity == 0 {
            StockStatus::OutOfStock
        } else if is_low_stock(product, None) {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Human label.
    pub const fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

impl Product {
    #[inline]
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::of(self)
    }
}

// =============================================================================
// Alert Summary
// =============================================================================

/// Condensed view of the low-stock list for an alert banner.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │ ⚠ 5 products are running low                                 │
/// │   Blue Widget, Bolt M4, Cable Tie and 2 more                 │
/// └──────────────────────────────────────────────────────────────┘
///     total = 5, preview = [3 names], remaining = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LowStockSummary {
    pub total: usize,
    pub preview: Vec<String>,
    pub remaining: usize,
}

impl LowStockSummary {
    /// Builds the summary from an already-filtered, already-ordered list.
    pub fn from_low_stock(low: &[Product], preview: usize) -> Self {
        let names: Vec<String> = low.iter().take(preview).map(|p| p.name.clone()).collect();
        let remaining = low.len() - names.len();

        LowStockSummary {
            total: low.len(),
            preview: names,
            remaining,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// One-line rendering, e.g. `"Blue Widget, Bolt M4 and 2 more"`.
    pub fn headline(&self) -> String {
        let mut line = self.preview.join(", ");
        if self.remaining > 0 {
            line.push_str(&format!(" and {} more", self.remaining));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i64, name: &str, quantity: u32, threshold: u32) -> Product {
        Product {
            id,
            sku: format!("SKU-{id}"),
            name: name.to_string(),
            category: "Widgets".to_string(),
            price_cents: 100,
            quantity,
            low_stock_threshold: threshold,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_low_stock(&product(1, "A", 5, 5), None));
        assert!(!is_low_stock(&product(1, "A", 6, 5), None));
        assert!(is_low_stock(&product(1, "A", 0, 0), None));
    }

    #[test]
    fn test_override_replaces_own_threshold() {
        let p = product(1, "A", 8, 5);
        assert!(!is_low_stock(&p, None));
        assert!(is_low_stock(&p, Some(10)));
        assert!(!is_low_stock(&product(2, "B", 3, 5), Some(1)));
    }

    #[test]
    fn test_low_stock_products_keeps_order() {
        let products = vec![
            product(1, "Alpha", 1, 5),
            product(2, "Beta", 50, 5),
            product(3, "Gamma", 5, 5),
        ];
        let low = low_stock_products(&products, None);
        let ids: Vec<i64> = low.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_stock_status() {
        assert_eq!(product(1, "A", 0, 5).stock_status(), StockStatus::OutOfStock);
        assert_eq!(product(1, "A", 5, 5).stock_status(), StockStatus::LowStock);
        assert_eq!(product(1, "A", 6, 5).stock_status(), StockStatus::InStock);
        assert_eq!(StockStatus::OutOfStock.label(), "Out of Stock");
    }

    #[test]
    fn test_summary_preview_and_remaining() {
        let low: Vec<Product> = ["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, n)| product(i as i64 + 1, n, 0, 1))
            .collect();

        let summary = LowStockSummary::from_low_stock(&low, DEFAULT_ALERT_PREVIEW);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.preview, vec!["A", "B", "C"]);
        assert_eq!(summary.remaining, 2);
        assert_eq!(summary.headline(), "A, B, C and 2 more");

        let short = LowStockSummary::from_low_stock(&low[..2], DEFAULT_ALERT_PREVIEW);
        assert_eq!(short.remaining, 0);
        assert_eq!(short.headline(), "A, B");

        assert!(LowStockSummary::from_low_stock(&[], 3).is_empty());
    }
}
