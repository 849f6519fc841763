//! # Product Queries
//!
//! Search, category filter and sort rules shared by every store variant.
//! The SQLite repository pushes nothing down: it loads the ordered list and
//! runs these same predicates, so both variants agree on edge cases
//! (Unicode case folding, blank queries, tie breaking).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{Category, Product};

// =============================================================================
// Search & Filter
// =============================================================================

/// True when `query` appears, case-insensitively, in the product's name,
/// SKU or category. A blank query matches everything; otherwise spaces in
/// the query are matched literally.
pub fn matches_search(product: &Product, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();

    [&product.name, &product.sku, &product.category]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Case-insensitive exact category match. `None` or blank matches
/// everything.
pub fn matches_category(product: &Product, category: Option<&str>) -> bool {
    match category.map(str::trim) {
        None | Some("") => true,
        Some(wanted) => product.category.to_lowercase() == wanted.to_lowercase(),
    }
}

pub fn search(products: Vec<Product>, query: &str) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| matches_search(p, query))
        .collect()
}

pub fn filter_by_category(products: Vec<Product>, category: Option<&str>) -> Vec<Product> {
    products
        .into_iter()
        .filter(|p| matches_category(p, category))
        .collect()
}

/// The product table's combined view: search, then category, then sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductQuery {
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let query = self.search.as_deref().unwrap_or("");
        let category = self.category.as_deref();

        let mut products: Vec<Product> = products
            .into_iter()
            .filter(|p| matches_search(p, query) && matches_category(p, category))
            .collect();
        sort_products(&mut products, self.sort);
        products
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Column a product list can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum SortField {
    #[default]
    Name,
    Sku,
    Category,
    Price,
    Quantity,
    LowStockThreshold,
    LastUpdated,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Name,
        SortField::Sku,
        SortField::Category,
        SortField::Price,
        SortField::Quantity,
        SortField::LowStockThreshold,
        SortField::LastUpdated,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Sku => "sku",
            SortField::Category => "category",
            SortField::Price => "price",
            SortField::Quantity => "quantity",
            SortField::LowStockThreshold => "lowStockThreshold",
            SortField::LastUpdated => "lastUpdated",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Name => cmp_folded(&a.name, &b.name),
            SortField::Sku => cmp_folded(&a.sku, &b.sku),
            SortField::Category => cmp_folded(&a.category, &b.category),
            SortField::Price => a.price_cents.cmp(&b.price_cents),
            SortField::Quantity => a.quantity.cmp(&b.quantity),
            SortField::LowStockThreshold => a.low_stock_threshold.cmp(&b.low_stock_threshold),
            SortField::LastUpdated => a.last_updated.cmp(&b.last_updated),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the camelCase wire name or a snake_case spelling.
impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        SortField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().to_lowercase() == key)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: SortField::ALL.iter().map(|f| f.as_str().to_string()).collect(),
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A column + direction pair. The default sorts by name ascending, which is
/// the store's natural `list` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl ProductSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        ProductSort { field, direction }
    }

    /// Total order: the chosen column, then id. Direction applies to both so
    /// a descending sort is the exact reverse of the ascending one.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ordering = self.field.compare(a, b).then_with(|| a.id.cmp(&b.id));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

pub fn sort_products(products: &mut [Product], sort: ProductSort) {
    products.sort_by(|a, b| sort.compare(a, b));
}

/// Categories are listed by name (case-folded), then id.
pub fn sort_categories(categories: &mut [Category]) {
    categories.sort_by(|a, b| cmp_folded(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn product(id: i64, sku: &str, name: &str, category: &str, price_cents: i64) -> Product {
        Product {
            id,
            sku: sku.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price_cents,
            quantity: id as u32,
            low_stock_threshold: 5,
            last_updated: Utc::now() + Duration::seconds(id),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "WID-001", "blue widget", "Widgets", 1299),
            product(2, "GAD-001", "Gadget Pro", "Gadgets", 4999),
            product(3, "BLT-004", "Bolt M4", "Hardware", 15),
            product(4, "WID-002", "Widget Mini", "widgets", 899),
        ]
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let upper = search(catalog(), "WID");
        let lower = search(catalog(), "wid");
        assert_eq!(ids(&upper), ids(&lower));
        assert_eq!(ids(&upper), vec![1, 4]);
    }

    #[test]
    fn test_search_matches_category_and_sku() {
        assert_eq!(ids(&search(catalog(), "hardware")), vec![3]);
        assert_eq!(ids(&search(catalog(), "gad-0")), vec![2]);
        assert!(search(catalog(), "nothing-here").is_empty());
    }

    #[test]
    fn test_search_keeps_edge_spaces() {
        assert_eq!(ids(&search(catalog(), "Blue ")), vec![1]);
        assert!(search(catalog(), " Blue").is_empty());
        assert!(search(catalog(), "Gadgets ").is_empty());
    }

    #[test]
    fn test_blank_search_is_no_filter() {
        assert_eq!(search(catalog(), "").len(), 4);
        assert_eq!(search(catalog(), "   ").len(), 4);
    }

    #[test]
    fn test_category_filter_exact_case_insensitive() {
        assert_eq!(ids(&filter_by_category(catalog(), Some("WIDGETS"))), vec![1, 4]);
        assert!(filter_by_category(catalog(), Some("Widget")).is_empty());
        assert_eq!(filter_by_category(catalog(), None).len(), 4);
        assert_eq!(filter_by_category(catalog(), Some("")).len(), 4);
    }

    #[test]
    fn test_sort_by_name_folds_case() {
        let mut products = catalog();
        sort_products(&mut products, ProductSort::default());
        assert_eq!(ids(&products), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_sort_descending_reverses() {
        let mut asc = catalog();
        sort_products(&mut asc, ProductSort::new(SortField::Price, SortDirection::Asc));
        assert_eq!(ids(&asc), vec![3, 4, 1, 2]);

        let mut desc = catalog();
        sort_products(&mut desc, ProductSort::new(SortField::Price, SortDirection::Desc));
        let mut reversed = ids(&asc);
        reversed.reverse();
        assert_eq!(ids(&desc), reversed);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let mut products = catalog();
        sort_products(&mut products, ProductSort::new(SortField::Category, SortDirection::Asc));
        // "Widgets" and "widgets" fold equal, so id decides.
        assert_eq!(ids(&products), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_product_query_combines_filters() {
        let query = ProductQuery {
            search: Some("wid".to_string()),
            category: Some("widgets".to_string()),
            sort: ProductSort::new(SortField::Price, SortDirection::Desc),
        };
        assert_eq!(ids(&query.apply(catalog())), vec![1, 4]);

        let everything = ProductQuery::default().apply(catalog());
        assert_eq!(ids(&everything), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_sort_categories() {
        let mut categories = vec![
            Category { id: 1, name: "widgets".to_string(), product_count: 0 },
            Category { id: 2, name: "Gadgets".to_string(), product_count: 3 },
            Category { id: 3, name: "Apparel".to_string(), product_count: 1 },
        ];
        sort_categories(&mut categories);
        let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_field_parsing() {
        assert_eq!("lowStockThreshold".parse::<SortField>().unwrap(), SortField::LowStockThreshold);
        assert_eq!("low_stock_threshold".parse::<SortField>().unwrap(), SortField::LowStockThreshold);
        assert_eq!("PRICE".parse::<SortField>().unwrap(), SortField::Price);
        assert!("colour".parse::<SortField>().is_err());
    }
}
