//! # Product Commands
//!
//! Product catalog commands.
//!
//! ## List Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Table Flow                                   │
//! │                                                                         │
//! │  stockroom products list --search wid --category Widgets --sort price  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_search_query("wid")    "price".parse::<SortField>()          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductQuery { search, category, sort }                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  inventory.products().list(&query)                                     │
//! │    search ──► category filter ──► sort (ties by id)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<ProductDto> (with stockStatus badge + formatted price)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product input is validated here, before the store sees it, so a rejected
//! create or update never leaves a trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use stockroom_core::validation::{
    validate_new_product, validate_product_patch, validate_search_query, validate_stock_count,
};
use stockroom_core::{
    Money, NewProduct, Product, ProductId, ProductPatch, ProductQuery, ProductSort, SortDirection,
    SortField, StockStatus, ValidationError,
};
use stockroom_db::{DeletedProduct, Inventory};

use crate::error::ApiError;

/// Product DTO for the admin panel.
///
/// Adds the derived `stockStatus` badge and a display price to the stored
/// fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    /// e.g. `"$12.99"`
    pub price: String,
    pub quantity: u32,
    pub low_stock_threshold: u32,
    pub stock_status: StockStatus,
    pub last_updated: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            price: p.price().to_string(),
            stock_status: p.stock_status(),
            id: p.id,
            sku: p.sku,
            name: p.name,
            category: p.category,
            price_cents: p.price_cents,
            quantity: p.quantity,
            low_stock_threshold: p.low_stock_threshold,
            last_updated: p.last_updated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProductDto {
    pub product: ProductDto,
    pub adjustments_removed: u64,
}

impl From<DeletedProduct> for DeletedProductDto {
    fn from(d: DeletedProduct) -> Self {
        DeletedProductDto {
            product: d.product.into(),
            adjustments_removed: d.adjustments_removed,
        }
    }
}

/// Raw product form. Price is decimal text; counts are signed so negative
/// input is reported as a validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: i64,
    pub low_stock_threshold: i64,
}

impl CreateProductInput {
    /// Parses and validates into a [`NewProduct`] with trimmed text fields.
    pub fn into_new_product(self) -> Result<NewProduct, ValidationError> {
        let product = NewProduct {
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price_cents: self.price.parse::<Money>()?.cents(),
            quantity: validate_stock_count("quantity", self.quantity)?,
            low_stock_threshold: validate_stock_count(
                "lowStockThreshold",
                self.low_stock_threshold,
            )?,
        };
        validate_new_product(&product)?;
        Ok(product)
    }
}

/// Partial product form; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
}

impl UpdateProductInput {
    pub fn into_patch(self) -> Result<ProductPatch, ValidationError> {
        let trimmed = |s: String| s.trim().to_string();

        let patch = ProductPatch {
            sku: self.sku.map(trimmed),
            name: self.name.map(trimmed),
            category: self.category.map(trimmed),
            price_cents: self
                .price
                .map(|p| p.parse::<Money>().map(|m| m.cents()))
                .transpose()?,
            quantity: self
                .quantity
                .map(|q| validate_stock_count("quantity", q))
                .transpose()?,
            low_stock_threshold: self
                .low_stock_threshold
                .map(|t| validate_stock_count("lowStockThreshold", t))
                .transpose()?,
        };
        validate_product_patch(&patch)?;
        Ok(patch)
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Lists products, searched, filtered and sorted in one pass.
///
/// ## Arguments
/// * `search` - Case-insensitive substring of name, SKU or category
/// * `category` - Exact category, case-insensitive; blank means all
/// * `sort` - Column name (`name`, `price`, `lowStockThreshold`, ...)
/// * `descending` - Reverse the whole order
pub async fn list_products(
    inventory: &Inventory,
    search: Option<&str>,
    category: Option<&str>,
    sort: &str,
    descending: bool,
) -> Result<Vec<ProductDto>, ApiError> {
    let search = search.map(validate_search_query).transpose()?;
    let field: SortField = sort.parse()?;
    let direction = if descending {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };

    let query = ProductQuery {
        search,
        category: category.map(|c| c.trim().to_string()),
        sort: ProductSort::new(field, direction),
    };
    debug!(?query, "list_products command");

    let products = inventory.products().list(&query).await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

pub async fn get_product(inventory: &Inventory, id: ProductId) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "get_product command");
    Ok(inventory.products().get_by_id(id).await?.into())
}

pub async fn create_product(
    inventory: &Inventory,
    input: CreateProductInput,
) -> Result<ProductDto, ApiError> {
    let new = input.into_new_product()?;
    debug!(sku = %new.sku, "create_product command");
    Ok(inventory.products().create(new).await?.into())
}

/// Applies a partial update. The id never changes; `lastUpdated` always
/// moves forward, even for an empty update.
pub async fn update_product(
    inventory: &Inventory,
    id: ProductId,
    input: UpdateProductInput,
) -> Result<ProductDto, ApiError> {
    let patch = input.into_patch()?;
    debug!(id = %id, empty = patch.is_empty(), "update_product command");
    Ok(inventory.products().update(id, patch).await?.into())
}

pub async fn delete_product(
    inventory: &Inventory,
    id: ProductId,
) -> Result<DeletedProductDto, ApiError> {
    debug!(id = %id, "delete_product command");
    Ok(inventory.products().delete(id).await?.into())
}
