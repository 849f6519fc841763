//! # Category Commands
//!
//! Category sidebar. Counts are recomputed from the product list on every
//! read; renaming or deleting a category leaves products' category text
//! alone.

use serde::{Deserialize, Serialize};
use tracing::debug;

use stockroom_core::validation::validate_new_category;
use stockroom_core::{Category, CategoryId, CategoryPatch, CategoryRecord, NewCategory};
use stockroom_db::Inventory;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: CategoryId,
    pub name: String,
    pub product_count: usize,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        CategoryDto {
            id: c.id,
            name: c.name,
            product_count: c.product_count,
        }
    }
}

/// A deleted category carries no count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCategoryDto {
    pub id: CategoryId,
    pub name: String,
}

impl From<CategoryRecord> for DeletedCategoryDto {
    fn from(r: CategoryRecord) -> Self {
        DeletedCategoryDto {
            id: r.id,
            name: r.name,
        }
    }
}

fn category_name(name: &str) -> Result<NewCategory, ApiError> {
    let new = NewCategory {
        name: name.trim().to_string(),
    };
    validate_new_category(&new)?;
    Ok(new)
}

pub async fn list_categories(inventory: &Inventory) -> Result<Vec<CategoryDto>, ApiError> {
    let categories = inventory.categories().get_all().await?;
    Ok(categories.into_iter().map(CategoryDto::from).collect())
}

pub async fn get_category(inventory: &Inventory, id: CategoryId) -> Result<CategoryDto, ApiError> {
    Ok(inventory.categories().get_by_id(id).await?.into())
}

pub async fn create_category(inventory: &Inventory, name: &str) -> Result<CategoryDto, ApiError> {
    let new = category_name(name)?;
    debug!(name = %new.name, "create_category command");
    Ok(inventory.categories().create(new).await?.into())
}

pub async fn rename_category(
    inventory: &Inventory,
    id: CategoryId,
    name: &str,
) -> Result<CategoryDto, ApiError> {
    let new = category_name(name)?;
    debug!(id = %id, name = %new.name, "rename_category command");
    let patch = CategoryPatch {
        name: Some(new.name),
    };
    Ok(inventory.categories().update(id, patch).await?.into())
}

pub async fn delete_category(
    inventory: &Inventory,
    id: CategoryId,
) -> Result<DeletedCategoryDto, ApiError> {
    debug!(id = %id, "delete_category command");
    Ok(inventory.categories().delete(id).await?.into())
}
