//! # Stock Commands
//!
//! Adjustments, their history, and low-stock reporting.
//!
//! ## Adjust Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stockroom stock adjust 7 --type sale --quantity 5 --reason "Walk-in"   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "sale".parse::<AdjustmentKind>()   ──► VALIDATION_ERROR if unknown     │
//! │  AdjustmentRequest::new(kind, 5, ..) ──► VALIDATION_ERROR if 0 / blank  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  inventory.stock().apply(7, &request)                                   │
//! │    quantity 3 ──► max(0, 3 - 5) = 0, history entry -5                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AdjustmentResultDto { product, adjustment, previousQuantity, ... }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use stockroom_core::validation::validate_stock_count;
use stockroom_core::{
    AdjustmentId, AdjustmentKind, AdjustmentOutcome, AdjustmentRequest, LowStockSummary,
    ProductId, StockAdjustment,
};
use stockroom_db::Inventory;

use super::product::ProductDto;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentDto {
    pub id: AdjustmentId,
    pub product_id: ProductId,
    #[serde(rename = "type")]
    pub kind: AdjustmentKind,
    /// Signed: negative for sale and damage.
    pub quantity: i64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

impl From<StockAdjustment> for AdjustmentDto {
    fn from(a: StockAdjustment) -> Self {
        AdjustmentDto {
            id: a.id,
            product_id: a.product_id,
            kind: a.kind,
            quantity: a.quantity,
            reason: a.reason,
            timestamp: a.timestamp,
        }
    }
}

/// What the adjust modal shows after saving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentResultDto {
    pub product: ProductDto,
    pub adjustment: AdjustmentDto,
    pub previous_quantity: u32,
    /// Units of a sale or damage that exceeded stock on hand.
    pub absorbed: u32,
}

impl From<AdjustmentOutcome> for AdjustmentResultDto {
    fn from(o: AdjustmentOutcome) -> Self {
        AdjustmentResultDto {
            previous_quantity: o.movement.previous,
            absorbed: o.movement.absorbed,
            product: o.product.into(),
            adjustment: o.adjustment.into(),
        }
    }
}

/// Low-stock banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockAlertDto {
    pub total: usize,
    pub preview: Vec<String>,
    pub remaining: usize,
    /// `""` when nothing is low.
    pub headline: String,
}

impl From<LowStockSummary> for LowStockAlertDto {
    fn from(s: LowStockSummary) -> Self {
        LowStockAlertDto {
            headline: s.headline(),
            total: s.total,
            preview: s.preview,
            remaining: s.remaining,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Applies a stock adjustment.
///
/// ## Arguments
/// * `kind` - `adjustment`, `restock`, `sale` or `damage`
/// * `quantity` - Units moved; the sign is ignored, `kind` decides direction
/// * `reason` - Free text, required
pub async fn adjust_stock(
    inventory: &Inventory,
    product_id: ProductId,
    kind: &str,
    quantity: i64,
    reason: &str,
) -> Result<AdjustmentResultDto, ApiError> {
    let kind: AdjustmentKind = kind.parse()?;
    let request = AdjustmentRequest::new(kind, quantity, reason)?;
    debug!(product_id = %product_id, kind = %kind, quantity, "adjust_stock command");

    let outcome = inventory.stock().apply(product_id, &request).await?;
    if outcome.movement.was_clamped() {
        info!(
            product_id = %product_id,
            absorbed = outcome.movement.absorbed,
            "Adjustment clamped at zero"
        );
    }

    Ok(outcome.into())
}

/// History, newest first; all products or one product id.
pub async fn stock_history(
    inventory: &Inventory,
    product_id: Option<ProductId>,
) -> Result<Vec<AdjustmentDto>, ApiError> {
    let entries = match product_id {
        Some(id) => inventory.stock().history_for(id).await?,
        None => inventory.stock().history().await?,
    };
    Ok(entries.into_iter().map(AdjustmentDto::from).collect())
}

pub async fn get_adjustment(
    inventory: &Inventory,
    id: AdjustmentId,
) -> Result<AdjustmentDto, ApiError> {
    Ok(inventory.stock().get_adjustment(id).await?.into())
}

/// Removes one history entry. Stock on hand is not recalculated.
pub async fn delete_adjustment(
    inventory: &Inventory,
    id: AdjustmentId,
) -> Result<AdjustmentDto, ApiError> {
    debug!(id = %id, "delete_adjustment command");
    Ok(inventory.stock().delete_adjustment(id).await?.into())
}

/// Products at or below their own threshold, or at or below `threshold`
/// for every product when given.
pub async fn low_stock(
    inventory: &Inventory,
    threshold: Option<i64>,
) -> Result<Vec<ProductDto>, ApiError> {
    let threshold = threshold
        .map(|t| validate_stock_count("threshold", t))
        .transpose()?;

    let products = inventory.stock().low_stock(threshold).await?;
    Ok(products.into_iter().map(ProductDto::from).collect())
}

pub async fn low_stock_alert(inventory: &Inventory) -> Result<LowStockAlertDto, ApiError> {
    Ok(inventory.stock().alert().await?.into())
}
