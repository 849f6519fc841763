//! # Stock Adjustment Engine
//!
//! The arithmetic behind every stock movement. Stores call into this module
//! while holding their lock (or transaction); nothing here performs I/O.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjust(product_id, kind, magnitude, reason)                            │
//! │                                                                         │
//! │  AdjustmentRequest::new ── magnitude == 0? ──► ValidationError          │
//! │       │                 ── reason blank?   ──► ValidationError          │
//! │       ▼                                                                 │
//! │  effective_delta()                                                      │
//! │       ├── Sale / Damage      → -|magnitude|                             │
//! │       └── Adjustment/Restock → +|magnitude|                             │
//! │       ▼                                                                 │
//! │  StockMovement::plan(current, delta)                                    │
//! │       new = max(0, current + delta)                                     │
//! │       absorbed = units the clamp swallowed                              │
//! │       ▼                                                                 │
//! │  store: write quantity + append StockAdjustment { quantity: delta }     │
//! │         (one lock / one transaction)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Clamping
//! Selling 5 units of a product with 3 on hand leaves 0, not -2, and the
//! request still succeeds. The history entry records the requested delta
//! (-5); [`StockMovement::absorbed`] reports the 2 units that had nowhere to
//! go so the caller can log them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{AdjustmentKind, Product, StockAdjustment};
use crate::validation::validate_reason;

// =============================================================================
// Adjustment Kind
// =============================================================================

impl AdjustmentKind {
    /// Every kind, in display order.
    pub const ALL: [AdjustmentKind; 4] = [
        AdjustmentKind::Adjustment,
        AdjustmentKind::Restock,
        AdjustmentKind::Sale,
        AdjustmentKind::Damage,
    ];

    /// Lowercase wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Adjustment => "adjustment",
            AdjustmentKind::Restock => "restock",
            AdjustmentKind::Sale => "sale",
            AdjustmentKind::Damage => "damage",
        }
    }

    /// True for kinds that always remove stock.
    #[inline]
    pub const fn is_outbound(&self) -> bool {
        matches!(self, AdjustmentKind::Sale | AdjustmentKind::Damage)
    }

    /// Applies this kind's sign to a magnitude. The caller's sign is ignored.
    ///
    /// ```rust
    /// use stockroom_core::AdjustmentKind;
    ///
    /// assert_eq!(AdjustmentKind::Sale.signed(5), -5);
    /// assert_eq!(AdjustmentKind::Sale.signed(-5), -5);
    /// assert_eq!(AdjustmentKind::Restock.signed(-10), 10);
    /// ```
    #[inline]
    pub const fn signed(&self, magnitude: i64) -> i64 {
        let magnitude = magnitude.saturating_abs();
        if self.is_outbound() {
            -magnitude
        } else {
            magnitude
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjustment" => Ok(AdjustmentKind::Adjustment),
            "restock" => Ok(AdjustmentKind::Restock),
            "sale" => Ok(AdjustmentKind::Sale),
            "damage" | "loss" => Ok(AdjustmentKind::Damage),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: AdjustmentKind::ALL
                    .iter()
                    .map(|k| k.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Adjustment Request
// =============================================================================

/// A validated request to move stock.
///
/// Fields are private so that every request in circulation has a non-zero
/// magnitude and a non-blank reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdjustmentRequest {
    kind: AdjustmentKind,
    magnitude: i64,
    reason: String,
}

impl AdjustmentRequest {
    /// Validates and builds a request. The reason is stored trimmed.
    pub fn new(
        kind: AdjustmentKind,
        magnitude: i64,
        reason: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if magnitude == 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }

        let reason = validate_reason(&reason.into())?;

        Ok(AdjustmentRequest {
            kind,
            magnitude,
            reason,
        })
    }

    pub fn kind(&self) -> AdjustmentKind {
        self.kind
    }

    /// The magnitude as supplied (sign not yet normalized).
    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// The signed delta that is applied and logged.
    #[inline]
    pub fn effective_delta(&self) -> i64 {
        self.kind.signed(self.magnitude)
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// The result of applying a delta to a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockMovement {
    pub previous: u32,
    pub delta: i64,
    pub new_quantity: u32,
    /// Units of an outbound delta that the zero clamp swallowed.
    pub absorbed: u32,
}

impl StockMovement {
    /// Computes `max(0, current + delta)`, saturating at `u32::MAX` on the
    /// way up.
    pub fn plan(current: u32, delta: i64) -> Self {
        let target = i64::from(current).saturating_add(delta);
        let new_quantity = target.clamp(0, i64::from(u32::MAX)) as u32;
        let absorbed = if target < 0 {
            u32::try_from(target.unsigned_abs()).unwrap_or(u32::MAX)
        } else {
            0
        };

        StockMovement {
            previous: current,
            delta,
            new_quantity,
            absorbed,
        }
    }

    /// True when the clamp changed the result.
    #[inline]
    pub fn was_clamped(&self) -> bool {
        self.absorbed > 0
    }
}

/// History order: newest first, ties broken by id descending.
pub fn sort_newest_first(adjustments: &mut [StockAdjustment]) {
    adjustments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
}

// =============================================================================
// Outcome
// =============================================================================

/// What a successful adjustment produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdjustmentOutcome {
    /// The product after the adjustment.
    pub product: Product,
    /// The history entry that was appended.
    pub adjustment: StockAdjustment,
    pub movement: StockMovement,
}
