//! # stockroom-core: Pure Inventory Logic for Stockroom
//!
//! This crate holds the inventory rules as pure functions with zero I/O
//! dependencies. Every storage backend calls into it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Admin panel / stockroom CLI                        │   │
//! │  │    Product table ──► Adjust modal ──► Low-stock alert           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands (JSON DTOs)                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockroom-db: Inventory facade                  │   │
//! │  │         MemoryStore  │  Database (SQLite)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌────────────┐ ┌───────────┐ ┌───────┐ ┌────────┐ │   │
//! │  │  │  types  │ │ adjustment │ │ low_stock │ │ query │ │validate│ │   │
//! │  │  │ Product │ │ sign+clamp │ │  status   │ │search │ │ rules  │ │   │
//! │  │  │Category │ │  request   │ │  summary  │ │ sort  │ │        │ │   │
//! │  │  └─────────┘ └────────────┘ └───────────┘ └───────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, StockAdjustment)
//! - [`money`] - Integer-cents price type
//! - [`adjustment`] - Stock adjustment sign and clamp rules
//! - [`low_stock`] - Low-stock derivation, badge status, alert summary
//! - [`query`] - Search, category filter, sorting
//! - [`validation`] - Input validation for the command layer
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::adjustment::{AdjustmentRequest, StockMovement};
//! use stockroom_core::AdjustmentKind;
//!
//! // Selling 5 with only 3 on hand clamps at zero
//! let sale = AdjustmentRequest::new(AdjustmentKind::Sale, 5, "Walk-in").unwrap();
//! let movement = StockMovement::plan(3, sale.effective_delta());
//!
//! assert_eq!(movement.new_quantity, 0);
//! assert_eq!(movement.absorbed, 2);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod adjustment;
pub mod error;
pub mod low_stock;
pub mod money;
pub mod query;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use adjustment::{AdjustmentOutcome, AdjustmentRequest, StockMovement};
pub use error::{CoreError, CoreResult, ValidationError};
pub use low_stock::{LowStockSummary, StockStatus, DEFAULT_ALERT_PREVIEW};
pub use money::Money;
pub use query::{ProductQuery, ProductSort, SortDirection, SortField};
pub use types::*;
