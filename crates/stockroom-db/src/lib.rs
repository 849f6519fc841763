//! # stockroom-db: Storage Layer for Stockroom
//!
//! Every backend inventory state can live in, behind one trait set, plus the
//! [`Inventory`] facade consumers call.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  Command (stockroom stock adjust 7 --type sale --quantity 5)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockroom-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   Inventory ──► Arc<dyn InventoryStore>                         │   │
//! │  │                    │                                            │   │
//! │  │        ┌───────────┴────────────┐                               │   │
//! │  │        ▼                        ▼                               │   │
//! │  │  ┌─────────────┐   ┌────────────────────────────────────────┐  │   │
//! │  │  │ MemoryStore │   │ Database (pool.rs)                     │  │   │
//! │  │  │ (store/)    │   │  ├── ProductRepository                 │  │   │
//! │  │  │             │   │  ├── CategoryRepository                │  │   │
//! │  │  │             │   │  ├── AdjustmentRepository              │  │   │
//! │  │  │             │   │  └── migrations (embedded)             │  │   │
//! │  │  └─────────────┘   └────────────────────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                         SQLite file (WAL mode)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Storage traits and the in-memory store
//! - [`pool`] - SQLite connection pool and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQLite repository implementations
//! - [`inventory`] - The facade
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{DbConfig, Inventory, InventorySettings};
//! use stockroom_core::AdjustmentKind;
//!
//! let inventory = Inventory::sqlite(DbConfig::new("stockroom.db"), InventorySettings::default()).await?;
//!
//! let outcome = inventory
//!     .stock()
//!     .adjust(7, AdjustmentKind::Sale, 5, "Walk-in")
//!     .await?;
//!
//! let alert = inventory.stock().alert().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use inventory::{Inventory, InventorySettings};
pub use pool::{Database, DbConfig};
pub use store::{
    AdjustmentLog, AdjustmentRetention, CategoryStore, DeletedProduct, InventoryStore,
    MemoryStore, ProductStore,
};

// Repository re-exports for convenience
pub use repository::adjustment::AdjustmentRepository;
pub use repository::category::CategoryRepository;
pub use repository::product::ProductRepository;
