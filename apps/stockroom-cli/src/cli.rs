//! # Command-Line Surface
//!
//! ```text
//! stockroom [--config PATH] [--memory | --database PATH] [--pretty] <GROUP> <COMMAND>
//!
//!   products    list · get · create · update · delete
//!   stock       adjust · history · show · delete · low · alert
//!   categories  list · get · create · rename · delete
//! ```
//!
//! Numeric inputs are parsed as signed integers so that a negative
//! quantity reaches validation and comes back as `VALIDATION_ERROR`
//! instead of a clap usage error.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "stockroom", version, about = "Inventory admin for products, stock and categories")]
pub struct Cli {
    /// Config file (default: platform config dir / stockroom.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use an empty in-memory store for this invocation
    #[arg(long, global = true, conflicts_with = "database")]
    pub memory: bool,

    /// SQLite database file
    #[arg(long, global = true, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Product catalog
    #[command(subcommand)]
    Products(ProductCommand),

    /// Stock adjustments and low-stock reporting
    #[command(subcommand)]
    Stock(StockCommand),

    /// Category sidebar
    #[command(subcommand)]
    Categories(CategoryCommand),
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    /// List products, optionally searched, filtered and sorted
    List {
        /// Case-insensitive match on name, SKU or category
        #[arg(long)]
        search: Option<String>,

        /// Exact category (case-insensitive)
        #[arg(long)]
        category: Option<String>,

        /// name, sku, category, price, quantity, lowStockThreshold, lastUpdated
        #[arg(long, default_value = "name")]
        sort: String,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one product
    Get { id: i64 },

    /// Create a product
    Create(CreateProductArgs),

    /// Change some fields of a product
    Update(UpdateProductArgs),

    /// Delete a product
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct CreateProductArgs {
    #[arg(long)]
    pub sku: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub category: String,

    /// Unit price, e.g. 12.99
    #[arg(long, allow_hyphen_values = true)]
    pub price: String,

    #[arg(long, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Low-stock threshold
    #[arg(long, allow_negative_numbers = true)]
    pub threshold: i64,
}

#[derive(Debug, Args)]
pub struct UpdateProductArgs {
    pub id: i64,

    #[arg(long)]
    pub sku: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub price: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub quantity: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub threshold: Option<i64>,
}

// =============================================================================
// Stock
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum StockCommand {
    /// Apply a stock adjustment to a product
    Adjust {
        /// Product id
        id: i64,

        /// adjustment, restock, sale or damage
        #[arg(long = "type", value_name = "TYPE")]
        kind: String,

        /// Units moved; the type decides the direction
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,

        #[arg(long)]
        reason: String,
    },

    /// Adjustment history, newest first
    History {
        /// Only this product's entries
        #[arg(long)]
        product: Option<i64>,
    },

    /// Show one history entry
    Show { id: i64 },

    /// Delete one history entry (stock is not changed)
    Delete { id: i64 },

    /// Products at or below their low-stock threshold
    Low {
        /// Use this threshold for every product instead
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i64>,
    },

    /// Low-stock alert summary
    Alert,
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories with product counts
    List,

    /// Show one category
    Get { id: i64 },

    /// Create a category
    Create { name: String },

    /// Rename a category (products keep their category text)
    Rename { id: i64, name: String },

    /// Delete a category (products keep their category text)
    Delete { id: i64 },
}
