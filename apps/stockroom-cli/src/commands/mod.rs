//! # Commands Module
//!
//! Every operation the admin surface exposes. Each command takes the
//! [`Inventory`](stockroom_db::Inventory) handle plus plain arguments and
//! returns a serializable DTO or an [`ApiError`](crate::error::ApiError).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (dispatch)
//! ├── product.rs   ◄─── Product CRUD, search, filter, sort
//! ├── stock.rs     ◄─── Adjustments, history, low stock, alert
//! └── category.rs  ◄─── Categories with derived product counts
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  clap parses argv ──► cli::Command                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatch(inventory, command)                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  product::create_product(inventory, input)                              │
//! │    1. validate input (stockroom_core::validation)                       │
//! │    2. call the facade (inventory.products().create(..))                 │
//! │    3. map Product ──► ProductDto                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  serde_json::Value ──► stdout                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod product;
pub mod stock;

use serde::Serialize;
use serde_json::Value;
use stockroom_db::Inventory;

use crate::cli::{CategoryCommand, Command, ProductCommand, StockCommand};
use crate::error::ApiError;

use product::{CreateProductInput, UpdateProductInput};

/// Runs one parsed command and returns its JSON payload.
pub async fn dispatch(inventory: &Inventory, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::Products(cmd) => dispatch_product(inventory, cmd).await,
        Command::Stock(cmd) => dispatch_stock(inventory, cmd).await,
        Command::Categories(cmd) => dispatch_category(inventory, cmd).await,
    }
}

async fn dispatch_product(inventory: &Inventory, cmd: ProductCommand) -> Result<Value, ApiError> {
    match cmd {
        ProductCommand::List {
            search,
            category,
            sort,
            desc,
        } => to_json(
            product::list_products(inventory, search.as_deref(), category.as_deref(), &sort, desc)
                .await?,
        ),
        ProductCommand::Get { id } => to_json(product::get_product(inventory, id).await?),
        ProductCommand::Create(args) => {
            let input = CreateProductInput {
                sku: args.sku,
                name: args.name,
                category: args.category,
                price: args.price,
                quantity: args.quantity,
                low_stock_threshold: args.threshold,
            };
            to_json(product::create_product(inventory, input).await?)
        }
        ProductCommand::Update(args) => {
            let input = UpdateProductInput {
                sku: args.sku,
                name: args.name,
                category: args.category,
                price: args.price,
                quantity: args.quantity,
                low_stock_threshold: args.threshold,
            };
            to_json(product::update_product(inventory, args.id, input).await?)
        }
        ProductCommand::Delete { id } => to_json(product::delete_product(inventory, id).await?),
    }
}

async fn dispatch_stock(inventory: &Inventory, cmd: StockCommand) -> Result<Value, ApiError> {
    match cmd {
        StockCommand::Adjust {
            id,
            kind,
            quantity,
            reason,
        } => to_json(stock::adjust_stock(inventory, id, &kind, quantity, &reason).await?),
        StockCommand::History { product } => {
            to_json(stock::stock_history(inventory, product).await?)
        }
        StockCommand::Show { id } => to_json(stock::get_adjustment(inventory, id).await?),
        StockCommand::Delete { id } => to_json(stock::delete_adjustment(inventory, id).await?),
        StockCommand::Low { threshold } => to_json(stock::low_stock(inventory, threshold).await?),
        StockCommand::Alert => to_json(stock::low_stock_alert(inventory).await?),
    }
}

async fn dispatch_category(
    inventory: &Inventory,
    cmd: CategoryCommand,
) -> Result<Value, ApiError> {
    match cmd {
        CategoryCommand::List => to_json(category::list_categories(inventory).await?),
        CategoryCommand::Get { id } => to_json(category::get_category(inventory, id).await?),
        CategoryCommand::Create { name } => {
            to_json(category::create_category(inventory, &name).await?)
        }
        CategoryCommand::Rename { id, name } => {
            to_json(category::rename_category(inventory, id, &name).await?)
        }
        CategoryCommand::Delete { id } => {
            to_json(category::delete_category(inventory, id).await?)
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(format!("Serialization failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use stockroom_db::InventorySettings;

    async fn run(inventory: &Inventory, args: &[&str]) -> Result<Value, ApiError> {
        let mut argv = vec!["stockroom"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        dispatch(inventory, cli.command).await
    }

    #[tokio::test]
    async fn test_end_to_end_flow() {
        let inventory = Inventory::in_memory(InventorySettings::default());

        run(&inventory, &["categories", "create", "Widgets"]).await.unwrap();
        let created = run(
            &inventory,
            &[
                "products", "create", "--sku", "WID-001", "--name", "Blue Widget", "--category",
                "Widgets", "--price", "12.99", "--quantity", "3", "--threshold", "5",
            ],
        )
        .await
        .unwrap();
        assert_eq!(created["id"], 1);
        assert_eq!(created["priceCents"], 1299);
        assert_eq!(created["stockStatus"], "low_stock");

        let sold = run(
            &inventory,
            &["stock", "adjust", "1", "--type", "sale", "--quantity", "5", "--reason", "Walk-in"],
        )
        .await
        .unwrap();
        assert_eq!(sold["product"]["quantity"], 0);
        assert_eq!(sold["adjustment"]["quantity"], -5);
        assert_eq!(sold["adjustment"]["type"], "sale");

        let categories = run(&inventory, &["categories", "list"]).await.unwrap();
        assert_eq!(categories[0]["productCount"], 1);

        let alert = run(&inventory, &["stock", "alert"]).await.unwrap();
        assert_eq!(alert["total"], 1);
        assert_eq!(alert["headline"], "Blue Widget");
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let inventory = Inventory::in_memory(InventorySettings::default());
        let err = run(&inventory, &["products", "get", "99"]).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }
}
