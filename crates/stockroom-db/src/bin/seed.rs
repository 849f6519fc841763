//! # Seed Data Generator
//!
//! Populates a database with sample inventory for development.
//!
//! ## Usage
//! ```bash
//! # Generate the full catalog (default)
//! cargo run -p stockroom-db --bin seed
//!
//! # Generate the first 40 products only
//! cargo run -p stockroom-db --bin seed -- --count 40
//!
//! # Specify database path
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - One category per entry in [`CATALOG`]
//! - Products named `{base} {variant}` with SKU `{CODE}-{BASE}-{NNN}`, one
//!   per base and variant pair (see [`catalog_size`]); larger counts are
//!   capped there
//! - Quantities spread so a share of products start at or below threshold
//! - A restock entry for every tenth product, so history isn't empty

use std::env;

use stockroom_core::{AdjustmentKind, NewCategory, NewProduct};
use stockroom_db::{DbConfig, Inventory, InventorySettings};

/// (category, SKU code, base product names)
const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Widgets",
        "WID",
        &["Blue Widget", "Red Widget", "Widget Mini", "Widget Max", "Flex Widget"],
    ),
    (
        "Gadgets",
        "GAD",
        &["Gadget Pro", "Pocket Gadget", "Gadget Lite", "Smart Gadget"],
    ),
    (
        "Hardware",
        "HRD",
        &["Bolt M4", "Bolt M6", "Hex Nut", "Washer", "Wood Screw", "Anchor Plug"],
    ),
    (
        "Electronics",
        "ELC",
        &["USB Cable", "HDMI Cable", "Power Bank", "Wall Charger", "Earbuds"],
    ),
    (
        "Office",
        "OFF",
        &["Stapler", "Sticky Notes", "Ballpoint Pen", "Notebook", "Binder Clip"],
    ),
];

/// Variant suffixes and their price addon in cents
const VARIANTS: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 150),
    ("Large", 300),
    ("2-Pack", 250),
    ("10-Pack", 900),
];

/// Distinct products the catalog can produce.
fn catalog_size() -> usize {
    let bases: usize = CATALOG.iter().map(|(_, _, bases)| bases.len()).sum();
    bases * VARIANTS.len()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let capacity = catalog_size();
    let mut count: usize = capacity;
    let mut db_path = String::from("./stockroom_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().map_err(|e| {
                        format!("invalid --count {:?}: {}", args[i + 1], e)
                    })?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --count <N>    Number of products to generate (default and max: {})",
                    capacity
                );
                println!("  -d, --db <PATH>    Database file path (default: ./stockroom_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    if count > capacity {
        println!(
            "⚠ Requested {} products but the catalog has {}; generating {}",
            count, capacity, capacity
        );
        count = capacity;
    }

    println!("🌱 Stockroom Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let inventory = Inventory::sqlite(DbConfig::new(&db_path), InventorySettings::default()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = inventory.products().get_all().await?.len();
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (category, _, _) in CATALOG {
        inventory
            .categories()
            .create(NewCategory {
                name: category.to_string(),
            })
            .await?;
    }
    println!("✓ Created {} categories", CATALOG.len());

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    'outer: for (category, code, bases) in CATALOG {
        for base in bases.iter() {
            for (variant, price_addon) in VARIANTS {
                if generated >= count {
                    break 'outer;
                }

                let draft = generate_product(category, code, base, variant, *price_addon, generated);
                let sku = draft.sku.clone();
                let product = match inventory.products().create(draft).await {
                    Ok(product) => product,
                    Err(e) => {
                        eprintln!("Failed to insert {}: {}", sku, e);
                        continue;
                    }
                };

                if generated % 10 == 0 {
                    inventory
                        .stock()
                        .adjust(product.id, AdjustmentKind::Restock, 12, "Initial delivery")
                        .await?;
                }

                generated += 1;
                if generated % 50 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    let alert = inventory.stock().alert().await?;
    println!("  Low stock: {} products", alert.total);
    if !alert.is_empty() {
        println!("  {}", alert.headline());
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one product draft with deterministic pseudo-random values.
fn generate_product(
    category: &str,
    code: &str,
    base: &str,
    variant: &str,
    price_addon: i64,
    seed: usize,
) -> NewProduct {
    let stem: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let sku = format!("{}-{}-{:03}", code, stem, seed);

    // $0.99 - $24.98 plus the variant addon
    let price_cents = 99 + ((seed * 37) % 2400) as i64 + price_addon;

    let low_stock_threshold = [5, 10, 15, 20][seed % 4];

    // Roughly one in four starts at or below threshold
    let quantity = if seed % 4 == 0 {
        (seed % (low_stock_threshold as usize + 1)) as u32
    } else {
        low_stock_threshold + 1 + ((seed * 13) % 120) as u32
    };

    NewProduct {
        sku,
        name: format!("{} {}", base, variant),
        category: category.to_string(),
        price_cents,
        quantity,
        low_stock_threshold,
    }
}
