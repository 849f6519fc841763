//! # Stockroom CLI Library
//!
//! Everything the `stockroom` binary does, kept in a library so commands
//! can be driven from tests without spawning a process.
//!
//! ## Module Organization
//! ```text
//! stockroom_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── StockroomConfig (file + env + flags)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Dispatch
//! │   ├── product.rs  ◄─── Product CRUD, search, sort
//! │   ├── stock.rs    ◄─── Adjustments, history, low stock
//! │   └── category.rs ◄─── Categories
//! └── error.rs        ◄─── ApiError, ConfigError
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Invocation                                    │
//! │                                                                         │
//! │  1. Parse argv (clap) ────────────────────────────────────────────────► │
//! │                                                                         │
//! │  2. Resolve Configuration ────────────────────────────────────────────► │
//! │     • defaults → stockroom.toml → STOCKROOM_* env → --memory/--database │
//! │                                                                         │
//! │  3. Initialize Logging ───────────────────────────────────────────────► │
//! │     • stderr, EnvFilter from RUST_LOG or [logging].filter               │
//! │                                                                         │
//! │  4. Open Inventory ───────────────────────────────────────────────────► │
//! │     • memory: empty MemoryStore                                         │
//! │     • sqlite: connect, WAL, run pending migrations                      │
//! │                                                                         │
//! │  5. Dispatch Command ─────────────────────────────────────────────────► │
//! │     • JSON on stdout, ApiError JSON on stderr                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockroom_db::Inventory;

use cli::Cli;
use config::{StockroomConfig, StorageBackend};
use error::{ApiError, ConfigResult};

/// Runs one command end to end and returns its JSON payload.
pub async fn run(cli: Cli) -> Result<Value, ApiError> {
    let config = resolve_config(&cli)?;
    init_tracing(&config.logging.filter);

    let inventory = open_inventory(&config).await?;
    commands::dispatch(&inventory, cli.command).await
}

/// Loads [`StockroomConfig`] and applies the global flags on top.
pub fn resolve_config(cli: &Cli) -> ConfigResult<StockroomConfig> {
    let mut config = StockroomConfig::load(cli.config.clone())?;

    if cli.memory {
        config.storage.backend = StorageBackend::Memory;
    }
    if let Some(path) = &cli.database {
        config.storage.backend = StorageBackend::Sqlite;
        config.storage.database_path = Some(path.clone());
    }

    Ok(config)
}

/// Opens the configured backend behind the [`Inventory`] facade.
pub async fn open_inventory(config: &StockroomConfig) -> Result<Inventory, ApiError> {
    let settings = config.inventory_settings();

    let inventory = match config.storage.backend {
        StorageBackend::Memory => Inventory::in_memory(settings),
        StorageBackend::Sqlite => {
            let db_config = config.db_config()?;
            info!(path = ?db_config.database_path, "Opening SQLite inventory");
            Inventory::sqlite(db_config, settings).await?
        }
    };

    Ok(inventory)
}

/// Installs the tracing subscriber on stderr so stdout stays clean JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom=trace` - Trace for stockroom crates only
/// - Default: `[logging].filter`, itself defaulting to
///   `info,stockroom=debug,sqlx=warn`
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second call (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Serializes command output; `pretty` indents it.
pub fn render<T: Serialize>(value: &T, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_else(|e| {
        serde_json::json!({ "code": "INTERNAL", "message": e.to_string() }).to_string()
    })
}
