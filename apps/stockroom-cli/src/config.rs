//! # Stockroom Configuration
//!
//! Where inventory lives and how it behaves.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --memory, --database ./stockroom.db                                │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     STOCKROOM_BACKEND=memory                                           │
//! │     STOCKROOM_DB_PATH=/var/lib/stockroom/stockroom.db                  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │     ~/Library/Application Support/com.stockroom.stockroom/ (macOS)     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     SQLite in the platform data dir, history retained on delete        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stockroom.toml
//! [storage]
//! backend = "sqlite"          # sqlite | memory
//! database_path = "./stockroom.db"
//! max_connections = 5
//!
//! [inventory]
//! adjustment_retention = "retain"   # retain | cascade
//! alert_preview = 3
//!
//! [logging]
//! filter = "info,stockroom=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use stockroom_db::{AdjustmentRetention, DbConfig, InventorySettings};

use crate::error::{ConfigError, ConfigResult};

/// Default tracing filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,stockroom=debug,sqlx=warn";

const CONFIG_FILE_NAME: &str = "stockroom.toml";
const DATABASE_FILE_NAME: &str = "stockroom.db";
const MAX_ALERT_PREVIEW: usize = 50;

// =============================================================================
// Storage Backend
// =============================================================================

/// Which [`InventoryStore`](stockroom_db::InventoryStore) variant to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Persistent SQLite file.
    #[default]
    Sqlite,

    /// Process-local; starts empty and is gone when the command exits.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "file" | "persistent" => Ok(StorageBackend::Sqlite),
            "memory" | "in-memory" | "mem" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::Invalid(format!(
                "Unknown storage backend: '{}'. Valid options: sqlite, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite file. Falls back to the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            backend: StorageBackend::default(),
            database_path: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySection {
    /// What deleting a product does to its stock history.
    #[serde(default)]
    pub adjustment_retention: AdjustmentRetention,

    /// Product names listed in the low-stock alert before "and N more".
    #[serde(default = "default_alert_preview")]
    pub alert_preview: usize,
}

fn default_alert_preview() -> usize {
    stockroom_core::DEFAULT_ALERT_PREVIEW
}

impl Default for InventorySection {
    fn default() -> Self {
        InventorySection {
            adjustment_retention: AdjustmentRetention::default(),
            alert_preview: default_alert_preview(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins over it.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockroomConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub inventory: InventorySection,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl StockroomConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`stockroom.toml`)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` that does not exist is an error; a missing
    /// file at the default location is not.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path));
                }
                Self::from_file(&path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses one TOML file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.inventory.alert_preview > MAX_ALERT_PREVIEW {
            return Err(ConfigError::Invalid(format!(
                "alert_preview must be at most {}",
                MAX_ALERT_PREVIEW
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("logging filter must not be empty".into()));
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("database_path must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Applies `STOCKROOM_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override logic, parameterized over the variable lookup so it can be
    /// exercised without touching the process environment.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(backend) = var("STOCKROOM_BACKEND") {
            match backend.parse() {
                Ok(parsed) => {
                    debug!(backend = %backend, "Overriding storage backend from environment");
                    self.storage.backend = parsed;
                }
                Err(_) => warn!(backend = %backend, "Unknown storage backend in environment"),
            }
        }

        if let Some(path) = var("STOCKROOM_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(retention) = var("STOCKROOM_ADJUSTMENT_RETENTION") {
            match retention.parse() {
                Ok(parsed) => self.inventory.adjustment_retention = parsed,
                Err(_) => warn!(retention = %retention, "Unknown adjustment retention in environment"),
            }
        }

        if let Some(preview) = var("STOCKROOM_ALERT_PREVIEW") {
            match preview.parse::<usize>() {
                Ok(n) => self.inventory.alert_preview = n,
                Err(_) => warn!(preview = %preview, "Invalid alert preview in environment"),
            }
        }

        if let Some(filter) = var("STOCKROOM_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The SQLite file to open: the configured path, else
    /// `<platform data dir>/stockroom.db` (directory created on demand).
    pub fn database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoProjectDirs("data"))?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }

    pub fn db_config(&self) -> ConfigResult<DbConfig> {
        Ok(DbConfig::new(self.database_path()?).max_connections(self.storage.max_connections))
    }

    pub fn inventory_settings(&self) -> InventorySettings {
        InventorySettings {
            adjustment_retention: self.inventory.adjustment_retention,
            alert_preview: self.inventory.alert_preview,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "stockroom", "stockroom")
}
