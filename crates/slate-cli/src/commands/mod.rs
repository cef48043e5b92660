//! CLI command implementations for the Slate MCP server.

pub mod init;
pub mod serve;
pub mod tools;

use anyhow::{Context, Result};
use clap::Args;
use slate_core::{SlateConfig, StorageLocation};
use slate_store::Store;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "slate.yaml";

/// Options shared by every command that opens the database.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Configuration file path. Defaults to ./slate.yaml when present.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// SQLite database path or URL. Overrides the config file.
    #[arg(long, env = "SQLITE_DB")]
    pub database: Option<String>,
}

impl ConfigArgs {
    /// Load the config file, or defaults when none is found.
    pub fn load(&self) -> Result<SlateConfig> {
        match &self.config {
            Some(path) => read_config(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                read_config(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => {
                warn!("No config file found, using defaults");
                Ok(SlateConfig::default())
            }
        }
    }

    /// Where the database lives. Missing storage is fatal.
    pub fn storage_location(&self, config: &SlateConfig) -> Result<StorageLocation> {
        config
            .storage
            .resolve(self.database.as_deref())
            .context("No database configured")
    }
}

fn read_config(path: &Path) -> Result<SlateConfig> {
    let config = SlateConfig::load(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))?;
    info!(config = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Connect and apply the embedded schema.
pub async fn open_store(location: &StorageLocation, config: &SlateConfig) -> Result<Store> {
    let store = Store::connect(location, &config.storage)
        .await
        .with_context(|| format!("Failed to open database at {}", location.to_url()))?;
    store
        .bootstrap()
        .await
        .context("Failed to apply database schema")?;
    Ok(store)
}
