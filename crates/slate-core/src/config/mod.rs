//! Configuration types for Slate.
//!
//! Configuration is loaded from a single YAML file (`slate.yaml`). Every
//! section is optional; the only setting without a usable default is the
//! storage location, which may also come from the CLI or the environment.
//!
//! ```yaml
//! storage:
//!   path: data/slate.db
//! query:
//!   max_rows: 1000
//! mcp:
//!   transport: stdio
//! ```

pub mod error;
pub mod mcp;
pub mod query;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use error::ConfigError;
pub use mcp::{McpConfig, Transport};
pub use query::QueryConfig;
pub use storage::{StorageConfig, StorageLocation};

/// Complete Slate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlateConfig {
    /// SQLite location and pool settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// `run_select` limits.
    #[serde(default)]
    pub query: QueryConfig,

    /// MCP server settings.
    #[serde(default)]
    pub mcp: McpConfig,
}

impl SlateConfig {
    /// Load and validate configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty file deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;

        if self.query.max_rows == 0 {
            return Err(ConfigError::invalid("query.max_rows", "must be at least 1"));
        }
        if self.query.default_limit == 0 {
            return Err(ConfigError::invalid(
                "query.default_limit",
                "must be at least 1",
            ));
        }
        if self.query.default_limit > self.query.max_rows {
            return Err(ConfigError::invalid(
                "query.default_limit",
                format!(
                    "{} exceeds query.max_rows ({})",
                    self.query.default_limit, self.query.max_rows
                ),
            ));
        }
        if self.query.max_sql_length == 0 {
            return Err(ConfigError::invalid(
                "query.max_sql_length",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
