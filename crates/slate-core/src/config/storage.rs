//! Storage location and connection settings.
//!
//! The location is resolved in order of precedence:
//! 1. an explicit override (the CLI `--database` flag)
//! 2. the environment variable named by `path_env` (default `SQLITE_DB`)
//! 3. `database_url`
//! 4. `path`

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file path. Lowest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Full sqlx URL (`sqlite://...`, `sqlite::memory:`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Environment variable holding a path or URL. Consulted before the file settings.
    #[serde(default = "default_path_env", skip_serializing_if = "Option::is_none")]
    pub path_env: Option<String>,

    /// How long a connection waits on a locked database before reporting busy.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Create the database file when it does not exist.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            database_url: None,
            path_env: default_path_env(),
            busy_timeout_ms: default_busy_timeout_ms(),
            max_connections: default_max_connections(),
            create_if_missing: true,
        }
    }
}

/// A resolved storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// A private in-memory database.
    Memory,
    /// A database file on disk.
    File(PathBuf),
    /// A caller-supplied sqlx URL, passed through untouched.
    Url(String),
}

impl StorageLocation {
    /// Interpret a path or URL string.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == ":memory:" || value == "sqlite::memory:" {
            StorageLocation::Memory
        } else if value.starts_with("sqlite:") {
            StorageLocation::Url(value.to_string())
        } else {
            StorageLocation::File(PathBuf::from(value))
        }
    }

    /// The sqlx connection URL for this location.
    pub fn to_url(&self) -> String {
        match self {
            StorageLocation::Memory => "sqlite::memory:".to_string(),
            StorageLocation::File(path) => sqlite_url(path),
            StorageLocation::Url(url) => url.clone(),
        }
    }

    /// Whether the database lives only in memory (no WAL, single connection).
    pub fn is_memory(&self) -> bool {
        match self {
            StorageLocation::Memory => true,
            StorageLocation::File(_) => false,
            StorageLocation::Url(url) => url.contains(":memory:") || url.contains("mode=memory"),
        }
    }

    /// The file backing this location, when there is one.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            StorageLocation::File(path) => Some(path),
            _ => None,
        }
    }
}

impl StorageConfig {
    /// Resolve the storage location using the process environment.
    pub fn resolve(&self, cli_override: Option<&str>) -> Result<StorageLocation, ConfigError> {
        self.resolve_with(cli_override, |name| std::env::var(name).ok())
    }

    /// Resolve the storage location with an injectable environment lookup.
    pub fn resolve_with<F>(
        &self,
        cli_override: Option<&str>,
        env: F,
    ) -> Result<StorageLocation, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |s: &str| !s.trim().is_empty();

        if let Some(value) = cli_override.filter(|s| non_empty(s)) {
            return Ok(StorageLocation::parse(value));
        }

        if let Some(env_var) = &self.path_env
            && let Some(value) = env(env_var).filter(|s| non_empty(s))
        {
            return Ok(StorageLocation::parse(&value));
        }

        if let Some(url) = self.database_url.as_deref().filter(|s| non_empty(s)) {
            return Ok(StorageLocation::parse(url));
        }

        if let Some(path) = &self.path
            && !path.as_os_str().is_empty()
        {
            return Ok(StorageLocation::File(path.clone()));
        }

        Err(ConfigError::MissingStorage {
            env_hint: self
                .path_env
                .clone()
                .unwrap_or_else(|| "SQLITE_DB".to_string()),
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::invalid(
                "storage.max_connections",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

// sqlx sqlite URL format: sqlite://relative/path.db (or sqlite:/abs/path.db)
fn sqlite_url(path: &Path) -> String {
    if path.is_absolute() {
        format!("sqlite:{}", path.display())
    } else {
        format!("sqlite://{}", path.display())
    }
}

fn default_path_env() -> Option<String> {
    Some("SQLITE_DB".to_string())
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_max_connections() -> u32 {
    4
}

fn default_true() -> bool {
    true
}
