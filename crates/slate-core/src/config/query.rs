//! Limits applied to `run_select`.

use serde::{Deserialize, Serialize};

/// Row and size limits for caller-supplied read queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Rows returned when the caller does not ask for a limit.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Hard cap on rows returned, whatever the caller asks for.
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,

    /// Longest SQL text accepted, in characters.
    #[serde(default = "default_max_sql_length")]
    pub max_sql_length: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_rows: default_max_rows(),
            max_sql_length: default_max_sql_length(),
        }
    }
}

fn default_limit() -> u32 {
    100
}

fn default_max_rows() -> u32 {
    1000
}

fn default_max_sql_length() -> usize {
    10_000
}
