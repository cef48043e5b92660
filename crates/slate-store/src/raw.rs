//! Execution of gated read queries.

use crate::error::StoreError;
use crate::row::row_to_json;
use crate::store::{Store, arguments};
use serde::Serialize;
use serde_json::{Map, Value};
use slate_sql::GatedQuery;
use sqlx::{Column, Executor, Row};
use tracing::debug;

/// Result of `run_select`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowSet {
    /// Column names in result order.
    pub columns: Vec<String>,
    /// One JSON object per row, keyed by column name.
    pub rows: Vec<Map<String, Value>>,
    pub row_count: usize,
    /// More rows existed beyond `limit`.
    pub truncated: bool,
    /// The effective limit that was applied.
    pub limit: u32,
}

impl Store {
    /// Execute a gated query inside a transaction that is always rolled back.
    pub async fn run_select(&self, query: &GatedQuery) -> Result<RowSet, StoreError> {
        let mut tx = self.pool().begin().await?;

        debug!(sql = %query.sql, limit = query.limit, "Executing read query");
        let fetched = sqlx::query_with(&query.sql, arguments(&query.params)?)
            .fetch_all(&mut *tx)
            .await;

        // An empty result carries no column metadata, so ask the engine.
        let described = match &fetched {
            Ok(rows) if rows.is_empty() => (&mut *tx)
                .describe(&query.sql)
                .await
                .map(|d| d.columns().iter().map(|c| c.name().to_string()).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        tx.rollback().await?;
        let mut rows = fetched.map_err(StoreError::from_read_query)?;

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let truncated = rows.len() > limit;
        rows.truncate(limit);

        let columns = match rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            None => described,
        };
        let rows = rows
            .iter()
            .map(row_to_json)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RowSet {
            columns,
            row_count: rows.len(),
            rows,
            truncated,
            limit: query.limit,
        })
    }
}
