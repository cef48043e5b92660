//! The `run_select` safety gate.

use crate::error::GateError;
use crate::parser::SqlAnalyzer;
use crate::rewrite::rewrite_named_parameters;
use slate_core::{BindValue, QueryConfig, SelectQuery, ValidationError};

/// A statement that passed the gate, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct GatedQuery {
    /// The caller's statement wrapped in a limiting subquery.
    pub sql: String,
    /// Positional parameters. The last one is the fetch limit (`limit + 1`).
    pub params: Vec<BindValue>,
    /// Effective row limit reported back to the caller.
    pub limit: u32,
}

/// Checks caller-supplied SQL and wraps it with a bound row limit.
#[derive(Clone)]
pub struct SelectGate {
    analyzer: SqlAnalyzer,
    default_limit: u32,
    max_rows: u32,
}

impl std::fmt::Debug for SelectGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectGate")
            .field("default_limit", &self.default_limit)
            .field("max_rows", &self.max_rows)
            .finish_non_exhaustive()
    }
}

impl SelectGate {
    pub fn new(default_limit: u32, max_rows: u32) -> Self {
        Self {
            analyzer: SqlAnalyzer::new(),
            default_limit,
            max_rows,
        }
    }

    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(config.default_limit, config.max_rows)
    }

    pub fn max_rows(&self) -> u32 {
        self.max_rows
    }

    /// `min(requested or default, max_rows)`.
    pub fn effective_limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_limit).min(self.max_rows)
    }

    /// Run every check and produce an executable statement.
    ///
    /// Nothing here touches storage; a rejected statement was never executed.
    pub fn prepare(&self, query: &SelectQuery) -> Result<GatedQuery, GateError> {
        let stmt = self.analyzer.parse_single(&query.sql)?;
        self.analyzer.ensure_read_only(&stmt)?;

        let rewritten = rewrite_named_parameters(self.analyzer.dialect(), &query.sql)?;

        let mut params = Vec::with_capacity(rewritten.parameters.len() + 1);
        for name in &rewritten.parameters {
            let value = query
                .params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| ValidationError::missing(&format!("params.{}", name)))?;
            params.push(value);
        }

        if let Some((unused, _)) = query
            .params
            .iter()
            .find(|(key, _)| !rewritten.parameters.contains(key))
        {
            return Err(ValidationError::malformed(
                &format!("params.{}", unused),
                format!("the statement has no :{} placeholder", unused),
            )
            .into());
        }

        let limit = self.effective_limit(query.limit);
        let sql = format!(
            "SELECT * FROM (\n{}\n) LIMIT ?{}",
            rewritten.sql,
            params.len() + 1
        );
        params.push(BindValue::Integer(i64::from(limit) + 1));

        tracing::debug!(
            limit,
            parameters = rewritten.parameters.len(),
            "Prepared read query"
        );

        Ok(GatedQuery { sql, params, limit })
    }
}
