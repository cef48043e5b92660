//! SQL parsing and read-only analysis.

use crate::error::QueryRejection;
use sqlparser::ast::{Query, SetExpr, Statement};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

/// Parses SQLite statements and decides whether they only read.
pub struct SqlAnalyzer {
    dialect: SQLiteDialect,
}

impl Clone for SqlAnalyzer {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Default for SqlAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlAnalyzer {
    /// Create a new SQL analyzer.
    pub fn new() -> Self {
        Self {
            dialect: SQLiteDialect {},
        }
    }

    pub fn dialect(&self) -> &SQLiteDialect {
        &self.dialect
    }

    /// Parse a SQL string into statements.
    pub fn parse(&self, sql: &str) -> Result<Vec<Statement>, QueryRejection> {
        Parser::parse_sql(&self.dialect, sql).map_err(|e| QueryRejection::ParseError(e.to_string()))
    }

    /// Parse exactly one statement.
    pub fn parse_single(&self, sql: &str) -> Result<Statement, QueryRejection> {
        let mut statements = self.parse(sql)?;
        match statements.len() {
            0 => Err(QueryRejection::Empty),
            1 => Ok(statements.remove(0)),
            count => Err(QueryRejection::MultipleStatements { count }),
        }
    }

    /// Accept only statements that cannot write.
    pub fn ensure_read_only(&self, stmt: &Statement) -> Result<(), QueryRejection> {
        match stmt {
            Statement::Query(query) => check_query(query),
            other => Err(QueryRejection::NotReadOnly {
                statement: statement_verb(other),
            }),
        }
    }
}

fn check_query(query: &Query) -> Result<(), QueryRejection> {
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            check_query(&cte.query)?;
        }
    }
    check_set_expr(&query.body)
}

fn check_set_expr(body: &SetExpr) -> Result<(), QueryRejection> {
    match body {
        SetExpr::Select(select) => {
            if select.into.is_some() {
                return Err(QueryRejection::SelectInto);
            }
            Ok(())
        }
        SetExpr::Query(query) => check_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            check_set_expr(left)?;
            check_set_expr(right)
        }
        SetExpr::Values(_) => Ok(()),
        other => Err(QueryRejection::NotReadOnly {
            statement: first_keyword(&other.to_string()),
        }),
    }
}

/// The leading keyword of a statement, for messages (`INSERT`, `PRAGMA`, ...).
pub fn statement_verb(stmt: &Statement) -> String {
    first_keyword(&stmt.to_string())
}

fn first_keyword(rendered: &str) -> String {
    rendered
        .split_whitespace()
        .next()
        .unwrap_or("statement")
        .to_uppercase()
}
