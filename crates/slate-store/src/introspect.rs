//! Catalog introspection for `list_tables` and `schema`.
//!
//! Table names only ever reach SQLite as bound parameters of the
//! `pragma_table_info` / `pragma_foreign_key_list` table-valued functions.

use crate::error::StoreError;
use crate::query;
use crate::store::{Store, arguments};
use serde::Serialize;

/// Schema information for a database table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    /// Table name.
    pub table: String,

    /// Columns in declaration order.
    pub columns: Vec<ColumnSchema>,

    /// Primary key columns, in key order.
    pub primary_key: Vec<String>,

    /// Foreign key relationships.
    pub foreign_keys: Vec<ForeignKey>,
}

/// Schema information for a database column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,

    /// Declared SQL type (may be empty in SQLite).
    pub data_type: String,

    /// Whether the column is nullable.
    pub nullable: bool,

    /// Whether this is a primary key column.
    pub is_primary_key: bool,

    /// Default value expression, if any.
    pub default: Option<String>,
}

/// A foreign key relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Column in this table.
    pub column: String,

    /// Referenced table.
    pub references_table: String,

    /// Referenced column. `None` means the referenced table's primary key.
    pub references_column: Option<String>,

    /// `ON DELETE` action (`CASCADE`, `NO ACTION`, ...).
    pub on_delete: String,
}

#[derive(sqlx::FromRow)]
struct ColumnRow {
    name: String,
    data_type: String,
    not_null: i64,
    default_value: Option<String>,
    pk: i64,
}

#[derive(sqlx::FromRow)]
struct ForeignKeyRow {
    from_column: String,
    to_table: String,
    to_column: Option<String>,
    on_delete: String,
}

impl Store {
    /// User tables, sorted by name. SQLite's own `sqlite_*` tables are excluded.
    pub async fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let stmt = query::select_table_names();
        let rows: Vec<(String,)> = sqlx::query_as_with(&stmt.sql, arguments(&stmt.params)?)
            .fetch_all(self.pool())
            .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Describe one table. `None` when it does not exist or is internal to SQLite.
    pub async fn table_schema(&self, table: &str) -> Result<Option<TableSchema>, StoreError> {
        if table.to_ascii_lowercase().starts_with("sqlite_") {
            return Ok(None);
        }

        let stmt = query::select_table_columns(table);
        let column_rows: Vec<ColumnRow> =
            sqlx::query_as_with(&stmt.sql, arguments(&stmt.params)?)
                .fetch_all(self.pool())
                .await?;
        if column_rows.is_empty() {
            return Ok(None);
        }

        let mut keyed: Vec<(i64, String)> = column_rows
            .iter()
            .filter(|c| c.pk > 0)
            .map(|c| (c.pk, c.name.clone()))
            .collect();
        keyed.sort();
        let primary_key = keyed.into_iter().map(|(_, name)| name).collect();

        let columns = column_rows
            .into_iter()
            .map(|c| ColumnSchema {
                name: c.name,
                data_type: c.data_type,
                nullable: c.not_null == 0 && c.pk == 0,
                is_primary_key: c.pk > 0,
                default: c.default_value,
            })
            .collect();

        let stmt = query::select_foreign_keys(table);
        let fk_rows: Vec<ForeignKeyRow> = sqlx::query_as_with(&stmt.sql, arguments(&stmt.params)?)
            .fetch_all(self.pool())
            .await?;
        let foreign_keys = fk_rows
            .into_iter()
            .map(|fk| ForeignKey {
                column: fk.from_column,
                references_table: fk.to_table,
                references_column: fk.to_column,
                on_delete: fk.on_delete,
            })
            .collect();

        Ok(Some(TableSchema {
            table: table.to_string(),
            columns,
            primary_key,
            foreign_keys,
        }))
    }
}
