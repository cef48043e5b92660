//! Row decoding.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use slate_core::{DueDate, Ticket, Todo};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, ValueRef};

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TicketRow {
    id: i64,
    project_id: String,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = StoreError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            description: row.description,
            status: row
                .status
                .parse()
                .map_err(|e| StoreError::corrupt("tickets", e))?,
            priority: row
                .priority
                .parse()
                .map_err(|e| StoreError::corrupt("tickets", e))?,
            created_at: timestamp("tickets", &row.created_at)?,
            updated_at: timestamp("tickets", &row.updated_at)?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TodoRow {
    id: i64,
    ticket_id: i64,
    description: String,
    status: String,
    due_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TodoRow> for Todo {
    type Error = StoreError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: row.id,
            ticket_id: row.ticket_id,
            description: row.description,
            status: row
                .status
                .parse()
                .map_err(|e| StoreError::corrupt("todos", e))?,
            due_date: row
                .due_date
                .as_deref()
                .map(DueDate::parse)
                .transpose()
                .map_err(|e| StoreError::corrupt("todos", e))?,
            created_at: timestamp("todos", &row.created_at)?,
            updated_at: timestamp("todos", &row.updated_at)?,
        })
    }
}

fn timestamp(table: &'static str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::corrupt(table, format!("bad timestamp '{}': {}", raw, e)))
}

/// Convert an arbitrary result row into a JSON object keyed by column name.
///
/// SQLite is dynamically typed, so each value is decoded by its storage class:
/// NULL, INTEGER, REAL, TEXT, then BLOB (rendered as lowercase hex).
pub(crate) fn row_to_json(row: &SqliteRow) -> Result<Map<String, Value>, StoreError> {
    let mut object = Map::new();
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            Value::Null
        } else if let Ok(n) = row.try_get::<i64, _>(i) {
            Value::from(n)
        } else if let Ok(f) = row.try_get::<f64, _>(i) {
            // NaN and infinities have no JSON form.
            serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null)
        } else if let Ok(s) = row.try_get::<String, _>(i) {
            Value::String(s)
        } else if let Ok(bytes) = row.try_get::<Vec<u8>, _>(i) {
            Value::String(bytes.iter().map(|b| format!("{:02x}", b)).collect())
        } else {
            Value::Null
        };
        object.insert(column.name().to_string(), value);
    }
    Ok(object)
}
