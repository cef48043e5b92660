//! Query builder.
//!
//! Every statement is assembled from compile-time column names. Caller values
//! only ever travel in [`SqlStatement::params`].

use slate_core::{
    BindValue, Choice, NewTicket, NewTodo, TicketChanges, TodoChanges, TodoStatus,
};

/// Statement text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl SqlStatement {
    fn new(sql: impl Into<String>, params: Vec<BindValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Accumulates `column = ?` pairs for a partial update.
struct Assignments {
    columns: Vec<&'static str>,
    params: Vec<BindValue>,
}

impl Assignments {
    fn new() -> Self {
        Self {
            columns: Vec::new(),
            params: Vec::new(),
        }
    }

    fn set(&mut self, column: &'static str, value: impl Into<BindValue>) {
        self.columns.push(column);
        self.params.push(value.into());
    }

    fn into_update(mut self, table: &'static str, id: i64, now: &str) -> SqlStatement {
        self.set("updated_at", now);
        let set_clause = self
            .columns
            .iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ");
        self.params.push(BindValue::Integer(id));
        SqlStatement::new(
            format!("UPDATE {} SET {} WHERE id = ? RETURNING *", table, set_clause),
            self.params,
        )
    }
}

// =============================================================================
// TICKETS
// =============================================================================

pub fn insert_ticket(ticket: &NewTicket, now: &str) -> SqlStatement {
    SqlStatement::new(
        "INSERT INTO tickets (project_id, title, description, status, priority, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
        vec![
            ticket.project_id.as_str().into(),
            ticket.title.as_str().into(),
            ticket.description.clone().into(),
            ticket.status.as_str().into(),
            ticket.priority.as_str().into(),
            now.into(),
            now.into(),
        ],
    )
}

/// Newest first; `id` breaks ties between tickets created in the same microsecond.
pub fn select_tickets() -> SqlStatement {
    SqlStatement::new(
        "SELECT * FROM tickets ORDER BY created_at DESC, id DESC",
        Vec::new(),
    )
}

pub fn select_ticket(id: i64) -> SqlStatement {
    SqlStatement::new("SELECT * FROM tickets WHERE id = ?", vec![id.into()])
}

pub fn update_ticket(id: i64, changes: &TicketChanges, now: &str) -> SqlStatement {
    let mut set = Assignments::new();
    if let Some(project_id) = &changes.project_id {
        set.set("project_id", project_id.as_str());
    }
    if let Some(title) = &changes.title {
        set.set("title", title.as_str());
    }
    if let Some(description) = &changes.description {
        set.set("description", description.clone());
    }
    if let Some(status) = changes.status {
        set.set("status", status.as_str());
    }
    if let Some(priority) = changes.priority {
        set.set("priority", priority.as_str());
    }
    set.into_update("tickets", id, now)
}

pub fn delete_ticket(id: i64) -> SqlStatement {
    SqlStatement::new("DELETE FROM tickets WHERE id = ?", vec![id.into()])
}

// =============================================================================
// TODOS
// =============================================================================

pub fn insert_todo(todo: &NewTodo, now: &str) -> SqlStatement {
    SqlStatement::new(
        "INSERT INTO todos (ticket_id, description, status, due_date, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        vec![
            todo.ticket_id.into(),
            todo.description.as_str().into(),
            todo.status.as_str().into(),
            todo.due_date.map(|d| d.to_string()).into(),
            now.into(),
            now.into(),
        ],
    )
}

/// Oldest first, so a ticket's checklist reads in the order it was written.
pub fn select_todos(ticket_id: i64) -> SqlStatement {
    SqlStatement::new(
        "SELECT * FROM todos WHERE ticket_id = ? ORDER BY created_at ASC, id ASC",
        vec![ticket_id.into()],
    )
}

pub fn select_todo(id: i64) -> SqlStatement {
    SqlStatement::new("SELECT * FROM todos WHERE id = ?", vec![id.into()])
}

pub fn update_todo_status(id: i64, status: TodoStatus, now: &str) -> SqlStatement {
    let mut set = Assignments::new();
    set.set("status", status.as_str());
    set.into_update("todos", id, now)
}

pub fn update_todo(id: i64, changes: &TodoChanges, now: &str) -> SqlStatement {
    let mut set = Assignments::new();
    if let Some(description) = &changes.description {
        set.set("description", description.as_str());
    }
    if let Some(status) = changes.status {
        set.set("status", status.as_str());
    }
    if let Some(due_date) = &changes.due_date {
        set.set("due_date", due_date.map(|d| d.to_string()));
    }
    set.into_update("todos", id, now)
}

pub fn delete_todo(id: i64) -> SqlStatement {
    SqlStatement::new("DELETE FROM todos WHERE id = ?", vec![id.into()])
}

pub fn count_todos(ticket_id: i64) -> SqlStatement {
    SqlStatement::new(
        "SELECT COUNT(*) FROM todos WHERE ticket_id = ?",
        vec![ticket_id.into()],
    )
}

// =============================================================================
// CATALOG
// =============================================================================

pub fn select_table_names() -> SqlStatement {
    SqlStatement::new(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
         ORDER BY name",
        Vec::new(),
    )
}

pub fn select_table_columns(table: &str) -> SqlStatement {
    SqlStatement::new(
        "SELECT name, type AS data_type, \"notnull\" AS not_null, \
         CAST(dflt_value AS TEXT) AS default_value, pk \
         FROM pragma_table_info(?) ORDER BY cid",
        vec![table.into()],
    )
}

pub fn select_foreign_keys(table: &str) -> SqlStatement {
    SqlStatement::new(
        "SELECT \"from\" AS from_column, \"table\" AS to_table, \"to\" AS to_column, on_delete \
         FROM pragma_foreign_key_list(?) ORDER BY id, seq",
        vec![table.into()],
    )
}
