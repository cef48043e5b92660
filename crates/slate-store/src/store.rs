//! The SQLite store.

use crate::error::StoreError;
use crate::query::{self, SqlStatement};
use crate::row::{TicketRow, TodoRow};
use chrono::{SecondsFormat, Utc};
use slate_core::{
    BindValue, NewTicket, NewTodo, StorageConfig, StorageLocation, Ticket, TicketChanges, Todo,
    TodoChanges, TodoStatus,
};
use sqlx::sqlite::{
    Sqlite, SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePool,
    SqlitePoolOptions, SqliteRow,
};
use sqlx::Arguments;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Idempotent schema bootstrap script.
pub const SCHEMA: &str = include_str!("schema.sql");

/// Result of deleting a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketDeletion {
    /// Todos removed along with the ticket.
    pub todos_deleted: u64,
}

/// Handle to the ticket database. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open a pool for the given location.
    ///
    /// File databases run in WAL mode. In-memory databases are pinned to a
    /// single connection that is never recycled, since each connection to
    /// `:memory:` would otherwise see its own empty database.
    pub async fn connect(
        location: &StorageLocation,
        config: &StorageConfig,
    ) -> Result<Self, StoreError> {
        if let Some(path) = location.file_path()
            && config.create_if_missing
        {
            ensure_parent_dir(path)?;
        }

        let mut options = SqliteConnectOptions::from_str(&location.to_url())?
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .create_if_missing(config.create_if_missing);

        let pool_options = if location.is_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        info!(
            url = %location.to_url(),
            memory = location.is_memory(),
            "Opened SQLite store"
        );
        Ok(Self { pool })
    }

    /// A private in-memory store with the schema applied.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let store = Self::connect(&StorageLocation::Memory, &StorageConfig::default()).await?;
        store.bootstrap().await?;
        Ok(store)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if they do not exist yet.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        debug!("Schema bootstrap complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    // -------------------------------------------------------------------------
    // Tickets
    // -------------------------------------------------------------------------

    pub async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket, StoreError> {
        let stmt = query::insert_ticket(ticket, &now());
        let row = self.fetch_one_as::<TicketRow>(&stmt).await?;
        Ticket::try_from(row)
    }

    pub async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        let rows = self.fetch_all_as::<TicketRow>(&query::select_tickets()).await?;
        rows.into_iter().map(Ticket::try_from).collect()
    }

    pub async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, StoreError> {
        self.fetch_optional_as::<TicketRow>(&query::select_ticket(id))
            .await?
            .map(Ticket::try_from)
            .transpose()
    }

    /// Apply a partial update. `None` when the ticket does not exist.
    pub async fn update_ticket(
        &self,
        id: i64,
        changes: &TicketChanges,
    ) -> Result<Option<Ticket>, StoreError> {
        let stmt = query::update_ticket(id, changes, &now());
        self.fetch_optional_as::<TicketRow>(&stmt)
            .await?
            .map(Ticket::try_from)
            .transpose()
    }

    /// Delete a ticket and, through the cascade, its todos.
    pub async fn delete_ticket(&self, id: i64) -> Result<Option<TicketDeletion>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let count = query::count_todos(id);
        let (todos,): (i64,) = sqlx::query_as_with(&count.sql, arguments(&count.params)?)
            .fetch_one(&mut *tx)
            .await?;

        let delete = query::delete_ticket(id);
        let result = sqlx::query_with(&delete.sql, arguments(&delete.params)?)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
        tx.commit().await?;

        debug!(ticket_id = id, todos_deleted = todos, "Deleted ticket");
        Ok(Some(TicketDeletion {
            todos_deleted: u64::try_from(todos).unwrap_or(0),
        }))
    }

    // -------------------------------------------------------------------------
    // Todos
    // -------------------------------------------------------------------------

    /// Insert a todo. A missing parent ticket surfaces as [`StoreError::ForeignKey`].
    pub async fn create_todo(&self, todo: &NewTodo) -> Result<Todo, StoreError> {
        let stmt = query::insert_todo(todo, &now());
        let row = self.fetch_one_as::<TodoRow>(&stmt).await?;
        Todo::try_from(row)
    }

    /// Todos of one ticket. Unknown tickets simply have none.
    pub async fn list_todos(&self, ticket_id: i64) -> Result<Vec<Todo>, StoreError> {
        let rows = self
            .fetch_all_as::<TodoRow>(&query::select_todos(ticket_id))
            .await?;
        rows.into_iter().map(Todo::try_from).collect()
    }

    pub async fn get_todo(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        self.fetch_optional_as::<TodoRow>(&query::select_todo(id))
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    pub async fn update_todo_status(
        &self,
        id: i64,
        status: TodoStatus,
    ) -> Result<Option<Todo>, StoreError> {
        let stmt = query::update_todo_status(id, status, &now());
        self.fetch_optional_as::<TodoRow>(&stmt)
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    pub async fn update_todo(
        &self,
        id: i64,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        let stmt = query::update_todo(id, changes, &now());
        self.fetch_optional_as::<TodoRow>(&stmt)
            .await?
            .map(Todo::try_from)
            .transpose()
    }

    /// `false` when the todo does not exist.
    pub async fn delete_todo(&self, id: i64) -> Result<bool, StoreError> {
        let stmt = query::delete_todo(id);
        let result = sqlx::query_with(&stmt.sql, arguments(&stmt.params)?)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    async fn fetch_one_as<T>(&self, stmt: &SqlStatement) -> Result<T, StoreError>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin + 'static,
    {
        debug!(sql = %stmt.sql, "Executing statement");
        Ok(sqlx::query_as_with(&stmt.sql, arguments(&stmt.params)?)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn fetch_optional_as<T>(&self, stmt: &SqlStatement) -> Result<Option<T>, StoreError>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin + 'static,
    {
        debug!(sql = %stmt.sql, "Executing statement");
        Ok(sqlx::query_as_with(&stmt.sql, arguments(&stmt.params)?)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn fetch_all_as<T>(&self, stmt: &SqlStatement) -> Result<Vec<T>, StoreError>
    where
        T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin + 'static,
    {
        debug!(sql = %stmt.sql, "Executing statement");
        Ok(sqlx::query_as_with(&stmt.sql, arguments(&stmt.params)?)
            .fetch_all(&self.pool)
            .await?)
    }
}

fn args_add<'q, T>(args: &mut SqliteArguments<'q>, value: T) -> Result<(), StoreError>
where
    T: Send + 'q + sqlx::Encode<'q, Sqlite> + sqlx::Type<Sqlite>,
{
    args.add(value).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Bind values in order.
pub(crate) fn arguments<'q>(params: &[BindValue]) -> Result<SqliteArguments<'q>, StoreError> {
    let mut args = SqliteArguments::default();
    for param in params {
        match param {
            BindValue::Null => args_add(&mut args, Option::<String>::None)?,
            BindValue::Integer(n) => args_add(&mut args, *n)?,
            BindValue::Real(f) => args_add(&mut args, *f)?,
            BindValue::Text(s) => args_add(&mut args, s.clone())?,
        }
    }
    Ok(args)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn ensure_parent_dir(file_path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
