//! Tool execution engine.
//!
//! Every call follows the same path:
//! 1. Decode `arguments` into the tool's typed request (unknown fields rejected)
//! 2. Validate into an intent, before any storage access
//! 3. Run the intent against the [`Store`]
//! 4. Shape the outcome, success or [`ToolError`], into an [`ExecutionResult`]

use crate::error::ToolError;
use crate::protocol::{CallToolResponse, ToolContent};
use crate::tool_definitions as names;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use slate_core::request::{
    AddTicketRequest, AddTodoRequest, ListTablesRequest, ListTicketsRequest, ListTodosRequest,
    RunSelectRequest, SchemaRequest, TicketIdRequest, TodoIdRequest, UpdateTicketRequest,
    UpdateTodoRequest, UpdateTodoStatusRequest,
};
use slate_core::{QueryConfig, ValidationError};
use slate_sql::SelectGate;
use slate_store::{Store, StoreError};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Result of a tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// The JSON payload: the tool's output, or `{"error": {...}}`.
    pub payload: Value,
}

impl ExecutionResult {
    /// Create a successful result with JSON content.
    pub fn success_json(value: Value) -> Self {
        Self {
            success: true,
            payload: value,
        }
    }

    /// Create an error result.
    pub fn error(err: &ToolError) -> Self {
        Self {
            success: false,
            payload: err.to_json(),
        }
    }

    /// The error kind, if this is a failure.
    pub fn error_kind(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.payload["error"]["kind"].as_str()
    }

    /// Render as a `tools/call` result.
    pub fn into_response(self) -> CallToolResponse {
        let text = serde_json::to_string(&self.payload).unwrap_or_else(|_| "{}".to_string());
        CallToolResponse {
            content: vec![ToolContent::Text { text }],
            structured_content: Some(self.payload),
            is_error: !self.success,
        }
    }
}

/// The tool executor handles running tools against the database.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    store: Store,
    gate: SelectGate,
    max_sql_length: usize,
}

impl ToolExecutor {
    /// Create a new tool executor over an initialized store.
    pub fn new(store: Store, query: &QueryConfig) -> Self {
        Self {
            store,
            gate: SelectGate::from_config(query),
            max_sql_length: query.max_sql_length,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Execute a tool call by name.
    pub async fn execute(&self, tool: &str, arguments: Value) -> ExecutionResult {
        let started = Instant::now();
        debug!(tool, "Executing tool");

        match self.dispatch(tool, arguments).await {
            Ok(value) => {
                debug!(
                    tool,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Tool call succeeded"
                );
                ExecutionResult::success_json(value)
            }
            Err(err) => {
                match &err {
                    ToolError::Storage(cause) => {
                        error!(tool, error = %cause, retryable = cause.is_retryable(), "Storage failure");
                    }
                    ToolError::NotFound { .. } => debug!(tool, error = %err, "Not found"),
                    other => warn!(tool, kind = other.kind(), error = %other, "Tool call rejected"),
                }
                ExecutionResult::error(&err)
            }
        }
    }

    async fn dispatch(&self, tool: &str, arguments: Value) -> Result<Value, ToolError> {
        match tool {
            names::ADD_TICKET => self.add_ticket(decode(arguments)?).await,
            names::LIST_TICKETS => self.list_tickets(decode(arguments)?).await,
            names::GET_TICKET => self.get_ticket(decode(arguments)?).await,
            names::UPDATE_TICKET => self.update_ticket(decode(arguments)?).await,
            names::DELETE_TICKET => self.delete_ticket(decode(arguments)?).await,
            names::ADD_TODO => self.add_todo(decode(arguments)?).await,
            names::LIST_TODOS => self.list_todos(decode(arguments)?).await,
            names::UPDATE_TODO_STATUS => self.update_todo_status(decode(arguments)?).await,
            names::UPDATE_TODO => self.update_todo(decode(arguments)?).await,
            names::DELETE_TODO => self.delete_todo(decode(arguments)?).await,
            names::LIST_TABLES => self.list_tables(decode(arguments)?).await,
            names::SCHEMA => self.schema(decode(arguments)?).await,
            names::RUN_SELECT => self.run_select(decode(arguments)?).await,
            other => Err(ToolError::not_found("tool", other)),
        }
    }

    // -------------------------------------------------------------------------
    // Tickets
    // -------------------------------------------------------------------------

    async fn add_ticket(&self, request: AddTicketRequest) -> Result<Value, ToolError> {
        let ticket = request.validate()?;
        to_json(&self.store.create_ticket(&ticket).await?)
    }

    async fn list_tickets(&self, _request: ListTicketsRequest) -> Result<Value, ToolError> {
        let tickets = self.store.list_tickets().await?;
        Ok(json!({ "tickets": to_json(&tickets)? }))
    }

    async fn get_ticket(&self, request: TicketIdRequest) -> Result<Value, ToolError> {
        let id = request.validate()?;
        match self.store.get_ticket(id).await? {
            Some(ticket) => to_json(&ticket),
            None => Err(ToolError::not_found("ticket", id)),
        }
    }

    async fn update_ticket(&self, request: UpdateTicketRequest) -> Result<Value, ToolError> {
        let (id, changes) = request.validate()?;
        match self.store.update_ticket(id, &changes).await? {
            Some(ticket) => to_json(&ticket),
            None => Err(ToolError::not_found("ticket", id)),
        }
    }

    async fn delete_ticket(&self, request: TicketIdRequest) -> Result<Value, ToolError> {
        let id = request.validate()?;
        match self.store.delete_ticket(id).await? {
            Some(deletion) => Ok(json!({
                "id": id,
                "deleted": true,
                "todos_deleted": deletion.todos_deleted
            })),
            None => Err(ToolError::not_found("ticket", id)),
        }
    }

    // -------------------------------------------------------------------------
    // Todos
    // -------------------------------------------------------------------------

    async fn add_todo(&self, request: AddTodoRequest) -> Result<Value, ToolError> {
        let todo = request.validate()?;
        match self.store.create_todo(&todo).await {
            Ok(created) => to_json(&created),
            Err(StoreError::ForeignKey(_)) => Err(ToolError::ReferentialIntegrity {
                field: Some("ticket_id"),
                message: format!("ticket {} does not exist", todo.ticket_id),
            }),
            Err(other) => Err(other.into()),
        }
    }

    async fn list_todos(&self, request: ListTodosRequest) -> Result<Value, ToolError> {
        let ticket_id = request.validate()?;
        let todos = self.store.list_todos(ticket_id).await?;
        Ok(json!({ "todos": to_json(&todos)? }))
    }

    async fn update_todo_status(
        &self,
        request: UpdateTodoStatusRequest,
    ) -> Result<Value, ToolError> {
        let (id, status) = request.validate()?;
        match self.store.update_todo_status(id, status).await? {
            Some(todo) => to_json(&todo),
            None => Err(ToolError::not_found("todo", id)),
        }
    }

    async fn update_todo(&self, request: UpdateTodoRequest) -> Result<Value, ToolError> {
        let (id, changes) = request.validate()?;
        match self.store.update_todo(id, &changes).await? {
            Some(todo) => to_json(&todo),
            None => Err(ToolError::not_found("todo", id)),
        }
    }

    async fn delete_todo(&self, request: TodoIdRequest) -> Result<Value, ToolError> {
        let id = request.validate()?;
        if self.store.delete_todo(id).await? {
            Ok(json!({ "id": id, "deleted": true }))
        } else {
            Err(ToolError::not_found("todo", id))
        }
    }

    // -------------------------------------------------------------------------
    // Introspection and raw reads
    // -------------------------------------------------------------------------

    async fn list_tables(&self, _request: ListTablesRequest) -> Result<Value, ToolError> {
        let tables = self.store.list_tables().await?;
        Ok(json!({ "tables": tables }))
    }

    async fn schema(&self, request: SchemaRequest) -> Result<Value, ToolError> {
        let table = request.validate()?;
        match self.store.table_schema(&table).await? {
            Some(schema) => to_json(&schema),
            None => Err(ToolError::not_found("table", table)),
        }
    }

    async fn run_select(&self, request: RunSelectRequest) -> Result<Value, ToolError> {
        let query = request.validate(self.max_sql_length)?;
        let gated = self.gate.prepare(&query)?;
        to_json(&self.store.run_select(&gated).await?)
    }
}

/// Decode tool arguments. A missing `arguments` object counts as `{}`.
fn decode<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments)
        .map_err(|e| ToolError::Validation(ValidationError::malformed("arguments", e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::Storage(StoreError::Encode(e.to_string())))
}
