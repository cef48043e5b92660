//! Error types for the MCP crate.

use serde_json::{Map, Value, json};
use slate_core::ValidationError;
use slate_sql::{GateError, QueryRejection};
use slate_store::StoreError;
use thiserror::Error;

/// Errors that stop the MCP server itself.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Transport error.
    #[error("transport error: {0}")]
    TransportError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A failed tool call.
///
/// Converted at the dispatch boundary into the `{"error": {...}}` body of a
/// tool result. Storage details are logged, never sent to the caller.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Caller input violates the data model.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced ticket, todo or table does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A write would orphan a todo.
    #[error("{message}")]
    ReferentialIntegrity {
        field: Option<&'static str>,
        message: String,
    },

    /// `run_select` input failed the safety gate.
    #[error(transparent)]
    Rejected(#[from] QueryRejection),

    /// Engine failure.
    #[error(transparent)]
    Storage(StoreError),
}

impl ToolError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ToolError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Wire code for the `kind` field.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "validation_error",
            ToolError::NotFound { .. } => "not_found",
            ToolError::ReferentialIntegrity { .. } => "referential_integrity_error",
            ToolError::Rejected(_) => "query_rejected",
            ToolError::Storage(_) => "storage_error",
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ToolError::Storage(StoreError::Busy) => {
                "The database is busy. Retry the request later.".to_string()
            }
            ToolError::Storage(StoreError::Constraint(_)) => {
                "The database rejected the write because it violates a constraint.".to_string()
            }
            ToolError::Storage(_) => "The storage layer failed to complete the request.".to_string(),
            ToolError::Rejected(rejection) => format!("Query rejected: {}", rejection),
            other => other.to_string(),
        }
    }

    /// `{"error": {"kind", "message", "field"?, "retryable"?}}`
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("kind".into(), json!(self.kind()));
        body.insert("message".into(), json!(self.public_message()));

        let field = match self {
            ToolError::Validation(err) => Some(err.field.as_str()),
            ToolError::ReferentialIntegrity { field, .. } => *field,
            ToolError::Rejected(_) => Some("sql"),
            _ => None,
        };
        if let Some(field) = field {
            body.insert("field".into(), json!(field));
        }
        if let ToolError::Storage(err) = self {
            body.insert("retryable".into(), json!(err.is_retryable()));
        }

        json!({ "error": body })
    }
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ForeignKey(_) => ToolError::ReferentialIntegrity {
                field: None,
                message: "The write would violate the ticket/todo relationship.".to_string(),
            },
            StoreError::QueryFailed(message) => ToolError::Rejected(QueryRejection::Engine(message)),
            other => ToolError::Storage(other),
        }
    }
}

impl From<GateError> for ToolError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Rejected(rejection) => ToolError::Rejected(rejection),
            GateError::Invalid(invalid) => ToolError::Validation(invalid),
        }
    }
}
