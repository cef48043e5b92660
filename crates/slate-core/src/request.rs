//! Typed tool payloads.
//!
//! Each tool's `arguments` object is deserialized into one of these structs.
//! Unknown fields are rejected at deserialization time. Required fields are
//! still modelled as `Option` so that "missing" is reported by the validator
//! with the field name rather than as an opaque decode error.

use crate::intent::{NewTicket, NewTodo, SelectQuery, TicketChanges, TodoChanges};
use crate::model::{
    PROJECT_ID_MAX_LEN, TABLE_NAME_MAX_LEN, TICKET_DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
    TODO_DESCRIPTION_MAX_LEN, TicketPriority, TicketStatus, TodoStatus,
};
use crate::validate::{
    ValidationError, choice, choice_or_default, due_date, optional_text, positive_id,
    required_text,
};
use crate::value::BindValue;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// TICKETS
// =============================================================================

/// `add_ticket` arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddTicketRequest {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl AddTicketRequest {
    pub fn validate(&self) -> Result<NewTicket, ValidationError> {
        Ok(NewTicket {
            project_id: required_text("project_id", self.project_id.as_deref(), PROJECT_ID_MAX_LEN)?,
            title: required_text("title", self.title.as_deref(), TITLE_MAX_LEN)?,
            description: optional_text(
                "description",
                self.description.as_deref(),
                TICKET_DESCRIPTION_MAX_LEN,
            )?,
            status: choice_or_default::<TicketStatus>("status", self.status.as_deref())?,
            priority: choice_or_default::<TicketPriority>("priority", self.priority.as_deref())?,
        })
    }
}

/// `list_tickets` arguments (none).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListTicketsRequest {}

/// Arguments naming one ticket: `get_ticket`, `delete_ticket`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TicketIdRequest {
    #[serde(alias = "ticket_id")]
    pub id: Option<i64>,
}

impl TicketIdRequest {
    pub fn validate(&self) -> Result<i64, ValidationError> {
        positive_id("id", self.id)
    }
}

/// `update_ticket` arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTicketRequest {
    #[serde(alias = "ticket_id")]
    pub id: Option<i64>,
    pub project_id: Option<String>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl UpdateTicketRequest {
    pub fn validate(&self) -> Result<(i64, TicketChanges), ValidationError> {
        let id = positive_id("id", self.id)?;
        let changes = TicketChanges {
            project_id: self
                .project_id
                .as_deref()
                .map(|v| required_text("project_id", Some(v), PROJECT_ID_MAX_LEN))
                .transpose()?,
            title: self
                .title
                .as_deref()
                .map(|v| required_text("title", Some(v), TITLE_MAX_LEN))
                .transpose()?,
            description: self
                .description
                .as_ref()
                .map(|v| optional_text("description", v.as_deref(), TICKET_DESCRIPTION_MAX_LEN))
                .transpose()?,
            status: self
                .status
                .as_deref()
                .map(|v| choice::<TicketStatus>("status", v))
                .transpose()?,
            priority: self
                .priority
                .as_deref()
                .map(|v| choice::<TicketPriority>("priority", v))
                .transpose()?,
        };
        if changes.is_empty() {
            return Err(ValidationError::no_changes(&[
                "project_id",
                "title",
                "description",
                "status",
                "priority",
            ]));
        }
        Ok((id, changes))
    }
}

// =============================================================================
// TODOS
// =============================================================================

/// `add_todo` arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddTodoRequest {
    pub ticket_id: Option<i64>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<String>,
}

impl AddTodoRequest {
    pub fn validate(&self) -> Result<NewTodo, ValidationError> {
        Ok(NewTodo {
            ticket_id: positive_id("ticket_id", self.ticket_id)?,
            description: required_text(
                "description",
                self.description.as_deref(),
                TODO_DESCRIPTION_MAX_LEN,
            )?,
            status: choice_or_default::<TodoStatus>("status", self.status.as_deref())?,
            due_date: self
                .due_date
                .as_deref()
                .map(|v| due_date("due_date", v))
                .transpose()?,
        })
    }
}

/// `list_todos` arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListTodosRequest {
    pub ticket_id: Option<i64>,
}

impl ListTodosRequest {
    pub fn validate(&self) -> Result<i64, ValidationError> {
        positive_id("ticket_id", self.ticket_id)
    }
}

/// Arguments naming one todo: `delete_todo`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoIdRequest {
    #[serde(alias = "todo_id")]
    pub id: Option<i64>,
}

impl TodoIdRequest {
    pub fn validate(&self) -> Result<i64, ValidationError> {
        positive_id("id", self.id)
    }
}

/// `update_todo_status` arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodoStatusRequest {
    #[serde(alias = "todo_id")]
    pub id: Option<i64>,
    pub status: Option<String>,
}

impl UpdateTodoStatusRequest {
    pub fn validate(&self) -> Result<(i64, TodoStatus), ValidationError> {
        let id = positive_id("id", self.id)?;
        let Some(status) = self.status.as_deref() else {
            return Err(ValidationError::missing("status"));
        };
        Ok((id, choice::<TodoStatus>("status", status)?))
    }
}

/// `update_todo` arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodoRequest {
    #[serde(alias = "todo_id")]
    pub id: Option<i64>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(i64, TodoChanges), ValidationError> {
        let id = positive_id("id", self.id)?;
        let changes = TodoChanges {
            description: self
                .description
                .as_deref()
                .map(|v| required_text("description", Some(v), TODO_DESCRIPTION_MAX_LEN))
                .transpose()?,
            status: self
                .status
                .as_deref()
                .map(|v| choice::<TodoStatus>("status", v))
                .transpose()?,
            due_date: match &self.due_date {
                None => None,
                Some(None) => Some(None),
                Some(Some(raw)) => Some(Some(due_date("due_date", raw)?)),
            },
        };
        if changes.is_empty() {
            return Err(ValidationError::no_changes(&["description", "status", "due_date"]));
        }
        Ok((id, changes))
    }
}

// =============================================================================
// INTROSPECTION AND RAW QUERIES
// =============================================================================

/// `list_tables` arguments (none).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListTablesRequest {}

/// `schema` arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaRequest {
    pub table: Option<String>,
}

impl SchemaRequest {
    pub fn validate(&self) -> Result<String, ValidationError> {
        required_text("table", self.table.as_deref(), TABLE_NAME_MAX_LEN)
    }
}

/// `run_select` arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSelectRequest {
    pub sql: Option<String>,
    pub params: Option<Map<String, Value>>,
    pub limit: Option<i64>,
}

impl RunSelectRequest {
    /// Validate the payload shape. The SQL text is checked later by the safety gate.
    pub fn validate(&self, max_sql_length: usize) -> Result<SelectQuery, ValidationError> {
        let sql = required_text("sql", self.sql.as_deref(), max_sql_length)?;

        let limit = match self.limit {
            None => None,
            Some(n) if n <= 0 => return Err(ValidationError::not_positive("limit", n)),
            Some(n) => Some(u32::try_from(n).unwrap_or(u32::MAX)),
        };

        let mut params: Vec<(String, BindValue)> = Vec::new();
        for (key, value) in self.params.iter().flatten() {
            let name = key.strip_prefix(':').unwrap_or(key);
            let field = format!("params.{}", key);
            if !is_parameter_name(name) {
                return Err(ValidationError::invalid_format(
                    &field,
                    "a parameter name made of letters, digits and underscores",
                ));
            }
            if params.iter().any(|(existing, _)| existing == name) {
                return Err(ValidationError::malformed(
                    &field,
                    format!("parameter '{}' supplied more than once", name),
                ));
            }
            let Some(bind) = BindValue::from_json(value) else {
                return Err(ValidationError::invalid_format(
                    &field,
                    "a string, number, boolean or null",
                ));
            };
            params.push((name.to_string(), bind));
        }

        Ok(SelectQuery { sql, params, limit })
    }
}

fn is_parameter_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// =============================================================================
// TESTS
// =============================================================================
