//! Validated intents.
//!
//! These are only constructed by the `validate` methods in [`crate::request`],
//! so holding one proves the caller's input passed every field rule.

use crate::model::{DueDate, TicketPriority, TicketStatus, TodoStatus};
use crate::value::BindValue;

/// A ticket ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
}

/// A partial ticket update. `None` leaves a column untouched.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketChanges {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
}

impl TicketChanges {
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

/// A todo ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub ticket_id: i64,
    pub description: String,
    pub status: TodoStatus,
    pub due_date: Option<DueDate>,
}

/// A partial todo update. `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub due_date: Option<Option<DueDate>>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.status.is_none() && self.due_date.is_none()
    }
}

/// A caller-supplied read query that passed input validation.
///
/// The SQL text itself has not been checked yet; that is the safety gate's job.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub sql: String,
    /// Named parameters, keyed without the leading `:`.
    pub params: Vec<(String, BindValue)>,
    /// Requested row limit, if any. Always positive.
    pub limit: Option<u32>,
}
