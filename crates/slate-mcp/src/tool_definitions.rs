//! The fixed Slate tool catalogue.
//!
//! | Tool | Reads | Writes | Destructive |
//! |------|-------|--------|-------------|
//! | `add_ticket`, `add_todo` | | yes | |
//! | `list_tickets`, `get_ticket`, `list_todos` | yes | | |
//! | `update_ticket`, `update_todo`, `update_todo_status` | | yes | |
//! | `delete_ticket`, `delete_todo` | | yes | yes |
//! | `list_tables`, `schema`, `run_select` | yes | | |
//!
//! Every input schema carries `examples` that the server accepts.

use crate::protocol::{ToolAnnotations, ToolDefinition};
use slate_core::model::{
    PROJECT_ID_MAX_LEN, TABLE_NAME_MAX_LEN, TICKET_DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
    TODO_DESCRIPTION_MAX_LEN,
};
use slate_core::{Choice, TicketPriority, TicketStatus, TodoStatus};
use serde_json::{Map, Value, json};

pub const ADD_TICKET: &str = "add_ticket";
pub const LIST_TICKETS: &str = "list_tickets";
pub const GET_TICKET: &str = "get_ticket";
pub const UPDATE_TICKET: &str = "update_ticket";
pub const DELETE_TICKET: &str = "delete_ticket";
pub const ADD_TODO: &str = "add_todo";
pub const LIST_TODOS: &str = "list_todos";
pub const UPDATE_TODO_STATUS: &str = "update_todo_status";
pub const UPDATE_TODO: &str = "update_todo";
pub const DELETE_TODO: &str = "delete_todo";
pub const LIST_TABLES: &str = "list_tables";
pub const SCHEMA: &str = "schema";
pub const RUN_SELECT: &str = "run_select";

const READ: ToolAnnotations = ToolAnnotations {
    read_only_hint: true,
    destructive_hint: false,
    idempotent_hint: true,
};

const CREATE: ToolAnnotations = ToolAnnotations {
    read_only_hint: false,
    destructive_hint: false,
    idempotent_hint: false,
};

const UPDATE: ToolAnnotations = ToolAnnotations {
    read_only_hint: false,
    destructive_hint: false,
    idempotent_hint: true,
};

const DELETE: ToolAnnotations = ToolAnnotations {
    read_only_hint: false,
    destructive_hint: true,
    idempotent_hint: true,
};

/// All tool definitions, in documentation order.
pub fn all() -> Vec<ToolDefinition> {
    vec![
        add_ticket(),
        list_tickets(),
        get_ticket(),
        update_ticket(),
        delete_ticket(),
        add_todo(),
        list_todos(),
        update_todo_status(),
        update_todo(),
        delete_todo(),
        list_tables(),
        schema(),
        run_select(),
    ]
}

fn tool(
    name: &str,
    description: &str,
    input_schema: Value,
    annotations: ToolAnnotations,
) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
        annotations: Some(annotations),
    }
}

/// An object schema that rejects unknown properties.
fn object_schema(properties: Value, required: &[&str], examples: Value) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), properties);
    if !required.is_empty() {
        schema.insert("required".into(), json!(required));
    }
    schema.insert("additionalProperties".into(), json!(false));
    schema.insert("examples".into(), examples);
    Value::Object(schema)
}

fn text(description: &str, max: usize) -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "maxLength": max,
        "description": description
    })
}

fn nullable_text(description: &str, max: usize) -> Value {
    json!({
        "type": ["string", "null"],
        "maxLength": max,
        "description": description
    })
}

fn id(description: &str) -> Value {
    json!({
        "type": "integer",
        "minimum": 1,
        "description": description
    })
}

fn choice<T: Choice>(description: &str) -> Value {
    json!({
        "type": "string",
        "enum": T::allowed(),
        "description": description
    })
}

fn date(description: &str, nullable: bool) -> Value {
    let kind = if nullable { json!(["string", "null"]) } else { json!("string") };
    json!({
        "type": kind,
        "pattern": "^[0-9]{4}-[0-9]{2}-[0-9]{2}$",
        "description": description
    })
}

// =============================================================================
// TICKETS
// =============================================================================

fn add_ticket() -> ToolDefinition {
    tool(
        ADD_TICKET,
        "Create a ticket. Status defaults to 'open' and priority to 'medium'.",
        object_schema(
            json!({
                "project_id": text("Project label the ticket belongs to", PROJECT_ID_MAX_LEN),
                "title": text("Short summary", TITLE_MAX_LEN),
                "description": text("Longer free-form description", TICKET_DESCRIPTION_MAX_LEN),
                "status": choice::<TicketStatus>("Initial status"),
                "priority": choice::<TicketPriority>("Initial priority")
            }),
            &["project_id", "title"],
            json!([
                {"project_id": "web", "title": "Fix login redirect"},
                {
                    "project_id": "api",
                    "title": "Rate limit search",
                    "description": "Search is hammered by crawlers",
                    "status": "in-progress",
                    "priority": "high"
                }
            ]),
        ),
        CREATE,
    )
}

fn list_tickets() -> ToolDefinition {
    tool(
        LIST_TICKETS,
        "List every ticket, newest first.",
        object_schema(json!({}), &[], json!([{}])),
        READ,
    )
}

fn get_ticket() -> ToolDefinition {
    tool(
        GET_TICKET,
        "Fetch one ticket by id.",
        object_schema(json!({"id": id("Ticket id")}), &["id"], json!([{"id": 1}])),
        READ,
    )
}

fn update_ticket() -> ToolDefinition {
    tool(
        UPDATE_TICKET,
        "Change one or more fields of a ticket. Pass description: null to clear it.",
        object_schema(
            json!({
                "id": id("Ticket id"),
                "project_id": text("New project label", PROJECT_ID_MAX_LEN),
                "title": text("New title", TITLE_MAX_LEN),
                "description": nullable_text("New description, or null to clear", TICKET_DESCRIPTION_MAX_LEN),
                "status": choice::<TicketStatus>("New status"),
                "priority": choice::<TicketPriority>("New priority")
            }),
            &["id"],
            json!([
                {"id": 1, "status": "closed"},
                {"id": 1, "title": "Fix login redirect loop", "description": null}
            ]),
        ),
        UPDATE,
    )
}

fn delete_ticket() -> ToolDefinition {
    tool(
        DELETE_TICKET,
        "Delete a ticket together with all of its todos.",
        object_schema(json!({"id": id("Ticket id")}), &["id"], json!([{"id": 1}])),
        DELETE,
    )
}

// =============================================================================
// TODOS
// =============================================================================

fn add_todo() -> ToolDefinition {
    tool(
        ADD_TODO,
        "Add a todo to an existing ticket. Status defaults to 'pending'.",
        object_schema(
            json!({
                "ticket_id": id("Owning ticket id"),
                "description": text("What needs doing", TODO_DESCRIPTION_MAX_LEN),
                "status": choice::<TodoStatus>("Initial status"),
                "due_date": date("Due date (YYYY-MM-DD)", false)
            }),
            &["ticket_id", "description"],
            json!([
                {"ticket_id": 1, "description": "Write a regression test"},
                {"ticket_id": 1, "description": "Ship it", "status": "pending", "due_date": "2024-03-15"}
            ]),
        ),
        CREATE,
    )
}

fn list_todos() -> ToolDefinition {
    tool(
        LIST_TODOS,
        "List the todos of a ticket, oldest first.",
        object_schema(
            json!({"ticket_id": id("Ticket id")}),
            &["ticket_id"],
            json!([{"ticket_id": 1}]),
        ),
        READ,
    )
}

fn update_todo_status() -> ToolDefinition {
    tool(
        UPDATE_TODO_STATUS,
        "Set the status of a todo.",
        object_schema(
            json!({
                "id": id("Todo id"),
                "status": choice::<TodoStatus>("New status")
            }),
            &["id", "status"],
            json!([{"id": 3, "status": "done"}]),
        ),
        UPDATE,
    )
}

fn update_todo() -> ToolDefinition {
    tool(
        UPDATE_TODO,
        "Change one or more fields of a todo. Pass due_date: null to clear it.",
        object_schema(
            json!({
                "id": id("Todo id"),
                "description": text("New description", TODO_DESCRIPTION_MAX_LEN),
                "status": choice::<TodoStatus>("New status"),
                "due_date": date("New due date (YYYY-MM-DD), or null to clear", true)
            }),
            &["id"],
            json!([
                {"id": 3, "description": "Write two regression tests"},
                {"id": 3, "due_date": null}
            ]),
        ),
        UPDATE,
    )
}

fn delete_todo() -> ToolDefinition {
    tool(
        DELETE_TODO,
        "Delete a todo.",
        object_schema(json!({"id": id("Todo id")}), &["id"], json!([{"id": 3}])),
        DELETE,
    )
}

// =============================================================================
// INTROSPECTION AND RAW READS
// =============================================================================

fn list_tables() -> ToolDefinition {
    tool(
        LIST_TABLES,
        "List the user tables in the database.",
        object_schema(json!({}), &[], json!([{}])),
        READ,
    )
}

fn schema() -> ToolDefinition {
    tool(
        SCHEMA,
        "Describe a table: columns, primary key and foreign keys.",
        object_schema(
            json!({"table": text("Table name", TABLE_NAME_MAX_LEN)}),
            &["table"],
            json!([{"table": "todos"}]),
        ),
        READ,
    )
}

fn run_select() -> ToolDefinition {
    tool(
        RUN_SELECT,
        "Run a single read-only SELECT. Use :name placeholders with the params map. \
         Results are capped at the effective limit and flagged as truncated when more rows exist. \
         Give duplicate column names distinct aliases (SELECT t.id AS ticket_id, d.id AS todo_id); \
         otherwise SQLite renames the repeats (id, id:1).",
        object_schema(
            json!({
                "sql": {
                    "type": "string",
                    "minLength": 1,
                    "description": "One SELECT statement (CTEs, UNION and VALUES allowed)"
                },
                "params": {
                    "type": "object",
                    "description": "Values for :name placeholders, keyed by name",
                    "additionalProperties": {
                        "type": ["string", "number", "boolean", "null"]
                    }
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum rows to return; clamped to the server's max_rows"
                }
            }),
            &["sql"],
            json!([
                {"sql": "SELECT status, COUNT(*) AS n FROM tickets GROUP BY status"},
                {
                    "sql": "SELECT * FROM todos WHERE ticket_id = :ticket ORDER BY due_date",
                    "params": {"ticket": 1},
                    "limit": 20
                }
            ]),
        ),
        READ,
    )
}
