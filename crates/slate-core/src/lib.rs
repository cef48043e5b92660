//! # slate-core
//!
//! Data model, validators and configuration shared by every Slate crate.
//!
//! Everything in this crate is pure: no I/O happens during validation, so a
//! request that fails here is guaranteed to have had no side effects.
//!
//! ## Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | `Ticket`, `Todo` and their closed enumerations |
//! | [`validate`] | `ValidationError` and per-field validators |
//! | [`request`] | Typed tool payloads and their conversion into intents |
//! | [`intent`] | Validated, normalized intents consumed by the query builder |
//! | [`value`] | Bind values that cross into SQL as parameters |
//! | [`config`] | `SlateConfig` loaded from YAML |

pub mod config;
pub mod intent;
pub mod model;
pub mod request;
pub mod validate;
pub mod value;

pub use config::{
    ConfigError, McpConfig, QueryConfig, SlateConfig, StorageConfig, StorageLocation, Transport,
};
pub use intent::{NewTicket, NewTodo, SelectQuery, TicketChanges, TodoChanges};
pub use model::{Choice, DueDate, Ticket, TicketPriority, TicketStatus, Todo, TodoStatus};
pub use validate::{ValidationError, ValidationErrorKind};
pub use value::BindValue;
