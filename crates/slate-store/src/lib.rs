//! # slate-store
//!
//! SQLite storage for Slate, built on `sqlx`.
//!
//! - [`query`]: the query builder. Fixed column lists, every value bound.
//! - [`Store`]: pool ownership, schema bootstrap and typed ticket/todo access.
//! - [`RowSet`]: results of gated read queries, executed in a rolled-back
//!   transaction.
//! - [`TableSchema`]: catalog introspection.
//!
//! Storage failures surface as [`StoreError`]. Foreign key violations and
//! busy/locked conditions are distinguished so callers can report them
//! precisely.

pub mod error;
pub mod introspect;
pub mod query;
pub mod raw;
mod row;
pub mod store;

pub use error::StoreError;
pub use introspect::{ColumnSchema, ForeignKey, TableSchema};
pub use query::SqlStatement;
pub use raw::RowSet;
pub use store::{SCHEMA, Store, TicketDeletion};
