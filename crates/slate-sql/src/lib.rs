//! # slate-sql
//!
//! Safety gate for the `run_select` tool.
//!
//! A caller-supplied statement passes through the gate before it may reach
//! storage:
//!
//! 1. It must parse as exactly one statement (SQLite dialect).
//! 2. It must be a read: `SELECT`, a compound of selects, `VALUES`, or a `WITH`
//!    query whose every body is one of those.
//! 3. Named parameters (`:name`) are rewritten to numbered placeholders and
//!    bound from the caller's map. Any other placeholder style is rejected.
//! 4. The statement is wrapped so that a bound row limit applies to the whole
//!    result:
//!
//! ```sql
//! SELECT * FROM (
//! SELECT id, title FROM tickets WHERE project_id = ?1 ORDER BY id LIMIT 50
//! ) LIMIT ?2
//! ```
//!
//! The gate never touches storage. Executing a [`GatedQuery`] is the store's job.

pub mod error;
pub mod gate;
pub mod parser;
pub mod rewrite;

pub use error::{GateError, QueryRejection};
pub use gate::{GatedQuery, SelectGate};
pub use parser::SqlAnalyzer;
pub use rewrite::{RewrittenSql, rewrite_named_parameters};
