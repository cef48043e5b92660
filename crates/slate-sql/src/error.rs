//! Error types for the safety gate.

use slate_core::ValidationError;
use thiserror::Error;

/// Reasons a caller-supplied statement is refused.
///
/// Every variant except [`QueryRejection::Engine`] is raised by the gate
/// before the statement reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryRejection {
    /// SQL parsing failed.
    #[error("failed to parse SQL: {0}")]
    ParseError(String),

    /// The text contained no statement at all.
    #[error("no SQL statement found")]
    Empty,

    /// More than one statement was supplied.
    #[error("only one statement is allowed, found {count}")]
    MultipleStatements { count: usize },

    /// The statement is not a read.
    #[error("only SELECT statements are allowed, found {statement}")]
    NotReadOnly { statement: String },

    /// `SELECT ... INTO` creates a table.
    #[error("SELECT ... INTO is not allowed")]
    SelectInto,

    /// A placeholder style other than `:name`.
    #[error("unsupported placeholder '{placeholder}': use named parameters such as :name")]
    UnsupportedPlaceholder { placeholder: String },

    /// SQLite could not prepare or run the statement.
    #[error("SQLite rejected the query: {0}")]
    Engine(String),
}

/// Errors returned by [`crate::SelectGate::prepare`].
#[derive(Debug, Error)]
pub enum GateError {
    /// The statement was refused by the gate.
    #[error(transparent)]
    Rejected(#[from] QueryRejection),

    /// Statement and parameter map disagree.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
