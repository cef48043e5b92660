//! Field validators.
//!
//! Every validator takes the field name so that failures point at the exact
//! input the caller has to correct. Validators never perform I/O.

use crate::model::{Choice, DueDate, DueDateError};
use serde::Serialize;
use std::fmt;

// =============================================================================
// VALIDATION ERROR TYPES
// =============================================================================

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The offending input field.
    pub field: String,
    /// The kind of validation error.
    pub kind: ValidationErrorKind,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// A required field was not supplied.
    pub fn missing(field: &str) -> Self {
        Self::new(field, ValidationErrorKind::Missing, format!("{} is required", field))
    }

    /// A string field was empty or whitespace only.
    pub fn empty(field: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::Empty,
            format!("{} cannot be empty or whitespace", field),
        )
    }

    /// A string field exceeded its maximum length.
    pub fn too_long(field: &str, max: usize, actual: usize) -> Self {
        Self::new(
            field,
            ValidationErrorKind::TooLong,
            format!("{} must be at most {} characters (got {})", field, max, actual),
        )
    }

    /// An enumerated field held a value outside its allowed set.
    pub fn invalid_choice(field: &str, value: &str, allowed: &[&str]) -> Self {
        Self::new(
            field,
            ValidationErrorKind::InvalidChoice,
            format!(
                "Invalid {}: '{}'. Must be one of: {}",
                field,
                value,
                allowed.join(", ")
            ),
        )
    }

    /// A value did not have the expected syntax.
    pub fn invalid_format(field: &str, expected: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::InvalidFormat,
            format!("{} must be {}", field, expected),
        )
    }

    /// A well-formed date that does not exist on the calendar.
    pub fn invalid_date(field: &str, value: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::InvalidDate,
            format!("{} '{}' is not a valid calendar date", field, value),
        )
    }

    /// An identifier or count that must be positive was not.
    pub fn not_positive(field: &str, value: i64) -> Self {
        Self::new(
            field,
            ValidationErrorKind::NotPositive,
            format!("{} must be a positive integer (got {})", field, value),
        )
    }

    /// An update request touched no fields.
    pub fn no_changes(fields: &[&str]) -> Self {
        Self::new(
            "arguments",
            ValidationErrorKind::NoChanges,
            format!(
                "At least one field must be provided for update: {}",
                fields.join(", ")
            ),
        )
    }

    /// The payload could not be decoded into the tool's request shape.
    pub fn malformed(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            field,
            ValidationErrorKind::Malformed,
            format!("Invalid arguments: {}", reason),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Required field absent.
    Missing,
    /// Empty or whitespace-only string.
    Empty,
    /// String longer than the field allows.
    TooLong,
    /// Value not in the enumerated set.
    InvalidChoice,
    /// Value does not have the required syntax.
    InvalidFormat,
    /// Syntactically valid date that does not exist.
    InvalidDate,
    /// Identifier or limit is zero or negative.
    NotPositive,
    /// Update request without any field to change.
    NoChanges,
    /// Payload has the wrong shape (unknown field, wrong JSON type).
    Malformed,
}

// =============================================================================
// FIELD VALIDATORS
// =============================================================================

/// Validate a required string: trims, rejects empty and over-long values.
pub fn required_text(field: &str, value: Option<&str>, max: usize) -> Result<String, ValidationError> {
    let Some(raw) = value else {
        return Err(ValidationError::missing(field));
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty(field));
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Validate an optional string: trims; empty or whitespace-only becomes `None`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    check_length(field, trimmed, max)?;
    Ok(Some(trimmed.to_string()))
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::too_long(field, max, len));
    }
    Ok(())
}

/// Validate an enumerated value (exact, case-sensitive).
pub fn choice<T: Choice>(field: &str, value: &str) -> Result<T, ValidationError> {
    T::from_wire(value).ok_or_else(|| ValidationError::invalid_choice(field, value, &T::allowed()))
}

/// Validate an optional enumerated value, substituting `T::default()` when absent.
pub fn choice_or_default<T: Choice + Default>(
    field: &str,
    value: Option<&str>,
) -> Result<T, ValidationError> {
    match value {
        Some(raw) => choice(field, raw),
        None => Ok(T::default()),
    }
}

/// Validate a `YYYY-MM-DD` calendar date.
pub fn due_date(field: &str, value: &str) -> Result<DueDate, ValidationError> {
    DueDate::parse(value).map_err(|e| match e {
        DueDateError::Format => {
            ValidationError::invalid_format(field, "an ISO 8601 calendar date (YYYY-MM-DD)")
        }
        DueDateError::Calendar => ValidationError::invalid_date(field, value),
    })
}

/// Validate an identifier reference: present and positive.
pub fn positive_id(field: &str, value: Option<i64>) -> Result<i64, ValidationError> {
    match value {
        None => Err(ValidationError::missing(field)),
        Some(id) if id <= 0 => Err(ValidationError::not_positive(field, id)),
        Some(id) => Ok(id),
    }
}

// =============================================================================
// TESTS
// =============================================================================
