//! Ticket and todo entities.
//!
//! Enumerated columns are closed Rust enums. The wire and storage form is the
//! kebab-case string (`in-progress`), matched case-sensitively.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Maximum length of `Ticket::project_id`, in characters.
pub const PROJECT_ID_MAX_LEN: usize = 128;
/// Maximum length of `Ticket::title`, in characters.
pub const TITLE_MAX_LEN: usize = 200;
/// Maximum length of `Ticket::description`, in characters.
pub const TICKET_DESCRIPTION_MAX_LEN: usize = 4000;
/// Maximum length of `Todo::description`, in characters.
pub const TODO_DESCRIPTION_MAX_LEN: usize = 1000;
/// Maximum length of a table name accepted by the `schema` tool.
pub const TABLE_NAME_MAX_LEN: usize = 128;

/// A closed set of string values for one column.
pub trait Choice: Copy + Sized + 'static {
    /// Every allowed value, in documentation order.
    const ALL: &'static [Self];

    /// The canonical wire/storage form.
    fn as_str(self) -> &'static str;

    /// Exact, case-sensitive lookup.
    fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == value)
    }

    /// Allowed values as strings, for error messages and JSON schemas.
    fn allowed() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.as_str()).collect()
    }
}

/// Error returned when a string is not one of a [`Choice`]'s values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice(pub String);

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownChoice {}

/// Ticket workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Blocked,
    Closed,
}

impl Choice for TicketStatus {
    const ALL: &'static [Self] = &[Self::Open, Self::InProgress, Self::Blocked, Self::Closed];

    fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
        }
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Choice for TicketPriority {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Urgent];

    fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// Todo workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl Choice for TodoStatus {
    const ALL: &'static [Self] = &[Self::Pending, Self::InProgress, Self::Done];

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

macro_rules! impl_choice_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = UnknownChoice;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    <$ty as Choice>::from_wire(s).ok_or_else(|| UnknownChoice(s.to_string()))
                }
            }
        )*
    };
}

impl_choice_str!(TicketStatus, TicketPriority, TodoStatus);

static DUE_DATE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("due date pattern is valid")
});

/// Why a string is not a valid [`DueDate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDateError {
    /// Not in `YYYY-MM-DD` form.
    Format,
    /// Well-formed but not a real calendar date (e.g. `2024-02-30`).
    Calendar,
}

impl fmt::Display for DueDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDateError::Format => write!(f, "expected an ISO 8601 calendar date (YYYY-MM-DD)"),
            DueDateError::Calendar => write!(f, "not a valid calendar date"),
        }
    }
}

impl std::error::Error for DueDateError {}

/// A calendar date in strict `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(NaiveDate);

impl DueDate {
    /// Parse a strict `YYYY-MM-DD` string.
    pub fn parse(value: &str) -> Result<Self, DueDateError> {
        if !DUE_DATE_FORMAT.is_match(value) {
            return Err(DueDateError::Format);
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(DueDate)
            .map_err(|_| DueDateError::Calendar)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DueDate {
    type Err = DueDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DueDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A top-level unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A sub-task owned by exactly one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub ticket_id: i64,
    pub description: String,
    pub status: TodoStatus,
    pub due_date: Option<DueDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
