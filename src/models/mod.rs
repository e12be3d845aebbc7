//! Data models for devdash tasks.
//!
//! This module defines:
//! - `Task` - A to-do item with optional priority, due date and categories
//! - `Priority` - High / medium / low
//! - `TaskInput` - Unvalidated user input for creating or editing a task
//! - Legacy migration for task files written before priorities existed
//!
//! Date predicates take `today` as a parameter so they stay pure.

pub mod query;

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Format used for `created_at` timestamps.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parse from the stored spelling (`high`, `medium`, `low`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort rank: high, medium, low, then no priority.
pub fn priority_rank(priority: Option<Priority>) -> u8 {
    match priority {
        Some(Priority::High) => 0,
        Some(Priority::Medium) => 1,
        Some(Priority::Low) => 2,
        None => 3,
    }
}

/// Emoji for an optional priority (empty when unset).
pub fn priority_emoji(priority: Option<Priority>) -> &'static str {
    priority.map(|p| p.emoji()).unwrap_or("")
}

/// Due-date status shown next to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueIndicator {
    Overdue,
    DueSoon,
    Future,
}

impl DueIndicator {
    pub fn glyph(&self) -> &'static str {
        match self {
            DueIndicator::Overdue => "⚠️",
            DueIndicator::DueSoon => "📅",
            DueIndicator::Future => "📆",
        }
    }
}

/// A task stored in the task file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// Unique within a task file
    pub id: u64,
    pub text: String,
    pub done: bool,
    pub priority: Option<Priority>,
    /// Serialized as `YYYY-MM-DD`
    pub due_date: Option<NaiveDate>,
    /// Case preserved, compared case-insensitively
    pub categories: Vec<String>,
    /// ISO-8601 local datetime
    pub created_at: String,
}

/// User-entered task fields, validated by [`Task::new`] and [`Task::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub text: String,
    /// `high`, `medium`, `low`; empty or `None` clears the priority
    pub priority: Option<String>,
    /// ISO date; empty or `None` clears the due date
    pub due_date: Option<String>,
    pub categories: Vec<String>,
}

impl TaskInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn with_categories(mut self, categories: &str) -> Self {
        self.categories = parse_categories(categories);
        self
    }
}

/// Fields of a `TaskInput` after validation.
struct ValidInput {
    text: String,
    priority: Option<Priority>,
    due_date: Option<NaiveDate>,
    categories: Vec<String>,
}

impl TaskInput {
    fn validate(&self) -> Result<ValidInput> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("Task text cannot be empty".to_string()));
        }

        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Priority::parse(raw)
                    .ok_or_else(|| Error::InvalidInput(format!("Invalid priority: {}", raw)))?,
            ),
        };

        let due_date = match self.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_due_date(raw)?),
        };

        Ok(ValidInput {
            text: text.to_string(),
            priority,
            due_date,
            categories: self
                .categories
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        })
    }
}

impl Task {
    /// Strict constructor for a new task from user input.
    pub fn new(id: u64, input: &TaskInput) -> Result<Self> {
        let valid = input.validate()?;
        Ok(Self {
            id,
            text: valid.text,
            done: false,
            priority: valid.priority,
            due_date: valid.due_date,
            categories: valid.categories,
            created_at: now_timestamp(),
        })
    }

    /// Replace the editable fields. Nothing changes if validation fails.
    pub fn apply(&mut self, input: &TaskInput) -> Result<()> {
        let valid = input.validate()?;
        self.text = valid.text;
        self.priority = valid.priority;
        self.due_date = valid.due_date;
        self.categories = valid.categories;
        Ok(())
    }

    /// Tolerant constructor for stored records.
    ///
    /// Absent fields take their defaults (`created_at` becomes now), but a
    /// present priority or due date must still be valid.
    pub fn from_value(raw: &Value) -> Result<Self> {
        let empty = Map::new();
        let obj = raw.as_object().unwrap_or(&empty);

        let priority = match obj.get("priority") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(
                Priority::parse(s)
                    .ok_or_else(|| Error::InvalidInput(format!("Invalid priority: {}", s)))?,
            ),
            Some(other) => {
                return Err(Error::InvalidInput(format!("Invalid priority: {}", other)));
            }
        };

        let due_date = match obj.get("due_date") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(parse_due_date(s)?),
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "Invalid due_date format: {}",
                    other
                )));
            }
        };

        let categories = match obj.get("categories") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|c| c.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            id: obj.get("id").and_then(Value::as_u64).unwrap_or(0),
            text: obj
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            done: obj.get("done").and_then(Value::as_bool).unwrap_or(false),
            priority,
            due_date,
            categories,
            created_at: obj
                .get("created_at")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(now_timestamp),
        })
    }

    pub fn toggle_done(&mut self) {
        self.done = !self.done;
    }

    pub fn set_priority(&mut self, priority: Option<Priority>) {
        self.priority = priority;
    }

    /// Has a due date before `today` and is not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) if !self.done => due < today,
            _ => false,
        }
    }

    /// Due within `window_days` of `today` (inclusive), not overdue, not done.
    pub fn is_due_soon(&self, today: NaiveDate, window_days: i64) -> bool {
        match self.due_date {
            Some(due) if !self.done && due >= today => (due - today).num_days() <= window_days,
            _ => false,
        }
    }

    /// Case-insensitive category membership.
    pub fn has_category(&self, category: &str) -> bool {
        let wanted = category.to_lowercase();
        self.categories.iter().any(|c| c.to_lowercase() == wanted)
    }

    /// Exact priority match; `None` matches tasks without a priority.
    pub fn matches_priority(&self, priority: Option<Priority>) -> bool {
        self.priority == priority
    }

    pub fn priority_emoji(&self) -> &'static str {
        priority_emoji(self.priority)
    }

    /// Indicator for a dated task; `Future` covers every dated task that is
    /// neither overdue nor due soon.
    pub fn due_indicator(&self, today: NaiveDate, window_days: i64) -> Option<DueIndicator> {
        self.due_date?;
        if self.is_overdue(today) {
            Some(DueIndicator::Overdue)
        } else if self.is_due_soon(today, window_days) {
            Some(DueIndicator::DueSoon)
        } else {
            Some(DueIndicator::Future)
        }
    }
}

/// Current local time in the `created_at` format.
pub fn now_timestamp() -> String {
    Local::now().naive_local().format(CREATED_AT_FORMAT).to_string()
}

/// Today's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an ISO date, also accepting an ISO datetime (its date is kept).
pub fn parse_due_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }
    Err(Error::InvalidInput(format!("Invalid due_date format: {}", s)))
}

/// Split a comma-separated category string, dropping blanks.
pub fn parse_categories(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Upgrade a stored record to the current shape.
///
/// Legacy records only carry `id`, `text` and `done`. Missing keys are
/// added (`created_at` = now); existing values are never changed, so the
/// migration is idempotent.
pub fn migrate_legacy(record: &Map<String, Value>) -> Map<String, Value> {
    let mut migrated = record.clone();
    migrated.entry("id").or_insert(Value::from(0));
    migrated.entry("text").or_insert(Value::from(""));
    migrated.entry("done").or_insert(Value::Bool(false));
    migrated.entry("priority").or_insert(Value::Null);
    migrated.entry("due_date").or_insert(Value::Null);
    migrated
        .entry("categories")
        .or_insert_with(|| Value::Array(Vec::new()));
    match migrated.get("created_at") {
        None | Some(Value::Null) => {
            migrated.insert("created_at".to_string(), Value::from(now_timestamp()));
        }
        Some(_) => {}
    }
    migrated
}

/// Migrate every object in a list; non-objects are dropped.
pub fn migrate_task_list(records: &[Value]) -> Vec<Map<String, Value>> {
    records
        .iter()
        .filter_map(Value::as_object)
        .map(migrate_legacy)
        .collect()
}

/// Whether a record carries the fields every task file version has.
pub fn is_valid_task_record(record: &Value) -> bool {
    record
        .as_object()
        .map(|obj| ["id", "text", "done"].iter().all(|k| obj.contains_key(*k)))
        .unwrap_or(false)
}
