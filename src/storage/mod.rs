//! Task persistence.
//!
//! Tasks live in a single pretty-printed JSON array. The whole file is
//! rewritten on every save. Loading is forgiving: a missing or malformed
//! file yields an empty list, and damaged records are repaired rather than
//! dropped so the next save does not lose them. Records written by older
//! versions (only `id`, `text`, `done`) are migrated on load and saved back
//! in the current shape.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::Result;
use crate::models::query::next_task_id;
use crate::models::{Priority, Task, is_valid_task_record, migrate_legacy, parse_due_date};

/// Text given to stored records that have none.
pub const UNTITLED_TASK: &str = "Untitled Task";

/// JSON file holding the task list.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve a configured `file_path` against `base` when it is relative.
    pub fn resolve(file_path: &str, base: &Path) -> Self {
        let path = Path::new(file_path);
        if path.is_absolute() {
            Self::new(path)
        } else {
            Self::new(base.join(path))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all valid tasks. Never fails.
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read task file");
                return Vec::new();
            }
        };
        if content.trim().is_empty() {
            return Vec::new();
        }

        let records = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "Task file is not a JSON array");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Malformed task file");
                return Vec::new();
            }
        };

        let mut loaded = Vec::with_capacity(records.len());
        let mut migrated = 0;
        for record in &records {
            let Some(obj) = record.as_object() else {
                tracing::warn!(record = %record, "Skipping non-object task record");
                continue;
            };
            let mut obj = obj.clone();
            if !is_valid_task_record(record) {
                tracing::warn!(record = %record, "Backfilling task record without id/text/done");
                obj.entry("text")
                    .or_insert_with(|| Value::from(UNTITLED_TASK));
            }
            let has_id = obj.get("id").and_then(Value::as_u64).is_some();

            let mut upgraded = migrate_legacy(&obj);
            if upgraded.len() != obj.len() {
                migrated += 1;
            }
            clear_invalid_fields(&mut upgraded);
            match Task::from_value(&Value::Object(upgraded)) {
                Ok(task) => loaded.push((task, has_id)),
                Err(e) => tracing::warn!(record = %record, error = %e, "Skipping invalid task"),
            }
        }

        if migrated > 0 {
            tracing::info!(count = migrated, "Migrated legacy task records");
        }
        let tasks = assign_unique_ids(loaded);
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "Loaded tasks");
        tasks
    }

    /// Overwrite the file with `tasks`, creating parent directories.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "Saved tasks");
        Ok(())
    }
}

/// Null out a priority or due date that would make the record unloadable.
fn clear_invalid_fields(record: &mut Map<String, Value>) {
    let priority_ok = match record.get("priority") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => Priority::parse(s).is_some(),
        Some(_) => false,
    };
    if !priority_ok {
        tracing::warn!(priority = ?record.get("priority"), "Clearing invalid task priority");
        record.insert("priority".to_string(), Value::Null);
    }

    let due_ok = match record.get("due_date") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => parse_due_date(s).is_ok(),
        Some(_) => false,
    };
    if !due_ok {
        tracing::warn!(due_date = ?record.get("due_date"), "Clearing invalid task due date");
        record.insert("due_date".to_string(), Value::Null);
    }
}

/// Keep the first occurrence of each stored id; records without an integer
/// id and later duplicates get fresh ids.
fn assign_unique_ids(loaded: Vec<(Task, bool)>) -> Vec<Task> {
    let mut used = HashSet::new();
    let mut reassign = Vec::new();
    for (index, (task, has_id)) in loaded.iter().enumerate() {
        if !*has_id || !used.insert(task.id) {
            reassign.push(index);
        }
    }

    let mut tasks: Vec<Task> = loaded.into_iter().map(|(task, _)| task).collect();
    for index in reassign {
        let id = next_task_id(&tasks);
        tracing::warn!(old = tasks[index].id, new = id, "Assigning fresh task id");
        tasks[index].id = id;
    }
    tasks
}
