//! Sorting and filtering of task lists.
//!
//! All functions return new vectors; the input slice is never reordered.

use std::collections::HashSet;

use crate::config::SortKey;

use super::{Priority, Task, priority_rank};

/// Priority part of a [`TaskFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    /// No priority filtering
    #[default]
    Any,
    /// Only tasks with exactly this priority; `None` selects unprioritized tasks
    Exactly(Option<Priority>),
}

impl PriorityFilter {
    fn matches(&self, task: &Task) -> bool {
        match self {
            PriorityFilter::Any => true,
            PriorityFilter::Exactly(p) => task.matches_priority(*p),
        }
    }
}

/// Active filters of the task panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub priority: PriorityFilter,
    pub category: Option<String>,
    pub show_done: bool,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self {
            priority: PriorityFilter::Any,
            category: None,
            show_done: true,
        }
    }
}

impl TaskFilter {
    pub fn is_active(&self) -> bool {
        self.priority != PriorityFilter::Any || self.category.is_some()
    }

    pub fn clear(&mut self) {
        self.priority = PriorityFilter::Any;
        self.category = None;
    }
}

/// Stable sort by the given key.
pub fn sort_tasks(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    match key {
        SortKey::Created => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::Priority => sorted.sort_by(|a, b| {
            priority_rank(a.priority)
                .cmp(&priority_rank(b.priority))
                .then_with(|| a.created_at.cmp(&b.created_at))
        }),
        // None sorts after every date
        SortKey::DueDate => {
            sorted.sort_by_key(|t| (t.due_date.is_none(), t.due_date));
        }
        SortKey::Text => sorted.sort_by_cached_key(|t| t.text.to_lowercase()),
    }
    sorted
}

/// Apply done-exclusion, then priority, then category.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| filter.show_done || !t.done)
        .filter(|t| filter.priority.matches(t))
        .filter(|t| match &filter.category {
            Some(category) => t.has_category(category),
            None => true,
        })
        .cloned()
        .collect()
}

/// One more than the largest id in use, or the lowest free id once the
/// largest is `u64::MAX`.
pub fn next_task_id(tasks: &[Task]) -> u64 {
    let max = tasks.iter().map(|t| t.id).max().unwrap_or(0);
    max.checked_add(1).unwrap_or_else(|| {
        let used: HashSet<u64> = tasks.iter().map(|t| t.id).collect();
        (1..=u64::MAX).find(|id| !used.contains(id)).unwrap_or(0)
    })
}
