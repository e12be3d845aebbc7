//! Tasks panel - the task list with filters, sorting and persistence.
//!
//! Every mutation is applied in memory first and then written to the task
//! file. A failed write leaves the in-memory change in place and returns
//! the error so the caller can report it.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use ratatui::{
    prelude::*,
    widgets::{List, ListItem, ListState, Paragraph},
};

use super::panel_block;
use crate::config::{SortKey, TasksConfig, UiConfig};
use crate::export::{ExportLayout, ExportOptions, export_to_file};
use crate::models::query::{PriorityFilter, TaskFilter, filter_tasks, next_task_id, sort_tasks};
use crate::models::{DueIndicator, Priority, Task, TaskInput};
use crate::storage::TaskStore;
use crate::tui::keymap::{Action, Keymap};
use crate::{Error, Result};

pub struct TasksPanel {
    store: TaskStore,
    tasks: Vec<Task>,
    config: TasksConfig,
    filter: TaskFilter,
    sort: SortKey,
    selected: usize,
    list_state: ListState,
}

impl TasksPanel {
    /// Load tasks from `store`, starting from the configured sort and filters.
    pub fn new(store: TaskStore, config: TasksConfig) -> Self {
        let tasks = store.load();
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            store,
            tasks,
            filter: initial_filter(&config),
            sort: config.default_sort,
            config,
            selected: 0,
            list_state,
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Apply a reloaded configuration. Sort and filters return to the new
    /// defaults; the task file is re-read when its path changed.
    pub fn reconfigure(&mut self, store: TaskStore, config: TasksConfig) {
        let path_changed = store.path() != self.store.path();
        self.store = store;
        self.filter = initial_filter(&config);
        self.sort = config.default_sort;
        self.config = config;
        if path_changed {
            self.reload();
        } else {
            self.clamp_selection();
        }
    }

    /// Re-read the task file.
    pub fn reload(&mut self) {
        self.tasks = self.store.load();
        self.clamp_selection();
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> &TaskFilter {
        &self.filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Tasks in display order after filtering and sorting.
    pub fn visible(&self) -> Vec<Task> {
        sort_tasks(&filter_tasks(&self.tasks, &self.filter), self.sort)
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.visible().into_iter().nth(self.selected)
    }

    // ==================== Navigation ====================

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
        self.list_state.select(Some(self.selected));
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.list_state.select(Some(self.selected));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible().len().saturating_sub(1);
        self.list_state.select(Some(self.selected));
    }

    fn select_id(&mut self, id: u64) {
        if let Some(index) = self.visible().iter().position(|t| t.id == id) {
            self.selected = index;
            self.list_state.select(Some(index));
        } else {
            self.clamp_selection();
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        self.list_state.select(Some(self.selected));
    }

    // ==================== Mutations ====================

    /// Create a task. Invalid input is rejected before anything changes.
    pub fn add(&mut self, input: &TaskInput) -> Result<Task> {
        let task = Task::new(next_task_id(&self.tasks), input)?;
        tracing::info!(id = task.id, "Task added");
        self.tasks.push(task.clone());
        self.select_id(task.id);
        self.save()?;
        Ok(task)
    }

    /// Replace the editable fields of task `id`.
    pub fn edit(&mut self, id: u64, input: &TaskInput) -> Result<()> {
        let task = self.find_mut(id)?;
        task.apply(input)?;
        tracing::info!(id, "Task edited");
        self.select_id(id);
        self.save()
    }

    /// Flip the done flag of the selected task. Returns the new state.
    pub fn toggle_selected(&mut self) -> Result<Option<bool>> {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return Ok(None);
        };
        let task = self.find_mut(id)?;
        task.toggle_done();
        let done = task.done;
        self.clamp_selection();
        self.save()?;
        Ok(Some(done))
    }

    /// Remove the selected task. Returns its text.
    pub fn delete_selected(&mut self) -> Result<Option<String>> {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return Ok(None);
        };
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let removed = self.tasks.remove(index);
        tracing::info!(id, "Task deleted");
        self.clamp_selection();
        self.save()?;
        Ok(Some(removed.text))
    }

    pub fn set_priority(&mut self, id: u64, priority: Option<Priority>) -> Result<()> {
        self.find_mut(id)?.set_priority(priority);
        self.select_id(id);
        self.save()
    }

    fn find_mut(&mut self, id: u64) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(format!("task {}", id)))
    }

    fn save(&self) -> Result<()> {
        self.store.save(&self.tasks)
    }

    // ==================== View state ====================

    /// Show or hide completed tasks. Returns whether they are now shown.
    pub fn toggle_show_done(&mut self) -> bool {
        self.filter.show_done = !self.filter.show_done;
        self.clamp_selection();
        self.filter.show_done
    }

    pub fn cycle_sort(&mut self) -> SortKey {
        self.sort = self.sort.next();
        self.select_first();
        self.sort
    }

    pub fn set_priority_filter(&mut self, priority: PriorityFilter) {
        self.filter.priority = priority;
        self.select_first();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.select_first();
    }

    /// Write all tasks to `dir` in the configured export format.
    pub fn export(&self, dir: &Path, now: NaiveDateTime) -> Result<PathBuf> {
        let layout = ExportLayout::from(self.config.export_format);
        let options = ExportOptions::new(now, self.config.due_soon_days);
        export_to_file(&self.tasks, dir, layout, &options)
    }

    // ==================== Rendering ====================

    fn title(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" Tasks ({}) ", self.tasks.len()),
            Style::default().fg(Color::Magenta).bold(),
        )];
        let mut details = vec![format!("sort: {}", self.sort.label())];
        if let PriorityFilter::Exactly(p) = self.filter.priority {
            details.push(format!(
                "priority: {}",
                p.map(|p| p.as_str()).unwrap_or("none")
            ));
        }
        if let Some(category) = &self.filter.category {
            details.push(format!("#{}", category));
        }
        if !self.filter.show_done {
            details.push("hiding done".to_string());
        }
        spans.push(Span::styled(
            format!("[{}] ", details.join(" | ")),
            Style::default().fg(Color::DarkGray),
        ));
        Line::from(spans)
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        ui: &UiConfig,
        keymap: &Keymap,
        today: NaiveDate,
    ) {
        let block = panel_block(self.title(), ui);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let visible = self.visible();
        if visible.is_empty() {
            let dim = Style::default().fg(Color::DarkGray);
            let message = if self.tasks.is_empty() {
                "No tasks yet."
            } else {
                "No tasks match the current filters."
            };
            let lines = vec![
                Line::from(Span::styled(message, dim)),
                Line::default(),
                Line::from(Span::styled(
                    format!("Press '{}' to add a task", keymap.label(Action::AddTask)),
                    dim,
                )),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        }

        let max_rows = u16::try_from(self.config.max_visible_tasks.max(1)).unwrap_or(u16::MAX);
        let list_area = Rect {
            height: inner.height.min(max_rows),
            ..inner
        };

        let items: Vec<ListItem> = visible
            .iter()
            .map(|task| ListItem::new(task_line(task, &self.config, today)))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, list_area, &mut self.list_state);
    }
}

fn initial_filter(config: &TasksConfig) -> TaskFilter {
    TaskFilter {
        priority: match config.default_priority_filter {
            Some(p) => PriorityFilter::Exactly(Some(p)),
            None => PriorityFilter::Any,
        },
        category: config.default_category_filter.clone(),
        show_done: config.show_completed,
    }
}

/// Cut `text` to `max` characters, ending in `...` when shortened.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut cut: String = text.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

fn due_color(indicator: DueIndicator) -> Color {
    match indicator {
        DueIndicator::Overdue => Color::Red,
        DueIndicator::DueSoon => Color::Yellow,
        DueIndicator::Future => Color::DarkGray,
    }
}

/// One row of the task list.
pub fn task_line(task: &Task, config: &TasksConfig, today: NaiveDate) -> Line<'static> {
    let mut spans = Vec::new();
    if task.done {
        spans.push(Span::styled("[✓] ", Style::default().fg(Color::Green)));
    } else {
        spans.push(Span::raw("[ ] "));
    }

    if config.show_priority_emoji && task.priority.is_some() {
        spans.push(Span::raw(format!("{} ", task.priority_emoji())));
    }

    let limit = usize::try_from(config.truncate_length).unwrap_or(0).max(1);
    let text_style = if task.done {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    spans.push(Span::styled(truncate(&task.text, limit), text_style));

    if config.show_due_dates {
        if let (Some(date), Some(indicator)) =
            (task.due_date, task.due_indicator(today, config.due_soon_days))
        {
            spans.push(Span::styled(
                format!(" {} {}", indicator.glyph(), date.format("%Y-%m-%d")),
                Style::default().fg(due_color(indicator)),
            ));
        }
    }

    if config.show_categories {
        for category in &task.categories {
            spans.push(Span::styled(
                format!(" #{}", category),
                Style::default().fg(Color::Blue),
            ));
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::views::line_text;
    use tempfile::TempDir;

    fn panel(dir: &TempDir) -> TasksPanel {
        let store = TaskStore::new(dir.path().join("tasks.json"));
        TasksPanel::new(store, TasksConfig::default())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ==================== Mutations ====================

    #[test]
    fn test_add_persists_and_selects() {
        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        tasks.add(&TaskInput::new("First")).unwrap();
        let second = tasks
            .add(&TaskInput::new("Second").with_priority("high"))
            .unwrap();

        assert_eq!(second.id, 2);
        assert_eq!(tasks.selected_task().map(|t| t.id), Some(2));

        let reloaded = panel(&dir);
        assert_eq!(reloaded.tasks().len(), 2);
        assert_eq!(reloaded.tasks()[1].priority, Some(Priority::High));
    }

    #[test]
    fn test_add_rejects_invalid_input_without_change() {
        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        let result = tasks.add(&TaskInput::new("Bad").with_due_date("someday"));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(tasks.tasks().is_empty());
        assert!(!dir.path().join("tasks.json").exists());
    }

    #[test]
    fn test_edit_keeps_identity() {
        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        let task = tasks.add(&TaskInput::new("Draft")).unwrap();
        tasks
            .edit(task.id, &TaskInput::new("Final").with_categories("work, docs"))
            .unwrap();

        let edited = &tasks.tasks()[0];
        assert_eq!(edited.id, task.id);
        assert_eq!(edited.text, "Final");
        assert_eq!(edited.categories, vec!["work", "docs"]);
        assert_eq!(edited.created_at, task.created_at);

        assert!(matches!(
            tasks.edit(99, &TaskInput::new("x")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_toggle_and_delete_selected() {
        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        assert_eq!(tasks.toggle_selected().unwrap(), None);

        tasks.add(&TaskInput::new("One")).unwrap();
        tasks.add(&TaskInput::new("Two")).unwrap();
        tasks.select_first();

        assert_eq!(tasks.toggle_selected().unwrap(), Some(true));
        assert!(tasks.tasks()[0].done);

        assert_eq!(tasks.delete_selected().unwrap(), Some("One".to_string()));
        assert_eq!(tasks.tasks().len(), 1);
        assert_eq!(tasks.selected_task().map(|t| t.text), Some("Two".to_string()));
    }

    #[test]
    fn test_toggle_targets_selected_task_with_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("tasks.json"),
            r#"[{"id": 1, "text": "a", "done": false}, {"id": 1, "text": "b", "done": false}]"#,
        )
        .unwrap();
        let mut tasks = panel(&dir);
        tasks.select_last();
        assert_eq!(tasks.selected_task().map(|t| t.text), Some("b".to_string()));

        assert_eq!(tasks.toggle_selected().unwrap(), Some(true));
        let done: Vec<(&str, bool)> = tasks
            .tasks()
            .iter()
            .map(|t| (t.text.as_str(), t.done))
            .collect();
        assert_eq!(done, vec![("a", false), ("b", true)]);
    }

    #[test]
    fn test_save_failure_keeps_change() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let store = TaskStore::new(blocker.join("tasks.json"));
        let mut tasks = TasksPanel::new(store, TasksConfig::default());

        assert!(tasks.add(&TaskInput::new("Kept")).is_err());
        assert_eq!(tasks.tasks().len(), 1);
    }

    #[test]
    fn test_set_priority() {
        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        let task = tasks.add(&TaskInput::new("Ship")).unwrap();
        tasks.set_priority(task.id, Some(Priority::Low)).unwrap();
        assert_eq!(tasks.tasks()[0].priority, Some(Priority::Low));
        tasks.set_priority(task.id, None).unwrap();
        assert_eq!(tasks.tasks()[0].priority, None);
    }

    // ==================== View state ====================

    #[test]
    fn test_filters_and_sort() {
        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        tasks.add(&TaskInput::new("b low").with_priority("low")).unwrap();
        tasks.add(&TaskInput::new("a high").with_priority("high")).unwrap();
        tasks.add(&TaskInput::new("c none")).unwrap();

        tasks.set_priority_filter(PriorityFilter::Exactly(Some(Priority::High)));
        assert_eq!(tasks.visible().len(), 1);
        assert!(tasks.filter().is_active());

        tasks.set_priority_filter(PriorityFilter::Exactly(None));
        assert_eq!(tasks.visible()[0].text, "c none");

        tasks.clear_filters();
        assert_eq!(tasks.visible().len(), 3);

        assert_eq!(tasks.cycle_sort(), SortKey::Priority);
        let order: Vec<String> = tasks.visible().into_iter().map(|t| t.text).collect();
        assert_eq!(order, vec!["a high", "b low", "c none"]);
    }

    #[test]
    fn test_toggle_show_done_hides_completed() {
        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        tasks.add(&TaskInput::new("Done")).unwrap();
        tasks.add(&TaskInput::new("Open")).unwrap();
        tasks.select_first();
        tasks.toggle_selected().unwrap();

        assert!(!tasks.toggle_show_done());
        assert_eq!(tasks.visible().len(), 1);
        assert_eq!(tasks.selected_task().map(|t| t.text), Some("Open".to_string()));
        assert!(tasks.toggle_show_done());
    }

    #[test]
    fn test_initial_filter_from_config() {
        let config = TasksConfig {
            show_completed: false,
            default_priority_filter: Some(Priority::Medium),
            default_category_filter: Some("work".to_string()),
            default_sort: SortKey::Text,
            ..Default::default()
        };
        let filter = initial_filter(&config);
        assert_eq!(filter.priority, PriorityFilter::Exactly(Some(Priority::Medium)));
        assert_eq!(filter.category.as_deref(), Some("work"));
        assert!(!filter.show_done);
    }

    #[test]
    fn test_export_uses_configured_format() {
        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        tasks.add(&TaskInput::new("Write docs")).unwrap();

        let now = date("2026-03-01").and_hms_opt(9, 30, 0).unwrap();
        let path = tasks.export(dir.path(), now).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("devdash_tasks_grouped_20260301_093000.md")
        );
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Write docs"));
    }

    // ==================== Rendering ====================

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long task name", 10), "a long ...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_task_line() {
        let mut task = Task::new(
            1,
            &TaskInput::new("Review PR")
                .with_priority("high")
                .with_due_date("2026-03-02")
                .with_categories("work"),
        )
        .unwrap();
        let config = TasksConfig::default();
        let today = date("2026-03-01");

        assert_eq!(
            line_text(&task_line(&task, &config, today)),
            "[ ] 🔴 Review PR 📅 2026-03-02 #work"
        );

        task.toggle_done();
        let hidden = TasksConfig {
            show_categories: false,
            show_due_dates: false,
            show_priority_emoji: false,
            ..Default::default()
        };
        assert_eq!(line_text(&task_line(&task, &hidden, today)), "[✓] Review PR");
    }

    #[test]
    fn test_render_empty_and_full() {
        use crate::config::KeybindingsConfig;
        use ratatui::{Terminal, backend::TestBackend};

        let dir = TempDir::new().unwrap();
        let mut tasks = panel(&dir);
        let keymap = Keymap::from_config(&KeybindingsConfig::default());
        let ui = UiConfig::default();
        let today = date("2026-03-01");
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();

        terminal
            .draw(|f| tasks.render(f, f.area(), &ui, &keymap, today))
            .unwrap();

        tasks.add(&TaskInput::new("Visible task")).unwrap();
        terminal
            .draw(|f| tasks.render(f, f.area(), &ui, &keymap, today))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Visible task"));
    }
}
