//! Markdown export of task lists.
//!
//! Output depends only on the tasks and [`ExportOptions`]; the export
//! timestamp is passed in rather than read from the clock.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::Result;
use crate::config::ExportFormat;
use crate::models::{Task, priority_rank};

/// Maximum number of category tags shown per line in the flat layout.
pub const FLAT_EXPORT_TAG_LIMIT: usize = 5;

pub const DEFAULT_EXPORT_TITLE: &str = "DevDash Tasks";

/// Grouping used when rendering tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportLayout {
    /// Single list sorted by completion and priority
    Flat,
    /// Sections per priority
    Grouped,
    /// Sections per category
    Category,
}

impl ExportLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportLayout::Flat => "flat",
            ExportLayout::Grouped => "grouped",
            ExportLayout::Category => "category",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "flat" => Some(ExportLayout::Flat),
            "grouped" => Some(ExportLayout::Grouped),
            "category" => Some(ExportLayout::Category),
            _ => None,
        }
    }
}

impl fmt::Display for ExportLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ExportFormat> for ExportLayout {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Grouped => ExportLayout::Grouped,
            ExportFormat::Simple => ExportLayout::Flat,
            ExportFormat::Detailed => ExportLayout::Category,
        }
    }
}

/// Rendering inputs besides the tasks themselves.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub title: String,
    pub exported_at: NaiveDateTime,
    /// Reference date for due-date glyphs
    pub today: NaiveDate,
    pub due_soon_days: i64,
}

impl ExportOptions {
    pub fn new(exported_at: NaiveDateTime, due_soon_days: i64) -> Self {
        Self {
            title: DEFAULT_EXPORT_TITLE.to_string(),
            exported_at,
            today: exported_at.date(),
            due_soon_days,
        }
    }
}

/// Render tasks to Markdown.
pub fn export_markdown(tasks: &[Task], layout: ExportLayout, options: &ExportOptions) -> String {
    let mut lines = header(tasks, options);
    match layout {
        ExportLayout::Flat => render_flat(tasks, options, &mut lines),
        ExportLayout::Grouped => render_grouped(tasks, options, &mut lines),
        ExportLayout::Category => render_category(tasks, options, &mut lines),
    }
    lines.join("\n")
}

fn header(tasks: &[Task], options: &ExportOptions) -> Vec<String> {
    let completed = tasks.iter().filter(|t| t.done).count();
    vec![
        format!("# {}", options.title),
        String::new(),
        format!("*Exported: {}*", options.exported_at.format("%Y-%m-%d %H:%M")),
        String::new(),
        format!("Total tasks: {} | Completed: {}", tasks.len(), completed),
        String::new(),
        "---".to_string(),
        String::new(),
    ]
}

fn checkbox(task: &Task) -> &'static str {
    if task.done { "[x]" } else { "[ ]" }
}

/// ` <glyph> *<prefix><date>*` or empty.
fn due_text(task: &Task, options: &ExportOptions, prefix: &str) -> String {
    match (task.due_date, task.due_indicator(options.today, options.due_soon_days)) {
        (Some(due), Some(indicator)) => format!(
            " {} *{}{}*",
            indicator.glyph(),
            prefix,
            due.format("%Y-%m-%d")
        ),
        _ => String::new(),
    }
}

fn tag_text(categories: &[String], limit: usize) -> String {
    if categories.is_empty() {
        return String::new();
    }
    let tags: Vec<String> = categories
        .iter()
        .take(limit)
        .map(|c| format!("`#{}`", c))
        .collect();
    format!(" {}", tags.join(" "))
}

fn render_flat(tasks: &[Task], options: &ExportOptions, lines: &mut Vec<String>) {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by_key(|t| (t.done, priority_rank(t.priority)));

    for task in sorted {
        let badge = task
            .priority
            .map(|p| format!(" **{} {}**", p.emoji(), p.as_str().to_uppercase()))
            .unwrap_or_default();
        lines.push(format!(
            "- {} {}{}{}{}",
            checkbox(task),
            task.text,
            badge,
            due_text(task, options, "Due: "),
            tag_text(&task.categories, FLAT_EXPORT_TAG_LIMIT)
        ));
    }
}

fn render_grouped(tasks: &[Task], options: &ExportOptions, lines: &mut Vec<String>) {
    const SECTIONS: [&str; 4] = [
        "🔴 High Priority",
        "🟡 Medium Priority",
        "🟢 Low Priority",
        "⚪ No Priority",
    ];

    for (rank, title) in SECTIONS.iter().enumerate() {
        let mut group: Vec<&Task> = tasks
            .iter()
            .filter(|t| usize::from(priority_rank(t.priority)) == rank)
            .collect();
        if group.is_empty() {
            continue;
        }
        group.sort_by_key(|t| (t.done, t.due_date.unwrap_or(NaiveDate::MAX)));

        let completed = group.iter().filter(|t| t.done).count();
        lines.push(format!("## {}", title));
        lines.push(String::new());
        lines.push(format!("*{} tasks ({} completed)*", group.len(), completed));
        lines.push(String::new());

        for task in group {
            lines.push(format!(
                "- {} {}{}{}",
                checkbox(task),
                task.text,
                due_text(task, options, "Due: "),
                tag_text(&task.categories, usize::MAX)
            ));
        }
        lines.push(String::new());
    }
}

fn render_category(tasks: &[Task], options: &ExportOptions, lines: &mut Vec<String>) {
    let mut by_category: BTreeMap<&str, Vec<&Task>> = BTreeMap::new();
    let mut uncategorized: Vec<&Task> = Vec::new();

    for task in tasks {
        if task.categories.is_empty() {
            uncategorized.push(task);
        }
        for category in &task.categories {
            by_category.entry(category.as_str()).or_default().push(task);
        }
    }

    for (category, mut group) in by_category {
        let completed = group.iter().filter(|t| t.done).count();
        lines.push(format!("## 📁 {}", category));
        lines.push(String::new());
        lines.push(format!("*{} tasks ({} completed)*", group.len(), completed));
        lines.push(String::new());
        push_category_tasks(&mut group, options, lines);
    }

    if !uncategorized.is_empty() {
        lines.push("## 📋 Uncategorized".to_string());
        lines.push(String::new());
        lines.push(format!("*{} tasks*", uncategorized.len()));
        lines.push(String::new());
        push_category_tasks(&mut uncategorized, options, lines);
    }
}

fn push_category_tasks(group: &mut [&Task], options: &ExportOptions, lines: &mut Vec<String>) {
    group.sort_by_key(|t| (priority_rank(t.priority), t.done));
    for task in group.iter() {
        let badge = task
            .priority
            .map(|p| format!(" **{}**", p.emoji()))
            .unwrap_or_default();
        lines.push(format!(
            "- {} {}{}{}",
            checkbox(task),
            task.text,
            badge,
            due_text(task, options, "")
        ));
    }
    lines.push(String::new());
}

/// `devdash_tasks_<layout>_<YYYYmmdd_HHMMSS>.md`
pub fn export_filename(layout: ExportLayout, now: NaiveDateTime) -> String {
    format!(
        "devdash_tasks_{}_{}.md",
        layout.as_str(),
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Render and write an export into `dir`, returning the file path.
pub fn export_to_file(
    tasks: &[Task],
    dir: &Path,
    layout: ExportLayout,
    options: &ExportOptions,
) -> Result<PathBuf> {
    let path = dir.join(export_filename(layout, options.exported_at));
    fs::write(&path, export_markdown(tasks, layout, options))?;
    tracing::info!(path = %path.display(), layout = %layout, count = tasks.len(), "Exported tasks");
    Ok(path)
}
