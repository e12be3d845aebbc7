//! Task add/edit form and the quick priority picker.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;
use crate::models::{Priority, Task, TaskInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Priority,
    DueDate,
    Categories,
}

impl FormField {
    const ALL: [FormField; 4] = [
        FormField::Text,
        FormField::Priority,
        FormField::DueDate,
        FormField::Categories,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Text => "Task",
            FormField::Priority => "Priority",
            FormField::DueDate => "Due Date (YYYY-MM-DD)",
            FormField::Categories => "Categories (comma-separated)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Still editing
    Pending,
    Cancel,
    Submit(TaskInput),
}

/// Modal form for adding a task or editing an existing one.
#[derive(Debug, Clone)]
pub struct TaskForm {
    /// Id of the task being edited, `None` when adding
    pub editing: Option<u64>,
    text: String,
    priority: Option<Priority>,
    due_date: String,
    categories: String,
    field: FormField,
    error: Option<String>,
}

impl TaskForm {
    pub fn add() -> Self {
        Self {
            editing: None,
            text: String::new(),
            priority: None,
            due_date: String::new(),
            categories: String::new(),
            field: FormField::Text,
            error: None,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            text: task.text.clone(),
            priority: task.priority,
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            categories: task.categories.join(", "),
            field: FormField::Text,
            error: None,
        }
    }

    pub fn field(&self) -> FormField {
        self.field
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show a validation error; the form stays open.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Current contents as unvalidated input.
    pub fn input(&self) -> TaskInput {
        TaskInput::new(self.text.clone())
            .with_priority(self.priority.map(|p| p.as_str()).unwrap_or(""))
            .with_due_date(self.due_date.clone())
            .with_categories(&self.categories)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> FormOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return FormOutcome::Cancel,
            KeyCode::Enter => return FormOutcome::Submit(self.input()),
            KeyCode::Char('s') if ctrl => return FormOutcome::Submit(self.input()),
            KeyCode::Tab | KeyCode::Down => self.field = self.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.previous(),
            KeyCode::Left if self.field == FormField::Priority => {
                self.priority = cycle_priority(self.priority, false);
            }
            KeyCode::Right | KeyCode::Char(' ') if self.field == FormField::Priority => {
                self.priority = cycle_priority(self.priority, true);
            }
            KeyCode::Backspace => {
                if let Some(value) = self.value_mut() {
                    value.pop();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(value) = self.value_mut() {
                    value.push(c);
                }
            }
            _ => {}
        }
        FormOutcome::Pending
    }

    fn value_mut(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Text => Some(&mut self.text),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Categories => Some(&mut self.categories),
            FormField::Priority => None,
        }
    }

    fn value_line(&self, field: FormField) -> Line<'static> {
        let active = self.field == field;
        let value = match field {
            FormField::Text => self.text.clone(),
            FormField::DueDate => self.due_date.clone(),
            FormField::Categories => self.categories.clone(),
            FormField::Priority => {
                let label = match self.priority {
                    Some(p) => format!("{} {}", p.emoji(), capitalize(p.as_str())),
                    None => "None".to_string(),
                };
                if active {
                    format!("◀ {} ▶", label)
                } else {
                    label
                }
            }
        };

        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let mut spans = vec![Span::raw("  "), Span::styled(value, style)];
        if active && field != FormField::Priority {
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 60, area);
        let title = if self.editing.is_some() {
            " Edit Task "
        } else {
            " Add Task "
        };

        let mut lines = Vec::new();
        for field in FormField::ALL {
            let label_style = if self.field == field {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().bold()
            };
            lines.push(Line::from(Span::styled(field.label(), label_style)));
            lines.push(self.value_line(field));
            lines.push(Line::default());
        }
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("✗ {}", error),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            "Tab: next field  ←/→: priority  Enter/Ctrl+S: save  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(Span::styled(title, Style::default().bold()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

fn cycle_priority(current: Option<Priority>, forward: bool) -> Option<Priority> {
    const ORDER: [Option<Priority>; 4] = [
        None,
        Some(Priority::High),
        Some(Priority::Medium),
        Some(Priority::Low),
    ];
    let index = ORDER.iter().position(|p| *p == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % ORDER.len()
    } else {
        (index + ORDER.len() - 1) % ORDER.len()
    };
    ORDER[next]
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    Cancel,
    Pick(Option<Priority>),
}

/// One-key priority chooser for the selected task.
#[derive(Debug, Clone)]
pub struct PriorityPicker {
    pub task_id: u64,
    task_text: String,
}

impl PriorityPicker {
    pub fn new(task: &Task) -> Self {
        Self {
            task_id: task.id,
            task_text: task.text.clone(),
        }
    }

    pub fn handle_key(&self, key: &KeyEvent) -> PickerOutcome {
        match key.code {
            KeyCode::Char('1') => PickerOutcome::Pick(Some(Priority::High)),
            KeyCode::Char('2') => PickerOutcome::Pick(Some(Priority::Medium)),
            KeyCode::Char('3') => PickerOutcome::Pick(Some(Priority::Low)),
            KeyCode::Char('0') => PickerOutcome::Pick(None),
            KeyCode::Esc => PickerOutcome::Cancel,
            _ => PickerOutcome::Pending,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(40, 40, area);
        let lines = vec![
            Line::from(Span::styled(self.task_text.clone(), Style::default().bold())),
            Line::default(),
            Line::from(format!("1  {} High", Priority::High.emoji())),
            Line::from(format!("2  {} Medium", Priority::Medium.emoji())),
            Line::from(format!("3  {} Low", Priority::Low.emoji())),
            Line::from("0  None"),
            Line::default(),
            Line::from(Span::styled(
                "Esc: cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(" Set Priority ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut TaskForm, text: &str) {
        for c in text.chars() {
            form.handle_key(&press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_form_collects_all_fields() {
        let mut form = TaskForm::add();
        type_text(&mut form, "Write tests");
        form.handle_key(&press(KeyCode::Tab));
        assert_eq!(form.field(), FormField::Priority);
        form.handle_key(&press(KeyCode::Right));
        form.handle_key(&press(KeyCode::Right));
        form.handle_key(&press(KeyCode::Tab));
        type_text(&mut form, "2026-05-01");
        form.handle_key(&press(KeyCode::Tab));
        type_text(&mut form, "work, qa");

        let submit = form.handle_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        let FormOutcome::Submit(input) = submit else {
            panic!("expected submit, got {:?}", submit);
        };
        let task = Task::new(1, &input).unwrap();
        assert_eq!(task.text, "Write tests");
        assert_eq!(task.priority, Some(Priority::Medium));
        assert_eq!(task.due_date.map(|d| d.to_string()), Some("2026-05-01".to_string()));
        assert_eq!(task.categories, vec!["work", "qa"]);
    }

    #[test]
    fn test_form_editing_existing_task() {
        let task = Task::new(
            7,
            &TaskInput::new("Old")
                .with_priority("low")
                .with_due_date("2026-01-02")
                .with_categories("a,b"),
        )
        .unwrap();
        let mut form = TaskForm::edit(&task);
        assert_eq!(form.editing, Some(7));
        form.handle_key(&press(KeyCode::Backspace));
        form.handle_key(&press(KeyCode::Backspace));
        form.handle_key(&press(KeyCode::Backspace));
        type_text(&mut form, "New");

        let FormOutcome::Submit(input) = form.handle_key(&press(KeyCode::Enter)) else {
            panic!("expected submit");
        };
        assert_eq!(
            input,
            TaskInput::new("New")
                .with_priority("low")
                .with_due_date("2026-01-02")
                .with_categories("a, b")
        );
    }

    #[test]
    fn test_form_navigation_and_cancel() {
        let mut form = TaskForm::add();
        form.handle_key(&press(KeyCode::BackTab));
        assert_eq!(form.field(), FormField::Categories);
        form.handle_key(&press(KeyCode::Down));
        assert_eq!(form.field(), FormField::Text);
        assert_eq!(form.handle_key(&press(KeyCode::Esc)), FormOutcome::Cancel);
    }

    #[test]
    fn test_form_error_is_kept() {
        let mut form = TaskForm::add();
        assert_eq!(form.error(), None);
        form.set_error("Task text cannot be empty");
        assert_eq!(form.error(), Some("Task text cannot be empty"));
    }

    #[test]
    fn test_cycle_priority() {
        assert_eq!(cycle_priority(None, true), Some(Priority::High));
        assert_eq!(cycle_priority(Some(Priority::Low), true), None);
        assert_eq!(cycle_priority(None, false), Some(Priority::Low));
    }

    #[test]
    fn test_priority_picker_keys() {
        let task = Task::new(3, &TaskInput::new("Pick")).unwrap();
        let picker = PriorityPicker::new(&task);
        assert_eq!(picker.task_id, 3);
        assert_eq!(
            picker.handle_key(&press(KeyCode::Char('1'))),
            PickerOutcome::Pick(Some(Priority::High))
        );
        assert_eq!(
            picker.handle_key(&press(KeyCode::Char('0'))),
            PickerOutcome::Pick(None)
        );
        assert_eq!(picker.handle_key(&press(KeyCode::Esc)), PickerOutcome::Cancel);
        assert_eq!(picker.handle_key(&press(KeyCode::Char('x'))), PickerOutcome::Pending);
    }
}
