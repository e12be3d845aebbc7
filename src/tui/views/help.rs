//! Help overlay listing the active key bindings.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::centered_rect;
use crate::tui::keymap::{Action, Keymap};

const SECTIONS: &[(&str, &[Action])] = &[
    (
        "General",
        &[
            Action::Quit,
            Action::Help,
            Action::Refresh,
            Action::ReloadConfig,
            Action::EditConfig,
        ],
    ),
    (
        "Tasks",
        &[
            Action::AddTask,
            Action::EditTask,
            Action::ToggleTask,
            Action::DeleteTask,
            Action::SetPriority,
            Action::ToggleCompleted,
            Action::CycleSort,
            Action::ExportTasks,
        ],
    ),
    (
        "Timer",
        &[Action::TimerFocus, Action::TimerBreak, Action::TimerStop],
    ),
];

/// Bindings that are not configurable.
const FIXED_TASK_KEYS: &[(&str, &str)] = &[
    ("↑/↓ j/k", "Move selection"),
    ("Home/End", "First/last task"),
    ("1/2/3", "Show only high/medium/low priority"),
    ("0", "Clear filters"),
];

#[derive(Debug, Default)]
pub struct HelpView {
    scroll: u16,
}

impl HelpView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, keymap: &Keymap) {
        let popup = centered_rect(60, 80, area);
        let paragraph = Paragraph::new(help_lines(keymap))
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .title(Span::styled(" devdash - Help ", Style::default().bold()))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

fn key_line(key: String, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), Style::default().fg(Color::Yellow)),
        Span::raw(description.to_string()),
    ])
}

/// Help text generated from the current bindings.
pub fn help_lines(keymap: &Keymap) -> Vec<Line<'static>> {
    let heading = Style::default().fg(Color::Cyan).bold();
    let mut lines = Vec::new();

    for (title, actions) in SECTIONS {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(title.to_string(), heading)));
        for action in *actions {
            lines.push(key_line(keymap.label(*action), action.description()));
        }
        if *title == "Tasks" {
            for (key, description) in FIXED_TASK_KEYS {
                lines.push(key_line(key.to_string(), description));
            }
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Press Esc or ? to close  ·  Ctrl+C quits",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}
