//! Dashboard panels and modal views.

mod config_editor;
mod git_panel;
mod help;
mod system_panel;
mod task_form;
mod tasks_panel;
mod timer_panel;

pub use config_editor::{ConfigEditor, ConfigEditorOutcome};
pub use git_panel::{GitPanel, git_lines};
pub use help::{HelpView, help_lines};
pub use system_panel::{SystemPanel, system_lines};
pub use task_form::{FormField, FormOutcome, PriorityPicker, PickerOutcome, TaskForm};
pub use tasks_panel::{TasksPanel, task_line};
pub use timer_panel::{TimerPanel, timer_lines};

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Padding},
};

use crate::config::{BorderStyle, UiConfig};

/// Bordered block for a panel, styled from `[ui]`.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, ui: &UiConfig) -> Block<'a> {
    let padding = u16::try_from(ui.panel_padding.max(0)).unwrap_or(0);
    let padding = if ui.compact_view { 0 } else { padding };

    let block = Block::default()
        .title(title)
        .padding(Padding::uniform(padding));

    match ui.border_style {
        BorderStyle::None => block.borders(Borders::NONE),
        style => block.borders(Borders::ALL).border_type(border_type(style)),
    }
}

fn border_type(style: BorderStyle) -> BorderType {
    match style {
        BorderStyle::Double => BorderType::Double,
        BorderStyle::Rounded => BorderType::Rounded,
        BorderStyle::Heavy => BorderType::Thick,
        BorderStyle::Solid | BorderStyle::None => BorderType::Plain,
    }
}

/// Rectangle of the given percentage size centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Plain text of a rendered line, for assertions.
#[cfg(test)]
pub(crate) fn line_text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
