//! Modal editor for the most commonly tuned config values.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;
use crate::config::{ConfigField, DevDashConfig, apply_edits};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEditorOutcome {
    Pending,
    Cancel,
    Save(DevDashConfig),
}

#[derive(Debug, Clone)]
pub struct ConfigEditor {
    base: DevDashConfig,
    values: Vec<(ConfigField, String)>,
    selected: usize,
    errors: Vec<String>,
}

impl ConfigEditor {
    pub fn new(config: &DevDashConfig) -> Self {
        Self {
            values: ConfigField::ALL
                .iter()
                .map(|field| (*field, field.read(config)))
                .collect(),
            base: config.clone(),
            selected: 0,
            errors: Vec::new(),
        }
    }

    pub fn field(&self) -> ConfigField {
        self.values[self.selected].0
    }

    pub fn value(&self, field: ConfigField) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Show an error from saving; the editor stays open.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.errors = vec![message.into()];
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> ConfigEditorOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let count = self.values.len();
        match key.code {
            KeyCode::Esc => return ConfigEditorOutcome::Cancel,
            KeyCode::Enter => return self.submit(),
            KeyCode::Char('s') if ctrl => return self.submit(),
            KeyCode::Tab | KeyCode::Down => self.selected = (self.selected + 1) % count,
            KeyCode::BackTab | KeyCode::Up => self.selected = (self.selected + count - 1) % count,
            KeyCode::Backspace => {
                self.values[self.selected].1.pop();
            }
            KeyCode::Char(c) if !ctrl => self.values[self.selected].1.push(c),
            _ => {}
        }
        ConfigEditorOutcome::Pending
    }

    fn submit(&mut self) -> ConfigEditorOutcome {
        match apply_edits(&self.base, &self.values) {
            Ok(config) => ConfigEditorOutcome::Save(config),
            Err(errors) => {
                self.errors = errors;
                ConfigEditorOutcome::Pending
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 80, area);

        let mut lines = Vec::new();
        for (index, (field, value)) in self.values.iter().enumerate() {
            let active = index == self.selected;
            let (label_style, value_style) = if active {
                (
                    Style::default().fg(Color::Cyan).bold(),
                    Style::default().fg(Color::Yellow),
                )
            } else {
                (Style::default().bold(), Style::default())
            };
            let mut spans = vec![
                Span::styled(format!("{:<28}", field.label()), label_style),
                Span::styled(value.clone(), value_style),
            ];
            if active {
                spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::default());
        for error in &self.errors {
            lines.push(Line::from(Span::styled(
                format!("✗ {}", error),
                Style::default().fg(Color::Red),
            )));
        }
        if !self.errors.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            "Tab/↑/↓: next field  Enter/Ctrl+S: save and reload  Esc: cancel",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(Span::styled(" ⚙ Configuration ", Style::default().bold()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}
