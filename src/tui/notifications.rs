//! Toast notifications for the dashboard.
//!
//! Task saves, exports, config reloads and timer transitions report back
//! through short-lived toasts drawn over the bottom-right corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Maximum number of toasts to display at once
const MAX_VISIBLE_TOASTS: usize = 3;

/// Default auto-dismiss duration in seconds
const DEFAULT_DISMISS_SECONDS: u64 = 4;

/// Errors stay up longer
const ERROR_DISMISS_SECONDS: u64 = 8;

const TOAST_WIDTH: u16 = 48;

/// Notification level (determines styling)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn color(&self) -> Color {
        match self {
            NotificationLevel::Info => Color::Blue,
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Warning => Color::Yellow,
            NotificationLevel::Error => Color::Red,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }

    fn dismiss_after(&self) -> Duration {
        match self {
            NotificationLevel::Error => Duration::from_secs(ERROR_DISMISS_SECONDS),
            _ => Duration::from_secs(DEFAULT_DISMISS_SECONDS),
        }
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn new(level: NotificationLevel, message: impl Into<String>, now: Instant) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: now,
            duration: level.dismiss_after(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

/// Active toasts, newest first.
#[derive(Debug, Default)]
pub struct NotificationManager {
    toasts: VecDeque<Toast>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notify_at(level, message, Instant::now());
    }

    pub fn notify_at(
        &mut self,
        level: NotificationLevel,
        message: impl Into<String>,
        now: Instant,
    ) {
        let toast = Toast::new(level, message, now);
        tracing::debug!(level = ?toast.level, message = %toast.message, "Toast");
        self.toasts.push_front(toast);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Remove expired toasts
    pub fn cleanup(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired(now));
    }

    pub fn visible_toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().take(MAX_VISIBLE_TOASTS)
    }

    pub fn has_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }

    /// Toasts beyond the visible limit
    pub fn overflow_count(&self) -> usize {
        self.toasts.len().saturating_sub(MAX_VISIBLE_TOASTS)
    }

    /// Time until the next toast expires, if any.
    pub fn time_until_expiry(&self, now: Instant) -> Option<Duration> {
        self.toasts
            .iter()
            .map(|t| (t.created_at + t.duration).saturating_duration_since(now))
            .min()
    }

    /// Draw the visible toasts stacked upward from the bottom-right corner.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = TOAST_WIDTH.min(area.width);
        let mut bottom = area.y + area.height;

        for toast in self.visible_toasts() {
            let inner_width = width.saturating_sub(2).max(1) as usize;
            let text_len = toast.message.chars().count() + 2;
            let lines = text_len.div_ceil(inner_width).max(1) as u16;
            let height = lines + 2;
            if bottom < area.y + height {
                break;
            }
            bottom -= height;

            let rect = Rect::new(area.x + area.width - width, bottom, width, height);
            let style = Style::default().fg(toast.level.color());
            let paragraph = Paragraph::new(Line::from(vec![
                Span::styled(format!("{} ", toast.level.icon()), style),
                Span::raw(toast.message.as_str()),
            ]))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(style));

            frame.render_widget(Clear, rect);
            frame.render_widget(paragraph, rect);
        }

        let overflow = self.overflow_count();
        if overflow > 0 && bottom > area.y {
            let label = format!("+{} more", overflow);
            let rect = Rect::new(
                area.x + area.width - width,
                bottom - 1,
                width,
                1,
            );
            frame.render_widget(
                Paragraph::new(label)
                    .alignment(Alignment::Right)
                    .style(Style::default().fg(Color::DarkGray)),
                rect,
            );
        }
    }
}
