//! Git panel - branch, working tree counts and recent commits.

use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use super::panel_block;
use crate::config::{GitConfig, UiConfig};
use crate::git::{GitError, GitProvider, GitStatus};
use crate::tui::schedule::RefreshSchedule;

pub struct GitPanel {
    provider: Box<dyn GitProvider>,
    config: GitConfig,
    status: Option<Result<GitStatus, GitError>>,
    pub schedule: RefreshSchedule,
}

impl GitPanel {
    pub fn new(provider: Box<dyn GitProvider>, config: GitConfig, now: Instant) -> Self {
        let interval = interval(&config);
        Self {
            provider,
            config,
            status: None,
            schedule: RefreshSchedule::new(interval, now),
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Swap in a new provider and settings after a config reload.
    pub fn reconfigure(&mut self, provider: Box<dyn GitProvider>, config: GitConfig, now: Instant) {
        self.schedule.set_interval(interval(&config), now);
        self.provider = provider;
        self.config = config;
        self.schedule.force(now);
    }

    pub fn refresh(&mut self, now: Instant) {
        let max_commits = usize::try_from(self.config.max_commits).unwrap_or(0);
        let result = self.provider.status(max_commits);
        if let Err(GitError::CommandFailed(msg)) = &result {
            tracing::warn!(error = %msg, "Git status failed");
        }
        self.status = Some(result);
        self.schedule.mark(now);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, ui: &UiConfig) {
        let title = Span::styled(" Git Status ", Style::default().fg(Color::Cyan).bold());
        let lines = match &self.status {
            Some(status) => git_lines(status, &self.config),
            None => vec![Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel_block(title, ui));
        frame.render_widget(paragraph, area);
    }
}

fn interval(config: &GitConfig) -> std::time::Duration {
    std::time::Duration::from_secs(config.refresh_interval.max(1).unsigned_abs())
}

/// Panel content for a status result.
pub fn git_lines(status: &Result<GitStatus, GitError>, config: &GitConfig) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let label = Style::default().fg(Color::Cyan).bold();

    let status = match status {
        Ok(status) => status,
        Err(GitError::NotARepository) => {
            return vec![
                Line::from(Span::styled(
                    "Not a git repository",
                    Style::default().fg(Color::Yellow),
                )),
                Line::default(),
                Line::from(Span::styled(
                    "Navigate to a git repository to see status",
                    dim,
                )),
            ];
        }
        Err(GitError::CommandFailed(msg)) => {
            return vec![
                Line::from(Span::styled("Git error:", Style::default().fg(Color::Red))),
                Line::from(msg.clone()),
            ];
        }
    };

    let mut branch = vec![
        Span::styled("Branch: ", label),
        Span::raw(if status.branch.is_empty() {
            "(unknown)".to_string()
        } else {
            status.branch.clone()
        }),
    ];
    if status.ahead > 0 {
        branch.push(Span::styled(format!(" ↑{}", status.ahead), dim));
    }
    if status.behind > 0 {
        branch.push(Span::styled(format!(" ↓{}", status.behind), dim));
    }

    let state = if status.is_clean() {
        Span::styled("Clean", Style::default().fg(Color::Green))
    } else {
        Span::styled(
            format!("Modified ({} files)", status.total_changes()),
            Style::default().fg(Color::Yellow),
        )
    };

    let mut lines = vec![
        Line::from(branch),
        Line::from(vec![Span::styled("Status: ", Style::default().bold()), state]),
    ];

    let mut counts = Vec::new();
    for (shown, name, count) in [
        (config.show_staged, "Staged", status.staged.len()),
        (config.show_modified, "Modified", status.modified.len()),
        (config.show_untracked, "Untracked", status.untracked.len()),
    ] {
        if !shown {
            continue;
        }
        if !counts.is_empty() {
            counts.push(Span::raw("  "));
        }
        counts.push(Span::styled(format!("{}: ", name), dim));
        counts.push(Span::raw(count.to_string()));
    }
    if !counts.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(counts));
    }

    if config.compact_mode || config.max_commits <= 0 {
        return lines;
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Recent Commits:",
        Style::default().bold(),
    )));
    if status.commits.is_empty() {
        lines.push(Line::from(Span::styled("  No commits", dim)));
    }
    for commit in &status.commits {
        lines.push(Line::from(vec![
            Span::raw("  • "),
            Span::styled(commit.hash.clone(), Style::default().fg(Color::Yellow)),
            Span::raw(format!(" - {}", commit.message)),
        ]));
    }
    lines
}
