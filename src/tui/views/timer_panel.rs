//! Pomodoro timer panel.

use std::time::{Duration, Instant};

use ratatui::{prelude::*, widgets::Paragraph};

use super::panel_block;
use crate::config::{ProgressBarStyle, TimerConfig, UiConfig};
use crate::timer::{
    Notifier, PomodoroTimer, TimerEvent, TimerSettings, TimerState, format_mmss,
};
use crate::tui::keymap::{Action, Keymap};
use crate::tui::schedule::RefreshSchedule;

const TICK: Duration = Duration::from_secs(1);

pub struct TimerPanel {
    timer: PomodoroTimer,
    notifier: Notifier,
    config: TimerConfig,
    pub schedule: RefreshSchedule,
}

impl TimerPanel {
    pub fn new(config: TimerConfig, now: Instant) -> Self {
        Self {
            timer: PomodoroTimer::new(TimerSettings::from_config(&config)),
            notifier: Notifier::from_config(&config),
            config,
            schedule: RefreshSchedule::new(TICK, now),
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn reconfigure(&mut self, config: TimerConfig) {
        self.timer.set_settings(TimerSettings::from_config(&config));
        self.notifier = Notifier::from_config(&config);
        self.config = config;
    }

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    pub fn start_focus(&mut self, now: Instant) {
        self.timer.start_focus(now);
        self.schedule.mark(now);
    }

    pub fn start_break(&mut self, now: Instant) {
        self.timer.start_break(now);
        self.schedule.mark(now);
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    /// Whether the loop needs to wake up for this panel.
    pub fn needs_tick(&self) -> bool {
        self.enabled() && self.timer.is_running()
    }

    /// Advance the timer, sending a desktop notification when a session ends.
    pub fn tick(&mut self, now: Instant) -> Option<TimerEvent> {
        self.schedule.mark(now);
        let event = self.timer.tick(now)?;
        tracing::info!(?event, completed = self.timer.completed_focus(), "Timer session ended");
        self.notifier.notify(event);
        Some(event)
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        ui: &UiConfig,
        keymap: &Keymap,
        now: Instant,
    ) {
        let title = Span::styled(" Pomodoro Timer ", Style::default().fg(Color::Red).bold());
        let lines = timer_lines(&self.timer, &self.config, keymap, now);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(panel_block(title, ui));
        frame.render_widget(paragraph, area);
    }
}

fn state_color(state: TimerState) -> Color {
    match state {
        TimerState::Idle => Color::Cyan,
        TimerState::Focus => Color::Red,
        TimerState::Break | TimerState::LongBreak => Color::Green,
    }
}

/// Panel content for the timer at `now`.
pub fn timer_lines(
    timer: &PomodoroTimer,
    config: &TimerConfig,
    keymap: &Keymap,
    now: Instant,
) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let state = timer.state();
    let heading = Line::from(Span::styled(
        state.label(),
        Style::default().fg(state_color(state)).bold(),
    ));

    let mut lines = vec![heading, Line::default()];

    if state == TimerState::Idle {
        lines.push(Line::from("Ready to start"));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(
                "Press '{}' for focus ({}min)",
                keymap.label(Action::TimerFocus),
                config.focus_duration.max(1)
            ),
            dim,
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "Press '{}' for break ({}min)",
                keymap.label(Action::TimerBreak),
                config.break_duration.max(1)
            ),
            dim,
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format_mmss(timer.remaining(now)),
            Style::default().fg(Color::Cyan).bold(),
        )));
        if config.show_progress_bar {
            let width = usize::try_from(config.progress_bar_width).unwrap_or(0).max(1);
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                ProgressBarStyle::Blocks.render(timer.progress(now), width),
                Style::default().fg(Color::Cyan),
            )));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Press '{}' to stop", keymap.label(Action::TimerStop)),
            dim,
        )));
    }

    if timer.completed_focus() > 0 {
        lines.push(Line::from(Span::styled(
            format!("Sessions completed: {}", timer.completed_focus()),
            dim,
        )));
    }
    lines
}
