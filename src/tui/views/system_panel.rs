//! System panel - CPU, memory, disk, session uptime and load.

use std::time::Instant;

use ratatui::{prelude::*, widgets::Paragraph};

use super::panel_block;
use crate::config::{SystemConfig, UiConfig};
use crate::sys::{
    MetricsProvider, SystemMetrics, UsageLevel, format_bytes, format_uptime, usage_level,
};
use crate::tui::schedule::{RefreshSchedule, interval_from_secs};

pub struct SystemPanel {
    provider: Box<dyn MetricsProvider>,
    config: SystemConfig,
    metrics: Option<SystemMetrics>,
    pub schedule: RefreshSchedule,
}

impl SystemPanel {
    pub fn new(provider: Box<dyn MetricsProvider>, config: SystemConfig, now: Instant) -> Self {
        let interval = interval_from_secs(config.refresh_interval);
        Self {
            provider,
            config,
            metrics: None,
            schedule: RefreshSchedule::new(interval, now),
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn reconfigure(&mut self, config: SystemConfig, now: Instant) {
        self.schedule
            .set_interval(interval_from_secs(config.refresh_interval), now);
        self.config = config;
    }

    pub fn refresh(&mut self, now: Instant) {
        self.metrics = Some(self.provider.sample());
        self.schedule.mark(now);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, ui: &UiConfig) {
        let title = Span::styled(
            " System Resources ",
            Style::default().fg(Color::Green).bold(),
        );
        let lines = match &self.metrics {
            Some(metrics) => system_lines(metrics, &self.config),
            None => vec![Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        frame.render_widget(Paragraph::new(lines).block(panel_block(title, ui)), area);
    }
}

fn level_color(level: UsageLevel) -> Color {
    match level {
        UsageLevel::Normal => Color::Green,
        UsageLevel::Warning => Color::Yellow,
        UsageLevel::Critical => Color::Red,
    }
}

fn usage_line(
    label: &'static str,
    percent: f64,
    thresholds: (f64, f64),
    config: &SystemConfig,
) -> Line<'static> {
    let width = usize::try_from(config.progress_bar_width).unwrap_or(0).max(1);
    let color = level_color(usage_level(percent, thresholds.0, thresholds.1));
    let bar = config.progress_bar_style.render(percent / 100.0, width);
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Cyan).bold()),
        Span::styled(bar, Style::default().fg(color)),
        Span::raw(format!(" {:.1}%", percent)),
    ])
}

fn detail_line(used: u64, total: u64) -> Line<'static> {
    Line::from(format!(
        "      {} / {}",
        format_bytes(used),
        format_bytes(total)
    ))
}

/// Panel content for one sample.
pub fn system_lines(metrics: &SystemMetrics, config: &SystemConfig) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if config.show_cpu {
        lines.push(usage_line(
            "CPU:  ",
            metrics.cpu_percent,
            (config.cpu_warning_threshold, config.cpu_critical_threshold),
            config,
        ));
    }
    if config.show_ram {
        lines.push(usage_line(
            "RAM:  ",
            metrics.ram_percent(),
            (config.ram_warning_threshold, config.ram_critical_threshold),
            config,
        ));
        lines.push(detail_line(metrics.ram_used, metrics.ram_total));
    }
    if config.show_disk {
        if metrics.disk_total > 0 {
            lines.push(usage_line(
                "Disk: ",
                metrics.disk_percent(),
                (config.disk_warning_threshold, config.disk_critical_threshold),
                config,
            ));
            lines.push(detail_line(metrics.disk_used, metrics.disk_total));
        } else {
            lines.push(Line::from(vec![
                Span::styled("Disk: ", Style::default().fg(Color::Cyan).bold()),
                Span::styled("unavailable", dim),
            ]));
        }
    }

    let mut footer = Vec::new();
    if config.show_uptime {
        footer.push(Line::from(vec![
            Span::styled("Session: ", dim),
            Span::raw(format_uptime(metrics.uptime)),
        ]));
    }
    if config.show_load_avg {
        if let Some([one, five, fifteen]) = metrics.load_avg {
            footer.push(Line::from(vec![
                Span::styled("Load: ", dim),
                Span::raw(format!("{:.2}, {:.2}, {:.2}", one, five, fifteen)),
            ]));
        }
    }
    if !footer.is_empty() {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.extend(footer);
    }
    lines
}
