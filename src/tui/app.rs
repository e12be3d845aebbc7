//! TUI Application - main event loop and terminal management
//!
//! This module contains the dashboard shell:
//! - Terminal setup and restoration
//! - The synchronous event loop driving panel refreshes
//! - Key dispatch to panels and modals
//! - Layout of header, panel grid and footer

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{prelude::*, widgets::Paragraph};

use super::keymap::{Action, Keymap};
use super::notifications::NotificationManager;
use super::views::{
    ConfigEditor, ConfigEditorOutcome, FormOutcome, GitPanel, HelpView, PickerOutcome,
    PriorityPicker, SystemPanel, TaskForm, TasksPanel, TimerPanel,
};
use crate::config::{
    ConfigLocations, DevDashConfig, LoadedConfig, load_config_from, save_config, save_path,
};
use crate::git::GitCli;
use crate::models::query::PriorityFilter;
use crate::models::{Priority, today};
use crate::storage::TaskStore;
use crate::sys::ProcMetrics;
use crate::timer::{Notifier, TimerEvent};
use crate::{Error, Result};

/// Upper bound on how long the loop sleeps waiting for input.
const MAX_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelId {
    Git,
    System,
    Tasks,
    Timer,
}

/// Overlay that captures keyboard input.
enum Modal {
    None,
    Help(HelpView),
    Form(TaskForm),
    Priority(PriorityPicker),
    Config(ConfigEditor),
}

pub struct App {
    config: DevDashConfig,
    custom_path: Option<PathBuf>,
    locations: ConfigLocations,
    keymap: Keymap,
    git: GitPanel,
    system: SystemPanel,
    tasks: TasksPanel,
    timer: TimerPanel,
    notifications: NotificationManager,
    modal: Modal,
    started_at: DateTime<Local>,
    should_quit: bool,
}

impl App {
    pub fn new(
        loaded: LoadedConfig,
        custom_path: Option<PathBuf>,
        locations: ConfigLocations,
        now: Instant,
    ) -> Self {
        let config = loaded.config;
        let git_provider =
            GitCli::from_config(config.git.repository_path.as_deref(), &locations.cwd);
        let store = TaskStore::resolve(&config.tasks.file_path, &locations.cwd);

        let mut notifications = NotificationManager::new();
        let warnings = loaded.warnings.len() + crate::config::validate(&config).len();
        if warnings > 0 {
            notifications.warning(format!(
                "Configuration has {} warning(s); run --validate-config for details",
                warnings
            ));
        }

        Self {
            keymap: Keymap::from_config(&config.keybindings),
            git: GitPanel::new(Box::new(git_provider), config.git.clone(), now),
            system: SystemPanel::new(
                Box::new(ProcMetrics::new(locations.cwd.clone())),
                config.system.clone(),
                now,
            ),
            tasks: TasksPanel::new(store, config.tasks.clone()),
            timer: TimerPanel::new(config.timer.clone(), now),
            notifications,
            modal: Modal::None,
            started_at: Local::now(),
            should_quit: false,
            config,
            custom_path,
            locations,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // ==================== Scheduling ====================

    /// Run every refresh that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.git.enabled() && self.git.schedule.is_due(now) {
            self.git.refresh(now);
        }
        if self.system.enabled() && self.system.schedule.is_due(now) {
            self.system.refresh(now);
        }
        if self.timer.needs_tick() && self.timer.schedule.is_due(now) {
            if let Some(event) = self.timer.tick(now) {
                self.on_timer_event(event);
            }
        }
        self.notifications.cleanup(now);
    }

    /// How long the loop may wait for input before something is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let mut timeout = MAX_POLL;
        if self.git.enabled() {
            timeout = timeout.min(self.git.schedule.time_until(now));
        }
        if self.system.enabled() {
            timeout = timeout.min(self.system.schedule.time_until(now));
        }
        if self.timer.needs_tick() {
            timeout = timeout.min(self.timer.schedule.time_until(now));
        }
        if let Some(expiry) = self.notifications.time_until_expiry(now) {
            timeout = timeout.min(expiry);
        }
        timeout
    }

    fn on_timer_event(&mut self, event: TimerEvent) {
        let (title, body) = Notifier::message(event);
        self.notifications.success(format!("{} {}", title, body));
    }

    // ==================== Input ====================

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match std::mem::replace(&mut self.modal, Modal::None) {
            Modal::None => self.handle_dashboard_key(key, now),
            Modal::Help(help) => self.handle_help_key(help, key),
            Modal::Form(form) => self.handle_form_key(form, key),
            Modal::Priority(picker) => self.handle_picker_key(picker, key),
            Modal::Config(editor) => self.handle_config_key(editor, key, now),
        }
    }

    fn handle_help_key(&mut self, mut help: HelpView, key: KeyEvent) {
        if self.keymap.action_for(&key) == Some(Action::Help) {
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return,
            KeyCode::Up | KeyCode::Char('k') => help.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => help.scroll_down(),
            _ => {}
        }
        self.modal = Modal::Help(help);
    }

    fn handle_form_key(&mut self, mut form: TaskForm, key: KeyEvent) {
        let input = match form.handle_key(&key) {
            FormOutcome::Pending => {
                self.modal = Modal::Form(form);
                return;
            }
            FormOutcome::Cancel => return,
            FormOutcome::Submit(input) => input,
        };

        let result = match form.editing {
            Some(id) => self.tasks.edit(id, &input).map(|()| "Task updated"),
            None => self.tasks.add(&input).map(|_| "Task added"),
        };
        match result {
            Ok(message) => self.notifications.success(message),
            Err(Error::InvalidInput(message)) => {
                form.set_error(message);
                self.modal = Modal::Form(form);
            }
            Err(e) => self.report_save_error(e),
        }
    }

    fn handle_picker_key(&mut self, picker: PriorityPicker, key: KeyEvent) {
        match picker.handle_key(&key) {
            PickerOutcome::Pending => self.modal = Modal::Priority(picker),
            PickerOutcome::Cancel => {}
            PickerOutcome::Pick(priority) => {
                match self.tasks.set_priority(picker.task_id, priority) {
                    Ok(()) => self.notifications.info(format!(
                        "Priority set to {}",
                        priority.map(|p| p.as_str()).unwrap_or("none")
                    )),
                    Err(e) => self.report_save_error(e),
                }
            }
        }
    }

    fn handle_config_key(&mut self, mut editor: ConfigEditor, key: KeyEvent, now: Instant) {
        let config = match editor.handle_key(&key) {
            ConfigEditorOutcome::Pending => {
                self.modal = Modal::Config(editor);
                return;
            }
            ConfigEditorOutcome::Cancel => return,
            ConfigEditorOutcome::Save(config) => config,
        };

        let path = save_path(self.custom_path.as_deref(), &self.locations);
        match save_config(&config, &path) {
            Ok(()) => self.reload_config(now),
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "Saving config failed");
                editor.set_error(format!("Failed to save {}: {}", path.display(), e));
                self.modal = Modal::Config(editor);
            }
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, now: Instant) {
        if let Some(action) = self.keymap.action_for(&key) {
            self.perform(action, now);
            return;
        }
        if !self.tasks.enabled() {
            return;
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.tasks.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.tasks.select_previous(),
            KeyCode::Home => self.tasks.select_first(),
            KeyCode::End => self.tasks.select_last(),
            KeyCode::Char('1') => self.filter_priority(Priority::High),
            KeyCode::Char('2') => self.filter_priority(Priority::Medium),
            KeyCode::Char('3') => self.filter_priority(Priority::Low),
            KeyCode::Char('0') => {
                self.tasks.clear_filters();
                self.notifications.info("Filters cleared");
            }
            _ => {}
        }
    }

    fn filter_priority(&mut self, priority: Priority) {
        self.tasks.set_priority_filter(PriorityFilter::Exactly(Some(priority)));
        self.notifications.info(format!("Showing {} priority tasks", priority.as_str()));
    }

    fn perform(&mut self, action: Action, now: Instant) {
        tracing::debug!(?action, "Action");
        let tasks_enabled = self.tasks.enabled();
        let timer_enabled = self.timer.enabled();

        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.modal = Modal::Help(HelpView::new()),
            Action::Refresh => {
                self.git.schedule.force(now);
                self.system.schedule.force(now);
                self.tasks.reload();
                self.notifications.info("Refreshed");
            }
            Action::ReloadConfig => self.reload_config(now),
            Action::EditConfig => self.modal = Modal::Config(ConfigEditor::new(&self.config)),

            Action::AddTask if tasks_enabled => self.modal = Modal::Form(TaskForm::add()),
            Action::EditTask if tasks_enabled => match self.tasks.selected_task() {
                Some(task) => self.modal = Modal::Form(TaskForm::edit(&task)),
                None => self.notifications.warning("No task selected"),
            },
            Action::SetPriority if tasks_enabled => match self.tasks.selected_task() {
                Some(task) => self.modal = Modal::Priority(PriorityPicker::new(&task)),
                None => self.notifications.warning("No task selected"),
            },
            Action::ToggleTask if tasks_enabled => {
                if let Err(e) = self.tasks.toggle_selected() {
                    self.report_save_error(e);
                }
            }
            Action::DeleteTask if tasks_enabled => match self.tasks.delete_selected() {
                Ok(Some(text)) => self.notifications.info(format!("Deleted: {}", text)),
                Ok(None) => {}
                Err(e) => self.report_save_error(e),
            },
            Action::ToggleCompleted if tasks_enabled => {
                let message = if self.tasks.toggle_show_done() {
                    "Showing completed tasks"
                } else {
                    "Hiding completed tasks"
                };
                self.notifications.info(message);
            }
            Action::CycleSort if tasks_enabled => {
                let sort = self.tasks.cycle_sort();
                self.notifications.info(format!("Sorted by {}", sort.label()));
            }
            Action::ExportTasks if tasks_enabled => {
                let exported_at = Local::now().naive_local();
                match self.tasks.export(&self.locations.cwd, exported_at) {
                    Ok(path) => {
                        self.notifications.success(format!("Exported to {}", path.display()))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Export failed");
                        self.notifications.error(format!("Export failed: {}", e));
                    }
                }
            }

            Action::TimerFocus if timer_enabled => self.timer.start_focus(now),
            Action::TimerBreak if timer_enabled => self.timer.start_break(now),
            Action::TimerStop if timer_enabled => self.timer.stop(),
            _ => {}
        }
    }

    fn report_save_error(&mut self, e: Error) {
        tracing::error!(error = %e, "Saving tasks failed");
        self.notifications.error(format!("Failed to save tasks: {}", e));
    }

    // ==================== Configuration ====================

    /// Re-read the configuration. On failure the current one stays active.
    pub fn reload_config(&mut self, now: Instant) {
        match load_config_from(self.custom_path.as_deref(), &self.locations) {
            Ok(loaded) => {
                let warnings = loaded.all_warnings();
                for warning in &warnings {
                    tracing::warn!(%warning, "Config warning");
                }
                self.apply_config(loaded.config, now);
                if warnings.is_empty() {
                    self.notifications.success("Configuration reloaded");
                } else {
                    self.notifications.warning(format!(
                        "Configuration reloaded with {} warning(s)",
                        warnings.len()
                    ));
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Config reload failed");
                self.notifications.error(format!("Reload failed: {}", e));
            }
        }
    }

    fn apply_config(&mut self, config: DevDashConfig, now: Instant) {
        let git_provider =
            GitCli::from_config(config.git.repository_path.as_deref(), &self.locations.cwd);
        let store = TaskStore::resolve(&config.tasks.file_path, &self.locations.cwd);

        self.keymap = Keymap::from_config(&config.keybindings);
        self.git.reconfigure(Box::new(git_provider), config.git.clone(), now);
        self.system.reconfigure(config.system.clone(), now);
        self.tasks.reconfigure(store, config.tasks.clone());
        self.timer.reconfigure(config.timer.clone());
        self.config = config;
    }

    // ==================== Rendering ====================

    fn rows(&self) -> Vec<Vec<PanelId>> {
        let top: Vec<PanelId> = [
            (self.git.enabled(), PanelId::Git),
            (self.system.enabled(), PanelId::System),
        ]
        .into_iter()
        .filter_map(|(on, id)| on.then_some(id))
        .collect();
        let bottom: Vec<PanelId> = [
            (self.tasks.enabled(), PanelId::Tasks),
            (self.timer.enabled(), PanelId::Timer),
        ]
        .into_iter()
        .filter_map(|(on, id)| on.then_some(id))
        .collect();

        [top, bottom]
            .into_iter()
            .filter(|row| !row.is_empty())
            .collect()
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let ui = &self.config.ui;

        let mut constraints = Vec::new();
        if ui.show_header {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(3));
        if ui.show_footer {
            constraints.push(Constraint::Length(1));
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut index = 0;
        if ui.show_header {
            self.render_header(frame, chunks[index]);
            index += 1;
        }
        let body = chunks[index];
        self.render_panels(frame, body);
        if self.config.ui.show_footer {
            self.render_footer(frame, chunks[index + 1]);
        }

        match &self.modal {
            Modal::None => {}
            Modal::Help(help) => help.render(frame, area, &self.keymap),
            Modal::Form(form) => form.render(frame, area),
            Modal::Priority(picker) => picker.render(frame, area),
            Modal::Config(editor) => editor.render(frame, area),
        }

        self.notifications.render(frame, body);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let clock = if self.config.general.update_header {
            Local::now()
        } else {
            self.started_at
        };
        let header = Line::from(vec![
            Span::styled(" devdash", Style::default().fg(Color::Cyan).bold()),
            Span::raw(" | "),
            Span::raw(self.locations.cwd.display().to_string()),
            Span::raw(" | "),
            Span::styled(
                clock.format("%Y-%m-%d %H:%M:%S").to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }

    fn render_panels(&mut self, frame: &mut Frame, area: Rect) {
        let rows = self.rows();
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new("All panels are disabled in the configuration.")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray)),
                area,
            );
            return;
        }

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows.len() as u32); rows.len()])
            .split(area);
        let now = Instant::now();
        let today = today();

        for (row, row_area) in rows.iter().zip(row_areas.iter()) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, row.len() as u32); row.len()])
                .split(*row_area);
            for (panel, cell) in row.iter().zip(cells.iter()) {
                let ui = &self.config.ui;
                match panel {
                    PanelId::Git => self.git.render(frame, *cell, ui),
                    PanelId::System => self.system.render(frame, *cell, ui),
                    PanelId::Tasks => self.tasks.render(frame, *cell, ui, &self.keymap, today),
                    PanelId::Timer => self.timer.render(frame, *cell, ui, &self.keymap, now),
                }
            }
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let key = Style::default().fg(Color::Yellow);
        let dim = Style::default().fg(Color::DarkGray);
        let mut spans = vec![Span::raw(" ")];
        for action in [
            Action::Quit,
            Action::Help,
            Action::AddTask,
            Action::ToggleTask,
            Action::TimerFocus,
            Action::ReloadConfig,
        ] {
            let Some(binding) = self.keymap.binding_for(action) else {
                continue;
            };
            spans.push(Span::styled(binding.to_string(), key));
            spans.push(Span::styled(format!(" {}  ", action.description()), dim));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| app.render(f))?;

        if event::poll(app.poll_timeout(Instant::now()))? {
            // Resize events fall through and redraw on the next pass.
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now());
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Run the dashboard until the user quits.
///
/// The terminal is restored before returning, including when the loop
/// fails.
pub fn run_tui(
    loaded: LoadedConfig,
    custom_path: Option<PathBuf>,
    locations: ConfigLocations,
) -> Result<()> {
    let mut app = App::new(loaded, custom_path, locations, Instant::now());
    tracing::info!(cwd = %app.locations.cwd.display(), "Dashboard started");

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app);
    let restored = restore_terminal();

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Event loop failed");
    }
    result?;
    restored?;
    tracing::info!("Dashboard exited");
    Ok(())
}
