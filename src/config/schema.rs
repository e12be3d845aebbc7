//! Typed configuration sections and their defaults.
//!
//! This module provides:
//! - One struct per TOML section, each with a `Default` impl
//! - Closed enums for every string field with a fixed set of values
//! - The commented example document printed by `--print-example-config`
//!
//! Integer fields are `i64` on purpose: a value such as `max_commits = -1`
//! must survive the merge so the validator can report it.

use serde::Serialize;

use crate::models::Priority;

/// A string-valued config field with a closed set of accepted values.
pub trait Choice: Sized + Copy + 'static {
    /// Every variant, in the order shown in warnings.
    const VARIANTS: &'static [Self];

    /// The TOML spelling of this variant.
    fn as_str(&self) -> &'static str;

    /// Parse an exact (case-sensitive) TOML spelling.
    fn parse(s: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.as_str() == s)
    }

    /// Render the accepted set as `['a', 'b', 'c']` for messages.
    fn variant_list() -> String {
        let names: Vec<String> = Self::VARIANTS
            .iter()
            .map(|v| format!("'{}'", v.as_str()))
            .collect();
        format!("[{}]", names.join(", "))
    }
}

macro_rules! choice_display {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

/// Glyph set used by the system panel's usage bars.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBarStyle {
    #[default]
    Blocks,
    Bars,
    Dots,
}

impl ProgressBarStyle {
    /// (filled, empty) glyphs.
    pub fn glyphs(&self) -> (char, char) {
        match self {
            ProgressBarStyle::Blocks => ('█', '░'),
            ProgressBarStyle::Bars => ('|', '·'),
            ProgressBarStyle::Dots => ('●', '○'),
        }
    }

    /// Draw a bar `width` cells wide with `fraction` (clamped to 0..=1) filled.
    pub fn render(&self, fraction: f64, width: usize) -> String {
        let (full, empty) = self.glyphs();
        let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        let filled = ((fraction * width as f64) as usize).min(width);
        let mut bar = String::with_capacity(width * 3);
        bar.extend(std::iter::repeat_n(full, filled));
        bar.extend(std::iter::repeat_n(empty, width - filled));
        bar
    }
}

impl Choice for ProgressBarStyle {
    const VARIANTS: &'static [Self] = &[Self::Blocks, Self::Bars, Self::Dots];

    fn as_str(&self) -> &'static str {
        match self {
            ProgressBarStyle::Blocks => "blocks",
            ProgressBarStyle::Bars => "bars",
            ProgressBarStyle::Dots => "dots",
        }
    }
}
choice_display!(ProgressBarStyle);

/// Ordering applied to the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Created,
    Priority,
    DueDate,
    Text,
}

impl SortKey {
    /// The next key in the cycle used by the sort action.
    pub fn next(&self) -> Self {
        match self {
            SortKey::Created => SortKey::Priority,
            SortKey::Priority => SortKey::DueDate,
            SortKey::DueDate => SortKey::Text,
            SortKey::Text => SortKey::Created,
        }
    }

    /// Short label for the tasks panel title.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Priority => "priority",
            SortKey::DueDate => "due date",
            SortKey::Text => "text",
        }
    }
}

impl Choice for SortKey {
    const VARIANTS: &'static [Self] = &[Self::Created, Self::Priority, Self::DueDate, Self::Text];

    fn as_str(&self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Priority => "priority",
            SortKey::DueDate => "due_date",
            SortKey::Text => "text",
        }
    }
}
choice_display!(SortKey);

impl Choice for Priority {
    const VARIANTS: &'static [Self] = &[Self::High, Self::Medium, Self::Low];

    fn as_str(&self) -> &'static str {
        Priority::as_str(self)
    }
}

/// Export layout selected by the export action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Sections by priority
    #[default]
    Grouped,
    /// One flat list
    Simple,
    /// Sections by category
    Detailed,
}

impl Choice for ExportFormat {
    const VARIANTS: &'static [Self] = &[Self::Grouped, Self::Simple, Self::Detailed];

    fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Grouped => "grouped",
            ExportFormat::Simple => "simple",
            ExportFormat::Detailed => "detailed",
        }
    }
}
choice_display!(ExportFormat);

/// Sound played when a timer session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSound {
    #[default]
    Bell,
    Chime,
    Silent,
}

impl Choice for NotificationSound {
    const VARIANTS: &'static [Self] = &[Self::Bell, Self::Chime, Self::Silent];

    fn as_str(&self) -> &'static str {
        match self {
            NotificationSound::Bell => "bell",
            NotificationSound::Chime => "chime",
            NotificationSound::Silent => "silent",
        }
    }
}
choice_display!(NotificationSound);

/// Panel border drawing style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    #[default]
    Solid,
    Double,
    Rounded,
    Heavy,
    None,
}

impl Choice for BorderStyle {
    const VARIANTS: &'static [Self] = &[
        Self::Solid,
        Self::Double,
        Self::Rounded,
        Self::Heavy,
        Self::None,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            BorderStyle::Solid => "solid",
            BorderStyle::Double => "double",
            BorderStyle::Rounded => "rounded",
            BorderStyle::Heavy => "heavy",
            BorderStyle::None => "none",
        }
    }
}
choice_display!(BorderStyle);

/// `[general]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralConfig {
    pub theme: String,
    pub layout: String,
    /// Redraw the header clock every second
    pub update_header: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            layout: "default".to_string(),
            update_header: true,
        }
    }
}

/// `[git]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GitConfig {
    pub enabled: bool,
    /// Seconds between refreshes
    pub refresh_interval: i64,
    pub max_commits: i64,
    pub show_staged: bool,
    pub show_modified: bool,
    pub show_untracked: bool,
    pub compact_mode: bool,
    /// Repository to inspect instead of the working directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_path: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval: 5,
            max_commits: 3,
            show_staged: true,
            show_modified: true,
            show_untracked: true,
            compact_mode: false,
            repository_path: None,
        }
    }
}

/// `[system]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemConfig {
    pub enabled: bool,
    /// Seconds between refreshes (fractions allowed)
    pub refresh_interval: f64,
    pub show_cpu: bool,
    pub show_ram: bool,
    pub show_disk: bool,
    pub show_uptime: bool,
    pub show_load_avg: bool,
    pub cpu_warning_threshold: f64,
    pub cpu_critical_threshold: f64,
    pub ram_warning_threshold: f64,
    pub ram_critical_threshold: f64,
    pub disk_warning_threshold: f64,
    pub disk_critical_threshold: f64,
    pub progress_bar_width: i64,
    pub progress_bar_style: ProgressBarStyle,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval: 1.0,
            show_cpu: true,
            show_ram: true,
            show_disk: true,
            show_uptime: true,
            show_load_avg: true,
            cpu_warning_threshold: 60.0,
            cpu_critical_threshold: 80.0,
            ram_warning_threshold: 60.0,
            ram_critical_threshold: 80.0,
            disk_warning_threshold: 60.0,
            disk_critical_threshold: 80.0,
            progress_bar_width: 10,
            progress_bar_style: ProgressBarStyle::Blocks,
        }
    }
}

/// `[tasks]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasksConfig {
    pub enabled: bool,
    /// Task file, relative to the working directory unless absolute
    pub file_path: String,
    pub default_sort: SortKey,
    pub show_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_priority_filter: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_category_filter: Option<String>,
    pub max_visible_tasks: i64,
    pub truncate_length: i64,
    pub show_categories: bool,
    pub show_due_dates: bool,
    pub show_priority_emoji: bool,
    pub due_soon_days: i64,
    pub export_format: ExportFormat,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file_path: ".devdash_tasks.json".to_string(),
            default_sort: SortKey::Created,
            show_completed: true,
            default_priority_filter: None,
            default_category_filter: None,
            max_visible_tasks: 20,
            truncate_length: 40,
            show_categories: true,
            show_due_dates: true,
            show_priority_emoji: true,
            due_soon_days: 3,
            export_format: ExportFormat::Grouped,
        }
    }
}

/// `[timer]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerConfig {
    pub enabled: bool,
    /// Minutes
    pub focus_duration: i64,
    /// Minutes
    pub break_duration: i64,
    /// Minutes
    pub long_break_duration: i64,
    pub auto_start_break: bool,
    pub notification_enabled: bool,
    pub notification_sound: NotificationSound,
    pub show_progress_bar: bool,
    pub progress_bar_width: i64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            focus_duration: 25,
            break_duration: 5,
            long_break_duration: 15,
            auto_start_break: false,
            notification_enabled: false,
            notification_sound: NotificationSound::Bell,
            show_progress_bar: true,
            progress_bar_width: 20,
        }
    }
}

/// `[ui]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiConfig {
    pub border_style: BorderStyle,
    pub panel_padding: i64,
    pub show_footer: bool,
    pub show_header: bool,
    pub compact_view: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            border_style: BorderStyle::Solid,
            panel_padding: 1,
            show_footer: true,
            show_header: true,
            compact_view: false,
        }
    }
}

/// `[keybindings]` - one key or combo (`ctrl+x`, `space`) per action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeybindingsConfig {
    pub quit: String,
    pub help: String,
    pub refresh: String,
    pub add_task: String,
    pub edit_task: String,
    pub toggle_task: String,
    pub delete_task: String,
    pub set_priority: String,
    pub toggle_completed: String,
    pub cycle_sort: String,
    pub export_tasks: String,
    pub timer_focus: String,
    pub timer_break: String,
    pub timer_stop: String,
    pub reload_config: String,
    pub edit_config: String,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            refresh: "r".to_string(),
            add_task: "a".to_string(),
            edit_task: "e".to_string(),
            toggle_task: "space".to_string(),
            delete_task: "d".to_string(),
            set_priority: "p".to_string(),
            toggle_completed: "f".to_string(),
            cycle_sort: "s".to_string(),
            export_tasks: "x".to_string(),
            timer_focus: "F".to_string(),
            timer_break: "B".to_string(),
            timer_stop: "S".to_string(),
            reload_config: "c".to_string(),
            edit_config: "C".to_string(),
        }
    }
}

impl KeybindingsConfig {
    /// `(action name, binding)` pairs in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("quit", self.quit.as_str()),
            ("help", self.help.as_str()),
            ("refresh", self.refresh.as_str()),
            ("add_task", self.add_task.as_str()),
            ("edit_task", self.edit_task.as_str()),
            ("toggle_task", self.toggle_task.as_str()),
            ("delete_task", self.delete_task.as_str()),
            ("set_priority", self.set_priority.as_str()),
            ("toggle_completed", self.toggle_completed.as_str()),
            ("cycle_sort", self.cycle_sort.as_str()),
            ("export_tasks", self.export_tasks.as_str()),
            ("timer_focus", self.timer_focus.as_str()),
            ("timer_break", self.timer_break.as_str()),
            ("timer_stop", self.timer_stop.as_str()),
            ("reload_config", self.reload_config.as_str()),
            ("edit_config", self.edit_config.as_str()),
        ]
    }
}

/// Root configuration object containing every section.
///
/// `DevDashConfig::default()` is the defaults factory: every field is
/// populated and the result validates without warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DevDashConfig {
    pub general: GeneralConfig,
    pub git: GitConfig,
    pub system: SystemConfig,
    pub tasks: TasksConfig,
    pub timer: TimerConfig,
    pub ui: UiConfig,
    pub keybindings: KeybindingsConfig,
}

impl DevDashConfig {
    /// Render the configuration as a TOML document.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Example configuration printed by `devdash --print-example-config`.
///
/// Every value equals the built-in default.
pub const EXAMPLE_CONFIG: &str = r#"# devdash configuration
#
# Looked up in order:
#   ./.devdash.toml
#   <config dir>/devdash/config.toml   (~/.config/devdash/config.toml on Linux)
#   ~/.devdash.toml
#
# Any field may be omitted; omitted or mistyped fields use the default.

[general]
theme = "default"
layout = "default"
update_header = true

[git]
enabled = true
refresh_interval = 5        # seconds, >= 1
max_commits = 3             # 0-20
show_staged = true
show_modified = true
show_untracked = true
compact_mode = false
# repository_path = "~/src/project"

[system]
enabled = true
refresh_interval = 1        # seconds, >= 0.5
show_cpu = true
show_ram = true
show_disk = true
show_uptime = true
show_load_avg = true
cpu_warning_threshold = 60.0
cpu_critical_threshold = 80.0
ram_warning_threshold = 60.0
ram_critical_threshold = 80.0
disk_warning_threshold = 60.0
disk_critical_threshold = 80.0
progress_bar_width = 10     # 5-50
progress_bar_style = "blocks"   # blocks | bars | dots

[tasks]
enabled = true
file_path = ".devdash_tasks.json"
default_sort = "created"    # created | priority | due_date | text
show_completed = true
# default_priority_filter = "high"   # high | medium | low
# default_category_filter = "work"
max_visible_tasks = 20      # 1-100
truncate_length = 40        # 20-200
show_categories = true
show_due_dates = true
show_priority_emoji = true
due_soon_days = 3           # 1-30
export_format = "grouped"   # grouped | simple | detailed

[timer]
enabled = true
focus_duration = 25         # minutes, 1-240
break_duration = 5          # minutes, 1-60
long_break_duration = 15    # minutes, 1-120
auto_start_break = false
notification_enabled = false
notification_sound = "bell" # bell | chime | silent
show_progress_bar = true
progress_bar_width = 20     # 10-60

[ui]
border_style = "solid"      # solid | double | rounded | heavy | none
panel_padding = 1           # 0-5
show_footer = true
show_header = true
compact_view = false

[keybindings]
quit = "q"
help = "?"
refresh = "r"
add_task = "a"
edit_task = "e"
toggle_task = "space"
delete_task = "d"
set_priority = "p"
toggle_completed = "f"
cycle_sort = "s"
export_tasks = "x"
timer_focus = "F"
timer_break = "B"
timer_stop = "S"
reload_config = "c"
edit_config = "C"
"#;
