//! Editing a subset of the configuration and saving it back to disk.
//!
//! The editable fields are the ones worth changing while the dashboard is
//! running. Everything else in the config is written back unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::loader::{ConfigLocations, PROJECT_CONFIG_FILE, find_config_file};
use crate::config::schema::{Choice, DevDashConfig, SortKey};

/// A config value that can be edited as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    GitRefreshInterval,
    GitMaxCommits,
    SystemRefreshInterval,
    CpuWarningThreshold,
    CpuCriticalThreshold,
    SystemProgressBarWidth,
    TasksFilePath,
    TasksDefaultSort,
    TasksMaxVisible,
    TimerFocusDuration,
    TimerBreakDuration,
    TimerProgressBarWidth,
}

impl ConfigField {
    pub const ALL: [ConfigField; 12] = [
        ConfigField::GitRefreshInterval,
        ConfigField::GitMaxCommits,
        ConfigField::SystemRefreshInterval,
        ConfigField::CpuWarningThreshold,
        ConfigField::CpuCriticalThreshold,
        ConfigField::SystemProgressBarWidth,
        ConfigField::TasksFilePath,
        ConfigField::TasksDefaultSort,
        ConfigField::TasksMaxVisible,
        ConfigField::TimerFocusDuration,
        ConfigField::TimerBreakDuration,
        ConfigField::TimerProgressBarWidth,
    ];

    /// Dotted TOML key.
    pub fn key(self) -> &'static str {
        match self {
            ConfigField::GitRefreshInterval => "git.refresh_interval",
            ConfigField::GitMaxCommits => "git.max_commits",
            ConfigField::SystemRefreshInterval => "system.refresh_interval",
            ConfigField::CpuWarningThreshold => "system.cpu_warning_threshold",
            ConfigField::CpuCriticalThreshold => "system.cpu_critical_threshold",
            ConfigField::SystemProgressBarWidth => "system.progress_bar_width",
            ConfigField::TasksFilePath => "tasks.file_path",
            ConfigField::TasksDefaultSort => "tasks.default_sort",
            ConfigField::TasksMaxVisible => "tasks.max_visible_tasks",
            ConfigField::TimerFocusDuration => "timer.focus_duration",
            ConfigField::TimerBreakDuration => "timer.break_duration",
            ConfigField::TimerProgressBarWidth => "timer.progress_bar_width",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::GitRefreshInterval => "Git refresh interval (s)",
            ConfigField::GitMaxCommits => "Git max commits",
            ConfigField::SystemRefreshInterval => "System refresh interval (s)",
            ConfigField::CpuWarningThreshold => "CPU warning %",
            ConfigField::CpuCriticalThreshold => "CPU critical %",
            ConfigField::SystemProgressBarWidth => "System progress bar width",
            ConfigField::TasksFilePath => "Task file path",
            ConfigField::TasksDefaultSort => "Default sort",
            ConfigField::TasksMaxVisible => "Max visible tasks",
            ConfigField::TimerFocusDuration => "Focus duration (min)",
            ConfigField::TimerBreakDuration => "Break duration (min)",
            ConfigField::TimerProgressBarWidth => "Timer progress bar width",
        }
    }

    /// Current value rendered for editing.
    pub fn read(self, config: &DevDashConfig) -> String {
        match self {
            ConfigField::GitRefreshInterval => config.git.refresh_interval.to_string(),
            ConfigField::GitMaxCommits => config.git.max_commits.to_string(),
            ConfigField::SystemRefreshInterval => config.system.refresh_interval.to_string(),
            ConfigField::CpuWarningThreshold => config.system.cpu_warning_threshold.to_string(),
            ConfigField::CpuCriticalThreshold => config.system.cpu_critical_threshold.to_string(),
            ConfigField::SystemProgressBarWidth => config.system.progress_bar_width.to_string(),
            ConfigField::TasksFilePath => config.tasks.file_path.clone(),
            ConfigField::TasksDefaultSort => config.tasks.default_sort.as_str().to_string(),
            ConfigField::TasksMaxVisible => config.tasks.max_visible_tasks.to_string(),
            ConfigField::TimerFocusDuration => config.timer.focus_duration.to_string(),
            ConfigField::TimerBreakDuration => config.timer.break_duration.to_string(),
            ConfigField::TimerProgressBarWidth => config.timer.progress_bar_width.to_string(),
        }
    }

    /// Parse `raw` and store it in `config`.
    ///
    /// Returns a message naming the field when the text does not parse or
    /// is out of range.
    pub fn apply(self, config: &mut DevDashConfig, raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        match self {
            ConfigField::GitRefreshInterval => {
                config.git.refresh_interval = self.int(raw, 1, 3600)?;
            }
            ConfigField::GitMaxCommits => config.git.max_commits = self.int(raw, 0, 20)?,
            ConfigField::SystemRefreshInterval => {
                config.system.refresh_interval = self.float(raw, 0.5, 60.0)?;
            }
            ConfigField::CpuWarningThreshold => {
                config.system.cpu_warning_threshold = self.float(raw, 0.0, 100.0)?;
            }
            ConfigField::CpuCriticalThreshold => {
                config.system.cpu_critical_threshold = self.float(raw, 0.0, 100.0)?;
            }
            ConfigField::SystemProgressBarWidth => {
                config.system.progress_bar_width = self.int(raw, 5, 50)?;
            }
            ConfigField::TasksFilePath => {
                if raw.is_empty() {
                    return Err(format!("{} must not be empty", self.key()));
                }
                config.tasks.file_path = raw.to_string();
            }
            ConfigField::TasksDefaultSort => {
                config.tasks.default_sort = SortKey::parse(raw).ok_or_else(|| {
                    format!("{} must be one of {}", self.key(), SortKey::variant_list())
                })?;
            }
            ConfigField::TasksMaxVisible => {
                config.tasks.max_visible_tasks = self.int(raw, 1, 100)?;
            }
            ConfigField::TimerFocusDuration => {
                config.timer.focus_duration = self.int(raw, 1, 240)?;
            }
            ConfigField::TimerBreakDuration => {
                config.timer.break_duration = self.int(raw, 1, 60)?;
            }
            ConfigField::TimerProgressBarWidth => {
                config.timer.progress_bar_width = self.int(raw, 10, 60)?;
            }
        }
        Ok(())
    }

    fn int(self, raw: &str, min: i64, max: i64) -> Result<i64, String> {
        let value: i64 = raw
            .parse()
            .map_err(|_| format!("{} must be a whole number (got '{}')", self.key(), raw))?;
        if value < min || value > max {
            return Err(format!("{} should be {}-{} (got {})", self.key(), min, max, value));
        }
        Ok(value)
    }

    fn float(self, raw: &str, min: f64, max: f64) -> Result<f64, String> {
        let value: f64 = raw
            .parse()
            .map_err(|_| format!("{} must be a number (got '{}')", self.key(), raw))?;
        if !(min..=max).contains(&value) {
            return Err(format!(
                "{} should be {:?}-{:?} (got {:?})",
                self.key(),
                min,
                max,
                value
            ));
        }
        Ok(value)
    }
}

/// Apply edited values on top of `base`.
///
/// Every field error is collected; the config is only returned when all
/// values are accepted.
pub fn apply_edits(
    base: &DevDashConfig,
    values: &[(ConfigField, String)],
) -> Result<DevDashConfig, Vec<String>> {
    let mut config = base.clone();
    let mut errors: Vec<String> = values
        .iter()
        .filter_map(|(field, raw)| field.apply(&mut config, raw).err())
        .collect();

    if errors.is_empty()
        && config.system.cpu_warning_threshold >= config.system.cpu_critical_threshold
    {
        errors.push(format!(
            "system.cpu_warning_threshold ({:?}) should be less than system.cpu_critical_threshold ({:?})",
            config.system.cpu_warning_threshold, config.system.cpu_critical_threshold
        ));
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}

/// File the editor writes to.
///
/// An explicit path wins, then the discovered file, then `./.devdash.toml`.
pub fn save_path(custom_path: Option<&Path>, locations: &ConfigLocations) -> PathBuf {
    custom_path
        .map(Path::to_path_buf)
        .or_else(|| find_config_file(locations))
        .unwrap_or_else(|| locations.cwd.join(PROJECT_CONFIG_FILE))
}

/// Write `config` as a complete TOML document, creating parent directories.
pub fn save_config(config: &DevDashConfig, path: &Path) -> crate::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let body = config.to_toml()?;
    fs::write(
        path,
        format!("# devdash configuration\n# Saved by the config editor\n\n{}", body),
    )?;
    tracing::info!(path = %path.display(), "saved config");
    Ok(())
}
