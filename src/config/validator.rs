//! Range and consistency checks over a merged configuration.
//!
//! Validation never mutates the config and never fails: every problem is
//! reported as a human-readable warning naming the field, the offending
//! value, the accepted range and the default the dashboard falls back to.
//! Enum membership is enforced earlier, while merging (see
//! [`crate::config::loader`]).

use std::collections::HashMap;

use crate::config::keys::KeyBinding;
use crate::config::schema::{
    DevDashConfig, GitConfig, KeybindingsConfig, SystemConfig, TasksConfig, TimerConfig, UiConfig,
};

/// Validate every section, in order: git, system, tasks, timer, ui,
/// keybindings.
pub fn validate(config: &DevDashConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    warnings.extend(validate_git(&config.git));
    warnings.extend(validate_system(&config.system));
    warnings.extend(validate_tasks(&config.tasks));
    warnings.extend(validate_timer(&config.timer));
    warnings.extend(validate_ui(&config.ui));
    warnings.extend(validate_keybindings(&config.keybindings));
    warnings
}

/// Push a warning when `value` is outside `min..=max`.
fn check_range(
    warnings: &mut Vec<String>,
    field: &str,
    value: i64,
    (min, max): (i64, i64),
    unit: &str,
    default: i64,
) {
    if value < min || value > max {
        warnings.push(format!(
            "{} should be {}-{}{} (got {}), using default: {}",
            field, min, max, unit, value, default
        ));
    }
}

pub fn validate_git(config: &GitConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.refresh_interval < 1 {
        warnings.push(format!(
            "git.refresh_interval must be >= 1 (got {}), using default: 5",
            config.refresh_interval
        ));
    }
    if config.refresh_interval > 3600 {
        warnings.push(format!(
            "git.refresh_interval is very large ({}s = {} minutes)",
            config.refresh_interval,
            config.refresh_interval / 60
        ));
    }
    check_range(
        &mut warnings,
        "git.max_commits",
        config.max_commits,
        (0, 20),
        "",
        3,
    );

    warnings
}

pub fn validate_system(config: &SystemConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.refresh_interval < 0.5 {
        warnings.push(format!(
            "system.refresh_interval must be >= 0.5 (got {:?}), using default: 1",
            config.refresh_interval
        ));
    }
    if config.refresh_interval > 60.0 {
        warnings.push(format!(
            "system.refresh_interval is very large ({:?}s)",
            config.refresh_interval
        ));
    }

    let pairs = [
        (
            "cpu_warning_threshold",
            config.cpu_warning_threshold,
            "cpu_critical_threshold",
            config.cpu_critical_threshold,
        ),
        (
            "ram_warning_threshold",
            config.ram_warning_threshold,
            "ram_critical_threshold",
            config.ram_critical_threshold,
        ),
        (
            "disk_warning_threshold",
            config.disk_warning_threshold,
            "disk_critical_threshold",
            config.disk_critical_threshold,
        ),
    ];

    for (warning_field, warning, critical_field, critical) in pairs {
        if !(0.0..=100.0).contains(&warning) {
            warnings.push(format!(
                "system.{} must be 0-100 (got {:?}), using default: 60",
                warning_field, warning
            ));
        }
        if !(0.0..=100.0).contains(&critical) {
            warnings.push(format!(
                "system.{} must be 0-100 (got {:?}), using default: 80",
                critical_field, critical
            ));
        }
        // Reported independently of the bound checks above.
        if warning >= critical {
            warnings.push(format!(
                "system.{} ({:?}) should be less than system.{} ({:?})",
                warning_field, warning, critical_field, critical
            ));
        }
    }

    check_range(
        &mut warnings,
        "system.progress_bar_width",
        config.progress_bar_width,
        (5, 50),
        "",
        10,
    );

    warnings
}

pub fn validate_tasks(config: &TasksConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.file_path.trim().is_empty() {
        warnings.push(
            "tasks.file_path must not be empty, using default: '.devdash_tasks.json'".to_string(),
        );
    }
    check_range(
        &mut warnings,
        "tasks.max_visible_tasks",
        config.max_visible_tasks,
        (1, 100),
        "",
        20,
    );
    check_range(
        &mut warnings,
        "tasks.truncate_length",
        config.truncate_length,
        (20, 200),
        "",
        40,
    );
    check_range(
        &mut warnings,
        "tasks.due_soon_days",
        config.due_soon_days,
        (1, 30),
        "",
        3,
    );

    warnings
}

pub fn validate_timer(config: &TimerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    check_range(
        &mut warnings,
        "timer.focus_duration",
        config.focus_duration,
        (1, 240),
        " minutes",
        25,
    );
    check_range(
        &mut warnings,
        "timer.break_duration",
        config.break_duration,
        (1, 60),
        " minutes",
        5,
    );
    check_range(
        &mut warnings,
        "timer.long_break_duration",
        config.long_break_duration,
        (1, 120),
        " minutes",
        15,
    );
    check_range(
        &mut warnings,
        "timer.progress_bar_width",
        config.progress_bar_width,
        (10, 60),
        "",
        20,
    );

    warnings
}

pub fn validate_ui(config: &UiConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    check_range(
        &mut warnings,
        "ui.panel_padding",
        config.panel_padding,
        (0, 5),
        "",
        1,
    );
    warnings
}

pub fn validate_keybindings(config: &KeybindingsConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let defaults = KeybindingsConfig::default();
    let default_entries: HashMap<&str, &str> = defaults.entries().into_iter().collect();
    let mut seen: HashMap<KeyBinding, &str> = HashMap::new();

    for (action, binding) in config.entries() {
        let default = default_entries.get(action).copied().unwrap_or_default();
        match KeyBinding::parse(binding) {
            None => warnings.push(format!(
                "keybindings.{} is not a valid key (got '{}'), using default: '{}'",
                action, binding, default
            )),
            Some(key) => {
                if let Some(other) = seen.insert(key, action) {
                    warnings.push(format!(
                        "keybindings.{} ('{}') conflicts with keybindings.{}",
                        action, binding, other
                    ));
                }
            }
        }
    }

    warnings
}
