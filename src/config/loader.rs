//! Config file discovery, parsing and merging onto defaults.
//!
//! ## Discovery order (first existing file wins)
//!
//! 1. `./.devdash.toml`
//! 2. `<config dir>/devdash/config.toml`
//! 3. `~/.devdash.toml`
//!
//! ## Merge rules
//!
//! Each known section present in the document is merged field by field. A
//! field is taken from the document only when its TOML kind matches the
//! declared type (integers are accepted for floats, booleans never count as
//! integers). Anything else silently keeps that field's default. Unknown
//! sections and fields are ignored.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::config::schema::{
    Choice, DevDashConfig, GeneralConfig, GitConfig, KeybindingsConfig, SystemConfig, TasksConfig,
    TimerConfig, UiConfig,
};
use crate::config::validator;

/// File name looked up in the working and home directories.
pub const PROJECT_CONFIG_FILE: &str = ".devdash.toml";

/// Directory and file name under the user config directory.
pub const USER_CONFIG_DIR: &str = "devdash";
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Error raised when a config file exists but cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("invalid syntax in {}: {detail}", path.display())]
    InvalidSyntax { path: PathBuf, detail: String },

    #[error("failed to load {}: {detail}", path.display())]
    Io { path: PathBuf, detail: String },
}

impl ConfigLoadError {
    /// Path of the file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            ConfigLoadError::PermissionDenied { path }
            | ConfigLoadError::InvalidSyntax { path, .. }
            | ConfigLoadError::Io { path, .. } => path,
        }
    }
}

/// Directories searched during discovery.
///
/// Passed explicitly so discovery can be exercised against temp dirs.
#[derive(Debug, Clone)]
pub struct ConfigLocations {
    pub cwd: PathBuf,
    pub config_dir: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl ConfigLocations {
    /// Locations for the current process.
    pub fn from_env() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_dir: dirs::config_dir(),
            home: dirs::home_dir(),
        }
    }

    /// Candidate paths in priority order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.cwd.join(PROJECT_CONFIG_FILE)];
        if let Some(ref dir) = self.config_dir {
            paths.push(dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE));
        }
        if let Some(ref home) = self.home {
            paths.push(home.join(PROJECT_CONFIG_FILE));
        }
        paths
    }
}

/// Find the first existing config file, if any.
pub fn find_config_file(locations: &ConfigLocations) -> Option<PathBuf> {
    locations
        .candidates()
        .into_iter()
        .find(|path| path.is_file())
}

/// Read and parse a TOML file.
///
/// An empty file yields an empty table.
pub fn load_toml(path: &Path) -> Result<Table, ConfigLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => ConfigLoadError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConfigLoadError::Io {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
    })?;

    content
        .parse::<Table>()
        .map_err(|e| ConfigLoadError::InvalidSyntax {
            path: path.to_path_buf(),
            detail: e.message().to_string(),
        })
}

/// Result of merging a document onto defaults.
#[derive(Debug, Clone, Default)]
pub struct Merged {
    pub config: DevDashConfig,
    /// Enum fields whose value named no variant
    pub warnings: Vec<String>,
}

/// A configuration together with where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: DevDashConfig,
    /// File the values were read from (`None` = built-in defaults)
    pub source: Option<PathBuf>,
    /// Warnings raised while merging
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Merge warnings followed by validator warnings.
    pub fn all_warnings(&self) -> Vec<String> {
        let mut all = self.warnings.clone();
        all.extend(validator::validate(&self.config));
        all
    }
}

/// Load configuration from an explicit path or by discovery.
///
/// Load errors are returned to the caller; only a discovery miss falls back
/// to defaults.
pub fn load_config(custom_path: Option<&Path>) -> Result<DevDashConfig, ConfigLoadError> {
    load_config_from(custom_path, &ConfigLocations::from_env()).map(|loaded| loaded.config)
}

/// Same as [`load_config`] with injected discovery locations and full report.
pub fn load_config_from(
    custom_path: Option<&Path>,
    locations: &ConfigLocations,
) -> Result<LoadedConfig, ConfigLoadError> {
    let path = match custom_path {
        Some(path) => path.to_path_buf(),
        None => match find_config_file(locations) {
            Some(path) => path,
            None => {
                tracing::debug!("no config file found, using defaults");
                return Ok(LoadedConfig::default());
            }
        },
    };

    let table = load_toml(&path)?;
    let merged = merge_config(DevDashConfig::default(), &table);
    tracing::info!(path = %path.display(), "loaded config");

    Ok(LoadedConfig {
        config: merged.config,
        source: Some(path),
        warnings: merged.warnings,
    })
}

/// Merge a parsed document onto `defaults`.
pub fn merge_config(defaults: DevDashConfig, doc: &Table) -> Merged {
    let mut warnings = Vec::new();
    let DevDashConfig {
        general,
        git,
        system,
        tasks,
        timer,
        ui,
        keybindings,
    } = defaults;

    let config = DevDashConfig {
        general: merge_section(doc, "general", general, &mut warnings, merge_general),
        git: merge_section(doc, "git", git, &mut warnings, merge_git),
        system: merge_section(doc, "system", system, &mut warnings, merge_system),
        tasks: merge_section(doc, "tasks", tasks, &mut warnings, merge_tasks),
        timer: merge_section(doc, "timer", timer, &mut warnings, merge_timer),
        ui: merge_section(doc, "ui", ui, &mut warnings, merge_ui),
        keybindings: merge_section(
            doc,
            "keybindings",
            keybindings,
            &mut warnings,
            merge_keybindings,
        ),
    };

    Merged { config, warnings }
}

fn merge_section<T>(
    doc: &Table,
    name: &'static str,
    default: T,
    warnings: &mut Vec<String>,
    merge: fn(&mut SectionReader<'_>, T) -> T,
) -> T {
    match doc.get(name) {
        Some(Value::Table(table)) => {
            let mut reader = SectionReader {
                section: name,
                table,
                warnings,
            };
            merge(&mut reader, default)
        }
        Some(other) => {
            tracing::debug!(
                section = name,
                kind = other.type_str(),
                "config section is not a table, using defaults"
            );
            default
        }
        None => default,
    }
}

/// Typed accessors over one section table.
///
/// Each accessor returns the document value when present and of the right
/// kind, otherwise the supplied default.
struct SectionReader<'a> {
    section: &'static str,
    table: &'a Table,
    warnings: &'a mut Vec<String>,
}

impl SectionReader<'_> {
    fn mismatch(&self, key: &str, expected: &str, got: &Value) {
        tracing::debug!(
            section = self.section,
            field = key,
            expected,
            got = got.type_str(),
            "config type mismatch, using default"
        );
    }

    fn bool(&self, key: &str, default: bool) -> bool {
        match self.table.get(key) {
            Some(Value::Boolean(b)) => *b,
            Some(other) => {
                self.mismatch(key, "boolean", other);
                default
            }
            None => default,
        }
    }

    fn int(&self, key: &str, default: i64) -> i64 {
        match self.table.get(key) {
            Some(Value::Integer(i)) => *i,
            Some(other) => {
                self.mismatch(key, "integer", other);
                default
            }
            None => default,
        }
    }

    fn float(&self, key: &str, default: f64) -> f64 {
        match self.table.get(key) {
            Some(Value::Float(f)) => *f,
            Some(Value::Integer(i)) => *i as f64,
            Some(other) => {
                self.mismatch(key, "float", other);
                default
            }
            None => default,
        }
    }

    fn string(&self, key: &str, default: String) -> String {
        match self.table.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.mismatch(key, "string", other);
                default
            }
            None => default,
        }
    }

    /// Optional string. The built-in defaults are `None`, so an omitted key
    /// stays unset unless the caller supplies something else.
    fn opt_string(&self, key: &str, default: Option<String>) -> Option<String> {
        match self.table.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.mismatch(key, "string", other);
                default
            }
            None => default,
        }
    }

    fn choice<C: Choice>(&mut self, key: &str, default: C) -> C {
        match self.table.get(key) {
            Some(Value::String(s)) => match C::parse(s) {
                Some(value) => value,
                None => {
                    self.warnings.push(format!(
                        "{}.{} must be one of {} (got '{}'), using default: '{}'",
                        self.section,
                        key,
                        C::variant_list(),
                        s,
                        default.as_str()
                    ));
                    default
                }
            },
            Some(other) => {
                self.mismatch(key, "string", other);
                default
            }
            None => default,
        }
    }

    fn opt_choice<C: Choice>(&mut self, key: &str, default: Option<C>) -> Option<C> {
        match self.table.get(key) {
            Some(Value::String(s)) => match C::parse(s) {
                Some(value) => Some(value),
                None => {
                    let shown = default
                        .map(|d| format!("'{}'", d.as_str()))
                        .unwrap_or_else(|| "null".to_string());
                    self.warnings.push(format!(
                        "{}.{} must be one of {} or null (got '{}'), using default: {}",
                        self.section,
                        key,
                        C::variant_list(),
                        s,
                        shown
                    ));
                    default
                }
            },
            Some(other) => {
                self.mismatch(key, "string", other);
                default
            }
            None => default,
        }
    }
}

fn merge_general(r: &mut SectionReader<'_>, d: GeneralConfig) -> GeneralConfig {
    GeneralConfig {
        theme: r.string("theme", d.theme),
        layout: r.string("layout", d.layout),
        update_header: r.bool("update_header", d.update_header),
    }
}

fn merge_git(r: &mut SectionReader<'_>, d: GitConfig) -> GitConfig {
    GitConfig {
        enabled: r.bool("enabled", d.enabled),
        refresh_interval: r.int("refresh_interval", d.refresh_interval),
        max_commits: r.int("max_commits", d.max_commits),
        show_staged: r.bool("show_staged", d.show_staged),
        show_modified: r.bool("show_modified", d.show_modified),
        show_untracked: r.bool("show_untracked", d.show_untracked),
        compact_mode: r.bool("compact_mode", d.compact_mode),
        repository_path: r.opt_string("repository_path", d.repository_path),
    }
}

fn merge_system(r: &mut SectionReader<'_>, d: SystemConfig) -> SystemConfig {
    SystemConfig {
        enabled: r.bool("enabled", d.enabled),
        refresh_interval: r.float("refresh_interval", d.refresh_interval),
        show_cpu: r.bool("show_cpu", d.show_cpu),
        show_ram: r.bool("show_ram", d.show_ram),
        show_disk: r.bool("show_disk", d.show_disk),
        show_uptime: r.bool("show_uptime", d.show_uptime),
        show_load_avg: r.bool("show_load_avg", d.show_load_avg),
        cpu_warning_threshold: r.float("cpu_warning_threshold", d.cpu_warning_threshold),
        cpu_critical_threshold: r.float("cpu_critical_threshold", d.cpu_critical_threshold),
        ram_warning_threshold: r.float("ram_warning_threshold", d.ram_warning_threshold),
        ram_critical_threshold: r.float("ram_critical_threshold", d.ram_critical_threshold),
        disk_warning_threshold: r.float("disk_warning_threshold", d.disk_warning_threshold),
        disk_critical_threshold: r.float("disk_critical_threshold", d.disk_critical_threshold),
        progress_bar_width: r.int("progress_bar_width", d.progress_bar_width),
        progress_bar_style: r.choice("progress_bar_style", d.progress_bar_style),
    }
}

fn merge_tasks(r: &mut SectionReader<'_>, d: TasksConfig) -> TasksConfig {
    TasksConfig {
        enabled: r.bool("enabled", d.enabled),
        file_path: r.string("file_path", d.file_path),
        default_sort: r.choice("default_sort", d.default_sort),
        show_completed: r.bool("show_completed", d.show_completed),
        default_priority_filter: r.opt_choice(
            "default_priority_filter",
            d.default_priority_filter,
        ),
        default_category_filter: r.opt_string(
            "default_category_filter",
            d.default_category_filter,
        ),
        max_visible_tasks: r.int("max_visible_tasks", d.max_visible_tasks),
        truncate_length: r.int("truncate_length", d.truncate_length),
        show_categories: r.bool("show_categories", d.show_categories),
        show_due_dates: r.bool("show_due_dates", d.show_due_dates),
        show_priority_emoji: r.bool("show_priority_emoji", d.show_priority_emoji),
        due_soon_days: r.int("due_soon_days", d.due_soon_days),
        export_format: r.choice("export_format", d.export_format),
    }
}

fn merge_timer(r: &mut SectionReader<'_>, d: TimerConfig) -> TimerConfig {
    TimerConfig {
        enabled: r.bool("enabled", d.enabled),
        focus_duration: r.int("focus_duration", d.focus_duration),
        break_duration: r.int("break_duration", d.break_duration),
        long_break_duration: r.int("long_break_duration", d.long_break_duration),
        auto_start_break: r.bool("auto_start_break", d.auto_start_break),
        notification_enabled: r.bool("notification_enabled", d.notification_enabled),
        notification_sound: r.choice("notification_sound", d.notification_sound),
        show_progress_bar: r.bool("show_progress_bar", d.show_progress_bar),
        progress_bar_width: r.int("progress_bar_width", d.progress_bar_width),
    }
}

fn merge_ui(r: &mut SectionReader<'_>, d: UiConfig) -> UiConfig {
    UiConfig {
        border_style: r.choice("border_style", d.border_style),
        panel_padding: r.int("panel_padding", d.panel_padding),
        show_footer: r.bool("show_footer", d.show_footer),
        show_header: r.bool("show_header", d.show_header),
        compact_view: r.bool("compact_view", d.compact_view),
    }
}

fn merge_keybindings(r: &mut SectionReader<'_>, d: KeybindingsConfig) -> KeybindingsConfig {
    KeybindingsConfig {
        quit: r.string("quit", d.quit),
        help: r.string("help", d.help),
        refresh: r.string("refresh", d.refresh),
        add_task: r.string("add_task", d.add_task),
        edit_task: r.string("edit_task", d.edit_task),
        toggle_task: r.string("toggle_task", d.toggle_task),
        delete_task: r.string("delete_task", d.delete_task),
        set_priority: r.string("set_priority", d.set_priority),
        toggle_completed: r.string("toggle_completed", d.toggle_completed),
        cycle_sort: r.string("cycle_sort", d.cycle_sort),
        export_tasks: r.string("export_tasks", d.export_tasks),
        timer_focus: r.string("timer_focus", d.timer_focus),
        timer_break: r.string("timer_break", d.timer_break),
        timer_stop: r.string("timer_stop", d.timer_stop),
        reload_config: r.string("reload_config", d.reload_config),
        edit_config: r.string("edit_config", d.edit_config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{BorderStyle, EXAMPLE_CONFIG, ExportFormat, SortKey};
    use crate::models::Priority;
    use std::fs;
    use tempfile::TempDir;

    fn parse(doc: &str) -> Table {
        doc.parse::<Table>().unwrap()
    }

    fn merge(doc: &str) -> Merged {
        merge_config(DevDashConfig::default(), &parse(doc))
    }

    /// Locations rooted in a temp dir: `<tmp>/cwd`, `<tmp>/config`, `<tmp>/home`.
    fn temp_locations(tmp: &TempDir) -> ConfigLocations {
        let locations = ConfigLocations {
            cwd: tmp.path().join("cwd"),
            config_dir: Some(tmp.path().join("config")),
            home: Some(tmp.path().join("home")),
        };
        fs::create_dir_all(&locations.cwd).unwrap();
        fs::create_dir_all(tmp.path().join("config").join(USER_CONFIG_DIR)).unwrap();
        fs::create_dir_all(tmp.path().join("home")).unwrap();
        locations
    }

    // ==================== Discovery Tests ====================

    #[test]
    fn test_find_config_file_none_exists() {
        let tmp = TempDir::new().unwrap();
        let locations = temp_locations(&tmp);
        assert_eq!(find_config_file(&locations), None);
    }

    #[test]
    fn test_find_config_file_each_level() {
        let tmp = TempDir::new().unwrap();
        let locations = temp_locations(&tmp);

        let home = tmp.path().join("home").join(PROJECT_CONFIG_FILE);
        fs::write(&home, "").unwrap();
        assert_eq!(find_config_file(&locations), Some(home));

        let user = tmp
            .path()
            .join("config")
            .join(USER_CONFIG_DIR)
            .join(USER_CONFIG_FILE);
        fs::write(&user, "").unwrap();
        assert_eq!(find_config_file(&locations), Some(user));

        let project = locations.cwd.join(PROJECT_CONFIG_FILE);
        fs::write(&project, "").unwrap();
        assert_eq!(find_config_file(&locations), Some(project));
    }

    #[test]
    fn test_find_config_file_skips_directories() {
        let tmp = TempDir::new().unwrap();
        let locations = temp_locations(&tmp);
        fs::create_dir_all(locations.cwd.join(PROJECT_CONFIG_FILE)).unwrap();
        assert_eq!(find_config_file(&locations), None);
    }

    // ==================== load_toml Tests ====================

    #[test]
    fn test_load_toml_valid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[git]\nrefresh_interval = 10\n\n[timer]\nfocus_duration = 30\n").unwrap();

        let table = load_toml(&path).unwrap();
        assert_eq!(table["git"]["refresh_interval"].as_integer(), Some(10));
        assert_eq!(table["timer"]["focus_duration"].as_integer(), Some(30));
    }

    #[test]
    fn test_load_toml_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.toml");
        fs::write(&path, "").unwrap();
        assert!(load_toml(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_toml_invalid_syntax() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[git\nrefresh_interval = ").unwrap();

        let err = load_toml(&path).unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidSyntax { .. }));
        assert!(err.to_string().starts_with("invalid syntax in "));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn test_load_toml_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");
        let err = load_toml(&path).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io { .. }));
        assert!(err.to_string().starts_with("failed to load "));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_toml_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("locked.toml");
        fs::write(&path, "[git]\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores file modes; nothing to assert in that case.
        if fs::read(&path).is_ok() {
            return;
        }
        let err = load_toml(&path).unwrap_err();
        assert_eq!(err.to_string(), format!("permission denied: {}", path.display()));
    }

    // ==================== load_config Tests ====================

    #[test]
    fn test_load_config_no_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_config_from(None, &temp_locations(&tmp)).unwrap();
        assert_eq!(loaded.config, DevDashConfig::default());
        assert!(loaded.source.is_none());
        assert!(loaded.all_warnings().is_empty());
    }

    #[test]
    fn test_load_config_with_custom_path() {
        let tmp = TempDir::new().unwrap();
        let locations = temp_locations(&tmp);
        // A discoverable file that must be ignored in favour of the custom one.
        fs::write(locations.cwd.join(PROJECT_CONFIG_FILE), "[git]\nmax_commits = 9\n").unwrap();
        let custom = tmp.path().join("custom.toml");
        fs::write(&custom, "[git]\nrefresh_interval = 15\n").unwrap();

        let loaded = load_config_from(Some(&custom), &locations).unwrap();
        assert_eq!(loaded.config.git.refresh_interval, 15);
        assert_eq!(loaded.config.git.max_commits, 3);
        assert_eq!(loaded.config.timer.focus_duration, 25);
        assert_eq!(loaded.source, Some(custom));
    }

    #[test]
    fn test_load_config_missing_custom_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.toml");
        let err = load_config_from(Some(&missing), &temp_locations(&tmp)).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io { .. }));
    }

    #[test]
    fn test_load_config_invalid_syntax_custom_and_discovered() {
        let tmp = TempDir::new().unwrap();
        let locations = temp_locations(&tmp);
        let bad = "[timer\nfocus_duration = 30\n";

        let custom = tmp.path().join("custom.toml");
        fs::write(&custom, bad).unwrap();
        let err = load_config_from(Some(&custom), &locations).unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidSyntax { .. }));

        fs::write(locations.cwd.join(PROJECT_CONFIG_FILE), bad).unwrap();
        let err = load_config_from(None, &locations).unwrap_err();
        assert!(matches!(err, ConfigLoadError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_example_config_merges_to_defaults() {
        let merged = merge(EXAMPLE_CONFIG);
        assert!(merged.warnings.is_empty());
        assert_eq!(merged.config, DevDashConfig::default());
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_merge_section_partial_values() {
        let merged = merge("[git]\nrefresh_interval = 15\n").config;
        assert_eq!(merged.git.refresh_interval, 15);
        assert_eq!(merged.git.max_commits, 3);
        assert!(merged.git.show_staged);
        assert_eq!(merged.timer.focus_duration, 25);
    }

    #[test]
    fn test_merge_multiple_sections() {
        let merged = merge(
            "[git]\nrefresh_interval = 15\nmax_commits = 7\n\n[timer]\nfocus_duration = 35\n",
        )
        .config;
        assert_eq!(merged.git.refresh_interval, 15);
        assert_eq!(merged.git.max_commits, 7);
        assert_eq!(merged.timer.focus_duration, 35);
        assert_eq!(merged.system.refresh_interval, 1.0);
    }

    #[test]
    fn test_merge_full_document() {
        let merged = merge(
            r#"
[general]
theme = "dark"

[git]
refresh_interval = 10
max_commits = 5
show_staged = false

[system]
refresh_interval = 2
cpu_warning_threshold = 70.0

[tasks]
default_sort = "priority"
max_visible_tasks = 30
export_format = "detailed"

[timer]
focus_duration = 40
break_duration = 8

[ui]
border_style = "rounded"
"#,
        )
        .config;
        assert_eq!(merged.general.theme, "dark");
        assert_eq!(merged.git.refresh_interval, 10);
        assert_eq!(merged.git.max_commits, 5);
        assert!(!merged.git.show_staged);
        assert_eq!(merged.system.refresh_interval, 2.0);
        assert_eq!(merged.system.cpu_warning_threshold, 70.0);
        assert_eq!(merged.tasks.default_sort, SortKey::Priority);
        assert_eq!(merged.tasks.max_visible_tasks, 30);
        assert_eq!(merged.tasks.export_format, ExportFormat::Detailed);
        assert_eq!(merged.timer.focus_duration, 40);
        assert_eq!(merged.timer.break_duration, 8);
        assert_eq!(merged.ui.border_style, BorderStyle::Rounded);
    }

    #[test]
    fn test_merge_type_mismatch_keeps_siblings() {
        let merged = merge(
            "[git]\nrefresh_interval = \"fast\"\nenabled = \"yes\"\nmax_commits = 7\n",
        );
        assert!(merged.warnings.is_empty());
        assert_eq!(merged.config.git.refresh_interval, 5);
        assert!(merged.config.git.enabled);
        assert_eq!(merged.config.git.max_commits, 7);
    }

    #[test]
    fn test_merge_bool_is_not_int_and_int_is_not_bool() {
        let merged = merge("[git]\nmax_commits = true\nshow_staged = 0\n").config;
        assert_eq!(merged.git.max_commits, 3);
        assert!(merged.git.show_staged);
    }

    #[test]
    fn test_merge_int_accepted_for_float() {
        let merged = merge("[system]\ncpu_warning_threshold = 50\nrefresh_interval = 0.5\n").config;
        assert_eq!(merged.system.cpu_warning_threshold, 50.0);
        assert_eq!(merged.system.refresh_interval, 0.5);
    }

    #[test]
    fn test_merge_float_not_accepted_for_int() {
        let merged = merge("[timer]\nfocus_duration = 30.5\n").config;
        assert_eq!(merged.timer.focus_duration, 25);
    }

    #[test]
    fn test_merge_optional_fields() {
        let merged = merge(
            "[tasks]\ndefault_priority_filter = \"high\"\ndefault_category_filter = \"work\"\n",
        )
        .config;
        assert_eq!(merged.tasks.default_priority_filter, Some(Priority::High));
        assert_eq!(merged.tasks.default_category_filter.as_deref(), Some("work"));

        let merged = merge("[tasks]\ndefault_sort = \"priority\"\n").config;
        assert_eq!(merged.tasks.default_sort, SortKey::Priority);
        assert_eq!(merged.tasks.default_priority_filter, None);
    }

    #[test]
    fn test_merge_optional_fields_use_supplied_defaults() {
        let mut defaults = DevDashConfig::default();
        defaults.git.repository_path = Some("/srv/repo".to_string());
        defaults.tasks.default_priority_filter = Some(Priority::Low);
        defaults.tasks.default_category_filter = Some("home".to_string());

        let doc = parse(
            "[git]\nrepository_path = 7\n\n[tasks]\ndefault_priority_filter = \"urgent\"\n",
        );
        let merged = merge_config(defaults, &doc);
        assert_eq!(merged.config.git.repository_path.as_deref(), Some("/srv/repo"));
        assert_eq!(merged.config.tasks.default_priority_filter, Some(Priority::Low));
        assert_eq!(merged.config.tasks.default_category_filter.as_deref(), Some("home"));
        assert!(merged.warnings[0].ends_with("using default: 'low'"));
    }

    #[test]
    fn test_merge_invalid_choice_defaults_with_warning() {
        let merged = merge("[ui]\nborder_style = \"wavy\"\npanel_padding = 2\n");
        assert_eq!(merged.config.ui.border_style, BorderStyle::Solid);
        assert_eq!(merged.config.ui.panel_padding, 2);
        assert_eq!(merged.warnings.len(), 1);
        assert!(merged.warnings[0].contains("ui.border_style must be one of"));
        assert!(merged.warnings[0].contains("'wavy'"));
    }

    #[test]
    fn test_merge_invalid_priority_filter_warns() {
        let merged = merge("[tasks]\ndefault_priority_filter = \"urgent\"\n");
        assert_eq!(merged.config.tasks.default_priority_filter, None);
        assert!(merged.warnings[0].contains("or null"));
    }

    #[test]
    fn test_merge_ignores_unknown_and_non_table_sections() {
        let merged = merge("git = 3\n[plugins]\nfoo = 1\n[timer]\nunknown = true\n");
        assert!(merged.warnings.is_empty());
        assert_eq!(merged.config, DevDashConfig::default());
    }

    #[test]
    fn test_merge_keybindings() {
        let merged = merge("[keybindings]\nquit = \"ctrl+q\"\n").config;
        assert_eq!(merged.keybindings.quit, "ctrl+q");
        assert_eq!(merged.keybindings.help, "?");
    }
}
