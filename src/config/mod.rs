//! Configuration for devdash.
//!
//! Configuration is a TOML document with the sections `general`, `git`,
//! `system`, `tasks`, `timer`, `ui` and `keybindings`. It is resolved in
//! three steps:
//!
//! 1. Start from built-in defaults ([`DevDashConfig::default`])
//! 2. Discover a file (`./.devdash.toml`, `<config dir>/devdash/config.toml`,
//!    `~/.devdash.toml`) or use an explicit path, and merge it field by field
//! 3. Validate the result into a list of warnings
//!
//! A missing file is not an error. A file that exists but cannot be read or
//! parsed is, and callers decide whether to fall back to defaults.
//!
//! [`editor`] writes an edited configuration back to the file it came from.

pub mod editor;
pub mod keys;
pub mod loader;
pub mod schema;
pub mod validator;

pub use editor::{ConfigField, apply_edits, save_config, save_path};
pub use keys::{Key, KeyBinding};
pub use loader::{
    ConfigLoadError, ConfigLocations, LoadedConfig, Merged, find_config_file, load_config,
    load_config_from, load_toml, merge_config,
};
pub use schema::{
    BorderStyle, Choice, DevDashConfig, EXAMPLE_CONFIG, ExportFormat, GeneralConfig, GitConfig,
    KeybindingsConfig, NotificationSound, ProgressBarStyle, SortKey, SystemConfig, TasksConfig,
    TimerConfig, UiConfig,
};
pub use validator::validate;
