//! Terminal user interface for devdash
//!
//! A keyboard-driven dashboard with four panels (git status, system
//! resources, tasks, Pomodoro timer), modal forms for editing tasks and
//! toast notifications. Enabled by the `tui` feature.

pub mod app;
pub mod keymap;
pub mod notifications;
pub mod schedule;
pub mod views;

pub use app::{App, run_tui};
pub use keymap::{Action, Keymap};
pub use notifications::{NotificationLevel, NotificationManager, Toast};
