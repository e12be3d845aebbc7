//! devdash - a terminal dashboard for developers.
//!
//! This library provides the core of the `devdash` binary: layered TOML
//! configuration, the task model with its query and export functions, the
//! Pomodoro timer, and the git and system metric providers behind the
//! dashboard panels. The interactive interface lives in [`tui`] behind the
//! `tui` feature.

pub mod cli;
pub mod config;
pub mod export;
pub mod git;
pub mod logging;
pub mod models;
pub mod storage;
pub mod sys;
pub mod timer;
#[cfg(feature = "tui")]
pub mod tui;

/// Library-level error type for devdash operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    ConfigLoad(#[from] config::ConfigLoadError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for devdash operations.
pub type Result<T> = std::result::Result<T, Error>;
