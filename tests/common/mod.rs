//! Common test utilities for devdash integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never read the
//! user's real configuration or write logs into their data directory.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with isolated directories.
///
/// - `work_dir`: the working directory (project config and task file)
/// - `home_dir`: `HOME`, with `XDG_CONFIG_HOME` and `XDG_DATA_HOME` inside it
///
/// The `devdash()` method returns a `Command` with these set per
/// invocation, making tests parallel-safe.
pub struct TestEnv {
    pub work_dir: TempDir,
    pub home_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
            home_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the devdash binary with isolated directories.
    pub fn devdash(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_devdash"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("HOME", self.home_dir.path());
        cmd.env("XDG_CONFIG_HOME", self.config_home());
        cmd.env("XDG_DATA_HOME", self.home_dir.path().join(".local/share"));
        cmd.env_remove("DEVDASH_CONFIG");
        cmd.env_remove("DEVDASH_LOG");
        cmd
    }

    pub fn work_path(&self) -> &Path {
        self.work_dir.path()
    }

    pub fn config_home(&self) -> PathBuf {
        self.home_dir.path().join(".config")
    }

    /// Write `./.devdash.toml` in the working directory.
    pub fn write_project_config(&self, content: &str) -> PathBuf {
        let path = self.work_path().join(".devdash.toml");
        fs::write(&path, content).expect("Failed to write project config");
        path
    }

    /// Write `$XDG_CONFIG_HOME/devdash/config.toml`.
    pub fn write_user_config(&self, content: &str) -> PathBuf {
        let dir = self.config_home().join("devdash");
        fs::create_dir_all(&dir).expect("Failed to create config directory");
        let path = dir.join("config.toml");
        fs::write(&path, content).expect("Failed to write user config");
        path
    }

    /// Write the default task file in the working directory.
    pub fn write_tasks(&self, json: &str) -> PathBuf {
        let path = self.work_path().join(".devdash_tasks.json");
        fs::write(&path, json).expect("Failed to write task file");
        path
    }

    /// Markdown files in `dir`, sorted by name.
    pub fn markdown_files(dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        files.sort();
        files
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
