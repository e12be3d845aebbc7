//! Integration tests for the configuration commands:
//! `--validate-config`, `--show-config` and `--print-example-config`.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ==================== --validate-config ====================

#[test]
fn test_validate_without_config_file() {
    let env = TestEnv::new();
    env.devdash()
        .arg("--validate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No configuration file found; using built-in defaults.",
        ));
}

#[test]
fn test_validate_clean_project_config() {
    let env = TestEnv::new();
    env.write_project_config("[git]\nrefresh_interval = 15\n");

    env.devdash()
        .arg("--validate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file:"))
        .stdout(predicate::str::contains(".devdash.toml"))
        .stdout(predicate::str::contains("Configuration is valid."));
}

#[test]
fn test_validate_reports_warnings() {
    let env = TestEnv::new();
    env.write_project_config(
        "[system]\ncpu_warning_threshold = 90\ncpu_critical_threshold = 80\n\n[ui]\nborder_style = \"wavy\"\n",
    );

    env.devdash()
        .arg("--validate-config")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Found 2 warning(s):"))
        .stdout(predicate::str::contains(
            "system.cpu_warning_threshold (90.0) should be less than system.cpu_critical_threshold (80.0)",
        ))
        .stdout(predicate::str::contains("ui.border_style must be one of"));
}

#[test]
fn test_validate_malformed_toml_fails() {
    let env = TestEnv::new();
    env.write_project_config("[git\nrefresh_interval = ");

    env.devdash()
        .arg("--validate-config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: invalid syntax"));
}

#[test]
fn test_validate_missing_explicit_path_fails() {
    let env = TestEnv::new();
    env.devdash()
        .args(["--validate-config", "--config", "does-not-exist.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_project_config_wins_over_user_config() {
    let env = TestEnv::new();
    env.write_user_config("[git]\nmax_commits = 50\n");
    env.write_project_config("[git]\nmax_commits = 5\n");

    env.devdash()
        .arg("--validate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid."));
}

#[test]
fn test_user_config_is_discovered() {
    let env = TestEnv::new();
    env.write_user_config("[git]\nmax_commits = 50\n");

    env.devdash()
        .arg("--validate-config")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("devdash/config.toml"))
        .stdout(predicate::str::contains("git.max_commits should be 0-20"));
}

#[test]
fn test_config_path_from_environment() {
    let env = TestEnv::new();
    let path = env.work_path().join("custom.toml");
    std::fs::write(&path, "[ui]\nborder_style = \"heavy\"\n").unwrap();

    env.devdash()
        .arg("--show-config")
        .env("DEVDASH_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"))
        .stdout(predicate::str::contains("border_style = \"heavy\""));
}

// ==================== --show-config ====================

#[test]
fn test_show_config_defaults() {
    let env = TestEnv::new();
    env.devdash()
        .arg("--show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Built-in defaults"))
        .stdout(predicate::str::contains("[timer]"))
        .stdout(predicate::str::contains("focus_duration = 25"));
}

#[test]
fn test_show_config_merges_partial_file() {
    let env = TestEnv::new();
    env.write_project_config("[timer]\nfocus_duration = 50\n\n[git]\nrefresh_interval = true\n");

    env.devdash()
        .arg("--show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Resolved from"))
        .stdout(predicate::str::contains("focus_duration = 50"))
        .stdout(predicate::str::contains("break_duration = 5"))
        .stdout(predicate::str::contains("refresh_interval = 5"));
}

#[test]
fn test_show_config_malformed_fails() {
    let env = TestEnv::new();
    env.write_project_config("not = [valid");

    env.devdash()
        .arg("--show-config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

// ==================== --print-example-config ====================

#[test]
fn test_print_example_config() {
    let env = TestEnv::new();
    env.devdash()
        .arg("--print-example-config")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# devdash configuration"))
        .stdout(predicate::str::contains("[keybindings]"));
}

#[test]
fn test_example_config_validates_clean() {
    let env = TestEnv::new();
    let output = env
        .devdash()
        .arg("--print-example-config")
        .output()
        .unwrap();
    env.write_project_config(&String::from_utf8(output.stdout).unwrap());

    env.devdash()
        .arg("--validate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid."));
}

// ==================== Argument handling ====================

#[test]
fn test_conflicting_modes_rejected() {
    let env = TestEnv::new();
    env.devdash()
        .args(["--validate-config", "--show-config"])
        .assert()
        .failure();
}

#[test]
fn test_version_includes_build_metadata() {
    let env = TestEnv::new();
    env.devdash()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
