//! Integration tests for `devdash --export`.

mod common;

use std::fs;

use common::TestEnv;
use predicates::prelude::*;

const TASKS: &str = r#"[
  {"id": 1, "text": "Review PR", "done": false, "priority": "high",
   "categories": ["work"], "created_at": "2025-06-01T09:00:00"},
  {"id": 2, "text": "Write notes", "done": true, "priority": "low",
   "categories": ["docs", "work"], "created_at": "2025-06-02T09:00:00"},
  {"id": 3, "text": "Legacy entry", "done": false},
  {"text": "Missing id"}
]"#;

// ==================== Layouts ====================

#[test]
fn test_export_grouped_writes_markdown() {
    let env = TestEnv::new();
    env.write_tasks(TASKS);
    let out = env.work_path().join("out");
    fs::create_dir(&out).unwrap();

    env.devdash()
        .args(["--export", "grouped", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 4 tasks to"));

    let files = TestEnv::markdown_files(&out);
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("devdash_tasks_grouped_"), "{}", name);

    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.starts_with("# DevDash Tasks"));
    assert!(content.contains("Total tasks: 4 | Completed: 1"));
    assert!(content.contains("## 🔴 High Priority"));
    assert!(content.contains("## ⚪ No Priority"));
    assert!(content.contains("- [ ] Legacy entry"));
    assert!(content.contains("- [ ] Missing id"));
}

#[test]
fn test_export_category_layout() {
    let env = TestEnv::new();
    env.write_tasks(TASKS);

    env.devdash()
        .args(["--export", "category", "--output-dir", "."])
        .assert()
        .success();

    let files = TestEnv::markdown_files(env.work_path());
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("## 📁 docs"));
    assert!(content.contains("## 📁 work"));
    assert!(content.contains("*2 tasks (1 completed)*"));
    assert!(content.contains("## 📋 Uncategorized"));
}

#[test]
fn test_export_defaults_to_working_directory() {
    let env = TestEnv::new();
    env.write_tasks(TASKS);

    env.devdash().args(["--export", "flat"]).assert().success();

    let files = TestEnv::markdown_files(env.work_path());
    assert_eq!(files.len(), 1);
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("- [ ] Review PR **🔴 HIGH** `#work`"));
}

#[test]
fn test_export_uses_configured_task_file() {
    let env = TestEnv::new();
    env.write_project_config("[tasks]\nfile_path = \"data/todo.json\"\n");
    fs::create_dir(env.work_path().join("data")).unwrap();
    fs::write(
        env.work_path().join("data/todo.json"),
        r#"[{"id": 7, "text": "From custom file", "done": false}]"#,
    )
    .unwrap();

    env.devdash()
        .args(["--export", "flat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 tasks to"));

    let files = TestEnv::markdown_files(env.work_path());
    let content = fs::read_to_string(&files[0]).unwrap();
    assert!(content.contains("From custom file"));
}

// ==================== Edge cases ====================

#[test]
fn test_export_without_task_file() {
    let env = TestEnv::new();
    env.devdash()
        .args(["--export", "flat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 0 tasks to"));
}

#[test]
fn test_export_invalid_layout_rejected() {
    let env = TestEnv::new();
    env.devdash()
        .args(["--export", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid layout 'pdf'"));
}

#[test]
fn test_output_dir_requires_export() {
    let env = TestEnv::new();
    env.devdash().args(["--output-dir", "."]).assert().failure();
}
