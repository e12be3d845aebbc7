//! Git repository status for the git panel.
//!
//! Status is read by running the `git` CLI in the repository directory:
//! `git status --porcelain=v1 --branch` for the branch and file counts and
//! `git log` for recent commits.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Hash prefix length shown for commits.
pub const SHORT_HASH_LEN: usize = 7;

/// Commit subjects are cut to this many characters.
pub const COMMIT_MESSAGE_LIMIT: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Git error: {0}")]
    CommandFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Abbreviated hash
    pub hash: String,
    /// First line of the message, truncated
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatus {
    pub branch: String,
    pub staged: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    pub ahead: u32,
    pub behind: u32,
    pub commits: Vec<CommitSummary>,
}

impl GitStatus {
    pub fn total_changes(&self) -> usize {
        self.staged.len() + self.modified.len() + self.untracked.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total_changes() == 0
    }
}

/// Source of repository status.
pub trait GitProvider {
    fn status(&self, max_commits: usize) -> Result<GitStatus, GitError>;
}

/// [`GitProvider`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Use `repository_path` from the config (with `~` expanded) or `cwd`.
    pub fn from_config(repository_path: Option<&str>, cwd: &Path) -> Self {
        match repository_path {
            Some(path) if !path.trim().is_empty() => Self::new(expand_home(path.trim())),
            _ => Self::new(cwd),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| GitError::CommandFailed(format!("Failed to run git: {}", e)))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.to_lowercase().contains("not a git repository") {
            Err(GitError::NotARepository)
        } else {
            Err(GitError::CommandFailed(stderr))
        }
    }
}

impl GitProvider for GitCli {
    fn status(&self, max_commits: usize) -> Result<GitStatus, GitError> {
        if !self.repo_path.is_dir() {
            return Err(GitError::NotARepository);
        }

        let porcelain = self.run(&["status", "--porcelain=v1", "--branch"])?;
        let mut status = parse_porcelain(&porcelain);

        if max_commits > 0 && !status.branch.is_empty() && !porcelain.contains("No commits yet") {
            let limit = max_commits.to_string();
            let log = self.run(&["log", "-n", &limit, "--format=%H%x1f%s"])?;
            status.commits = parse_log(&log);
        }

        tracing::trace!(
            branch = %status.branch,
            changes = status.total_changes(),
            "Git status refreshed"
        );
        Ok(status)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse `git status --porcelain=v1 --branch` output.
pub fn parse_porcelain(output: &str) -> GitStatus {
    let mut status = GitStatus::default();

    for line in output.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            parse_branch_header(header, &mut status);
            continue;
        }
        if line.len() < 3 {
            continue;
        }
        let mut codes = line.chars();
        let (Some(x), Some(y)) = (codes.next(), codes.next()) else {
            continue;
        };
        let path = line[3..].to_string();

        if x == '?' && y == '?' {
            status.untracked.push(path);
            continue;
        }
        if x == '!' {
            continue;
        }
        if x != ' ' {
            status.staged.push(path.clone());
        }
        if y != ' ' {
            status.modified.push(path);
        }
    }
    status
}

fn parse_branch_header(header: &str, status: &mut GitStatus) {
    if let Some(branch) = header
        .strip_prefix("No commits yet on ")
        .or_else(|| header.strip_prefix("Initial commit on "))
    {
        status.branch = branch.trim().to_string();
        return;
    }
    if header.starts_with("HEAD (no branch)") {
        status.branch = "HEAD (detached)".to_string();
        return;
    }

    let (names, tracking) = match header.find(" [") {
        Some(idx) => (&header[..idx], Some(&header[idx + 2..])),
        None => (header, None),
    };
    status.branch = names.split("...").next().unwrap_or(names).to_string();

    if let Some(tracking) = tracking {
        for part in tracking.trim_end_matches(']').split(", ") {
            if let Some(n) = part.strip_prefix("ahead ") {
                status.ahead = n.parse().unwrap_or(0);
            } else if let Some(n) = part.strip_prefix("behind ") {
                status.behind = n.parse().unwrap_or(0);
            }
        }
    }
}

/// Parse `git log --format=%H%x1f%s` output.
pub fn parse_log(output: &str) -> Vec<CommitSummary> {
    output
        .lines()
        .filter_map(|line| {
            let (hash, subject) = line.split_once('\x1f')?;
            Some(CommitSummary {
                hash: hash.chars().take(SHORT_HASH_LEN).collect(),
                message: subject.trim().chars().take(COMMIT_MESSAGE_LIMIT).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_porcelain_counts() {
        let output = "## main...origin/main [ahead 2, behind 1]\n\
                      M  src/lib.rs\n\
                      \x20M README.md\n\
                      MM Cargo.toml\n\
                      A  new.rs\n\
                      ?? scratch.txt\n\
                      ?? notes/\n";
        let status = parse_porcelain(output);
        assert_eq!(status.branch, "main");
        assert_eq!(status.ahead, 2);
        assert_eq!(status.behind, 1);
        assert_eq!(status.staged, vec!["src/lib.rs", "Cargo.toml", "new.rs"]);
        assert_eq!(status.modified, vec!["README.md", "Cargo.toml"]);
        assert_eq!(status.untracked, vec!["scratch.txt", "notes/"]);
        assert_eq!(status.total_changes(), 7);
    }

    #[test]
    fn test_parse_porcelain_clean_branch() {
        let status = parse_porcelain("## feature/x\n");
        assert_eq!(status.branch, "feature/x");
        assert!(status.is_clean());
        assert_eq!(status.ahead, 0);
    }

    #[test]
    fn test_parse_porcelain_special_headers() {
        assert_eq!(parse_porcelain("## No commits yet on main\n").branch, "main");
        assert_eq!(
            parse_porcelain("## HEAD (no branch)\n").branch,
            "HEAD (detached)"
        );
    }

    #[test]
    fn test_parse_log_truncates() {
        let long = "x".repeat(80);
        let output = format!(
            "0123456789abcdef\x1fFix the thing\nfedcba9876543210\x1f{}\n",
            long
        );
        let commits = parse_log(&output);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "0123456");
        assert_eq!(commits[0].message, "Fix the thing");
        assert_eq!(commits[1].message.chars().count(), COMMIT_MESSAGE_LIMIT);
    }

    #[test]
    fn test_from_config_prefers_repository_path() {
        let cwd = Path::new("/work");
        assert_eq!(GitCli::from_config(None, cwd).repo_path(), cwd);
        assert_eq!(GitCli::from_config(Some("  "), cwd).repo_path(), cwd);
        assert_eq!(
            GitCli::from_config(Some("/srv/repo"), cwd).repo_path(),
            Path::new("/srv/repo")
        );
    }

    #[test]
    fn test_missing_directory_is_not_a_repository() {
        let cli = GitCli::new("/nonexistent/devdash/repo");
        assert_eq!(cli.status(3), Err(GitError::NotARepository));
    }

    #[test]
    fn test_status_of_fresh_repository() {
        let dir = TempDir::new().unwrap();
        let init = Command::new("git")
            .args(["init", "-q", "-b", "trunk"])
            .current_dir(dir.path())
            .output();
        // Skip when git is unavailable
        let Ok(init) = init else { return };
        if !init.status.success() {
            return;
        }
        std::fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let status = GitCli::new(dir.path()).status(3).unwrap();
        assert_eq!(status.branch, "trunk");
        assert_eq!(status.untracked, vec!["a.txt"]);
        assert!(status.commits.is_empty());
    }
}
