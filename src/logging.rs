//! Logging setup.
//!
//! The dashboard owns the terminal, so log records go to a daily rolling
//! file instead of stderr. The filter is read from `DEVDASH_LOG` (same
//! syntax as `RUST_LOG`) and defaults to `info`.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter.
pub const LOG_ENV_VAR: &str = "DEVDASH_LOG";

pub const LOG_FILE_PREFIX: &str = "devdash.log";

/// Keeps the background writer alive; logs are flushed when dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_dir: PathBuf,
}

/// `<data_local_dir>/devdash/logs`, falling back to the temp directory.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("devdash")
        .join("logs")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Returns `None` when the log directory cannot be created or a subscriber
/// is already installed; the program keeps running without file logs.
pub fn init_logging() -> Option<LoggingGuard> {
    let log_dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!(
            "Warning: could not create log directory {}: {}",
            log_dir.display(),
            e
        );
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::registry().with(env_filter()).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "Logging initialized"
    );

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
