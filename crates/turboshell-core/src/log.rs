//! Tracing subscriber setup.
//!
//! With file logging enabled, events go to daily-rotated files under
//! `~/.config/turboshell/logs/`. Otherwise they go to stderr.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "turboshell";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum level: "trace", "debug", "info", "warn" or "error".
    pub level: String,
    /// Number of daily log files kept before the oldest is deleted.
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_files: 7,
        }
    }
}

impl LogConfig {
    /// The configured level, or INFO if it does not parse.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }
}

/// Returns the log directory: `~/.config/turboshell/logs/`.
pub fn log_dir() -> Option<PathBuf> {
    crate::config::config_dir().map(|d| d.join("logs"))
}

/// Installs the global subscriber. Call once at startup.
///
/// Keep the returned guard alive for as long as file logging should
/// flush. Calling this again after a subscriber is installed does
/// nothing.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    let level = config.level_filter();
    if config.enabled
        && let Some(dir) = log_dir()
    {
        match file_appender(&dir, config.max_files) {
            Ok(appender) => {
                let (writer, guard) = non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_thread_names(true)
                    .with_filter(level);
                return tracing_subscriber::registry()
                    .with(layer)
                    .try_init()
                    .ok()
                    .map(|()| guard);
            }
            Err(e) => {
                init_stderr(level);
                tracing::warn!("file logging disabled, {}: {e}", dir.display());
                return None;
            }
        }
    }
    init_stderr(level);
    None
}

fn init_stderr(level: LevelFilter) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(level);
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

fn file_appender(dir: &Path, max_files: usize) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(max_files.max(1))
        .build(dir)
}
