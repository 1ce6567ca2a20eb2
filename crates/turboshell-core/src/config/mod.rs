mod loader;
mod template;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;
use crate::stack::DEFAULT_CAPACITY;

pub use loader::{
    InitOutcome, config_dir, config_path, load, try_load, try_load_from, write_default,
};
pub use template::generate_config;

/// Top-level configuration for TurboShell.
///
/// Loaded from `~/.config/turboshell/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bar: BarConfig,
    pub history: HistoryConfig,
    pub logging: LogConfig,
}

/// Docked bar settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Height in pixels of the strip reserved at the top of the screen.
    pub height: i32,
    /// Foreground window classes whose fullscreen notifications are
    /// ignored. The desktop itself reports as fullscreen when focused.
    pub fullscreen_exclude_classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// How many recently focused windows are remembered.
    pub capacity: usize,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            height: 25,
            fullscreen_exclude_classes: vec!["WorkerW".into(), "Progman".into()],
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Clamps values to ranges the shell can honor.
    pub fn validate(&mut self) {
        self.bar.height = self.bar.height.clamp(8, 200);
        self.history.capacity = self.history.capacity.clamp(1, 64);
        self.logging.max_files = self.logging.max_files.clamp(1, 365);
    }
}
