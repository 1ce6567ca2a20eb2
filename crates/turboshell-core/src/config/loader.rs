use std::fs;
use std::path::{Path, PathBuf};

use super::{Config, generate_config};
use crate::error::ConfigError;

/// Returns the config directory: `~/.config/turboshell/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("turboshell"))
}

/// Returns the config file path: `~/.config/turboshell/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Loads and validates `config.toml`.
pub fn try_load() -> Result<Config, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    try_load_from(&path)
}

/// Loads and validates a config file at an explicit path.
pub fn try_load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate();
    Ok(config)
}

/// Loads the configuration, falling back to defaults.
///
/// A missing file silently yields defaults. Any other failure also
/// yields defaults, and the error is handed back so it can be logged
/// once logging is set up.
pub fn load() -> (Config, Option<ConfigError>) {
    match try_load() {
        Ok(config) => (config, None),
        Err(e) if e.is_not_found() => (Config::default(), None),
        Err(e) => (Config::default(), Some(e)),
    }
}

/// Result of [`write_default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Writes the commented default config to `path` unless a file is
/// already there.
pub fn write_default(path: &Path) -> Result<InitOutcome, ConfigError> {
    if path.exists() {
        return Ok(InitOutcome::AlreadyExists(path.to_path_buf()));
    }
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, generate_config()).map_err(io_err)?;
    Ok(InitOutcome::Created(path.to_path_buf()))
}
