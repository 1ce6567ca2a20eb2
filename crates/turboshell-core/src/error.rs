use std::path::PathBuf;

use thiserror::Error;

use crate::event::EventCategory;

/// Convenient result type for the core crate.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors surfaced by the window-tracking and docking core.
///
/// Only setup failures are returned to callers. Runtime failures
/// (a dead target window, a broken message loop) are logged where
/// they happen and never propagated.
#[derive(Debug, Error)]
pub enum ShellError {
    /// `SetWinEventHook` (or the platform equivalent) refused a hook.
    #[error("failed to install the {category} event hook")]
    HookInstall { category: EventCategory },

    /// The hook thread exited before it reported readiness.
    #[error("hook thread exited before it finished starting")]
    HookThread,

    /// The shell rejected the desktop toolbar registration.
    #[error("shell rejected the desktop toolbar registration")]
    DockRegistration,

    /// The bar window's message handler could not be replaced.
    #[error("failed to intercept bar window messages (os error {code})")]
    Intercept { code: u32 },

    /// A native call failed during setup.
    #[error("{context} failed (os error {code:#x})")]
    Os { context: &'static str, code: i32 },

    /// The command needs a platform this build does not target.
    #[error("{command} requires Windows")]
    Unsupported { command: &'static str },

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while locating or parsing `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    /// Returns true when the file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_install_error_names_the_category() {
        let err = ShellError::HookInstall {
            category: EventCategory::NameChange,
        };
        assert_eq!(
            err.to_string(),
            "failed to install the name-change event hook"
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = ConfigError::Io {
            path: PathBuf::from("config.toml"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_not_found());
        assert!(!ConfigError::NoConfigDir.is_not_found());
    }
}
