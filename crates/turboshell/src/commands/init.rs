use turboshell_core::config::{self, InitOutcome};
use turboshell_core::{ConfigError, ShellResult};

/// Creates `~/.config/turboshell/config.toml` with comments explaining
/// every option. An existing file is left untouched.
pub fn execute() -> ShellResult<()> {
    let path = config::config_path().ok_or(ConfigError::NoConfigDir)?;

    match config::write_default(&path)? {
        InitOutcome::Created(path) => println!("Created {}", path.display()),
        InitOutcome::AlreadyExists(path) => println!("Already exists: {}", path.display()),
    }
    Ok(())
}
