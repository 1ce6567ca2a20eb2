/// Generates the default `config.toml` contents with explanatory comments.
///
/// Used by `turboshell init` to create a starter file.
pub fn generate_config() -> String {
    r##"# TurboShell configuration
# Location: ~/.config/turboshell/config.toml

[bar]
# Height in pixels of the strip reserved at the top of the primary monitor.
height = 25
# Foreground window classes that never push the bar down when they
# report as fullscreen. The desktop background uses these.
fullscreen_exclude_classes = ["WorkerW", "Progman"]

[history]
# Number of recently focused windows remembered (1 to 64).
capacity = 10

[logging]
# Write logs to ~/.config/turboshell/logs/ instead of stderr.
enabled = false
# Minimum level: "trace", "debug", "info", "warn" or "error".
level = "info"
# Number of daily log files kept.
max_files = 7
"##
    .to_string()
}
