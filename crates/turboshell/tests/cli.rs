use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_turboshell"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute turboshell");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("desktop docking"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("run"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_turboshell"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute turboshell");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("turboshell"));
}

#[test]
fn debug_help_lists_tools() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_turboshell"));
    cmd.args(["debug", "--help"]);

    // Act
    let output = cmd.output().expect("failed to execute turboshell");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("events"));
    assert!(stdout.contains("work-area"));
}

#[test]
fn unknown_subcommand_fails() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_turboshell"));
    cmd.arg("dance");

    // Act
    let output = cmd.output().expect("failed to execute turboshell");

    // Assert
    assert!(!output.status.success());
}

#[cfg(not(windows))]
#[test]
fn run_reports_unsupported_platform() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_turboshell"));
    cmd.arg("run");

    // Act
    let output = cmd.output().expect("failed to execute turboshell");

    // Assert
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("run requires Windows"));
}
