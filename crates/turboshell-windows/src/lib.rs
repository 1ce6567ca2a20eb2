#![cfg(windows)]
//! Win32 implementations of the TurboShell core traits.

/// Placeholder bar window that gets docked.
pub mod bar;

/// Process-exit teardown and Ctrl+C delivery.
pub mod ctrl_c;

/// WinEvent translation.
pub mod event;

/// WinEvent hooks and the message pump.
pub mod event_loop;

/// Primary monitor geometry.
pub mod monitor;

/// Desktop toolbar (`SHAppBarMessage`) protocol.
pub mod shell;

mod subclass;

/// Window queries and commands.
pub mod window;

pub use bar::BarWindow;
pub use event_loop::Win32EventSource;
pub use monitor::primary_work_area;
pub use shell::Win32Shell;
pub use window::Win32Desktop;
