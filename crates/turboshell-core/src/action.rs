//! User-initiated commands against the tracked foreground window.
//!
//! Every command targets the top of the foreground history rather than
//! whatever the OS reports as foreground right now: a tooltip or menu
//! can take focus between the button press and the command, and must
//! not become the target.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::ShellResult;
use crate::stack::StackView;
use crate::window::{WindowHandle, WindowSnapshot};

/// How a window should be shown. Always requested asynchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    Minimize,
    Maximize,
    Restore,
}

/// How forcefully to kill the foreground application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillHardness {
    /// Post a quit request to the window's message queue.
    Soft,
    /// Terminate the owning process.
    Hard,
}

/// A command issued by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Minimize,
    ToggleResize,
    Close,
    Kill(KillHardness),
    /// Focus the most recently used maximized window.
    ActivateRecentMaximized,
    /// Focus the least recently used maximized window.
    ActivateOldestMaximized,
}

/// Window-changing OS calls.
///
/// Boolean results report whether the OS accepted the request; the
/// executor only logs them.
pub trait WindowOps: Send + Sync {
    fn show_async(&self, handle: WindowHandle, command: ShowCommand) -> bool;

    /// Posts `WM_CLOSE` without waiting.
    fn post_close(&self, handle: WindowHandle) -> bool;

    /// Posts `WM_QUIT` without waiting.
    fn post_quit(&self, handle: WindowHandle) -> bool;

    fn set_foreground(&self, handle: WindowHandle) -> bool;

    /// Returns the id of the process owning the window.
    fn owner_process(&self, handle: WindowHandle) -> Option<u32>;

    /// Terminates a process unconditionally.
    fn terminate_process(&self, pid: u32) -> ShellResult<()>;
}

/// Executes [`WindowCommand`]s against the top of the foreground stack.
#[derive(Clone)]
pub struct WindowActions {
    stack: StackView,
    ops: Arc<dyn WindowOps>,
}

impl WindowActions {
    pub fn new(stack: StackView, ops: Arc<dyn WindowOps>) -> Self {
        Self { stack, ops }
    }

    pub fn execute(&self, command: WindowCommand) {
        match command {
            WindowCommand::Minimize => self.minimize(),
            WindowCommand::ToggleResize => self.toggle_resize(),
            WindowCommand::Close => self.close_graceful(),
            WindowCommand::Kill(hardness) => self.kill(hardness),
            WindowCommand::ActivateRecentMaximized => self.activate_recent_maximized(),
            WindowCommand::ActivateOldestMaximized => self.activate_oldest_maximized(),
        }
    }

    fn target(&self) -> Option<WindowSnapshot> {
        let top = self.stack.peek();
        if top.is_none() {
            debug!("no foreground window tracked; command ignored");
        }
        top
    }

    pub fn minimize(&self) {
        let Some(top) = self.target() else {
            return;
        };
        let accepted = self.ops.show_async(top.handle(), ShowCommand::Minimize);
        debug!(hwnd = %top.handle(), accepted, "minimize");
    }

    /// Restores the target if it is maximized, maximizes it otherwise.
    pub fn toggle_resize(&self) {
        let Some(top) = self.target() else {
            return;
        };
        let command = if top.capabilities().is_maximized {
            ShowCommand::Restore
        } else {
            ShowCommand::Maximize
        };
        let accepted = self.ops.show_async(top.handle(), command);
        debug!(hwnd = %top.handle(), ?command, accepted, "toggle resize");
    }

    pub fn close_graceful(&self) {
        let Some(top) = self.target() else {
            return;
        };
        if !self.ops.post_close(top.handle()) {
            warn!(hwnd = %top.handle(), "close request was not delivered");
        }
    }

    pub fn kill(&self, hardness: KillHardness) {
        let Some(top) = self.target() else {
            return;
        };
        let hwnd = top.handle();
        match hardness {
            KillHardness::Soft => {
                let accepted = self.ops.post_quit(hwnd);
                info!(%hwnd, accepted, "sent quit request");
            }
            KillHardness::Hard => {
                let Some(pid) = self.ops.owner_process(hwnd) else {
                    warn!(%hwnd, "could not resolve owning process");
                    return;
                };
                if pid == std::process::id() {
                    warn!(%hwnd, pid, "refusing to terminate our own process");
                    return;
                }
                match self.ops.terminate_process(pid) {
                    Ok(()) => info!(%hwnd, pid, "terminated process"),
                    Err(e) => warn!(%hwnd, pid, "terminate failed: {e}"),
                }
            }
        }
    }

    /// Brings the most recently focused maximized window forward.
    pub fn activate_recent_maximized(&self) {
        let snapshots = self.stack.snapshots();
        if let Some(snap) = snapshots.iter().find(|s| s.capabilities().is_maximized) {
            self.ops.set_foreground(snap.handle());
        }
    }

    /// Brings the least recently focused maximized window forward.
    pub fn activate_oldest_maximized(&self) {
        let snapshots = self.stack.snapshots();
        if let Some(snap) = snapshots.iter().rfind(|s| s.capabilities().is_maximized) {
            self.ops.set_foreground(snap.handle());
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
