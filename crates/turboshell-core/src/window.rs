//! Window snapshots and the rules that decide which windows count.
//!
//! A [`WindowSnapshot`] is a point-in-time copy of the attributes the
//! core cares about. The classifier functions here are pure over those
//! bits; every OS read goes through [`WindowQuery`] so the rules can be
//! exercised without a desktop.

use std::fmt;
use std::time::Instant;

use serde::Serialize;

/// Title reported for windows with no (or an empty) caption.
pub const NO_TITLE: &str = "[NO TITLE]";

/// Win32 style bits read from `GWL_STYLE`.
pub mod style {
    pub const WS_MAXIMIZE: u32 = 0x0100_0000;
    pub const WS_SIZEBOX: u32 = 0x0004_0000;
    pub const WS_MINIMIZEBOX: u32 = 0x0002_0000;
    pub const WS_MAXIMIZEBOX: u32 = 0x0001_0000;
}

/// Win32 extended style bits read from `GWL_EXSTYLE`.
pub mod ex_style {
    pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;
    pub const WS_EX_APPWINDOW: u32 = 0x0004_0000;
    pub const WS_EX_NOACTIVATE: u32 = 0x0800_0000;
}

/// An opaque OS window identifier.
///
/// The core never owns the window behind a handle; it only compares
/// handles and hands them back to the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct WindowHandle(pub usize);

impl WindowHandle {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Read-only window attribute queries.
///
/// Implemented by the platform crate. Every method must tolerate a
/// handle whose window has already been destroyed.
pub trait WindowQuery: Send + Sync {
    /// Resolves a window to its root owner (`GA_ROOTOWNER`).
    fn root_owner(&self, handle: WindowHandle) -> WindowHandle;

    /// Returns the `GWL_STYLE` bits.
    fn style(&self, handle: WindowHandle) -> u32;

    /// Returns the `GWL_EXSTYLE` bits.
    fn ex_style(&self, handle: WindowHandle) -> u32;

    /// Returns the caption text, or `None` if it is absent or empty.
    fn title(&self, handle: WindowHandle) -> Option<String>;

    /// Returns the window currently holding input focus.
    fn foreground_window(&self) -> Option<WindowHandle>;
}

/// Capability flags derived from a snapshot's style bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WindowCapabilities {
    pub is_maximized: bool,
    pub is_maximizable: bool,
    pub is_minimizable: bool,
}

/// A point-in-time copy of a window's attributes.
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    handle: WindowHandle,
    title: Option<String>,
    style: u32,
    ex_style: u32,
    captured_at: Instant,
}

impl WindowSnapshot {
    /// Creates a snapshot from already-known bits. The title is fetched
    /// on first use.
    pub fn new(handle: WindowHandle, style: u32, ex_style: u32) -> Self {
        Self {
            handle,
            title: None,
            style,
            ex_style,
            captured_at: Instant::now(),
        }
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn style(&self) -> u32 {
        self.style
    }

    pub fn ex_style(&self) -> u32 {
        self.ex_style
    }

    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    /// The cached title, if one has been fetched.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the cached title, querying the OS only if none is cached.
    pub fn cached_title(&mut self, query: &dyn WindowQuery) -> &str {
        let handle = self.handle;
        self.title.get_or_insert_with(|| resolve_title(query.title(handle)))
    }

    /// Re-reads the title from the OS. Returns `true` when the stored
    /// title changed.
    pub fn refresh_title(&mut self, query: &dyn WindowQuery) -> bool {
        let fresh = resolve_title(query.title(self.handle));
        if self.title.as_deref() == Some(fresh.as_str()) {
            return false;
        }
        self.title = Some(fresh);
        true
    }

    fn has_style(&self, bits: u32) -> bool {
        self.style & bits == bits
    }

    fn has_ex_style(&self, bits: u32) -> bool {
        self.ex_style & bits == bits
    }

    /// Whether this window may enter the foreground history.
    ///
    /// Tool windows never qualify. Anything else qualifies if it asks
    /// for a taskbar button (`WS_EX_APPWINDOW`) or does not refuse
    /// activation (`WS_EX_NOACTIVATE`). Tooltips, menus and
    /// notification popups fail one of the two checks.
    pub fn is_eligible_foreground(&self) -> bool {
        if self.has_ex_style(ex_style::WS_EX_TOOLWINDOW) {
            return false;
        }
        self.has_ex_style(ex_style::WS_EX_APPWINDOW)
            || !self.has_ex_style(ex_style::WS_EX_NOACTIVATE)
    }

    /// Derives the capability flags from the style bits.
    pub fn capabilities(&self) -> WindowCapabilities {
        WindowCapabilities {
            is_maximized: self.has_style(style::WS_MAXIMIZE),
            is_maximizable: self.has_style(style::WS_SIZEBOX)
                && self.has_style(style::WS_MAXIMIZEBOX),
            is_minimizable: self.has_style(style::WS_MINIMIZEBOX),
        }
    }
}

/// Reads a window's attributes into a fresh snapshot.
///
/// The handle is first resolved to its root owner so that an owned
/// dialog is tracked as its application's main window.
pub fn classify(query: &dyn WindowQuery, handle: WindowHandle) -> WindowSnapshot {
    let root = query.root_owner(handle);
    let root = if root.is_null() { handle } else { root };
    WindowSnapshot {
        handle: root,
        title: Some(resolve_title(query.title(root))),
        style: query.style(root),
        ex_style: query.ex_style(root),
        captured_at: Instant::now(),
    }
}

fn resolve_title(raw: Option<String>) -> String {
    match raw {
        Some(t) if !t.is_empty() => t,
        _ => NO_TITLE.to_string(),
    }
}
