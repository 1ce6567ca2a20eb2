//! Reserves a screen strip for the bar and reacts to shell notifications.
//!
//! The shell reports desktop changes to a registered toolbar by sending
//! its window a private callback message. [`DockController`] registers
//! the bar, routes those callbacks through a per-notification handler
//! table and guarantees the reservation is released exactly once,
//! whether the controller is dropped or the process is exiting.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, info, trace};

use crate::channel::Channel;
use crate::config::BarConfig;
use crate::error::{ShellError, ShellResult};
use crate::payload::Payload;
use crate::rect::Rect;
use crate::window::WindowHandle;

/// Callback message the shell sends to the bar window (`WM_USER + 808`).
pub const APPBAR_CALLBACK_MESSAGE: u32 = 0x0400 + 808;

/// Notification codes carried in the callback's `wParam`.
pub mod notification {
    pub const ABN_STATECHANGE: u32 = 0;
    pub const ABN_POSCHANGED: u32 = 1;
    pub const ABN_FULLSCREENAPP: u32 = 2;
    pub const ABN_WINDOWARRANGE: u32 = 3;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockEdge {
    Left,
    Top,
    Right,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    /// Above every non-topmost window.
    Topmost,
    /// Below every other window.
    Bottom,
}

/// Receives `(notification code, lParam)` for each intercepted callback.
pub type NotificationSink = Arc<dyn Fn(u32, isize) + Send + Sync>;

/// Releases the reservation. Must be safe to call more than once.
pub type Teardown = Arc<dyn Fn() + Send + Sync>;

/// The shell calls the dock needs.
pub trait DockShell: Send + Sync {
    /// Registers `bar` as a desktop toolbar. Returns `false` if refused.
    fn register(&self, bar: WindowHandle, callback_message: u32) -> bool;

    /// Reserves `rect` along `edge`.
    fn set_position(&self, bar: WindowHandle, edge: DockEdge, rect: Rect);

    fn remove(&self, bar: WindowHandle);

    /// Wraps the bar's message handler. Messages equal to
    /// `callback_message` are handed to `sink` first; every message is
    /// then forwarded to the previous handler.
    fn intercept(
        &self,
        bar: WindowHandle,
        callback_message: u32,
        sink: NotificationSink,
    ) -> ShellResult<()>;

    /// Restores the bar's original message handler.
    fn release_intercept(&self, bar: WindowHandle);

    fn set_z_order(&self, bar: WindowHandle, order: ZOrder);

    /// Class name of the current foreground window.
    fn focused_class(&self) -> Option<String>;

    /// Arranges for `teardown` to run when the process exits.
    fn on_process_exit(&self, teardown: Teardown);
}

/// What was reserved, and for which window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockRegistration {
    pub bar: WindowHandle,
    pub callback_message: u32,
    pub edge: DockEdge,
    pub reserved: Rect,
}

type NotificationHandler = fn(&DockInner, isize);

struct DockInner {
    shell: Arc<dyn DockShell>,
    registration: DockRegistration,
    exclude_classes: Vec<String>,
    channel: Channel,
    handlers: HashMap<u32, Vec<NotificationHandler>>,
    topmost: Mutex<bool>,
    torn_down: AtomicBool,
}

/// A registered desktop toolbar.
///
/// Clones share one registration. The reservation is released when
/// [`teardown`](Self::teardown) is called, the last clone is dropped,
/// or the process exits, whichever comes first.
#[derive(Clone)]
pub struct DockController {
    inner: Arc<DockInner>,
}

impl fmt::Debug for DockController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockController")
            .field("registration", &self.inner.registration)
            .field("topmost", &self.is_topmost())
            .finish_non_exhaustive()
    }
}

impl DockController {
    /// Docks `bar` along the top edge of `work_area`.
    ///
    /// Registration is attempted first; if the shell refuses it nothing
    /// else is touched. If message interception fails the registration
    /// is rolled back.
    pub fn setup(
        shell: Arc<dyn DockShell>,
        bar: WindowHandle,
        work_area: Rect,
        config: &BarConfig,
        channel: Channel,
    ) -> ShellResult<Self> {
        let reserved = work_area.top_strip(config.height);
        if !shell.register(bar, APPBAR_CALLBACK_MESSAGE) {
            return Err(ShellError::DockRegistration);
        }
        shell.set_position(bar, DockEdge::Top, reserved);

        let inner = Arc::new(DockInner {
            shell: Arc::clone(&shell),
            registration: DockRegistration {
                bar,
                callback_message: APPBAR_CALLBACK_MESSAGE,
                edge: DockEdge::Top,
                reserved,
            },
            exclude_classes: config.fullscreen_exclude_classes.clone(),
            channel,
            handlers: default_handlers(),
            // The bar window is created topmost.
            topmost: Mutex::new(true),
            torn_down: AtomicBool::new(false),
        });

        let weak = Arc::downgrade(&inner);
        let sink: NotificationSink = Arc::new(move |code, lparam| {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.dispatch(code, lparam);
            }
        });
        if let Err(e) = shell.intercept(bar, APPBAR_CALLBACK_MESSAGE, sink) {
            inner.torn_down.store(true, Ordering::SeqCst);
            shell.remove(bar);
            return Err(e);
        }

        let weak = Arc::downgrade(&inner);
        shell.on_process_exit(Arc::new(move || {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.teardown();
            }
        }));

        info!(%bar, ?reserved, "bar docked");
        Ok(Self { inner })
    }

    pub fn registration(&self) -> DockRegistration {
        self.inner.registration
    }

    /// Runs the handlers for one shell notification.
    pub fn handle_notification(&self, code: u32, lparam: isize) {
        self.inner.dispatch(code, lparam);
    }

    /// Puts the bar above or below other windows. Repeating the current
    /// state makes no OS call.
    pub fn set_topmost(&self, topmost: bool) {
        self.inner.set_topmost(topmost);
    }

    pub fn is_topmost(&self) -> bool {
        *self
            .inner
            .topmost
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Releases the reservation and restores the bar's message handler.
    pub fn teardown(&self) {
        self.inner.teardown();
    }
}

fn default_handlers() -> HashMap<u32, Vec<NotificationHandler>> {
    let mut handlers: HashMap<u32, Vec<NotificationHandler>> = HashMap::new();
    handlers
        .entry(notification::ABN_FULLSCREENAPP)
        .or_default()
        .push(on_fullscreen_app);
    handlers
}

impl DockInner {
    fn dispatch(&self, code: u32, lparam: isize) {
        match self.handlers.get(&code) {
            Some(handlers) => {
                for handler in handlers {
                    handler(self, lparam);
                }
            }
            None => trace!(code, "unhandled toolbar notification"),
        }
    }

    // The OS call may wait on the bar's thread; never make it under the lock.
    fn set_topmost(&self, topmost: bool) {
        {
            let mut current = self.topmost.lock().unwrap_or_else(PoisonError::into_inner);
            if *current == topmost {
                return;
            }
            *current = topmost;
        }
        let order = if topmost { ZOrder::Topmost } else { ZOrder::Bottom };
        self.shell.set_z_order(self.registration.bar, order);
    }

    fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let bar = self.registration.bar;
        self.shell.release_intercept(bar);
        self.shell.remove(bar);
        info!(%bar, "bar undocked");
    }
}

impl Drop for DockInner {
    fn drop(&mut self) {
        self.teardown();
    }
}

// lParam is nonzero while a fullscreen application is opening.
fn on_fullscreen_app(inner: &DockInner, lparam: isize) {
    let entering = lparam != 0;
    let class = inner.shell.focused_class().unwrap_or_default();
    if inner.exclude_classes.iter().any(|c| *c == class) {
        debug!(%class, entering, "ignoring fullscreen notification for desktop window");
        return;
    }
    debug!(%class, entering, "fullscreen application changed");
    inner.set_topmost(!entering);
    inner.channel.publish(Payload::FullscreenToggled(entering));
}

#[cfg(test)]
#[path = "dock_tests.rs"]
mod tests;
