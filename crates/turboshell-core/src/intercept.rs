//! Routing state for the bar's decorated window procedure.
//!
//! The platform installs one decorator in front of the bar's own window
//! procedure. For every message it asks [`InterceptSlot::route`] what to
//! do; the answer never changes that every message is forwarded to the
//! previous procedure afterwards.

use std::sync::{Arc, Mutex};

use crate::dock::NotificationSink;
use crate::window::WindowHandle;

/// `WM_NCDESTROY`, the last message a window receives.
pub const FINAL_DESTROY_MESSAGE: u32 = 0x0082;

struct Interception {
    bar: WindowHandle,
    callback_message: u32,
    sink: NotificationSink,
}

/// What the decorator must do before forwarding a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Forward only.
    Forward,
    /// The callback was handed to the sink; forward as well.
    Notified,
    /// The window is being destroyed: the slot is already empty, remove
    /// the decorator, then forward.
    Detach,
}

/// Holds at most one active interception.
pub struct InterceptSlot {
    active: Mutex<Option<Interception>>,
}

impl InterceptSlot {
    pub const fn new() -> Self {
        Self {
            active: Mutex::new(None),
        }
    }

    /// Claims the slot for `message` on `bar`. Returns `false` if
    /// another interception is active or the slot is poisoned.
    pub fn occupy(&self, bar: WindowHandle, message: u32, sink: NotificationSink) -> bool {
        let Ok(mut active) = self.active.lock() else {
            return false;
        };
        if active.is_some() {
            return false;
        }
        *active = Some(Interception {
            bar,
            callback_message: message,
            sink,
        });
        true
    }

    /// Empties the slot if it belongs to `bar`.
    pub fn vacate(&self, bar: WindowHandle) -> bool {
        let Ok(mut active) = self.active.lock() else {
            return false;
        };
        if active.as_ref().is_some_and(|i| i.bar == bar) {
            *active = None;
            return true;
        }
        false
    }

    pub fn is_occupied(&self) -> bool {
        self.active.lock().is_ok_and(|active| active.is_some())
    }

    /// Decides what happens to one message sent to `bar`.
    ///
    /// The sink runs after the slot's lock is released, so it may
    /// vacate or reoccupy the slot.
    pub fn route(&self, bar: WindowHandle, msg: u32, wparam: usize, lparam: isize) -> Route {
        if msg == FINAL_DESTROY_MESSAGE {
            self.vacate(bar);
            return Route::Detach;
        }
        let sink = {
            let Ok(active) = self.active.lock() else {
                return Route::Forward;
            };
            active
                .as_ref()
                .filter(|i| i.bar == bar && i.callback_message == msg)
                .map(|i| Arc::clone(&i.sink))
        };
        match sink {
            Some(sink) => {
                sink(wparam as u32, lparam);
                Route::Notified
            }
            None => Route::Forward,
        }
    }
}

impl Default for InterceptSlot {
    fn default() -> Self {
        Self::new()
    }
}
