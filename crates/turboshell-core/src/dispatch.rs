//! Turns raw window events into stack updates and published payloads.
//!
//! Runs on the hook thread, which is the only writer of the stack.

use std::sync::Arc;

use tracing::trace;

use crate::channel::Channel;
use crate::event::WindowEvent;
use crate::payload::Payload;
use crate::stack::SharedStack;
use crate::window::{NO_TITLE, WindowHandle, WindowQuery, WindowSnapshot, classify};

pub struct EventDispatcher {
    query: Arc<dyn WindowQuery>,
    stack: SharedStack,
    channel: Channel,
}

impl EventDispatcher {
    pub fn new(query: Arc<dyn WindowQuery>, stack: SharedStack, channel: Channel) -> Self {
        Self {
            query,
            stack,
            channel,
        }
    }

    /// Treats the current OS foreground window as if it had just been
    /// focused, so the stack is not empty until the first switch.
    pub fn seed(&mut self) {
        if let Some(hwnd) = self.query.foreground_window() {
            self.on_foreground(hwnd);
        }
    }

    pub fn handle(&mut self, event: WindowEvent) {
        trace!(%event, "window event");
        match event {
            WindowEvent::ForegroundChanged { hwnd } => self.on_foreground(hwnd),
            WindowEvent::LocationChanged { hwnd } => self.on_location(hwnd),
            WindowEvent::NameChanged { hwnd } => self.on_name(hwnd),
        }
    }

    /// Classifies `hwnd` and pushes it if it qualifies.
    fn track(&self, hwnd: WindowHandle) -> Option<WindowSnapshot> {
        let snap = classify(self.query.as_ref(), hwnd);
        if !snap.is_eligible_foreground() {
            trace!(%hwnd, ex_style = snap.ex_style(), "ignoring ineligible window");
            return None;
        }
        self.stack.lock().push(snap.clone());
        Some(snap)
    }

    fn on_foreground(&self, hwnd: WindowHandle) {
        let Some(snap) = self.track(hwnd) else {
            return;
        };
        let title = snap.title().unwrap_or(NO_TITLE).to_string();
        self.channel.publish(Payload::TitleChanged(title));
        self.channel.publish(Payload::CapabilitiesChanged(snap.capabilities()));
    }

    // A move or resize may have flipped the maximized bit.
    fn on_location(&self, hwnd: WindowHandle) {
        let Some(snap) = self.track(hwnd) else {
            return;
        };
        self.channel.publish(Payload::CapabilitiesChanged(snap.capabilities()));
    }

    fn on_name(&self, hwnd: WindowHandle) {
        let title = {
            let mut stack = self.stack.lock();
            let Some(top) = stack.peek_mut() else {
                return;
            };
            if top.handle() != hwnd || !top.refresh_title(self.query.as_ref()) {
                return;
            }
            top.title().unwrap_or(NO_TITLE).to_string()
        };
        self.channel.publish(Payload::TitleChanged(title));
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
