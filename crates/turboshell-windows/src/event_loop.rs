//! WinEvent hooks and the blocking message pump.
//!
//! Out-of-context WinEvent callbacks run on the installing thread from
//! inside `GetMessageW`, so the callback hands events to a thread-local
//! [`OrderedDelivery`] that holds the sink for the duration of the pump.

#[path = "event_loop_win_event.rs"]
mod win_event;

use std::collections::HashMap;

use tracing::{debug, warn};
use turboshell_core::{
    EventCategory, EventSource, HookId, OrderedDelivery, PumpExit, QuitSignal, ShellError,
    ShellResult, WindowEvent,
};
use windows::Win32::Foundation::{GetLastError, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Accessibility::{HWINEVENTHOOK, SetWinEventHook, UnhookWinEvent};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PM_NOREMOVE, PeekMessageW, PostThreadMessageW,
    TranslateMessage, WINEVENT_OUTOFCONTEXT, WINEVENT_SKIPOWNPROCESS, WM_QUIT, WM_USER,
};

use crate::event;

thread_local! {
    static DELIVERY: OrderedDelivery<WindowEvent> = const { OrderedDelivery::new() };
}

/// WinEvent hooks bound to the thread that created this source.
pub struct Win32EventSource {
    thread_id: u32,
    hooks: HashMap<HookId, HWINEVENTHOOK>,
    next_id: usize,
}

impl Win32EventSource {
    /// Must be called on the thread that will pump.
    pub fn new() -> Self {
        let mut msg = MSG::default();
        // SAFETY: forces creation of this thread's message queue so a
        // quit request posted before the pump starts is not lost.
        unsafe {
            let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
        }
        Self {
            thread_id: unsafe { GetCurrentThreadId() },
            hooks: HashMap::new(),
            next_id: 0,
        }
    }
}

impl Default for Win32EventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for Win32EventSource {
    fn install(&mut self, category: EventCategory) -> ShellResult<HookId> {
        let code = event::event_code(category);
        // SAFETY: WINEVENT_OUTOFCONTEXT delivers the callback on this
        // thread; WINEVENT_SKIPOWNPROCESS ignores our own windows.
        let hook = unsafe {
            SetWinEventHook(
                code,
                code,
                None,
                Some(win_event::win_event_proc),
                0,
                0,
                WINEVENT_OUTOFCONTEXT | WINEVENT_SKIPOWNPROCESS,
            )
        };
        if hook.is_invalid() {
            return Err(ShellError::HookInstall { category });
        }
        self.next_id += 1;
        let id = HookId(self.next_id);
        self.hooks.insert(id, hook);
        Ok(id)
    }

    fn uninstall(&mut self, id: HookId) {
        if let Some(hook) = self.hooks.remove(&id)
            && !unsafe { UnhookWinEvent(hook) }.as_bool()
        {
            warn!(id = id.0, "UnhookWinEvent failed");
        }
    }

    fn quit_signal(&self) -> Box<dyn QuitSignal> {
        Box::new(ThreadQuit {
            thread_id: self.thread_id,
        })
    }

    fn pump(&mut self, sink: Box<dyn FnMut(WindowEvent)>) -> PumpExit {
        DELIVERY.with(|delivery| delivery.attach(sink));
        let exit = run_message_pump();
        DELIVERY.with(OrderedDelivery::detach);
        exit
    }
}

/// Blocks until `WM_QUIT` or a retrieval error.
fn run_message_pump() -> PumpExit {
    let mut msg = MSG::default();
    loop {
        let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        match result.0 {
            0 => return PumpExit::Quit,
            -1 => {
                let code = unsafe { GetLastError() }.0 as i32;
                return PumpExit::Failed { code };
            }
            _ => unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            },
        }
    }
}

/// Hands an event to the pump's sink, in arrival order.
fn deliver(event: WindowEvent) {
    let delivered = DELIVERY.with(|delivery| delivery.deliver(event));
    if !delivered {
        debug!(%event, "window event queued or dropped");
    }
}

struct ThreadQuit {
    thread_id: u32,
}

impl QuitSignal for ThreadQuit {
    fn quit(&self) {
        // Fails harmlessly if the pump thread has already exited.
        if unsafe { PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }.is_err() {
            debug!(thread = self.thread_id, "quit request not delivered");
        }
    }
}
