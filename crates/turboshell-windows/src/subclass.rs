//! Decorates the bar's window procedure to observe toolbar callbacks.
//!
//! One decorator per process. Every message still reaches the bar's
//! own procedure through `DefSubclassProc`.

use tracing::debug;
use turboshell_core::{
    InterceptSlot, NotificationSink, Route, ShellError, ShellResult, WindowHandle,
};
use windows::Win32::Foundation::{ERROR_ALREADY_EXISTS, GetLastError, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};

use crate::window::{from_hwnd, to_hwnd};

const SUBCLASS_ID: usize = 0x5453;

static DECORATOR: InterceptSlot = InterceptSlot::new();

/// Starts routing `callback_message` on `bar` to `sink`.
///
/// Must be called on the thread that owns `bar`.
pub(crate) fn install(
    bar: WindowHandle,
    callback_message: u32,
    sink: NotificationSink,
) -> ShellResult<()> {
    if !DECORATOR.occupy(bar, callback_message, sink) {
        return Err(ShellError::Intercept {
            code: ERROR_ALREADY_EXISTS.0,
        });
    }
    let ok = unsafe { SetWindowSubclass(to_hwnd(bar), Some(decorated_proc), SUBCLASS_ID, 0) };
    if !ok.as_bool() {
        let code = unsafe { GetLastError() }.0;
        DECORATOR.vacate(bar);
        return Err(ShellError::Intercept { code });
    }
    debug!(%bar, callback_message, "bar window procedure decorated");
    Ok(())
}

/// Stops routing callbacks and removes the decorator.
///
/// Removal only succeeds on the owning thread. From any other thread
/// the decorator stays installed but forwards without observing.
pub(crate) fn release(bar: WindowHandle) {
    if !DECORATOR.vacate(bar) {
        return;
    }
    let removed = unsafe { RemoveWindowSubclass(to_hwnd(bar), Some(decorated_proc), SUBCLASS_ID) };
    if !removed.as_bool() {
        debug!(%bar, "decorator left in place; released from a foreign thread");
    }
}

unsafe extern "system" fn decorated_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _id_subclass: usize,
    _ref_data: usize,
) -> LRESULT {
    if DECORATOR.route(from_hwnd(hwnd), msg, wparam.0, lparam.0) == Route::Detach {
        unsafe {
            let _ = RemoveWindowSubclass(hwnd, Some(decorated_proc), SUBCLASS_ID);
        }
    }
    unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) }
}
