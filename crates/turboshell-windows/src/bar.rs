//! The window that gets docked.
//!
//! A plain popup with no content. Drawing belongs to the view layer;
//! this only gives the shell a window to reserve space for, and a
//! top-level window that hears about the session ending.

use std::sync::Once;

use turboshell_core::{Rect, ShellError, ShellResult, WindowHandle};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{BLACK_BRUSH, GetStockObject, HBRUSH};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, RegisterClassW, WM_ENDSESSION, WNDCLASSW,
    WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP, WS_VISIBLE,
};
use windows::core::w;

use crate::ctrl_c;
use crate::window::from_hwnd;

static REGISTER_CLASS: Once = Once::new();

fn ensure_class_registered() {
    REGISTER_CLASS.call_once(|| unsafe {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(bar_wnd_proc),
            lpszClassName: w!("TurboShellBar"),
            hbrBackground: HBRUSH(GetStockObject(BLACK_BRUSH).0),
            ..Default::default()
        };
        RegisterClassW(&wc);
    });
}

unsafe extern "system" fn bar_wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // Logoff and shutdown are not reported through the console handler
    // once the process owns windows.
    if msg == WM_ENDSESSION && wparam.0 != 0 {
        ctrl_c::run_teardowns();
    }
    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
}

/// An empty, non-activating strip along the top of a work area.
///
/// Destroyed on drop, which must happen on the creating thread.
pub struct BarWindow {
    hwnd: HWND,
}

impl BarWindow {
    pub fn create(work_area: Rect, height: i32) -> ShellResult<Self> {
        ensure_class_registered();
        let strip = work_area.top_strip(height);
        // Tool window: no taskbar button and never tracked as foreground.
        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE | WS_EX_TOPMOST,
                w!("TurboShellBar"),
                w!("TurboShell"),
                WS_POPUP | WS_VISIBLE,
                strip.x,
                strip.y,
                strip.width,
                strip.height,
                None,
                None,
                None,
                None,
            )
        }
        .map_err(|e| ShellError::Os {
            context: "CreateWindowExW",
            code: e.code().0,
        })?;
        Ok(Self { hwnd })
    }

    pub fn handle(&self) -> WindowHandle {
        from_hwnd(self.hwnd)
    }
}

impl Drop for BarWindow {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}
