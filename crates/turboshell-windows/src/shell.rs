use std::mem;

use tracing::{debug, warn};
use turboshell_core::{
    DockEdge, DockShell, NotificationSink, Rect, ShellResult, Teardown, WindowHandle, ZOrder,
};
use windows::Win32::Foundation::RECT;
use windows::Win32::UI::Shell::{
    ABE_BOTTOM, ABE_LEFT, ABE_RIGHT, ABE_TOP, ABM_NEW, ABM_REMOVE, ABM_SETPOS, APPBARDATA,
    SHAppBarMessage,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, HWND_BOTTOM, HWND_TOP, HWND_TOPMOST, SET_WINDOW_POS_FLAGS,
    SWP_ASYNCWINDOWPOS, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, SetWindowPos,
};

use crate::window::{class_name, to_hwnd};
use crate::{ctrl_c, subclass};

/// The shell's desktop toolbar protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Shell;

fn appbar_data(bar: WindowHandle) -> APPBARDATA {
    APPBARDATA {
        cbSize: mem::size_of::<APPBARDATA>() as u32,
        hWnd: to_hwnd(bar),
        ..Default::default()
    }
}

fn edge_code(edge: DockEdge) -> u32 {
    match edge {
        DockEdge::Left => ABE_LEFT,
        DockEdge::Top => ABE_TOP,
        DockEdge::Right => ABE_RIGHT,
        DockEdge::Bottom => ABE_BOTTOM,
    }
}

fn place(bar: WindowHandle, rect: Rect, flags: SET_WINDOW_POS_FLAGS) {
    let result = unsafe {
        SetWindowPos(
            to_hwnd(bar),
            None,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            flags | SWP_NOZORDER | SWP_NOACTIVATE,
        )
    };
    if let Err(e) = result {
        warn!(%bar, "moving bar failed: {e}");
    }
}

impl DockShell for Win32Shell {
    fn register(&self, bar: WindowHandle, callback_message: u32) -> bool {
        let mut data = appbar_data(bar);
        data.uCallbackMessage = callback_message;
        unsafe { SHAppBarMessage(ABM_NEW, &mut data) == 1 }
    }

    fn set_position(&self, bar: WindowHandle, edge: DockEdge, rect: Rect) {
        let mut data = appbar_data(bar);
        data.uEdge = edge_code(edge);
        data.rc = RECT {
            left: rect.x,
            top: rect.y,
            right: rect.right(),
            bottom: rect.bottom(),
        };
        unsafe {
            SHAppBarMessage(ABM_SETPOS, &mut data);
        }
        // The shell may have adjusted the rectangle.
        let granted = Rect::from_edges(data.rc.left, data.rc.top, data.rc.right, data.rc.bottom);
        debug!(%bar, ?granted, "toolbar position set");
        place(bar, granted, SET_WINDOW_POS_FLAGS(0));
    }

    fn remove(&self, bar: WindowHandle) {
        let mut data = appbar_data(bar);
        unsafe {
            SHAppBarMessage(ABM_REMOVE, &mut data);
        }
    }

    fn intercept(
        &self,
        bar: WindowHandle,
        callback_message: u32,
        sink: NotificationSink,
    ) -> ShellResult<()> {
        subclass::install(bar, callback_message, sink)
    }

    fn release_intercept(&self, bar: WindowHandle) {
        subclass::release(bar);
    }

    fn set_z_order(&self, bar: WindowHandle, order: ZOrder) {
        // The bar belongs to the hook thread; post instead of waiting on it.
        let flags = SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_ASYNCWINDOWPOS;
        let hwnd = to_hwnd(bar);
        let result = unsafe {
            match order {
                // HWND_TOP then puts it in front of other topmost windows.
                ZOrder::Topmost => SetWindowPos(hwnd, Some(HWND_TOPMOST), 0, 0, 0, 0, flags)
                    .and_then(|()| SetWindowPos(hwnd, Some(HWND_TOP), 0, 0, 0, 0, flags)),
                ZOrder::Bottom => SetWindowPos(hwnd, Some(HWND_BOTTOM), 0, 0, 0, 0, flags),
            }
        };
        match result {
            Ok(()) => debug!(%bar, ?order, "bar z-order changed"),
            Err(e) => warn!(%bar, ?order, "changing z-order failed: {e}"),
        }
    }

    fn focused_class(&self) -> Option<String> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.is_invalid() {
            return None;
        }
        class_name(hwnd)
    }

    fn on_process_exit(&self, teardown: Teardown) {
        ctrl_c::on_exit(teardown);
    }
}
