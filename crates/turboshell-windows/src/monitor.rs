use std::mem;

use turboshell_core::{Rect, ShellError, ShellResult};
use windows::Win32::Foundation::{GetLastError, POINT};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MONITOR_DEFAULTTOPRIMARY, MONITORINFO, MonitorFromPoint,
};

/// Returns the work area of the primary monitor.
///
/// The work area excludes the taskbar and any docked toolbars.
pub fn primary_work_area() -> ShellResult<Rect> {
    // The origin always lies on the primary monitor.
    let monitor = unsafe { MonitorFromPoint(POINT { x: 0, y: 0 }, MONITOR_DEFAULTTOPRIMARY) };
    let mut info = MONITORINFO {
        cbSize: mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    // SAFETY: cbSize is set as the API requires.
    if !unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
        return Err(ShellError::Os {
            context: "GetMonitorInfoW",
            code: unsafe { GetLastError() }.0 as i32,
        });
    }

    let rc = info.rcWork;
    Ok(Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom))
}
