use turboshell_core::{ShellError, ShellResult, ShowCommand, WindowHandle, WindowOps, WindowQuery};
use windows::Win32::Foundation::{CloseHandle, HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::{OpenProcess, PROCESS_TERMINATE, TerminateProcess};
use windows::Win32::UI::WindowsAndMessaging::{
    GA_ROOTOWNER, GWL_EXSTYLE, GWL_STYLE, GetAncestor, GetClassNameW, GetForegroundWindow,
    GetWindowLongPtrW, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
    PostMessageW, SW_MAXIMIZE, SW_MINIMIZE, SW_RESTORE, SetForegroundWindow, ShowWindowAsync,
    WM_CLOSE, WM_QUIT,
};

/// Converts a core handle into a Win32 `HWND`.
pub fn to_hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut _)
}

/// Converts a Win32 `HWND` into a core handle.
pub fn from_hwnd(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as usize)
}

/// The live Win32 desktop.
///
/// Every call tolerates stale handles: reads return zero or `None`,
/// commands report `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Desktop;

impl WindowQuery for Win32Desktop {
    fn root_owner(&self, handle: WindowHandle) -> WindowHandle {
        // SAFETY: GetAncestor returns a null HWND for invalid handles.
        from_hwnd(unsafe { GetAncestor(to_hwnd(handle), GA_ROOTOWNER) })
    }

    fn style(&self, handle: WindowHandle) -> u32 {
        unsafe { GetWindowLongPtrW(to_hwnd(handle), GWL_STYLE) as u32 }
    }

    fn ex_style(&self, handle: WindowHandle) -> u32 {
        unsafe { GetWindowLongPtrW(to_hwnd(handle), GWL_EXSTYLE) as u32 }
    }

    fn title(&self, handle: WindowHandle) -> Option<String> {
        let hwnd = to_hwnd(handle);
        // SAFETY: both calls only read the window text.
        unsafe {
            let length = GetWindowTextLengthW(hwnd);
            if length <= 0 {
                return None;
            }
            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(hwnd, &mut buffer);
            Some(String::from_utf16_lossy(&buffer[..copied.max(0) as usize]))
        }
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.is_invalid()).then(|| from_hwnd(hwnd))
    }
}

impl WindowOps for Win32Desktop {
    fn show_async(&self, handle: WindowHandle, command: ShowCommand) -> bool {
        let cmd = match command {
            ShowCommand::Minimize => SW_MINIMIZE,
            ShowCommand::Maximize => SW_MAXIMIZE,
            ShowCommand::Restore => SW_RESTORE,
        };
        // ShowWindowAsync never blocks on a hung target.
        unsafe { ShowWindowAsync(to_hwnd(handle), cmd) }.as_bool()
    }

    fn post_close(&self, handle: WindowHandle) -> bool {
        post(handle, WM_CLOSE)
    }

    fn post_quit(&self, handle: WindowHandle) -> bool {
        post(handle, WM_QUIT)
    }

    fn set_foreground(&self, handle: WindowHandle) -> bool {
        unsafe { SetForegroundWindow(to_hwnd(handle)) }.as_bool()
    }

    fn owner_process(&self, handle: WindowHandle) -> Option<u32> {
        let mut pid = 0u32;
        // SAFETY: writes the owning process id into `pid`.
        let thread = unsafe { GetWindowThreadProcessId(to_hwnd(handle), Some(&mut pid)) };
        (thread != 0 && pid != 0).then_some(pid)
    }

    fn terminate_process(&self, pid: u32) -> ShellResult<()> {
        // SAFETY: the handle is closed on every path below.
        unsafe {
            let process = OpenProcess(PROCESS_TERMINATE, false, pid).map_err(|e| ShellError::Os {
                context: "OpenProcess",
                code: e.code().0,
            })?;
            let result = TerminateProcess(process, 1);
            let _ = CloseHandle(process);
            result.map_err(|e| ShellError::Os {
                context: "TerminateProcess",
                code: e.code().0,
            })
        }
    }
}

fn post(handle: WindowHandle, msg: u32) -> bool {
    unsafe { PostMessageW(Some(to_hwnd(handle)), msg, WPARAM(0), LPARAM(0)) }.is_ok()
}

/// Reads a window's class name. 256 is the Win32 maximum.
pub(crate) fn class_name(hwnd: HWND) -> Option<String> {
    let mut buffer = [0u16; 256];
    let length = unsafe { GetClassNameW(hwnd, &mut buffer) };
    (length > 0).then(|| String::from_utf16_lossy(&buffer[..length as usize]))
}
