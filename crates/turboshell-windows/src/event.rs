use turboshell_core::{EventCategory, WindowEvent};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    EVENT_OBJECT_LOCATIONCHANGE, EVENT_OBJECT_NAMECHANGE, EVENT_SYSTEM_FOREGROUND,
};

use crate::window::from_hwnd;

/// Object ID indicating the event applies to the window itself,
/// not a child element like a scrollbar or caret.
const OBJID_WINDOW: i32 = 0;

/// The WinEvent code hooked for each category.
pub fn event_code(category: EventCategory) -> u32 {
    match category {
        EventCategory::Foreground => EVENT_SYSTEM_FOREGROUND,
        EventCategory::LocationChange => EVENT_OBJECT_LOCATIONCHANGE,
        EventCategory::NameChange => EVENT_OBJECT_NAMECHANGE,
    }
}

/// Translates a raw WinEvent into a [`WindowEvent`].
///
/// Returns `None` for child-object events, null windows and event
/// codes that are not hooked.
pub fn translate(event: u32, hwnd: HWND, id_object: i32) -> Option<WindowEvent> {
    if id_object != OBJID_WINDOW || hwnd.is_invalid() {
        return None;
    }
    let hwnd = from_hwnd(hwnd);
    match event {
        e if e == EVENT_SYSTEM_FOREGROUND => Some(WindowEvent::ForegroundChanged { hwnd }),
        e if e == EVENT_OBJECT_LOCATIONCHANGE => Some(WindowEvent::LocationChanged { hwnd }),
        e if e == EVENT_OBJECT_NAMECHANGE => Some(WindowEvent::NameChanged { hwnd }),
        _ => None,
    }
}
