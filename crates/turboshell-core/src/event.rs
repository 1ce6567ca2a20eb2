use std::fmt;

use crate::window::WindowHandle;

/// The three families of global window events the core listens to.
///
/// Each category gets its own hook registration so the OS only wakes
/// the hook thread for events that are actually handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// The foreground window changed.
    Foreground,
    /// A window moved or was resized.
    LocationChange,
    /// A window's name (title) changed.
    NameChange,
}

impl EventCategory {
    /// All categories, in installation order.
    pub const ALL: [Self; 3] = [Self::Foreground, Self::LocationChange, Self::NameChange];
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Foreground => "foreground",
            Self::LocationChange => "location-change",
            Self::NameChange => "name-change",
        };
        f.write_str(name)
    }
}

/// A platform-agnostic window event.
///
/// Platform crates translate raw hook callbacks into these variants
/// and drop everything else before it reaches the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// A window became the foreground window.
    ForegroundChanged { hwnd: WindowHandle },

    /// A window moved, was resized, or changed show state.
    LocationChanged { hwnd: WindowHandle },

    /// A window's title changed.
    NameChanged { hwnd: WindowHandle },
}

impl WindowEvent {
    /// Returns the window handle associated with this event.
    pub fn hwnd(&self) -> WindowHandle {
        match self {
            Self::ForegroundChanged { hwnd }
            | Self::LocationChanged { hwnd }
            | Self::NameChanged { hwnd } => *hwnd,
        }
    }

    /// Returns the hook category this event is delivered through.
    pub fn category(&self) -> EventCategory {
        match self {
            Self::ForegroundChanged { .. } => EventCategory::Foreground,
            Self::LocationChanged { .. } => EventCategory::LocationChange,
            Self::NameChanged { .. } => EventCategory::NameChange,
        }
    }
}

impl fmt::Display for WindowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForegroundChanged { hwnd } => write!(f, "Foreground({hwnd})"),
            Self::LocationChanged { hwnd } => write!(f, "Location({hwnd})"),
            Self::NameChanged { hwnd } => write!(f, "Name({hwnd})"),
        }
    }
}
