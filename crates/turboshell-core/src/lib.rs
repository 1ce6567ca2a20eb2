pub mod action;
pub mod channel;
pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod dock;
pub mod error;
pub mod event;
pub mod hook;
pub mod intercept;
pub mod log;
pub mod payload;
pub mod rect;
pub mod service;
pub mod stack;
pub mod window;

#[cfg(test)]
mod test_support;

pub use action::{KillHardness, ShowCommand, WindowActions, WindowCommand, WindowOps};
pub use channel::{Channel, SubscriptionId};
pub use config::Config;
pub use delivery::OrderedDelivery;
pub use dock::{DockController, DockEdge, DockShell, NotificationSink, Teardown, ZOrder};
pub use error::{ConfigError, ShellError, ShellResult};
pub use event::{EventCategory, WindowEvent};
pub use hook::{EventSource, HookId, HookManager, HookState, PumpExit, QuitSignal, SourceFactory};
pub use intercept::{InterceptSlot, Route};
pub use payload::{Payload, PayloadKind};
pub use rect::Rect;
pub use service::{Service, ShellCore};
pub use stack::{ForegroundWindowStack, SharedStack, StackView};
pub use window::{WindowCapabilities, WindowHandle, WindowQuery, WindowSnapshot};
