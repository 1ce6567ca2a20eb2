//! In-memory stand-ins for the OS seams, shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc};

use crate::action::{ShowCommand, WindowOps};
use crate::dock::{DockEdge, DockShell, NotificationSink, Teardown, ZOrder};
use crate::error::{ShellError, ShellResult};
use crate::event::{EventCategory, WindowEvent};
use crate::hook::{EventSource, HookId, PumpExit, QuitSignal, SourceFactory};
use crate::rect::Rect;
use crate::window::{WindowHandle, WindowQuery};

#[derive(Debug, Clone)]
pub struct FakeWindow {
    id: usize,
    title: String,
    style: u32,
    ex_style: u32,
    owner: Option<usize>,
    pid: u32,
}

impl FakeWindow {
    pub fn new(id: usize, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            style: 0,
            ex_style: 0,
            owner: None,
            pid: 1000 + id as u32,
        }
    }

    pub fn style(mut self, bits: u32) -> Self {
        self.style = bits;
        self
    }

    pub fn ex_style(mut self, bits: u32) -> Self {
        self.ex_style = bits;
        self
    }

    pub fn owned_by(mut self, owner: usize) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }
}

/// A window-changing call made through [`WindowOps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsCall {
    Show(usize, ShowCommand),
    Close(usize),
    Quit(usize),
    Activate(usize),
    Terminate(u32),
}

/// A desktop of fake windows that records every OS call made on it.
#[derive(Debug, Default)]
pub struct FakeDesktop {
    windows: Mutex<HashMap<usize, FakeWindow>>,
    foreground: Mutex<Option<usize>>,
    calls: Mutex<Vec<OsCall>>,
}

impl FakeDesktop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, window: FakeWindow) {
        self.windows.lock().unwrap().insert(window.id, window);
    }

    pub fn set_title(&self, id: usize, title: &str) {
        if let Some(w) = self.windows.lock().unwrap().get_mut(&id) {
            w.title = title.to_string();
        }
    }

    pub fn set_style(&self, id: usize, bits: u32) {
        if let Some(w) = self.windows.lock().unwrap().get_mut(&id) {
            w.style = bits;
        }
    }

    /// Makes `id` the OS foreground window without recording a call.
    pub fn focus(&self, id: usize) {
        *self.foreground.lock().unwrap() = Some(id);
    }

    pub fn calls(&self) -> Vec<OsCall> {
        self.calls.lock().unwrap().clone()
    }

    fn with_window<T>(&self, handle: WindowHandle, f: impl FnOnce(&FakeWindow) -> T) -> Option<T> {
        self.windows.lock().unwrap().get(&handle.0).map(f)
    }

    fn record(&self, call: OsCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn exists(&self, handle: WindowHandle) -> bool {
        self.windows.lock().unwrap().contains_key(&handle.0)
    }
}

impl WindowQuery for FakeDesktop {
    fn root_owner(&self, handle: WindowHandle) -> WindowHandle {
        let windows = self.windows.lock().unwrap();
        let Some(mut current) = windows.get(&handle.0) else {
            return WindowHandle(0);
        };
        while let Some(owner) = current.owner.and_then(|o| windows.get(&o)) {
            current = owner;
        }
        WindowHandle(current.id)
    }

    fn style(&self, handle: WindowHandle) -> u32 {
        self.with_window(handle, |w| w.style).unwrap_or(0)
    }

    fn ex_style(&self, handle: WindowHandle) -> u32 {
        self.with_window(handle, |w| w.ex_style).unwrap_or(0)
    }

    fn title(&self, handle: WindowHandle) -> Option<String> {
        self.with_window(handle, |w| w.title.clone())
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        self.foreground.lock().unwrap().map(WindowHandle)
    }
}

impl WindowOps for FakeDesktop {
    fn show_async(&self, handle: WindowHandle, command: ShowCommand) -> bool {
        self.record(OsCall::Show(handle.0, command));
        self.exists(handle)
    }

    fn post_close(&self, handle: WindowHandle) -> bool {
        self.record(OsCall::Close(handle.0));
        self.exists(handle)
    }

    fn post_quit(&self, handle: WindowHandle) -> bool {
        self.record(OsCall::Quit(handle.0));
        self.exists(handle)
    }

    fn set_foreground(&self, handle: WindowHandle) -> bool {
        self.record(OsCall::Activate(handle.0));
        self.focus(handle.0);
        true
    }

    fn owner_process(&self, handle: WindowHandle) -> Option<u32> {
        self.with_window(handle, |w| w.pid)
    }

    fn terminate_process(&self, pid: u32) -> ShellResult<()> {
        self.record(OsCall::Terminate(pid));
        Ok(())
    }
}

/// A call made on a [`ScriptedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Install(EventCategory),
    Uninstall(EventCategory),
    Pump,
}

enum SourceMsg {
    Event(WindowEvent),
    Quit,
}

/// An event source whose events are fed by the test.
///
/// Pumping blocks until a quit request arrives, unless
/// [`exiting_with`](Self::exiting_with) makes it return on its own once
/// the queued events are drained.
pub struct ScriptedSource {
    fail_on: Option<EventCategory>,
    exit: Option<PumpExit>,
    installed: HashMap<HookId, EventCategory>,
    log: Arc<Mutex<Vec<SourceCall>>>,
    tx: mpsc::Sender<SourceMsg>,
    rx: mpsc::Receiver<SourceMsg>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            fail_on: None,
            exit: None,
            installed: HashMap::new(),
            log: Arc::default(),
            tx,
            rx,
        }
    }

    pub fn failing_on(mut self, category: EventCategory) -> Self {
        self.fail_on = Some(category);
        self
    }

    pub fn exiting_with(mut self, exit: PumpExit) -> Self {
        self.exit = Some(exit);
        self
    }

    pub fn feeder(&self) -> EventFeeder {
        EventFeeder(self.tx.clone())
    }

    pub fn log(&self) -> Arc<Mutex<Vec<SourceCall>>> {
        Arc::clone(&self.log)
    }

    /// Wraps the source in a factory that hands it out once.
    pub fn into_factory(self) -> SourceFactory {
        let slot = Mutex::new(Some(self));
        Arc::new(move || -> ShellResult<Box<dyn EventSource>> {
            let source = slot.lock().unwrap().take().ok_or(ShellError::HookThread)?;
            Ok(Box::new(source) as Box<dyn EventSource>)
        })
    }
}

impl EventSource for ScriptedSource {
    fn install(&mut self, category: EventCategory) -> ShellResult<HookId> {
        if self.fail_on == Some(category) {
            return Err(ShellError::HookInstall { category });
        }
        self.log.lock().unwrap().push(SourceCall::Install(category));
        let id = HookId(self.installed.len() + 1);
        self.installed.insert(id, category);
        Ok(id)
    }

    fn uninstall(&mut self, id: HookId) {
        if let Some(category) = self.installed.remove(&id) {
            let mut log = self.log.lock().unwrap();
            log.push(SourceCall::Uninstall(category));
        }
    }

    fn quit_signal(&self) -> Box<dyn QuitSignal> {
        Box::new(ScriptedQuit(self.tx.clone()))
    }

    fn pump(&mut self, mut sink: Box<dyn FnMut(WindowEvent)>) -> PumpExit {
        self.log.lock().unwrap().push(SourceCall::Pump);
        if let Some(exit) = self.exit {
            for msg in self.rx.try_iter() {
                if let SourceMsg::Event(event) = msg {
                    sink(event);
                }
            }
            return exit;
        }
        while let Ok(msg) = self.rx.recv() {
            match msg {
                SourceMsg::Event(event) => sink(event),
                SourceMsg::Quit => break,
            }
        }
        PumpExit::Quit
    }
}

/// Queues events for a running [`ScriptedSource`].
#[derive(Clone)]
pub struct EventFeeder(mpsc::Sender<SourceMsg>);

impl EventFeeder {
    pub fn send(&self, event: WindowEvent) {
        let _ = self.0.send(SourceMsg::Event(event));
    }
}

struct ScriptedQuit(mpsc::Sender<SourceMsg>);

impl QuitSignal for ScriptedQuit {
    fn quit(&self) {
        let _ = self.0.send(SourceMsg::Quit);
    }
}

/// A call made on a [`FakeShell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCall {
    Register(WindowHandle, u32),
    SetPosition(DockEdge, Rect),
    Remove,
    Intercept(u32),
    ReleaseIntercept,
    ZOrder(ZOrder),
    ExitHook,
}

pub struct FakeShell {
    accept_registration: bool,
    intercept_code: Option<u32>,
    focused_class: Mutex<Option<String>>,
    calls: Mutex<Vec<ShellCall>>,
    sink: Mutex<Option<NotificationSink>>,
    exit_hook: Mutex<Option<Teardown>>,
}

impl FakeShell {
    pub fn new() -> Self {
        Self {
            accept_registration: true,
            intercept_code: None,
            focused_class: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            sink: Mutex::new(None),
            exit_hook: Mutex::new(None),
        }
    }

    pub fn rejecting_registration(mut self) -> Self {
        self.accept_registration = false;
        self
    }

    pub fn failing_intercept(mut self, code: u32) -> Self {
        self.intercept_code = Some(code);
        self
    }

    pub fn set_focused_class(&self, class: &str) {
        *self.focused_class.lock().unwrap() = Some(class.to_string());
    }

    pub fn calls(&self) -> Vec<ShellCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&ShellCall) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| pred(c))
            .count()
    }

    /// Delivers a toolbar notification the way the bar window would.
    pub fn notify(&self, code: u32, lparam: isize) {
        let sink = self.sink.lock().unwrap().clone();
        if let Some(sink) = sink {
            sink(code, lparam);
        }
    }

    /// Runs the registered exit hook, as process shutdown would.
    pub fn exit(&self) {
        let hook = self.exit_hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn record(&self, call: ShellCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DockShell for FakeShell {
    fn register(&self, bar: WindowHandle, callback_message: u32) -> bool {
        self.record(ShellCall::Register(bar, callback_message));
        self.accept_registration
    }

    fn set_position(&self, _bar: WindowHandle, edge: DockEdge, rect: Rect) {
        self.record(ShellCall::SetPosition(edge, rect));
    }

    fn remove(&self, _bar: WindowHandle) {
        self.record(ShellCall::Remove);
    }

    fn intercept(
        &self,
        _bar: WindowHandle,
        callback_message: u32,
        sink: NotificationSink,
    ) -> ShellResult<()> {
        self.record(ShellCall::Intercept(callback_message));
        if let Some(code) = self.intercept_code {
            return Err(ShellError::Intercept { code });
        }
        *self.sink.lock().unwrap() = Some(sink);
        Ok(())
    }

    fn release_intercept(&self, _bar: WindowHandle) {
        self.record(ShellCall::ReleaseIntercept);
        *self.sink.lock().unwrap() = None;
    }

    fn set_z_order(&self, _bar: WindowHandle, order: ZOrder) {
        self.record(ShellCall::ZOrder(order));
    }

    fn focused_class(&self) -> Option<String> {
        self.focused_class.lock().unwrap().clone()
    }

    fn on_process_exit(&self, teardown: Teardown) {
        self.record(ShellCall::ExitHook);
        *self.exit_hook.lock().unwrap() = Some(teardown);
    }
}
