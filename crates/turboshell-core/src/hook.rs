//! Lifecycle of the OS event hooks and the thread that pumps them.
//!
//! Hook callbacks are delivered on the thread that installed the hooks,
//! and only while that thread pumps messages. [`HookManager`] therefore
//! owns a dedicated thread which installs every hook, seeds the stack,
//! pumps until asked to quit and then removes the hooks again.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use crate::channel::Channel;
use crate::dispatch::EventDispatcher;
use crate::error::{ShellError, ShellResult};
use crate::event::{EventCategory, WindowEvent};
use crate::stack::SharedStack;
use crate::window::WindowQuery;

/// Platform token for one installed hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub usize);

/// Why [`EventSource::pump`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpExit {
    /// A quit request was received.
    Quit,
    /// Retrieving the next message failed. The loop is not restarted.
    Failed { code: i32 },
}

/// Asks a running pump to return. Callable from any thread.
pub trait QuitSignal: Send {
    fn quit(&self);
}

/// A source of window events bound to the thread it was created on.
pub trait EventSource {
    fn install(&mut self, category: EventCategory) -> ShellResult<HookId>;

    fn uninstall(&mut self, id: HookId);

    fn quit_signal(&self) -> Box<dyn QuitSignal>;

    /// Blocks, handing each event to `sink`, until a quit request
    /// arrives or message retrieval fails.
    fn pump(&mut self, sink: Box<dyn FnMut(WindowEvent)>) -> PumpExit;
}

/// Creates the event source. Called once, on the hook thread.
pub type SourceFactory = Arc<dyn Fn() -> ShellResult<Box<dyn EventSource>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookRegistration {
    pub category: EventCategory,
    pub id: HookId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HookState {
    Stopped = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

impl HookState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Starting,
            2 => Self::Running,
            3 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

impl fmt::Display for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default)]
struct StateCell(Arc<AtomicU8>);

impl StateCell {
    fn get(&self) -> HookState {
        HookState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: HookState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

struct RunningLoop {
    quit: Box<dyn QuitSignal>,
    thread: JoinHandle<()>,
}

/// Owns the hook thread and the hooks installed on it.
pub struct HookManager {
    factory: SourceFactory,
    query: Arc<dyn WindowQuery>,
    stack: SharedStack,
    channel: Channel,
    state: StateCell,
    running: Option<RunningLoop>,
}

impl HookManager {
    pub fn new(
        factory: SourceFactory,
        query: Arc<dyn WindowQuery>,
        stack: SharedStack,
        channel: Channel,
    ) -> Self {
        Self {
            factory,
            query,
            stack,
            channel,
            state: StateCell::default(),
            running: None,
        }
    }

    pub fn state(&self) -> HookState {
        self.state.get()
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Starts the hook thread and waits until every hook is installed.
    ///
    /// Does nothing if the manager is already running. If any hook
    /// fails to install, the ones already installed are removed, the
    /// thread exits and the error is returned.
    pub fn start(&mut self) -> ShellResult<()> {
        if self.state.get() != HookState::Stopped {
            debug!(state = %self.state.get(), "hook manager already started");
            return Ok(());
        }
        // A previous loop may have ended on its own.
        if let Some(stale) = self.running.take() {
            let _ = stale.thread.join();
        }

        self.state.set(HookState::Starting);
        let (ready_tx, ready_rx) = mpsc::channel();
        let factory = Arc::clone(&self.factory);
        let dispatcher = EventDispatcher::new(
            Arc::clone(&self.query),
            self.stack.clone(),
            self.channel.clone(),
        );
        let state = self.state.clone();

        let spawned = thread::Builder::new()
            .name("turboshell-hooks".into())
            .spawn(move || {
                hook_thread(factory.as_ref(), dispatcher, &state, &ready_tx);
            });
        let thread = match spawned {
            Ok(t) => t,
            Err(e) => {
                error!("failed to spawn hook thread: {e}");
                self.state.set(HookState::Stopped);
                return Err(ShellError::HookThread);
            }
        };

        match ready_rx.recv() {
            Ok(Ok(quit)) => {
                self.running = Some(RunningLoop { quit, thread });
                info!("window event hooks running");
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = thread.join();
                self.state.set(HookState::Stopped);
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                self.state.set(HookState::Stopped);
                Err(ShellError::HookThread)
            }
        }
    }

    /// Asks the pump to quit and waits for the hooks to be removed.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.quit.quit();
        if running.thread.join().is_err() {
            warn!("hook thread panicked");
        }
        self.state.set(HookState::Stopped);
    }
}

impl Drop for HookManager {
    fn drop(&mut self) {
        self.stop();
    }
}

fn hook_thread(
    factory: &(dyn Fn() -> ShellResult<Box<dyn EventSource>> + Send + Sync),
    mut dispatcher: EventDispatcher,
    state: &StateCell,
    ready: &mpsc::Sender<ShellResult<Box<dyn QuitSignal>>>,
) {
    let mut source = match factory() {
        Ok(source) => source,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    let registrations = match install_all(source.as_mut()) {
        Ok(r) => r,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    dispatcher.seed();
    state.set(HookState::Running);
    if ready.send(Ok(source.quit_signal())).is_err() {
        uninstall_all(source.as_mut(), &registrations);
        state.set(HookState::Stopped);
        return;
    }

    let exit = source.pump(Box::new(move |event| dispatcher.handle(event)));
    match exit {
        PumpExit::Quit => debug!("message loop received quit"),
        PumpExit::Failed { code } => {
            error!(code, "message loop failed; window events are no longer tracked");
        }
    }

    state.set(HookState::Stopping);
    uninstall_all(source.as_mut(), &registrations);
    state.set(HookState::Stopped);
    info!("window event hooks removed");
}

fn install_all(source: &mut dyn EventSource) -> ShellResult<Vec<HookRegistration>> {
    let mut registrations = Vec::with_capacity(EventCategory::ALL.len());
    for category in EventCategory::ALL {
        match source.install(category) {
            Ok(id) => {
                debug!(%category, "installed event hook");
                registrations.push(HookRegistration { category, id });
            }
            Err(e) => {
                error!(%category, "event hook installation failed: {e}");
                uninstall_all(source, &registrations);
                return Err(e);
            }
        }
    }
    Ok(registrations)
}

fn uninstall_all(source: &mut dyn EventSource, registrations: &[HookRegistration]) {
    for reg in registrations.iter().rev() {
        source.uninstall(reg.id);
    }
}

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;
