//! Startable/stoppable components and the composed core.

use std::sync::Arc;

use crate::action::{WindowActions, WindowOps};
use crate::channel::Channel;
use crate::error::ShellResult;
use crate::hook::{HookManager, HookState, SourceFactory};
use crate::stack::{SharedStack, StackView};
use crate::window::WindowQuery;

/// A long-running component that publishes on a [`Channel`].
pub trait Service {
    fn start(&mut self) -> ShellResult<()>;

    fn stop(&mut self);

    fn channel(&self) -> &Channel;
}

impl Service for HookManager {
    fn start(&mut self) -> ShellResult<()> {
        HookManager::start(self)
    }

    fn stop(&mut self) {
        HookManager::stop(self);
    }

    fn channel(&self) -> &Channel {
        HookManager::channel(self)
    }
}

/// Hook manager, foreground history and command executor wired to
/// one channel.
pub struct ShellCore {
    stack: SharedStack,
    hooks: HookManager,
    actions: WindowActions,
}

impl ShellCore {
    /// Builds the core around `channel`, which other publishers (the
    /// dock) may share.
    pub fn new<D>(
        desktop: Arc<D>,
        factory: SourceFactory,
        capacity: usize,
        channel: Channel,
    ) -> Self
    where
        D: WindowQuery + WindowOps + 'static,
    {
        let stack = SharedStack::new(capacity);
        let query: Arc<dyn WindowQuery> = desktop.clone();
        let ops: Arc<dyn WindowOps> = desktop;
        Self {
            hooks: HookManager::new(factory, query, stack.clone(), channel),
            actions: WindowActions::new(stack.view(), ops),
            stack,
        }
    }

    pub fn actions(&self) -> &WindowActions {
        &self.actions
    }

    pub fn stack(&self) -> StackView {
        self.stack.view()
    }

    pub fn state(&self) -> HookState {
        self.hooks.state()
    }
}

impl Service for ShellCore {
    fn start(&mut self) -> ShellResult<()> {
        self.hooks.start()
    }

    fn stop(&mut self) {
        self.hooks.stop();
    }

    fn channel(&self) -> &Channel {
        self.hooks.channel()
    }
}
