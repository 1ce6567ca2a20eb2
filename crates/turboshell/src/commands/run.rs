#[cfg(windows)]
pub use imp::execute;

#[cfg(not(windows))]
pub fn execute() -> turboshell_core::ShellResult<()> {
    Err(turboshell_core::ShellError::Unsupported { command: "run" })
}

#[cfg(windows)]
mod imp {
    use std::sync::{Arc, mpsc};
    use std::time::Duration;

    use tracing::{info, warn};
    use turboshell_core::config::{self, BarConfig};
    use turboshell_core::{
        Channel, DockController, EventCategory, EventSource, HookId, HookState, PayloadKind,
        PumpExit, QuitSignal, Rect, Service, ShellCore, ShellResult, SourceFactory, WindowEvent,
        log,
    };
    use turboshell_windows::{
        BarWindow, Win32Desktop, Win32EventSource, Win32Shell, ctrl_c, primary_work_area,
    };

    /// The hook thread's event source, plus the docked bar it owns.
    ///
    /// The bar window lives on the hook thread because its messages,
    /// including the shell's toolbar callbacks, are only dispatched by
    /// that thread's pump.
    struct DockedSource {
        source: Win32EventSource,
        dock: DockController,
        _bar: BarWindow,
    }

    impl DockedSource {
        fn create(work_area: Rect, bar: &BarConfig, channel: Channel) -> ShellResult<Self> {
            let source = Win32EventSource::new();
            let window = BarWindow::create(work_area, bar.height)?;
            let dock = DockController::setup(
                Arc::new(Win32Shell),
                window.handle(),
                work_area,
                bar,
                channel,
            )?;
            Ok(Self {
                source,
                dock,
                _bar: window,
            })
        }
    }

    impl EventSource for DockedSource {
        fn install(&mut self, category: EventCategory) -> ShellResult<HookId> {
            self.source.install(category)
        }

        fn uninstall(&mut self, id: HookId) {
            self.source.uninstall(id);
        }

        fn quit_signal(&self) -> Box<dyn QuitSignal> {
            self.source.quit_signal()
        }

        fn pump(&mut self, sink: Box<dyn FnMut(WindowEvent)>) -> PumpExit {
            let exit = self.source.pump(sink);
            // Undock while the bar window still exists.
            self.dock.teardown();
            exit
        }
    }

    /// Docks the bar, starts the hooks and logs every payload until
    /// Ctrl+C.
    pub fn execute() -> ShellResult<()> {
        let (config, warning) = config::load();
        let _guard = log::init(&config.logging);
        if let Some(e) = warning {
            warn!("using default configuration: {e}");
        }

        let work_area = primary_work_area()?;
        let channel = Channel::new();
        let bar = config.bar.clone();
        let dock_channel = channel.clone();
        let factory: SourceFactory = Arc::new(move || -> ShellResult<Box<dyn EventSource>> {
            let source = DockedSource::create(work_area, &bar, dock_channel.clone())?;
            Ok(Box::new(source))
        });

        let mut core = ShellCore::new(
            Arc::new(Win32Desktop),
            factory,
            config.history.capacity,
            channel,
        );
        let (payload_tx, payload_rx) = mpsc::channel();
        core.channel().forward(&PayloadKind::ALL, payload_tx);

        let (stop_tx, stop_rx) = mpsc::channel();
        ctrl_c::set_handler(stop_tx)?;

        core.start()?;
        info!(?work_area, "turboshell running; press Ctrl+C to stop");

        loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }
            match payload_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(payload) => info!(?payload, "payload"),
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if core.state() == HookState::Stopped {
                        warn!("hook thread stopped on its own");
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        core.stop();
        if let Some(top) = core.stack().peek() {
            let title = top.title().unwrap_or_default();
            info!(hwnd = %top.handle(), title, "last foreground window");
        }
        Ok(())
    }
}
