#[cfg(windows)]
pub use imp::execute;

#[cfg(not(windows))]
pub fn execute() -> turboshell_core::ShellResult<()> {
    Err(turboshell_core::ShellError::Unsupported {
        command: "debug events",
    })
}

#[cfg(windows)]
mod imp {
    use std::sync::{Arc, mpsc};
    use std::time::Duration;

    use turboshell_core::{
        Channel, EventSource, PayloadKind, Service, ShellCore, ShellResult, SourceFactory, config,
        log,
    };
    use turboshell_windows::{Win32Desktop, Win32EventSource, ctrl_c};

    /// Prints every payload as a JSON line. Press Ctrl+C to stop.
    ///
    /// No bar is docked, so only title and capability payloads appear.
    pub fn execute() -> ShellResult<()> {
        let (config, _) = config::load();
        let _guard = log::init(&config.logging);

        let factory: SourceFactory = Arc::new(|| -> ShellResult<Box<dyn EventSource>> {
            Ok(Box::new(Win32EventSource::new()))
        });
        let mut core = ShellCore::new(
            Arc::new(Win32Desktop),
            factory,
            config.history.capacity,
            Channel::new(),
        );
        let (tx, rx) = mpsc::channel();
        core.channel().forward(&PayloadKind::ALL, tx);

        let (stop_tx, stop_rx) = mpsc::channel();
        ctrl_c::set_handler(stop_tx)?;

        eprintln!("Watching window events (press Ctrl+C to stop)...");
        core.start()?;

        loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(payload) => match serde_json::to_string(&payload) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!("could not encode payload: {e}"),
                },
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        core.stop();
        Ok(())
    }
}
