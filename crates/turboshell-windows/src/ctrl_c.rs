//! Console control and panic handling.
//!
//! Ctrl+C and Ctrl+Break are delivered to a channel so the binary can
//! shut down in order. Closing the console or panicking runs the
//! registered exit teardowns instead. Logoff and shutdown never reach
//! the console handler of a process that owns windows; the bar window
//! runs the teardowns on `WM_ENDSESSION` for those.

use std::panic;
use std::sync::mpsc::Sender;
use std::sync::{Mutex, OnceLock};

use tracing::{info, warn};
use turboshell_core::{ShellError, ShellResult, Teardown};
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};
use windows::core::BOOL;

static INTERRUPT: OnceLock<Sender<()>> = OnceLock::new();
static TEARDOWNS: Mutex<Vec<Teardown>> = Mutex::new(Vec::new());
static INSTALLED: OnceLock<Result<(), i32>> = OnceLock::new();

/// Sends `()` on `tx` for every Ctrl+C or Ctrl+Break.
pub fn set_handler(tx: Sender<()>) -> ShellResult<()> {
    install()?;
    INTERRUPT.set(tx).map_err(|_| ShellError::Os {
        context: "SetConsoleCtrlHandler",
        code: 0,
    })
}

/// Runs `teardown` once when the process is about to exit abnormally.
pub fn on_exit(teardown: Teardown) {
    if let Err(e) = install() {
        warn!("exit teardown not armed: {e}");
    }
    match TEARDOWNS.lock() {
        Ok(mut list) => list.push(teardown),
        Err(_) => warn!("teardown list poisoned"),
    }
}

/// Runs and forgets every registered teardown.
pub fn run_teardowns() {
    let list = match TEARDOWNS.lock() {
        Ok(mut list) => std::mem::take(&mut *list),
        Err(_) => return,
    };
    for teardown in list {
        teardown();
    }
}

fn install() -> ShellResult<()> {
    install_once(&INSTALLED, || {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            run_teardowns();
            previous(info);
        }));
        unsafe { SetConsoleCtrlHandler(Some(handler), true) }.map_err(|e| e.code().0)
    })
}

/// Runs `attempt` the first time only; every call reports its outcome.
fn install_once(
    cell: &OnceLock<Result<(), i32>>,
    attempt: impl FnOnce() -> Result<(), i32>,
) -> ShellResult<()> {
    (*cell.get_or_init(attempt)).map_err(|code| ShellError::Os {
        context: "SetConsoleCtrlHandler",
        code,
    })
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    if ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT {
        if let Some(tx) = INTERRUPT.get() {
            let _ = tx.send(());
            return BOOL(1);
        }
        return BOOL(0);
    }
    info!(ctrl_type, "console closing; releasing desktop reservations");
    run_teardowns();
    // Let the default handler terminate the process.
    BOOL(0)
}
