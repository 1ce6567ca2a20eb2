use std::sync::mpsc;
use std::time::Duration;

use super::*;
use crate::payload::{Payload, PayloadKind};
use crate::test_support::{FakeDesktop, FakeWindow, ScriptedSource, SourceCall};
use crate::window::WindowHandle;

fn manager(desktop: &Arc<FakeDesktop>, source: ScriptedSource) -> (HookManager, SharedStack) {
    let stack = SharedStack::new(10);
    let manager = HookManager::new(
        source.into_factory(),
        desktop.clone(),
        stack.clone(),
        Channel::new(),
    );
    (manager, stack)
}

#[test]
fn start_installs_every_hook_and_stop_removes_them() {
    // Arrange
    let desktop = Arc::new(FakeDesktop::new());
    let source = ScriptedSource::new();
    let log = source.log();
    let (mut manager, _) = manager(&desktop, source);

    // Act
    manager.start().unwrap();
    let running = manager.state();
    manager.stop();

    // Assert
    assert_eq!(running, HookState::Running);
    assert_eq!(manager.state(), HookState::Stopped);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            SourceCall::Install(EventCategory::Foreground),
            SourceCall::Install(EventCategory::LocationChange),
            SourceCall::Install(EventCategory::NameChange),
            SourceCall::Pump,
            SourceCall::Uninstall(EventCategory::NameChange),
            SourceCall::Uninstall(EventCategory::LocationChange),
            SourceCall::Uninstall(EventCategory::Foreground),
        ]
    );
}

#[test]
fn failed_install_aborts_start_and_rolls_back() {
    // Arrange
    let desktop = Arc::new(FakeDesktop::new());
    let source = ScriptedSource::new().failing_on(EventCategory::NameChange);
    let log = source.log();
    let (mut manager, _) = manager(&desktop, source);

    // Act
    let result = manager.start();

    // Assert
    assert!(matches!(
        result,
        Err(ShellError::HookInstall {
            category: EventCategory::NameChange
        })
    ));
    assert_eq!(manager.state(), HookState::Stopped);
    let log = log.lock().unwrap();
    assert!(!log.contains(&SourceCall::Pump));
    assert_eq!(
        &log[2..],
        &[
            SourceCall::Uninstall(EventCategory::LocationChange),
            SourceCall::Uninstall(EventCategory::Foreground),
        ]
    );
}

#[test]
fn factory_failure_is_reported() {
    let desktop = Arc::new(FakeDesktop::new());
    let factory: SourceFactory = Arc::new(|| -> ShellResult<Box<dyn EventSource>> {
        Err(ShellError::Os {
            context: "create event source",
            code: 5,
        })
    });
    let mut manager = HookManager::new(factory, desktop, SharedStack::new(4), Channel::new());

    let result = manager.start();

    assert!(matches!(result, Err(ShellError::Os { code: 5, .. })));
    assert_eq!(manager.state(), HookState::Stopped);
}

#[test]
fn start_twice_is_a_no_op() {
    let desktop = Arc::new(FakeDesktop::new());
    let source = ScriptedSource::new();
    let log = source.log();
    let (mut manager, _) = manager(&desktop, source);

    manager.start().unwrap();
    manager.start().unwrap();
    manager.stop();

    let installs = log
        .lock()
        .unwrap()
        .iter()
        .filter(|c| matches!(c, SourceCall::Install(_)))
        .count();
    assert_eq!(installs, 3);
}

#[test]
fn seeds_stack_with_current_foreground() {
    let desktop = Arc::new(FakeDesktop::new());
    desktop.add(FakeWindow::new(8, "Terminal"));
    desktop.focus(8);
    let (mut manager, stack) = manager(&desktop, ScriptedSource::new());

    manager.start().unwrap();

    assert_eq!(
        stack.lock().peek().map(|s| s.handle()),
        Some(WindowHandle(8))
    );
    manager.stop();
}

#[test]
fn events_are_dispatched_on_the_hook_thread() {
    // Arrange
    let desktop = Arc::new(FakeDesktop::new());
    desktop.add(FakeWindow::new(1, "Editor"));
    let source = ScriptedSource::new();
    let feeder = source.feeder();
    let (mut manager, stack) = manager(&desktop, source);
    let (tx, rx) = mpsc::channel();
    let caller = std::thread::current().id();
    manager
        .channel()
        .subscribe(PayloadKind::TitleChanged, move |p| {
            let _ = tx.send((std::thread::current().id(), p.clone()));
        });

    // Act
    manager.start().unwrap();
    feeder.send(WindowEvent::ForegroundChanged {
        hwnd: WindowHandle(1),
    });
    let (thread, payload) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    manager.stop();

    // Assert
    assert_ne!(thread, caller);
    assert_eq!(payload, Payload::TitleChanged("Editor".into()));
    assert_eq!(stack.lock().len(), 1);
}

#[test]
fn failed_pump_is_not_restarted_and_still_cleans_up() {
    let desktop = Arc::new(FakeDesktop::new());
    let source = ScriptedSource::new().exiting_with(PumpExit::Failed { code: -1 });
    let log = source.log();
    let (mut manager, _) = manager(&desktop, source);

    manager.start().unwrap();
    manager.stop();

    let log = log.lock().unwrap();
    assert_eq!(log.iter().filter(|c| **c == SourceCall::Pump).count(), 1);
    assert_eq!(
        log.last(),
        Some(&SourceCall::Uninstall(EventCategory::Foreground))
    );
    assert_eq!(manager.state(), HookState::Stopped);
}

#[test]
fn state_display_is_lowercase() {
    assert_eq!(HookState::Running.to_string(), "running");
    assert_eq!(HookState::Stopping.to_string(), "stopping");
}
