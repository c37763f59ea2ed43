//! Drives the gate screen through full request cycles via the public API,
//! with a scripted authentication service standing in for the real backend.

use std::cell::RefCell;
use std::rc::Rc;

use fpgate_core::{
    AuthOutcome, AuthRequest, Authenticator, CancelSignal, GateScreen, Navigator, Notifier,
    OutcomeSender, PumpStatus, RequestStatus,
};

#[derive(Clone, Default)]
struct FakeService {
    handles: Rc<RefCell<Vec<(CancelSignal, OutcomeSender)>>>,
}

impl FakeService {
    fn handle(&self, index: usize) -> (CancelSignal, OutcomeSender) {
        let handles = self.handles.borrow();
        let (signal, sender) = &handles[index];
        (signal.clone(), sender.clone())
    }
}

impl Authenticator for FakeService {
    fn secure_lock_configured(&self) -> bool {
        true
    }

    fn request_authentication(
        &self,
        _request: AuthRequest,
        cancel: CancelSignal,
        outcomes: OutcomeSender,
    ) {
        self.handles.borrow_mut().push((cancel, outcomes));
    }
}

/// Holds on to the cancellation signal but drops the outcome sender, like a
/// service that lost its reporting path mid-request.
#[derive(Clone, Default)]
struct MuteService {
    signals: Rc<RefCell<Vec<CancelSignal>>>,
}

impl Authenticator for MuteService {
    fn secure_lock_configured(&self) -> bool {
        true
    }

    fn request_authentication(
        &self,
        _request: AuthRequest,
        cancel: CancelSignal,
        _outcomes: OutcomeSender,
    ) {
        self.signals.borrow_mut().push(cancel);
    }
}

#[derive(Clone, Default)]
struct Shell {
    messages: Rc<RefCell<Vec<String>>>,
    navigations: Rc<RefCell<u32>>,
}

impl Notifier for Shell {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

impl Navigator for Shell {
    fn open_protected(&self) {
        *self.navigations.borrow_mut() += 1;
    }
}

#[test]
fn success_cycle_then_cancelled_retry() {
    let service = FakeService::default();
    let shell = Shell::default();
    let mut gate = GateScreen::new(service.clone(), shell.clone(), shell.clone());

    // First cycle: authentication succeeds and the protected screen opens.
    assert_eq!(gate.request_authentication(), RequestStatus::Submitted);
    assert_eq!(gate.process_pending(), PumpStatus::AwaitingOutcome);

    service.handle(0).1.send(AuthOutcome::Succeeded);
    assert_eq!(gate.process_pending(), PumpStatus::Settled);
    assert_eq!(*shell.navigations.borrow(), 1);
    assert_eq!(
        shell.messages.borrow().last().map(String::as_str),
        Some("You've been Authenticated!")
    );

    // Second cycle: the user cancels before any terminal outcome arrives.
    assert_eq!(gate.request_authentication(), RequestStatus::Submitted);
    service.handle(1).0.trigger();
    assert_eq!(gate.process_pending(), PumpStatus::Settled);

    assert_eq!(*shell.navigations.borrow(), 1);
    assert_eq!(
        shell.messages.borrow().last().map(String::as_str),
        Some("Authentication was cancelled")
    );
}

#[test]
fn error_cycle_keeps_the_gate_usable() {
    let service = FakeService::default();
    let shell = Shell::default();
    let mut gate = GateScreen::new(service.clone(), shell.clone(), shell.clone());

    gate.request_authentication();
    service.handle(0).1.send(AuthOutcome::Error {
        code: 1,
        message: "Fingerprint device is not available".to_string(),
    });
    assert_eq!(gate.process_pending(), PumpStatus::Settled);

    assert_eq!(*shell.navigations.borrow(), 0);
    assert_eq!(
        shell.messages.borrow().last().map(String::as_str),
        Some("Fingerprint device is not available")
    );

    // The gate accepts a new press once the failed request has settled.
    assert_eq!(gate.request_authentication(), RequestStatus::Submitted);
}

#[test]
fn silent_settle_after_service_loss_keeps_the_gate_usable() {
    let service = MuteService::default();
    let shell = Shell::default();
    let mut gate = GateScreen::new(service.clone(), shell.clone(), shell.clone());

    // The service drops its sender without reporting; the request settles
    // with no message and no navigation.
    assert_eq!(gate.request_authentication(), RequestStatus::Submitted);
    assert_eq!(gate.process_pending(), PumpStatus::Settled);
    assert!(shell.messages.borrow().is_empty());
    assert_eq!(*shell.navigations.borrow(), 0);

    assert_eq!(gate.process_pending(), PumpStatus::Idle);
    assert_eq!(gate.request_authentication(), RequestStatus::Submitted);
    assert_eq!(service.signals.borrow().len(), 2);
}
