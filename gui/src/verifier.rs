//! Fingerprint verification backed by fprintd.
//!
//! [`FprintdVerifier`] implements the gate screen's [`Authenticator`] trait:
//! capability is answered from a cached availability probe, and each
//! authentication request opens a prompt window and spawns an async worker
//! that drives fprintd's VerifyStart/VerifyStatus cycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;

use futures_util::StreamExt;
use gtk4::glib;
use gtk4::ApplicationWindow;
use log::{error, info, warn};
use tokio::runtime::Runtime;
use tokio::time::timeout;

use fpgate_core::{
    error_codes, AuthOutcome, AuthRequest, Authenticator, CancelSignal, OutcomeSender,
};

use crate::config;
use crate::fprintd;
use crate::prompt::PromptWindow;

/// Events sent from the verification worker to the prompt window.
#[derive(Clone)]
pub enum PromptEvent {
    SetStatus(String),
    Dismiss,
}

/// How one VerifyStart round ended.
enum RoundVerdict {
    Matched,
    NoMatch,
    Restart,
}

/// Classification of a VerifyStatus result string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Match,
    NoMatch,
    Disconnected,
    UnknownError,
    Feedback,
}

/// Authentication service talking to fprintd over the system bus.
pub struct FprintdVerifier {
    rt: Arc<Runtime>,
    window: ApplicationWindow,
    available: Arc<AtomicBool>,
}

impl FprintdVerifier {
    pub fn new(rt: Arc<Runtime>, window: ApplicationWindow) -> Self {
        Self {
            rt,
            window,
            available: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Re-probe sensor presence and enrollment in the background; the result
    /// lands in the cache answered by `secure_lock_configured`.
    pub fn refresh_availability(&self) {
        let available = self.available.clone();
        self.rt.spawn(async move {
            let ready = probe_enrolled_sensor().await;
            info!("Fingerprint availability check finished: ready={}", ready);
            available.store(ready, Ordering::SeqCst);
        });
    }
}

impl Authenticator for FprintdVerifier {
    fn secure_lock_configured(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn request_authentication(
        &self,
        request: AuthRequest,
        cancel: CancelSignal,
        outcomes: OutcomeSender,
    ) {
        info!("Opening fingerprint prompt for request {}", request.id);

        let prompt = PromptWindow::new(&self.window, &request.prompt, cancel.clone());
        prompt.show();

        let (events_tx, events_rx) = mpsc::channel::<PromptEvent>();
        setup_prompt_listener(events_rx, prompt);

        self.rt.spawn(run_verification(cancel, outcomes, events_tx));
    }
}

/// Where worker events land. [`PromptWindow`] is the real surface; tests
/// substitute a recorder.
trait PromptSink {
    fn set_status(&self, text: &str);
    fn dismiss(&self);
}

impl PromptSink for PromptWindow {
    fn set_status(&self, text: &str) {
        PromptWindow::set_status(self, text);
    }

    fn dismiss(&self) {
        PromptWindow::dismiss(self);
    }
}

/// Forward worker events to the prompt window from the GTK main loop.
fn setup_prompt_listener(rx: mpsc::Receiver<PromptEvent>, prompt: PromptWindow) {
    glib::idle_add_local(move || pump_prompt_events(&rx, &prompt));
}

fn pump_prompt_events<S: PromptSink>(
    rx: &mpsc::Receiver<PromptEvent>,
    sink: &S,
) -> glib::ControlFlow {
    loop {
        match rx.try_recv() {
            Ok(PromptEvent::SetStatus(text)) => sink.set_status(&text),
            Ok(PromptEvent::Dismiss) => {
                sink.dismiss();
                return glib::ControlFlow::Break;
            }
            Err(TryRecvError::Empty) => return glib::ControlFlow::Continue,
            Err(TryRecvError::Disconnected) => {
                // The worker is gone; take the prompt down with it
                sink.dismiss();
                return glib::ControlFlow::Break;
            }
        }
    }
}

/// Check whether a fingerprint reader is present and has enrolled prints for
/// the current user. Read-only: listing enrolled fingers needs no claim.
async fn probe_enrolled_sensor() -> bool {
    info!("Connecting to fprintd system bus for availability check");
    let client = match fprintd::Client::system().await {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to connect to fprintd system bus: {}", e);
            warn!("This usually means fprintd service is not running or not installed");
            return false;
        }
    };

    let device = match fprintd::first_device(&client).await {
        Ok(Some(device)) => device,
        Ok(None) => {
            info!("No fingerprint devices detected on this system");
            return false;
        }
        Err(e) => {
            warn!("Failed to enumerate fingerprint devices: {}", e);
            return false;
        }
    };

    match device.list_enrolled_fingers("").await {
        Ok(fingers) => {
            info!("Found {} enrolled fingerprint(s)", fingers.len());
            !fingers.is_empty()
        }
        Err(e) => {
            // fprintd answers with an error when the user has nothing enrolled
            info!("No enrolled fingerprints found: {}", e);
            false
        }
    }
}

/// Drive one verification request against fprintd, reporting progress to the
/// prompt and the terminal outcome to the gate.
async fn run_verification(
    cancel: CancelSignal,
    outcomes: OutcomeSender,
    events: mpsc::Sender<PromptEvent>,
) {
    info!(
        "Starting fingerprint verification for request {}",
        outcomes.request_id()
    );

    let outcome = verify_flow(&cancel, &events).await;

    info!(
        "Verification for request {} finished: {:?}",
        outcomes.request_id(),
        outcome
    );
    let _ = events.send(PromptEvent::Dismiss);
    outcomes.send(outcome);
}

/// Acquire a device, run the attempt loop and clean up afterwards.
async fn verify_flow(cancel: &CancelSignal, events: &mpsc::Sender<PromptEvent>) -> AuthOutcome {
    info!("Connecting to fprintd system bus for verification");
    let client = match fprintd::Client::system().await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to connect to fprintd system bus: {}", e);
            return service_unavailable();
        }
    };

    let device = match fprintd::first_device(&client).await {
        Ok(Some(device)) => device,
        Ok(None) => {
            warn!("No fingerprint devices available for verification");
            return AuthOutcome::Error {
                code: error_codes::HARDWARE_NOT_PRESENT,
                message: "No fingerprint hardware detected".to_string(),
            };
        }
        Err(e) => {
            error!("Failed to enumerate fingerprint devices: {}", e);
            return service_unavailable();
        }
    };

    if cancel.is_triggered() {
        return cancelled_outcome();
    }

    info!("Claiming fingerprint device for verification (current user)");
    if let Err(e) = device.claim("").await {
        error!("Failed to claim device for verification: {}", e);
        return AuthOutcome::Error {
            code: error_codes::HARDWARE_UNAVAILABLE,
            message: "Fingerprint device is busy or unavailable".to_string(),
        };
    }

    match device.name().await {
        Ok(name) => info!("Using fingerprint device '{}'", name),
        Err(e) => warn!("Could not read device name: {}", e),
    }

    // Swipe sensors need different instructions than press sensors
    match device.scan_type().await {
        Ok(scan) if scan == "swipe" => {
            let _ = events.send(PromptEvent::SetStatus(
                "Swipe your finger across the reader".to_string(),
            ));
        }
        Ok(_) => {}
        Err(e) => warn!("Could not read device scan type: {}", e),
    }

    let outcome = attempt_loop(&device, cancel, events).await;

    // fprintd wants verification stopped before the device is released; a
    // stop after a done status fails and is ignored
    let _ = device.verify_stop().await;
    if let Err(e) = device.release().await {
        warn!("Failed to release device after verification: {}", e);
    } else {
        info!("Successfully released device after verification");
    }

    outcome
}

/// Run VerifyStart rounds until a match, a lockout or a terminal failure.
async fn attempt_loop(
    device: &fprintd::Device,
    cancel: &CancelSignal,
    events: &mpsc::Sender<PromptEvent>,
) -> AuthOutcome {
    let mut stream = match device.verify_status_signals().await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to subscribe to verify status signals: {}", e);
            return service_unavailable();
        }
    };

    let mut failed_attempts = 0u32;

    loop {
        if cancel.is_triggered() {
            return cancelled_outcome();
        }

        if let Err(e) = device.verify_start(fprintd::FINGER_ANY).await {
            error!("Failed to start verification: {}", e);
            return AuthOutcome::Error {
                code: error_codes::UNABLE_TO_PROCESS,
                message: "Could not start fingerprint verification".to_string(),
            };
        }
        info!("Verification round started, waiting for the scanner");

        let verdict = loop {
            if cancel.is_triggered() {
                return cancelled_outcome();
            }

            let message = match timeout(config::verify::CANCEL_POLL, stream.next()).await {
                Err(_) => continue, // poll the cancellation signal again
                Ok(None) => {
                    warn!("Verify status signal stream ended unexpectedly");
                    return service_unavailable();
                }
                Ok(Some(message)) => message,
            };

            let (result, done): (String, bool) = match message.body().deserialize() {
                Ok(body) => body,
                Err(e) => {
                    warn!("Ignoring malformed VerifyStatus signal: {}", e);
                    continue;
                }
            };
            info!("Verify status update: result='{}', done={}", result, done);

            match classify_status(&result) {
                StatusKind::Match => break RoundVerdict::Matched,
                StatusKind::NoMatch => break RoundVerdict::NoMatch,
                StatusKind::Disconnected => {
                    warn!("Fingerprint device disconnected during verification");
                    return service_unavailable();
                }
                StatusKind::UnknownError => {
                    error!("Fingerprint reader reported an unrecoverable error");
                    return AuthOutcome::Error {
                        code: error_codes::UNABLE_TO_PROCESS,
                        message: "Fingerprint reader reported an error".to_string(),
                    };
                }
                StatusKind::Feedback => {
                    if let Some(text) = retry_feedback(&result) {
                        let _ = events.send(PromptEvent::SetStatus(text.to_string()));
                    }
                    if done {
                        // A feedback status ending the round is unexpected;
                        // restart it without counting an attempt
                        break RoundVerdict::Restart;
                    }
                }
            }
        };

        match verdict {
            RoundVerdict::Matched => {
                info!("Fingerprint matched");
                return AuthOutcome::Succeeded;
            }
            RoundVerdict::NoMatch => {
                failed_attempts += 1;
                if failed_attempts >= config::verify::MAX_ATTEMPTS {
                    warn!(
                        "No match after {} attempts, reporting lockout",
                        failed_attempts
                    );
                    return AuthOutcome::Error {
                        code: error_codes::LOCKOUT,
                        message: "Too many failed attempts".to_string(),
                    };
                }
                let remaining = config::verify::MAX_ATTEMPTS - failed_attempts;
                info!("No match, {} attempt(s) remaining", remaining);
                let _ = events.send(PromptEvent::SetStatus(no_match_feedback(remaining)));
            }
            RoundVerdict::Restart => {}
        }

        // A done status ends the round on the daemon side; stop before the
        // next start
        if let Err(e) = device.verify_stop().await {
            warn!("Failed to stop verification round: {}", e);
        }
    }
}

fn classify_status(result: &str) -> StatusKind {
    match result {
        "verify-match" => StatusKind::Match,
        "verify-no-match" => StatusKind::NoMatch,
        "verify-disconnected" => StatusKind::Disconnected,
        "verify-unknown-error" => StatusKind::UnknownError,
        _ => StatusKind::Feedback,
    }
}

fn retry_feedback(result: &str) -> Option<&'static str> {
    match result {
        "verify-retry-scan" => Some("Didn't quite catch that. Try again"),
        "verify-too-fast" => Some("Too fast. Hold your finger on the reader"),
        "verify-swipe-too-short" => Some("Swipe was too short. Try again"),
        "verify-finger-not-centered" => Some("Center your finger on the reader"),
        "verify-remove-and-retry" => Some("Remove your finger, then try again"),
        _ => None,
    }
}

fn no_match_feedback(remaining: u32) -> String {
    if remaining == 1 {
        "Fingerprint not recognized. 1 attempt left".to_string()
    } else {
        format!("Fingerprint not recognized. {} attempts left", remaining)
    }
}

fn service_unavailable() -> AuthOutcome {
    AuthOutcome::Error {
        code: error_codes::HARDWARE_UNAVAILABLE,
        message: "Fingerprint device is not available".to_string(),
    }
}

fn cancelled_outcome() -> AuthOutcome {
    AuthOutcome::Error {
        code: error_codes::CANCELED,
        message: "Authentication was cancelled".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingSink {
        statuses: Rc<RefCell<Vec<String>>>,
        dismissed: Rc<Cell<bool>>,
    }

    impl PromptSink for RecordingSink {
        fn set_status(&self, text: &str) {
            self.statuses.borrow_mut().push(text.to_string());
        }

        fn dismiss(&self) {
            self.dismissed.set(true);
        }
    }

    #[test]
    fn prompt_events_are_forwarded_in_order_until_dismiss() {
        let (tx, rx) = mpsc::channel();
        let sink = RecordingSink::default();

        tx.send(PromptEvent::SetStatus("first".to_string())).unwrap();
        tx.send(PromptEvent::SetStatus("second".to_string())).unwrap();
        assert_eq!(pump_prompt_events(&rx, &sink), glib::ControlFlow::Continue);
        assert_eq!(*sink.statuses.borrow(), ["first", "second"]);
        assert!(!sink.dismissed.get());

        tx.send(PromptEvent::Dismiss).unwrap();
        assert_eq!(pump_prompt_events(&rx, &sink), glib::ControlFlow::Break);
        assert!(sink.dismissed.get());
    }

    #[test]
    fn a_worker_that_dies_without_reporting_still_dismisses_the_prompt() {
        let (tx, rx) = mpsc::channel::<PromptEvent>();
        let sink = RecordingSink::default();
        drop(tx);

        assert_eq!(pump_prompt_events(&rx, &sink), glib::ControlFlow::Break);
        assert!(sink.dismissed.get());
    }

    #[test]
    fn terminal_statuses_are_not_classified_as_feedback() {
        assert_eq!(classify_status("verify-match"), StatusKind::Match);
        assert_eq!(classify_status("verify-no-match"), StatusKind::NoMatch);
        assert_eq!(
            classify_status("verify-disconnected"),
            StatusKind::Disconnected
        );
        assert_eq!(
            classify_status("verify-unknown-error"),
            StatusKind::UnknownError
        );
    }

    #[test]
    fn every_retry_status_has_feedback_text() {
        for status in [
            "verify-retry-scan",
            "verify-too-fast",
            "verify-swipe-too-short",
            "verify-finger-not-centered",
            "verify-remove-and-retry",
        ] {
            assert_eq!(classify_status(status), StatusKind::Feedback);
            assert!(
                retry_feedback(status).is_some(),
                "no feedback text for {}",
                status
            );
        }
    }

    #[test]
    fn unknown_statuses_get_no_feedback_text() {
        assert_eq!(classify_status("verify-something-new"), StatusKind::Feedback);
        assert!(retry_feedback("verify-something-new").is_none());
    }

    #[test]
    fn no_match_feedback_counts_remaining_attempts() {
        assert_eq!(
            no_match_feedback(2),
            "Fingerprint not recognized. 2 attempts left"
        );
        assert_eq!(
            no_match_feedback(1),
            "Fingerprint not recognized. 1 attempt left"
        );
    }

    #[test]
    fn cancelled_outcome_uses_the_canceled_error_code() {
        match cancelled_outcome() {
            AuthOutcome::Error { code, .. } => assert_eq!(code, error_codes::CANCELED),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
