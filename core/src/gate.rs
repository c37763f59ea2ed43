//! The gate screen: a button-driven flow that checks device capability,
//! requests biometric authentication and opens the protected screen on
//! success.

use std::sync::mpsc::{self, TryRecvError};

use log::{info, warn};

use crate::outcome::{AuthOutcome, OutcomeEvent, OutcomeSender};
use crate::prompt::{AuthRequest, PromptContent};
use crate::signal::CancelSignal;

const PROMPT_TITLE: &str = "Authentication Prompt";
const PROMPT_SUBTITLE: &str = "This app requires Authentication";
const PROMPT_DESCRIPTION: &str = "Authentication is required to view all content";
const PROMPT_CANCEL_LABEL: &str = "Cancel";

const MSG_NOT_CONFIGURED: &str = "Fingerprint authentication has not been enabled in settings";
const MSG_AUTHENTICATED: &str = "You've been Authenticated!";
const MSG_CANCELLED: &str = "Authentication was cancelled";

/// External biometric/credential service the gate screen submits requests to.
pub trait Authenticator {
    /// Whether a secure device lock is configured, i.e. whether submitting an
    /// authentication request can succeed at all.
    fn secure_lock_configured(&self) -> bool;

    /// Submit an authentication request. Must return without blocking;
    /// exactly one terminal outcome per request arrives later through
    /// `outcomes`.
    fn request_authentication(
        &self,
        request: AuthRequest,
        cancel: CancelSignal,
        outcomes: OutcomeSender,
    );
}

/// Shows transient user-facing messages.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Performs the one-way transition to the protected screen.
pub trait Navigator {
    fn open_protected(&self);
}

/// What became of a press of the authenticate button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// A request was handed to the authentication service.
    Submitted,
    /// No secure lock is configured; nothing was submitted.
    NotConfigured,
    /// An earlier request is still awaiting its outcome.
    AlreadyPending,
}

/// Result of one pass over the outcome channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    /// No request is in flight.
    Idle,
    /// A request is in flight but no outcome has arrived yet.
    AwaitingOutcome,
    /// The in-flight request settled during this pass.
    Settled,
}

/// State of the one request that may be outstanding. Dropping it also drops
/// the outcome receiver, which is what makes late outcomes unobservable.
struct Flight {
    id: u64,
    outcomes: mpsc::Receiver<OutcomeEvent>,
    cancel: CancelSignal,
}

/// The single demo screen. Owns the injected service, notifier and navigator
/// plus the state of the request currently in flight, if any.
pub struct GateScreen<A, N, V> {
    pub auth: A,
    pub notifier: N,
    pub navigator: V,
    flight: Option<Flight>,
    request_seq: u64,
}

impl<A, N, V> GateScreen<A, N, V>
where
    A: Authenticator,
    N: Notifier,
    V: Navigator,
{
    pub fn new(auth: A, notifier: N, navigator: V) -> Self {
        Self {
            auth,
            notifier,
            navigator,
            flight: None,
            request_seq: 0,
        }
    }

    /// Handle a press of the authenticate button.
    ///
    /// Runs the capability check and, if it passes, submits a prompt request
    /// with a fresh cancellation signal. At most one request is outstanding:
    /// further presses are rejected until the current one settles.
    pub fn request_authentication(&mut self) -> RequestStatus {
        if self.flight.is_some() {
            warn!("Ignoring button press: a request is still awaiting its outcome");
            return RequestStatus::AlreadyPending;
        }

        if !self.auth.secure_lock_configured() {
            info!("No secure lock configured, not submitting a request");
            self.notifier.notify(MSG_NOT_CONFIGURED);
            return RequestStatus::NotConfigured;
        }

        self.request_seq += 1;
        let id = self.request_seq;

        // The service gets the only sender; when it drops every handle
        // without reporting, the pump sees the channel disconnect.
        let (tx, rx) = mpsc::channel::<OutcomeEvent>();
        let cancel = CancelSignal::new();

        let request = AuthRequest {
            id,
            prompt: PromptContent {
                title: PROMPT_TITLE.to_string(),
                subtitle: PROMPT_SUBTITLE.to_string(),
                description: PROMPT_DESCRIPTION.to_string(),
                cancel_label: PROMPT_CANCEL_LABEL.to_string(),
            },
        };

        info!("Submitting authentication request {}", id);
        self.flight = Some(Flight {
            id,
            outcomes: rx,
            cancel: cancel.clone(),
        });
        self.auth
            .request_authentication(request, cancel, OutcomeSender::new(id, tx));

        RequestStatus::Submitted
    }

    /// Trigger cancellation of the in-flight request, if any. The request
    /// settles as cancelled on the next pump pass.
    pub fn cancel_pending(&self) {
        if let Some(flight) = &self.flight {
            info!("Cancelling authentication request {}", flight.id);
            flight.cancel.trigger();
        }
    }

    /// Whether a request is currently awaiting its outcome.
    pub fn has_pending_request(&self) -> bool {
        self.flight.is_some()
    }

    /// Drain the in-flight request's outcome channel without blocking.
    ///
    /// Driven from the UI loop while a request is outstanding. The first
    /// matching outcome settles the request and drops the channel, so a late
    /// second outcome for the same request is never observed. With nothing
    /// queued, a triggered cancellation signal settles the request as
    /// cancelled, and a channel with no senders left settles it silently.
    pub fn process_pending(&mut self) -> PumpStatus {
        loop {
            let (flight_id, cancelled, received) = match &self.flight {
                None => return PumpStatus::Idle,
                Some(flight) => (
                    flight.id,
                    flight.cancel.is_triggered(),
                    flight.outcomes.try_recv(),
                ),
            };

            match received {
                Ok(event) if event.request_id == flight_id => {
                    self.settle(event.outcome);
                    return PumpStatus::Settled;
                }
                Ok(event) => {
                    warn!(
                        "Dropping outcome for request {} while request {} is in flight",
                        event.request_id, flight_id
                    );
                }
                // A queued outcome wins over the signal; with the queue
                // quiet, a triggered signal settles the request as cancelled.
                Err(_) if cancelled => {
                    self.settle(AuthOutcome::Cancelled);
                    return PumpStatus::Settled;
                }
                Err(TryRecvError::Empty) => return PumpStatus::AwaitingOutcome,
                Err(TryRecvError::Disconnected) => {
                    warn!(
                        "Authentication service went away without settling request {}",
                        flight_id
                    );
                    self.flight = None;
                    return PumpStatus::Settled;
                }
            }
        }
    }

    /// Apply a terminal outcome: surface it to the user and, on success,
    /// open the protected screen. The success message is shown strictly
    /// before navigation.
    fn settle(&mut self, outcome: AuthOutcome) {
        match outcome {
            AuthOutcome::Succeeded => {
                info!("Authentication succeeded, opening the protected screen");
                self.notifier.notify(MSG_AUTHENTICATED);
                self.navigator.open_protected();
            }
            AuthOutcome::Error { code, message } => {
                warn!("Authentication failed with code {}: {}", code, message);
                self.notifier.notify(&message);
            }
            AuthOutcome::Cancelled => {
                info!("Authentication request was cancelled");
                self.notifier.notify(MSG_CANCELLED);
            }
        }
        self.flight = None;
    }
}
