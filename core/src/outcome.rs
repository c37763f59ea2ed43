//! Authentication outcomes and the channel envelope that carries them back
//! to the gate screen.

use std::sync::mpsc;

/// Well-known codes reported with [`AuthOutcome::Error`].
///
/// The numbering follows the platform biometric APIs, so a lockout is code 7
/// no matter which backend produced it.
pub mod error_codes {
    /// The sensor or its daemon cannot be reached right now.
    pub const HARDWARE_UNAVAILABLE: i32 = 1;
    /// The sensor produced data that could not be processed.
    pub const UNABLE_TO_PROCESS: i32 = 2;
    /// The request ran too long without a match.
    pub const TIMEOUT: i32 = 3;
    /// The operation was stopped before producing a result.
    pub const CANCELED: i32 = 5;
    /// Too many failed attempts in a row.
    pub const LOCKOUT: i32 = 7;
    /// No fingerprint is enrolled for the current user.
    pub const NO_BIOMETRICS: i32 = 11;
    /// No fingerprint sensor is present on this system.
    pub const HARDWARE_NOT_PRESENT: i32 = 12;
}

/// Terminal result of one authentication request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The presented fingerprint matched an enrolled one.
    Succeeded,
    /// The service gave up; `message` is surfaced to the user verbatim.
    Error { code: i32, message: String },
    /// The request's cancellation signal was triggered.
    Cancelled,
}

/// Envelope delivered on a gate screen's outcome channel.
#[derive(Debug, Clone)]
pub struct OutcomeEvent {
    pub request_id: u64,
    pub outcome: AuthOutcome,
}

/// Sending half handed to the authentication service.
///
/// Stamps every outcome with the id of the request it was created for, so a
/// service can never settle a request it was not asked about.
#[derive(Clone)]
pub struct OutcomeSender {
    request_id: u64,
    tx: mpsc::Sender<OutcomeEvent>,
}

impl OutcomeSender {
    pub(crate) fn new(request_id: u64, tx: mpsc::Sender<OutcomeEvent>) -> Self {
        Self { request_id, tx }
    }

    /// Id of the request this sender belongs to.
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Deliver an outcome. Delivery is best effort: once the request has
    /// settled the gate drops the receiving half and the event goes nowhere.
    pub fn send(&self, outcome: AuthOutcome) {
        let _ = self.tx.send(OutcomeEvent {
            request_id: self.request_id,
            outcome,
        });
    }
}
