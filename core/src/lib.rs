//! UI-free core of the FPGate demo: the gate screen component together with
//! its prompt model, outcome types and cancellation signal.
//!
//! The GTK shell in `fpgate-gui` plugs real implementations of
//! [`Authenticator`], [`Notifier`] and [`Navigator`] into a [`GateScreen`];
//! tests plug in scripted fakes and drive the same public API.

pub mod gate;
pub mod outcome;
pub mod prompt;
pub mod signal;

// Re-export commonly used items
pub use gate::{Authenticator, GateScreen, Navigator, Notifier, PumpStatus, RequestStatus};
pub use outcome::{error_codes, AuthOutcome, OutcomeEvent, OutcomeSender};
pub use prompt::{AuthRequest, PromptContent};
pub use signal::CancelSignal;
