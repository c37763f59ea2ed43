//! Centralized configuration and constants for the application.

/// Application information constants.
pub mod app_info {
    pub const NAME: &str = "FPGate";
    pub const ID: &str = "org.fpgate.gui";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Fingerprint verification tuning.
pub mod verify {
    use std::time::Duration;

    /// Failed matches allowed before a request settles as a lockout.
    pub const MAX_ATTEMPTS: u32 = 3;

    /// How often the verification worker checks the cancellation signal
    /// while waiting for the scanner.
    pub const CANCEL_POLL: Duration = Duration::from_millis(150);
}

/// UI timing.
pub mod ui {
    /// How long a toast message stays on screen, in milliseconds.
    pub const TOAST_MS: u64 = 2500;
}
