//! Button click handlers functionality.

use crate::context::AppContext;
use fpgate_core::{PumpStatus, RequestStatus};
use gtk4::glib;
use gtk4::prelude::*;
use log::info;

/// Set up all button handlers.
pub fn setup_button_handlers(ctx: &AppContext) {
    setup_authenticate_button(ctx);
}

/// Wire the authenticate button to the gate screen.
fn setup_authenticate_button(ctx: &AppContext) {
    let ctx_clone = ctx.clone();
    ctx.ui.auth_button.connect_clicked(move |_| {
        info!("User clicked the authenticate button");

        let status = ctx_clone.gate.borrow_mut().request_authentication();
        match status {
            RequestStatus::Submitted => start_outcome_pump(&ctx_clone),
            RequestStatus::NotConfigured => {
                info!("Fingerprint authentication is not available, nothing submitted");
            }
            RequestStatus::AlreadyPending => {
                info!("Ignoring click while a request is in flight");
            }
        }
    });
}

/// Poll the gate's outcome channel from the main loop until the in-flight
/// request settles, keeping the button disabled meanwhile.
fn start_outcome_pump(ctx: &AppContext) {
    ctx.ui.auth_button.set_sensitive(false);

    let ctx_clone = ctx.clone();
    glib::idle_add_local(move || {
        let status = ctx_clone.gate.borrow_mut().process_pending();
        match status {
            PumpStatus::AwaitingOutcome => glib::ControlFlow::Continue,
            PumpStatus::Idle | PumpStatus::Settled => {
                ctx_clone.ui.auth_button.set_sensitive(true);
                // The sensor or enrollment may have changed during the attempt
                ctx_clone.gate.borrow().auth.refresh_availability();
                glib::ControlFlow::Break
            }
        }
    });
}
