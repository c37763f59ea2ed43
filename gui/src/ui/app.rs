//! Application setup and initialization functionality.

use crate::config;
use crate::context::{AppContext, UiComponents};
use crate::system;
use crate::ui::{button_handlers, navigation, pages, toast};
use crate::verifier::FprintdVerifier;
use fpgate_core::GateScreen;
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow};
use log::info;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Initialize and set up main application UI.
pub fn setup_application_ui(app: &Application) {
    info!("Initializing application components");

    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to build Tokio runtime"),
    );
    info!("Tokio async runtime initialized");

    let window = ApplicationWindow::builder()
        .application(app)
        .title(config::app_info::NAME)
        .default_width(480)
        .default_height(360)
        .build();

    let (overlay, toast) = toast::build_toast_overlay();
    let (stack, auth_button, back_button) = pages::build_pages();
    overlay.set_child(Some(&stack));
    window.set_child(Some(&overlay));

    window.show();

    info!("Performing system environment checks");
    system::check_fprintd_service();

    let verifier = FprintdVerifier::new(rt, window.clone());
    verifier.refresh_availability();

    let gate = GateScreen::new(
        verifier,
        toast::ToastNotifier::new(toast),
        navigation::StackNavigator::new(stack.clone()),
    );

    let ctx = AppContext {
        gate: Rc::new(RefCell::new(gate)),
        ui: UiComponents::new(stack, auth_button, back_button),
    };

    navigation::setup_navigation(&ctx);
    button_handlers::setup_button_handlers(&ctx);

    info!("Setting initial view to main page");
    ctx.ui.stack.set_visible_child_name(navigation::PAGE_MAIN);
    info!("{} application startup complete", config::app_info::NAME);
}
