//! Shared context structures for the application.

use crate::ui::navigation::StackNavigator;
use crate::ui::toast::ToastNotifier;
use crate::verifier::FprintdVerifier;
use fpgate_core::GateScreen;
use gtk4::{Button, Stack};
use std::cell::RefCell;
use std::rc::Rc;

/// Gate screen instantiated with the GTK-backed service implementations.
pub type Gate = GateScreen<FprintdVerifier, ToastNotifier, StackNavigator>;

/// Shared handle to the gate screen, cloned into signal handlers.
pub type GateHandle = Rc<RefCell<Gate>>;

/// Main application context with the gate screen and UI elements.
#[derive(Clone)]
pub struct AppContext {
    pub gate: GateHandle,
    pub ui: UiComponents,
}

/// UI components shared between handlers.
#[derive(Clone)]
pub struct UiComponents {
    pub stack: Stack,
    pub auth_button: Button,
    pub back_button: Button,
}

impl UiComponents {
    /// Create UI components from individual widgets.
    pub fn new(stack: Stack, auth_button: Button, back_button: Button) -> Self {
        Self {
            stack,
            auth_button,
            back_button,
        }
    }
}
