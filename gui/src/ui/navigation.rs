//! Page names and navigation between them.

use crate::context::AppContext;
use fpgate_core::Navigator;
use gtk4::prelude::*;
use gtk4::Stack;
use log::info;

/// Stack page shown on startup.
pub const PAGE_MAIN: &str = "main";

/// Stack page reachable only through a successful authentication.
pub const PAGE_PROTECTED: &str = "protected";

/// Set up navigation buttons.
pub fn setup_navigation(ctx: &AppContext) {
    let stack = ctx.ui.stack.clone();
    ctx.ui.back_button.connect_clicked(move |_| {
        info!("User clicked 'Back' button - returning to the gate page");
        stack.set_visible_child_name(PAGE_MAIN);
    });
}

/// [`Navigator`] that switches the page stack to the protected page.
pub struct StackNavigator {
    stack: Stack,
}

impl StackNavigator {
    pub fn new(stack: Stack) -> Self {
        Self { stack }
    }
}

impl Navigator for StackNavigator {
    fn open_protected(&self) {
        info!("Navigating to the protected page");
        self.stack.set_visible_child_name(PAGE_PROTECTED);
    }
}
