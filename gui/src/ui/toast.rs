//! Transient message overlay.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use fpgate_core::Notifier;
use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{Align, Label, Overlay, Revealer, RevealerTransitionType};
use log::info;

use crate::config;

/// Banner revealed near the bottom edge of the window.
#[derive(Clone)]
pub struct Toast {
    revealer: Revealer,
    label: Label,
    generation: Rc<Cell<u32>>,
}

/// Build the overlay hosting the page stack plus the toast banner.
pub fn build_toast_overlay() -> (Overlay, Toast) {
    let overlay = Overlay::new();

    let label = Label::new(None);
    label.set_margin_top(8);
    label.set_margin_bottom(8);
    label.set_margin_start(16);
    label.set_margin_end(16);

    let revealer = Revealer::new();
    revealer.set_transition_type(RevealerTransitionType::SlideUp);
    revealer.set_halign(Align::Center);
    revealer.set_valign(Align::End);
    revealer.set_margin_bottom(24);
    revealer.add_css_class("osd");
    revealer.set_can_target(false);
    revealer.set_child(Some(&label));
    overlay.add_overlay(&revealer);

    let toast = Toast {
        revealer,
        label,
        generation: Rc::new(Cell::new(0)),
    };
    (overlay, toast)
}

impl Toast {
    /// Show `message` and hide it again after a short delay. A newer toast
    /// replaces the text and restarts the clock.
    pub fn show(&self, message: &str) {
        info!("Toast: {}", message);
        self.label.set_label(message);
        self.revealer.set_reveal_child(true);

        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let revealer = self.revealer.clone();
        let current = self.generation.clone();
        glib::timeout_add_local_once(Duration::from_millis(config::ui::TOAST_MS), move || {
            // A newer toast may have restarted the clock in the meantime
            if current.get() == generation {
                revealer.set_reveal_child(false);
            }
        });
    }
}

/// [`Notifier`] backed by the toast banner.
pub struct ToastNotifier {
    toast: Toast,
}

impl ToastNotifier {
    pub fn new(toast: Toast) -> Self {
        Self { toast }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str) {
        self.toast.show(message);
    }
}
