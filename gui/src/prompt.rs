//! Modal fingerprint prompt window.

use std::cell::Cell;
use std::rc::Rc;

use fpgate_core::{CancelSignal, PromptContent};
use gtk4::glib::Propagation;
use gtk4::prelude::*;
use gtk4::{Align, ApplicationWindow, Box as GtkBox, Button, Image, Label, Orientation, Window};
use log::info;

/// Modal window shown while a verification request is in flight.
///
/// Closing it in any way triggers the request's cancellation signal; the
/// verification worker dismisses it before delivering a terminal outcome.
#[derive(Clone)]
pub struct PromptWindow {
    window: Window,
    status: Label,
    closed: Rc<Cell<bool>>,
}

impl PromptWindow {
    pub fn new(parent: &ApplicationWindow, content: &PromptContent, cancel: CancelSignal) -> Self {
        let container = GtkBox::new(Orientation::Vertical, 12);
        container.set_margin_top(24);
        container.set_margin_bottom(24);
        container.set_margin_start(32);
        container.set_margin_end(32);

        let icon = Image::from_icon_name("fingerprint-symbolic");
        icon.set_pixel_size(64);
        container.append(&icon);

        let title = Label::new(Some(&content.title));
        title.set_css_classes(&["title-2"]);
        container.append(&title);

        let subtitle = Label::new(Some(&content.subtitle));
        container.append(&subtitle);

        let description = Label::new(Some(&content.description));
        description.set_css_classes(&["dim-label"]);
        description.set_wrap(true);
        container.append(&description);

        let status = Label::new(Some("Touch the fingerprint reader"));
        status.set_css_classes(&["dim-label"]);
        container.append(&status);

        let cancel_button = Button::with_label(&content.cancel_label);
        cancel_button.set_halign(Align::Center);
        container.append(&cancel_button);

        let window = Window::builder()
            .transient_for(parent)
            .modal(true)
            .resizable(false)
            .title(content.title.as_str())
            .child(&container)
            .build();

        let closed = Rc::new(Cell::new(false));

        {
            let window = window.clone();
            let label = content.cancel_label.clone();
            cancel_button.connect_clicked(move |_| {
                info!("User pressed '{}' on the fingerprint prompt", label);
                window.close();
            });
        }

        {
            // Any close path, the cancel button included, goes through here
            let closed = closed.clone();
            window.connect_close_request(move |_| {
                closed.set(true);
                cancel.trigger();
                Propagation::Proceed
            });
        }

        Self {
            window,
            status,
            closed,
        }
    }

    pub fn show(&self) {
        self.window.show();
    }

    /// Update the status line under the description.
    pub fn set_status(&self, text: &str) {
        self.status.set_label(text);
    }

    /// Tear the window down without emitting a close request, so dismissal
    /// after a terminal outcome is not mistaken for a cancellation.
    pub fn dismiss(&self) {
        if !self.closed.replace(true) {
            self.window.destroy();
        }
    }
}
