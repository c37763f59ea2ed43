//! The gate and protected pages of the demo.

use gtk4::prelude::*;
use gtk4::{Align, Box as GtkBox, Button, Image, Label, Orientation, Stack, StackTransitionType};

use crate::ui::navigation::{PAGE_MAIN, PAGE_PROTECTED};

/// Build the page stack and return it together with the authenticate button
/// on the gate page and the back button on the protected page.
pub fn build_pages() -> (Stack, Button, Button) {
    let stack = Stack::new();
    stack.set_transition_type(StackTransitionType::SlideLeft);

    let (gate_page, auth_button) = build_gate_page();
    stack.add_named(&gate_page, Some(PAGE_MAIN));

    let (protected_page, back_button) = build_protected_page();
    stack.add_named(&protected_page, Some(PAGE_PROTECTED));

    (stack, auth_button, back_button)
}

/// Create the gate page with the authenticate button.
fn build_gate_page() -> (GtkBox, Button) {
    let page = GtkBox::new(Orientation::Vertical, 16);
    page.set_valign(Align::Center);
    page.set_halign(Align::Center);

    let icon = Image::from_icon_name("dialog-password-symbolic");
    icon.set_pixel_size(96);
    page.append(&icon);

    let title = Label::new(Some("This content is protected"));
    title.set_css_classes(&["title-2"]);
    page.append(&title);

    let hint = Label::new(Some("Authenticate with your fingerprint to continue."));
    hint.set_css_classes(&["dim-label"]);
    page.append(&hint);

    let auth_button = Button::with_label("Authenticate Me");
    auth_button.set_halign(Align::Center);
    auth_button.add_css_class("suggested-action");
    page.append(&auth_button);

    (page, auth_button)
}

/// Create the protected page shown after a successful authentication.
fn build_protected_page() -> (GtkBox, Button) {
    let page = GtkBox::new(Orientation::Vertical, 16);
    page.set_valign(Align::Center);
    page.set_halign(Align::Center);

    let icon = Image::from_icon_name("emblem-ok-symbolic");
    icon.set_pixel_size(96);
    page.append(&icon);

    let title = Label::new(Some("Welcome to the protected page"));
    title.set_css_classes(&["title-2"]);
    page.append(&title);

    let body = Label::new(Some("Only authenticated users can see this content."));
    body.set_wrap(true);
    page.append(&body);

    let back_button = Button::with_label("Back");
    back_button.set_halign(Align::Center);
    page.append(&back_button);

    (page, back_button)
}
