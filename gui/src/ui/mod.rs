//! User Interface handling functionality.
//!
//! This module contains all UI-related components organized by functionality:
//! - `app`: Application setup and initialization
//! - `pages`: The gate and protected pages of the stack
//! - `navigation`: The transition to the protected page
//! - `button_handlers`: Button click handlers
//! - `toast`: Transient message overlay

pub mod app;
pub mod button_handlers;
pub mod navigation;
pub mod pages;
pub mod toast;

// Re-export commonly used items
pub use app::setup_application_ui;
