//! System environment checks performed at startup.

use log::{info, warn};

/// Check fprintd service status.
pub fn check_fprintd_service() {
    match std::process::Command::new("systemctl")
        .args(["is-active", "fprintd"])
        .output()
    {
        Ok(output) => {
            let status_output = String::from_utf8_lossy(&output.stdout);
            let status = status_output.trim();
            if status == "active" {
                info!("fprintd service is running");
            } else {
                warn!("fprintd service status: {}", status);
                warn!("The first verification will start it via D-Bus activation");
            }
        }
        Err(e) => {
            warn!("Cannot check fprintd service status: {}", e);
        }
    }
}
