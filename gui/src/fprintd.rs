//! Async helpers for the fprintd D-Bus interface.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use zbus::proxy::SignalStream;
use zbus::{Connection, Proxy};
use zvariant::{OwnedObjectPath, Type};

// D-Bus API Reference:
// BUS_NAME = 'net.reactivated.Fprint'
// MAIN_OBJ = '/net/reactivated/Fprint/Manager'
// SYSTEM_BUS = True

// VALID_VERIFY_STATUS = [
//     'verify-no-match',
//     'verify-match',
//     'verify-retry-scan',
//     'verify-too-fast',
//     'verify-swipe-too-short',
//     'verify-finger-not-centered',
//     'verify-remove-and-retry',
//     'verify-disconnected',
//     'verify-unknown-error'
// ]

/// D-Bus service name for fprintd.
pub const SERVICE: &str = "net.reactivated.Fprint";

/// Manager object path.
pub const MANAGER_PATH: &str = "/net/reactivated/Fprint/Manager";

/// Manager interface name.
pub const IFACE_MANAGER: &str = "net.reactivated.Fprint.Manager";

/// Device interface name.
pub const IFACE_DEVICE: &str = "net.reactivated.Fprint.Device";

/// Wildcard finger name accepted by VerifyStart.
pub const FINGER_ANY: &str = "any";

/// Async client with system bus connection.
#[derive(Clone)]
pub struct Client {
    conn: Connection,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Connect to system bus.
    pub async fn system() -> zbus::Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    /// Create Manager helper.
    pub fn manager(&self) -> Manager {
        Manager {
            conn: self.conn.clone(),
        }
    }

    /// Create Device helper for specific path.
    pub fn device(&self, object_path: OwnedObjectPath) -> Device {
        Device {
            conn: self.conn.clone(),
            object_path,
        }
    }
}

/// Manager interface helper.
#[derive(Clone)]
pub struct Manager {
    conn: Connection,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager").finish_non_exhaustive()
    }
}

impl Manager {
    async fn proxy(&self) -> zbus::Result<Proxy<'_>> {
        Proxy::new(&self.conn, SERVICE, MANAGER_PATH, IFACE_MANAGER).await
    }

    /// Generic method call.
    async fn call<R>(
        &self,
        method: &str,
        args: &(impl Serialize + Type + fmt::Debug),
    ) -> zbus::Result<R>
    where
        R: DeserializeOwned + Type,
    {
        let proxy = self.proxy().await?;

        proxy.call(method, args).await
    }

    /// Get device object paths.
    pub async fn get_devices(&self) -> zbus::Result<Vec<OwnedObjectPath>> {
        let (paths,): (Vec<OwnedObjectPath>,) = self.call("GetDevices", &()).await?;
        Ok(paths)
    }

    /// Get default device path.
    pub async fn get_default_device(&self) -> zbus::Result<OwnedObjectPath> {
        let (path,): (OwnedObjectPath,) = self.call("GetDefaultDevice", &()).await?;
        Ok(path)
    }
}

/// Device interface helper.
#[derive(Clone)]
pub struct Device {
    conn: Connection,
    object_path: OwnedObjectPath,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("object_path", &self.object_path)
            .finish()
    }
}

impl Device {
    async fn proxy(&self) -> zbus::Result<Proxy<'_>> {
        Proxy::new(&self.conn, SERVICE, self.object_path.as_str(), IFACE_DEVICE).await
    }

    /// Generic method call.
    async fn call<R>(
        &self,
        method: &str,
        args: &(impl Serialize + Type + fmt::Debug),
    ) -> zbus::Result<R>
    where
        R: DeserializeOwned + Type,
    {
        let proxy = self.proxy().await?;

        proxy.call(method, args).await
    }

    /// List enrolled fingers for user ("" for current user).
    pub async fn list_enrolled_fingers(&self, username: &str) -> zbus::Result<Vec<String>> {
        let (fingers,): (Vec<String>,) = self.call("ListEnrolledFingers", &(username,)).await?;
        Ok(fingers)
    }

    /// Start verification for finger.
    pub async fn verify_start(&self, finger: &str) -> zbus::Result<()> {
        let _: () = self.call("VerifyStart", &(finger,)).await?;
        Ok(())
    }

    /// Stop verification.
    pub async fn verify_stop(&self) -> zbus::Result<()> {
        let _: () = self.call("VerifyStop", &()).await?;
        Ok(())
    }

    /// Claim device for user ("" for current user).
    pub async fn claim(&self, username: &str) -> zbus::Result<()> {
        let _: () = self.call("Claim", &(username,)).await?;
        Ok(())
    }

    /// Release device.
    pub async fn release(&self) -> zbus::Result<()> {
        let _: () = self.call("Release", &()).await?;
        Ok(())
    }

    /// Get device name.
    pub async fn name(&self) -> zbus::Result<String> {
        let proxy = self.proxy().await?;
        proxy.get_property::<String>("name").await
    }

    /// Get scan type ("press" or "swipe").
    pub async fn scan_type(&self) -> zbus::Result<String> {
        let proxy = self.proxy().await?;
        proxy.get_property::<String>("scan-type").await
    }

    /// Subscribe to VerifyStatus signals. Each message body is
    /// `(result: String, done: bool)`; the stream outlives the proxy it was
    /// created from.
    pub async fn verify_status_signals(&self) -> zbus::Result<SignalStream<'static>> {
        let proxy = self.proxy().await?;
        proxy.receive_signal("VerifyStatus").await
    }
}

/// Find first available device.
pub async fn first_device(client: &Client) -> zbus::Result<Option<Device>> {
    let mgr = client.manager();

    // Try default device first
    if let Ok(path) = mgr.get_default_device().await {
        return Ok(Some(client.device(path)));
    }

    // Fall back to first enumerated device
    match mgr.get_devices().await {
        Ok(paths) => {
            if let Some(path) = paths.first() {
                Ok(Some(client.device(path.clone())))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(e),
    }
}
