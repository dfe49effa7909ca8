//! Online/offline state derived from the modem.
//!
//! The monitor is the only writer of the connectivity cell. Clones share the
//! cell, so the dispatcher and the controller read the value the last probe
//! stored without touching the link.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cardgate_core::ConnectivityState;
use cardgate_core::constants::{OK_TOKEN, WIFI_CONNECTED_TOKEN};
use cardgate_hardware::SerialLink;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::at::{AtCommand, WifiMode};
use crate::transport::SharedTransport;

/// Access point credentials for the join sequence.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

impl WifiCredentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Tracks whether the modem has confirmed network attachment.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cardgate_hardware::mock::MockSerialLink;
/// use cardgate_modem::{ConnectivityMonitor, ModemTransport};
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() {
///     let (link, handle) = MockSerialLink::new();
///     handle.reply_to("AT", "OK\r\n", Duration::from_millis(50));
///
///     let monitor = ConnectivityMonitor::new(ModemTransport::new(link).into_shared());
///     assert!(!monitor.is_online());
///
///     monitor.probe().await;
///     assert!(monitor.is_online());
/// }
/// ```
pub struct ConnectivityMonitor<L> {
    transport: Option<SharedTransport<L>>,
    online: Arc<AtomicBool>,
}

impl<L: SerialLink> ConnectivityMonitor<L> {
    /// Monitor a modem. Starts Offline until the first probe.
    pub fn new(transport: SharedTransport<L>) -> Self {
        Self {
            transport: Some(transport),
            online: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A monitor with no modem behind it. Permanently Offline.
    pub fn detached() -> Self {
        Self {
            transport: None,
            online: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send the attention command and store the result.
    ///
    /// Online iff the response contains `OK`.
    pub async fn probe(&self) -> ConnectivityState {
        let Some(transport) = &self.transport else {
            return ConnectivityState::Offline;
        };

        let response = transport.lock().await.send(&AtCommand::Attention).await;
        let state = ConnectivityState::from_online(response.contains(OK_TOKEN));
        self.online.store(state.is_online(), Ordering::Release);

        info!(state = %state, "Modem probe complete");
        state
    }

    /// Startup attachment: reset, station mode, join the network, then probe.
    ///
    /// The join result is only logged. The stored state comes from the probe.
    pub async fn attach(&self, credentials: &WifiCredentials) -> ConnectivityState {
        let Some(transport) = &self.transport else {
            return ConnectivityState::Offline;
        };

        {
            let mut transport = transport.lock().await;
            transport.send(&AtCommand::Reset).await;
            transport.send(&AtCommand::SetMode(WifiMode::Station)).await;

            let joined = transport
                .send(&AtCommand::JoinNetwork {
                    ssid: credentials.ssid.clone(),
                    password: credentials.password.clone(),
                })
                .await
                .contains(WIFI_CONNECTED_TOKEN);

            if joined {
                info!(ssid = %credentials.ssid, "Joined wireless network");
            } else {
                warn!(ssid = %credentials.ssid, "Join not confirmed by modem");
            }
        }

        self.probe().await
    }

    /// Last probed state. No I/O.
    #[inline]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    #[inline]
    pub fn state(&self) -> ConnectivityState {
        ConnectivityState::from_online(self.is_online())
    }

    /// The transport behind this monitor, if any.
    pub fn transport(&self) -> Option<&SharedTransport<L>> {
        self.transport.as_ref()
    }
}

impl<L> Clone for ConnectivityMonitor<L> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            online: Arc::clone(&self.online),
        }
    }
}

impl<L> fmt::Debug for ConnectivityMonitor<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("attached", &self.transport.is_some())
            .field("online", &self.online.load(Ordering::Acquire))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ModemTransport;
    use cardgate_hardware::mock::{MockSerialHandle, MockSerialLink};
    use std::time::Duration;
    use tokio::time::Instant;

    fn monitor() -> (ConnectivityMonitor<MockSerialLink>, MockSerialHandle) {
        let (link, handle) = MockSerialLink::new();
        (
            ConnectivityMonitor::new(ModemTransport::new(link).into_shared()),
            handle,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_online_on_ok() {
        let (monitor, handle) = monitor();
        handle.reply_to("AT", "AT\r\r\n\r\nOK\r\n", Duration::from_millis(200));

        let start = Instant::now();
        assert_eq!(monitor.probe().await, ConnectivityState::Online);
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert!(monitor.is_online());
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_offline_on_silence() {
        let (monitor, _handle) = monitor();
        assert_eq!(monitor.probe().await, ConnectivityState::Offline);
        assert!(!monitor.is_online());
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_offline_on_error_reply() {
        let (monitor, handle) = monitor();
        handle.reply_to("AT", "ERROR\r\n", Duration::ZERO);
        assert_eq!(monitor.probe().await, ConnectivityState::Offline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_state() {
        let (monitor, handle) = monitor();
        let reader = monitor.clone();
        handle.reply_to("AT", "OK", Duration::ZERO);

        monitor.probe().await;
        assert!(reader.is_online());
        assert_eq!(reader.state(), ConnectivityState::Online);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reprobe_can_go_offline() {
        let (monitor, handle) = monitor();
        handle.queue_reply("OK", Duration::ZERO);
        assert!(monitor.probe().await.is_online());

        assert!(!monitor.probe().await.is_online());
        assert!(!monitor.is_online());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_sequence() {
        let (monitor, handle) = monitor();
        handle.reply_to(
            "AT+CWJAP=\"lab\",\"pw\"",
            "WIFI CONNECTED\r\nWIFI GOT IP\r\n",
            Duration::from_millis(3000),
        );
        handle.reply_to("AT", "OK\r\n", Duration::ZERO);

        let start = Instant::now();
        let state = monitor.attach(&WifiCredentials::new("lab", "pw")).await;

        assert_eq!(state, ConnectivityState::Online);
        assert_eq!(
            handle.written(),
            vec![
                "AT+RST\r\n",
                "AT+CWMODE=1\r\n",
                "AT+CWJAP=\"lab\",\"pw\"\r\n",
                "AT\r\n"
            ]
        );
        assert_eq!(start.elapsed(), Duration::from_millis(2000 + 1000 + 5000 + 1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_state_comes_from_probe_alone() {
        let (monitor, handle) = monitor();
        handle.reply_to("AT+CWJAP=\"lab\",\"pw\"", "WIFI CONNECTED\r\n", Duration::ZERO);

        let state = monitor.attach(&WifiCredentials::new("lab", "pw")).await;
        assert_eq!(state, ConnectivityState::Offline);
    }

    #[tokio::test]
    async fn test_detached_is_offline() {
        let monitor = ConnectivityMonitor::<MockSerialLink>::detached();

        assert_eq!(monitor.probe().await, ConnectivityState::Offline);
        assert_eq!(
            monitor.attach(&WifiCredentials::default()).await,
            ConnectivityState::Offline
        );
        assert!(monitor.transport().is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let rendered = format!("{:?}", WifiCredentials::new("lab", "hunter2"));
        assert!(rendered.contains("lab"));
        assert!(!rendered.contains("hunter2"));
    }
}
