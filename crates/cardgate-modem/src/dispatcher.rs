//! Fire-and-forget access notifications.
//!
//! A granted access becomes one HTTP webhook call pushed through the modem.
//! There is no queue and no retry: when the controller is offline or the
//! decision is a denial the event is dropped, and delivery failures are
//! invisible.

use cardgate_core::{AccessDecision, NotificationMessage};
use cardgate_hardware::SerialLink;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::connectivity::ConnectivityMonitor;
use crate::http::HttpRequest;

/// Default collector host.
pub const DEFAULT_NOTIFICATION_HOST: &str = "maker.ifttt.com";

/// Default collector port (plain HTTP).
pub const DEFAULT_NOTIFICATION_PORT: u16 = 80;

/// Default webhook path. The key segment must be replaced per deployment.
pub const DEFAULT_NOTIFICATION_PATH: &str = "/trigger/door_access/json/with/key/changeme";

/// Where notifications are sent, and whether they are sent at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationEndpoint {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Default for NotificationEndpoint {
    fn default() -> Self {
        Self {
            enabled: true,
            host: DEFAULT_NOTIFICATION_HOST.to_string(),
            port: DEFAULT_NOTIFICATION_PORT,
            path: DEFAULT_NOTIFICATION_PATH.to_string(),
        }
    }
}

/// What `dispatch` did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Request handed to the modem.
    Sent,
    /// Reporting is switched off in configuration.
    Disabled,
    /// The last probe did not confirm attachment.
    Offline,
    /// Denials are never reported.
    NotReported,
}

/// Builds and pushes notifications while the monitor reports Online.
#[derive(Debug)]
pub struct NotificationDispatcher<L> {
    monitor: ConnectivityMonitor<L>,
    endpoint: NotificationEndpoint,
}

impl<L: SerialLink> NotificationDispatcher<L> {
    /// Dispatch through the transport behind `monitor`.
    pub fn new(monitor: ConnectivityMonitor<L>, endpoint: NotificationEndpoint) -> Self {
        Self { monitor, endpoint }
    }

    pub fn endpoint(&self) -> &NotificationEndpoint {
        &self.endpoint
    }

    /// Report a decision made `uptime_millis` after controller start.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgate_core::AccessDecision;
    /// use cardgate_hardware::mock::MockSerialLink;
    /// use cardgate_modem::{ConnectivityMonitor, DispatchOutcome, NotificationDispatcher};
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() {
    ///     let monitor = ConnectivityMonitor::<MockSerialLink>::detached();
    ///     let dispatcher = NotificationDispatcher::new(monitor, Default::default());
    ///
    ///     let outcome = dispatcher.dispatch(&AccessDecision::Denied, 10).await;
    ///     assert_eq!(outcome, DispatchOutcome::Offline);
    /// }
    /// ```
    pub async fn dispatch(&self, decision: &AccessDecision, uptime_millis: u64) -> DispatchOutcome {
        if !self.endpoint.enabled {
            return DispatchOutcome::Disabled;
        }

        let transport = match self.monitor.transport() {
            Some(transport) if self.monitor.is_online() => transport,
            _ => {
                debug!(decision = %decision, "Offline, notification dropped");
                return DispatchOutcome::Offline;
            }
        };

        let Some(message) = NotificationMessage::for_decision(decision, uptime_millis) else {
            return DispatchOutcome::NotReported;
        };

        let request = HttpRequest::notification(&self.endpoint.host, &self.endpoint.path, &message);
        info!(
            host = %self.endpoint.host,
            content_length = request.content_length(),
            text = %message.text,
            "Sending access notification"
        );

        transport
            .lock()
            .await
            .connect_and_post(&self.endpoint.host, self.endpoint.port, &request.to_string())
            .await;

        DispatchOutcome::Sent
    }
}
