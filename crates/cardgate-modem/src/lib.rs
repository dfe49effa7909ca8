//! Modem link for the cardgate access controller.
//!
//! This crate speaks the ESP8266 AT command set over a [`SerialLink`] and
//! builds the remote-reporting path on top of it.
//!
//! # Components
//!
//! - **ModemTransport**: bounded-window request/response exchange
//! - **ConnectivityMonitor**: online/offline state from the attention probe
//! - **NotificationDispatcher**: webhook notifications for granted accesses
//!
//! # Example
//!
//! ```no_run
//! use cardgate_core::{AccessDecision, Identity};
//! use cardgate_hardware::mock::MockSerialLink;
//! use cardgate_modem::{
//!     ConnectivityMonitor, ModemTransport, NotificationDispatcher, NotificationEndpoint,
//!     WifiCredentials,
//! };
//!
//! # async fn example() {
//! let (link, _handle) = MockSerialLink::new();
//! let monitor = ConnectivityMonitor::new(ModemTransport::new(link).into_shared());
//! monitor.attach(&WifiCredentials::new("lab", "secret")).await;
//!
//! let dispatcher = NotificationDispatcher::new(monitor.clone(), NotificationEndpoint::default());
//! dispatcher
//!     .dispatch(&AccessDecision::Granted(Identity::Master), 1200)
//!     .await;
//! # }
//! ```
//!
//! [`SerialLink`]: cardgate_hardware::SerialLink

pub mod at;
pub mod connectivity;
pub mod dispatcher;
pub mod http;
pub mod transport;

pub use at::{AtCommand, WifiMode};
pub use connectivity::{ConnectivityMonitor, WifiCredentials};
pub use dispatcher::{DispatchOutcome, NotificationDispatcher, NotificationEndpoint};
pub use http::HttpRequest;
pub use transport::{ModemTransport, SharedTransport};
