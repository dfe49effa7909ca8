//! Core constants for the cardgate controller.
//!
//! This module collects the fixed values shared by the decision engine, the
//! modem link and the controller: card identifier bounds, the compiled-in
//! master card, AT response tokens, default response windows and the
//! labels that appear on the wire.
//!
//! # Usage
//!
//! ```
//! use cardgate_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(MASTER_UID, [0x03, 0x89, 0xAF, 0x0D]);
//!
//! let window = Duration::from_millis(PROBE_TIMEOUT_MS);
//! assert_eq!(window.as_millis(), 1000);
//! ```
//!
//! # Firmware Compatibility
//!
//! The AT tokens and the notification text shape are matched against the
//! ESP8266 AT firmware and the existing collector endpoint. Changing them
//! breaks interoperability with deployed hardware.

// ============================================================================
// Card Identifiers
// ============================================================================

/// Minimum UID length in bytes (per ISO 14443 specification).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum UID length in bytes (per ISO 14443 specification).
pub const MAX_UID_LENGTH: usize = 10;

/// UID of the compiled-in master card.
///
/// The master card is always granted access and never consults the
/// directory. It cannot be changed at runtime.
pub const MASTER_UID: [u8; 4] = [0x03, 0x89, 0xAF, 0x0D];

/// Label used for the master card on the display and in notifications.
pub const MASTER_LABEL: &str = "Master";

// ============================================================================
// AT Response Tokens
// ============================================================================

/// Substring that confirms a successful attention probe.
pub const OK_TOKEN: &str = "OK";

/// Substring that confirms a successful join-network command.
pub const WIFI_CONNECTED_TOKEN: &str = "WIFI CONNECTED";

/// Line terminator appended to every AT command except raw payload writes.
pub const AT_TERMINATOR: &str = "\r\n";

// ============================================================================
// AT Response Windows (milliseconds)
// ============================================================================
//
// Each AT exchange waits the full window regardless of when the modem
// answers. The transport offers no completion signal.

/// Window for the bare attention probe (`AT`).
pub const PROBE_TIMEOUT_MS: u64 = 1000;

/// Window for a modem reset (`AT+RST`).
pub const RESET_TIMEOUT_MS: u64 = 2000;

/// Window for Wi-Fi mode selection (`AT+CWMODE`).
pub const MODE_TIMEOUT_MS: u64 = 1000;

/// Window for joining an access point (`AT+CWJAP`).
pub const JOIN_TIMEOUT_MS: u64 = 5000;

/// Window for opening a TCP connection (`AT+CIPSTART`).
pub const CONNECT_TIMEOUT_MS: u64 = 2000;

/// Window for announcing a payload length (`AT+CIPSEND`).
pub const SEND_SIZE_TIMEOUT_MS: u64 = 1000;

/// Window for the raw payload write.
pub const PAYLOAD_TIMEOUT_MS: u64 = 2000;

/// Window for closing the TCP connection (`AT+CIPCLOSE`).
pub const CLOSE_TIMEOUT_MS: u64 = 1000;

// ============================================================================
// Notifications
// ============================================================================

/// Prefix of every access notification text.
///
/// The full text is `User Accessed: <label> at <uptime_millis>`.
pub const NOTIFICATION_PREFIX: &str = "User Accessed: ";

/// JSON key carrying the notification text.
pub const NOTIFICATION_JSON_KEY: &str = "default";

/// Content type of notification requests.
pub const NOTIFICATION_CONTENT_TYPE: &str = "application/json";
