//! Controller configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file yields the
//! factory setup: the reference enrollment table and reporting to the stock
//! webhook. The master card is compiled in and has no key here.
//!
//! ```toml
//! [directory]
//! "12345678" = "Admin"
//! "87654321" = "John Doe"
//!
//! [timing]
//! relay_hold_ms = 5000
//! cooldown_ms = 2000
//!
//! [reporting]
//! enabled = true
//! host = "maker.ifttt.com"
//! path = "/trigger/door_access/json/with/key/<key>"
//!
//! [wifi]
//! ssid = "door-net"
//! password = "secret"
//!
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 115200
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use cardgate_core::{CardUid, Error, Result};
use cardgate_modem::{NotificationEndpoint, WifiCredentials};
use serde::{Deserialize, Serialize};

use crate::directory::StaticDirectory;

/// Top-level controller configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Enrollment table: hex UID to user name.
    pub directory: BTreeMap<String, String>,

    pub timing: TimingConfig,

    /// Remote reporting endpoint. `enabled = false` runs fully offline.
    pub reporting: NotificationEndpoint,

    pub wifi: WifiCredentials,

    pub serial: SerialConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            directory: BTreeMap::from([
                ("12345678".to_string(), "Admin".to_string()),
                ("87654321".to_string(), "John Doe".to_string()),
            ]),
            timing: TimingConfig::default(),
            reporting: NotificationEndpoint::default(),
            wifi: WifiCredentials::default(),
            serial: SerialConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the TOML is invalid or a value fails
    /// validation.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        for hex_id in self.directory.keys() {
            CardUid::from_hex(hex_id)
                .map_err(|e| Error::Config(format!("directory entry {hex_id:?}: {e}")))?;
        }

        if self.reporting.enabled && self.reporting.host.trim().is_empty() {
            return Err(Error::Config(
                "reporting.host must be set when reporting is enabled".to_string(),
            ));
        }

        if self.timing.poll_interval_ms == 0 {
            return Err(Error::Config(
                "timing.poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Directory built from the enrollment table.
    pub fn static_directory(&self) -> StaticDirectory {
        StaticDirectory::from_entries(self.directory.iter().map(|(k, v)| (k, v.clone())))
    }
}

/// Durations of the access cycle, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long the strike stays energized on a grant.
    pub relay_hold_ms: u64,
    /// How long the outcome stays on screen.
    pub cooldown_ms: u64,
    /// Pause between idle polls.
    pub poll_interval_ms: u64,
    /// How long the boot message stays on screen.
    pub boot_dwell_ms: u64,
    /// Deadline for a directory lookup.
    pub directory_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            relay_hold_ms: 5000,
            cooldown_ms: 2000,
            poll_interval_ms: 1000,
            boot_dwell_ms: 1000,
            directory_timeout_ms: 500,
        }
    }
}

impl TimingConfig {
    pub fn relay_hold(&self) -> Duration {
        Duration::from_millis(self.relay_hold_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn boot_dwell(&self) -> Duration {
        Duration::from_millis(self.boot_dwell_ms)
    }

    pub fn directory_timeout(&self) -> Duration {
        Duration::from_millis(self.directory_timeout_ms)
    }
}

/// Serial port of the modem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path. `None` runs without a modem.
    pub port: Option<String>,
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 115_200,
        }
    }
}
