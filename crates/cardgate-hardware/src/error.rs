//! Peripheral errors.
//!
//! None of these are fatal to the access cycle except a display that fails
//! to initialize; the controller logs the rest and carries on.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors raised by readers, actuators and the modem link.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The device, or the channel feeding it, is gone.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// The serial link rejected a read or write.
    #[error("Serial link error: {message}")]
    Link { message: String },

    /// Bytes from the device did not make sense.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// A card was in the field but its UID could not be read.
    #[error("Card read error: {message}")]
    CardRead { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn link(message: impl Into<String>) -> Self {
        Self::Link {
            message: message.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    pub fn card_read(message: impl Into<String>) -> Self {
        Self::CardRead {
            message: message.into(),
        }
    }
}

/// A UID outside 4-10 bytes surfaces as invalid reader data.
impl From<cardgate_core::Error> for HardwareError {
    fn from(error: cardgate_core::Error) -> Self {
        Self::InvalidData {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_names_device() {
        let error = HardwareError::disconnected("MFRC522");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: MFRC522");
    }

    #[test]
    fn test_link_error() {
        let error = HardwareError::link("port closed");
        assert!(matches!(error, HardwareError::Link { .. }));
        assert_eq!(error.to_string(), "Serial link error: port closed");
    }

    #[test]
    fn test_display_init_message() {
        let error = HardwareError::initialization_failed("SSD1306 not responding");
        assert_eq!(
            error.to_string(),
            "Initialization failed: SSD1306 not responding"
        );
    }

    #[test]
    fn test_short_uid_is_invalid_data() {
        let core = cardgate_core::CardUid::new(vec![0x01]).unwrap_err();
        let error: HardwareError = core.into();
        assert!(matches!(error, HardwareError::InvalidData { .. }));
    }
}
