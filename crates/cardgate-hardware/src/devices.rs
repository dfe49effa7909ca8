//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT - Rust Edition 2024) is not
//! object-safe, so `Box<dyn SerialLink>` is not available. The enums in this
//! module provide concrete type dispatch at compile time instead, with
//! feature-gated variants for real hardware.
//!
//! # Examples
//!
//! ```
//! use cardgate_hardware::devices::AnySerialLink;
//! use cardgate_hardware::mock::MockSerialLink;
//!
//! let (link, _handle) = MockSerialLink::new();
//! let any_link = AnySerialLink::Mock(link);
//!
//! // Can now be used polymorphically through the SerialLink trait
//! ```

use crate::Result;
use crate::mock::MockSerialLink;
#[cfg(feature = "hardware-serial")]
use crate::serial_port::SerialPortLink;
use crate::traits::SerialLink;

/// Enum wrapper for modem link dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySerialLink {
    /// Mock link for development and testing.
    Mock(MockSerialLink),

    /// Host serial port.
    #[cfg(feature = "hardware-serial")]
    Port(SerialPortLink),
}

impl SerialLink for AnySerialLink {
    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        match self {
            Self::Mock(link) => link.write(bytes).await,
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.write(bytes).await,
        }
    }

    async fn bytes_available(&mut self) -> Result<usize> {
        match self {
            Self::Mock(link) => link.bytes_available().await,
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.bytes_available().await,
        }
    }

    async fn read_byte(&mut self) -> Result<u8> {
        match self {
            Self::Mock(link) => link.read_byte().await,
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.read_byte().await,
        }
    }
}
