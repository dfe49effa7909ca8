//! Hardware device abstraction layer for the cardgate access controller.
//!
//! This crate provides trait-based abstractions for the peripherals attached
//! to a single entry point: the proximity card reader, the status display,
//! the strike relay, the buzzer and the serial link to the Wi-Fi modem.
//! These traits let the controller switch between mock implementations
//! (for development and testing) and real drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations use native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error
//!   information.
//!
//! # Device Traits
//!
//! ## Card Reader
//!
//! ```no_run
//! use cardgate_hardware::traits::RfidDevice;
//! use cardgate_hardware::error::Result;
//!
//! async fn next_uid<R: RfidDevice>(reader: &mut R) -> Result<Option<String>> {
//!     if reader.is_card_present().await? {
//!         return Ok(Some(reader.read_uid().await?.to_hex()));
//!     }
//!     Ok(None)
//! }
//! ```
//!
//! ## Modem Link
//!
//! ```no_run
//! use cardgate_hardware::traits::SerialLink;
//! use cardgate_hardware::error::Result;
//!
//! async fn drain<L: SerialLink>(link: &mut L) -> Result<Vec<u8>> {
//!     let mut received = Vec::new();
//!     while link.bytes_available().await? > 0 {
//!         received.push(link.read_byte().await?);
//!     }
//!     Ok(received)
//! }
//! ```
//!
//! # Mock Implementations
//!
//! Every trait has a mock in [`mock`] that returns a companion handle for
//! driving input (cards, modem replies) and inspecting output (frames,
//! relay switches, tones, written commands).
//!
//! # Real Hardware
//!
//! The `hardware-serial` feature adds a `SerialPortLink` backed by the
//! `serialport` crate and the matching [`AnySerialLink`] variant.

pub mod devices;
pub mod error;
pub mod mock;
#[cfg(feature = "hardware-serial")]
pub mod serial_port;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::AnySerialLink;
pub use error::{HardwareError, Result};
#[cfg(feature = "hardware-serial")]
pub use serial_port::SerialPortLink;
pub use traits::{DisplayDevice, RelayDevice, RfidDevice, SerialLink, ToneDevice};
pub use types::{DisplayGeometry, ReaderInfo};
