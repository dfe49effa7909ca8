//! Hardware device trait definitions.
//!
//! This module defines the capability interfaces the access controller
//! consumes: a proximity card reader, a status display, the strike relay,
//! the buzzer and the byte-oriented serial link to the Wi-Fi modem. These
//! traits keep the controller independent of the concrete drivers, so the
//! mock implementations in [`mock`](crate::mock) can stand in for real
//! hardware in tests.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use std::time::Duration;

use cardgate_core::CardUid;

use crate::error::Result;
use crate::types::ReaderInfo;

/// RFID reader device abstraction.
///
/// Represents a proximity card reader (e.g. MFRC522) that is polled for card
/// presence and then asked for the card's UID.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`, which is an opaque type that cannot be used in trait objects
/// (Edition 2024 RPITIT). Use generic type parameters instead:
///
/// ```no_run
/// use cardgate_hardware::traits::RfidDevice;
/// use cardgate_hardware::error::Result;
///
/// async fn poll<R: RfidDevice>(reader: &mut R) -> Result<Option<String>> {
///     if !reader.is_card_present().await? {
///         return Ok(None);
///     }
///     let uid = reader.read_uid().await?;
///     Ok(Some(uid.to_hex()))
/// }
/// ```
pub trait RfidDevice: Send + Sync {
    /// Check if a new card has entered the reader's field.
    ///
    /// This is a non-blocking check that returns immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while checking
    /// for card presence.
    async fn is_card_present(&mut self) -> Result<bool>;

    /// Read the UID of the card currently in the field.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No card is in the field
    /// - The serial exchange with the card fails
    /// - The UID length is outside 4-10 bytes
    async fn read_uid(&mut self) -> Result<CardUid>;

    /// Get reader information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// reader information.
    async fn get_reader_info(&self) -> Result<ReaderInfo>;
}

/// Character display abstraction.
///
/// Drawing calls edit an off-screen buffer; nothing becomes visible until
/// [`present`](DisplayDevice::present) is called, matching frame-buffered
/// OLED drivers.
pub trait DisplayDevice: Send + Sync {
    /// Initialize the display.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InitializationFailed`](crate::HardwareError::InitializationFailed)
    /// if the panel does not respond. The controller treats this as fatal.
    async fn init(&mut self) -> Result<()>;

    /// Clear the off-screen buffer and move the cursor home.
    async fn clear(&mut self) -> Result<()>;

    /// Move the text cursor to column `x`, row `y`.
    async fn set_cursor(&mut self, x: usize, y: usize) -> Result<()>;

    /// Print a line of text at the cursor and advance to the next row.
    async fn print_line(&mut self, text: &str) -> Result<()>;

    /// Push the off-screen buffer to the panel.
    async fn present(&mut self) -> Result<()>;
}

/// Electric strike relay.
pub trait RelayDevice: Send + Sync {
    /// Energize (`true`) or release (`false`) the relay coil.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be driven.
    async fn set_energized(&mut self, energized: bool) -> Result<()>;
}

/// Piezo buzzer.
pub trait ToneDevice: Send + Sync {
    /// Play a tone and complete only after `duration` has elapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be driven.
    async fn play_tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<()>;
}

/// Byte-oriented serial link to the modem.
///
/// The link offers no readiness notification: callers poll
/// [`bytes_available`](SerialLink::bytes_available) and read one byte at a
/// time.
pub trait SerialLink: Send + Sync {
    /// Write all bytes to the link.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is closed or the write fails.
    async fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Number of received bytes waiting to be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be queried.
    async fn bytes_available(&mut self) -> Result<usize>;

    /// Read one received byte.
    ///
    /// # Errors
    ///
    /// Returns an error if no byte is waiting or the read fails.
    async fn read_byte(&mut self) -> Result<u8>;
}
