//! Mock RFID reader implementation for testing and development.
//!
//! This module provides a simulated card reader that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{
    Result,
    traits::RfidDevice,
    types::ReaderInfo,
};
use cardgate_core::CardUid;
use tokio::sync::mpsc;

/// Mock RFID reader for testing and development.
///
/// Cards presented through the [`MockRfidHandle`] queue up and are reported
/// one at a time: each presentation makes `is_card_present` return `true`
/// until `read_uid` consumes it.
///
/// # Examples
///
/// ```
/// use cardgate_hardware::mock::MockRfid;
/// use cardgate_hardware::traits::RfidDevice;
///
/// #[tokio::main]
/// async fn main() -> cardgate_hardware::Result<()> {
///     let (mut reader, handle) = MockRfid::new();
///
///     handle.present_card(vec![0x03, 0x89, 0xAF, 0x0D]).await?;
///
///     assert!(reader.is_card_present().await?);
///     let uid = reader.read_uid().await?;
///     assert_eq!(uid.to_hex(), "0389af0d");
///     assert!(!reader.is_card_present().await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRfid {
    /// Channel receiver for card events
    event_rx: mpsc::Receiver<CardEvent>,

    /// Device name
    name: String,
}

impl MockRfid {
    /// Create a new mock RFID reader with the default name.
    ///
    /// Returns a tuple of (MockRfid, MockRfidHandle) where the handle
    /// can be used to simulate card presentations.
    pub fn new() -> (Self, MockRfidHandle) {
        Self::with_name("Mock RFID Reader".to_string())
    }

    /// Create a new mock RFID reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockRfidHandle) {
        let (event_tx, event_rx) = mpsc::channel(32);

        let reader = Self {
            event_rx,
            name: name.clone(),
        };

        let handle = MockRfidHandle { event_tx, name };

        (reader, handle)
    }
}

impl Default for MockRfid {
    fn default() -> Self {
        Self::new().0
    }
}

impl RfidDevice for MockRfid {
    async fn is_card_present(&mut self) -> Result<bool> {
        Ok(!self.event_rx.is_empty())
    }

    async fn read_uid(&mut self) -> Result<CardUid> {
        match self.event_rx.try_recv() {
            Ok(CardEvent::CardPresented(uid)) => Ok(uid),
            Ok(CardEvent::ReadFailure(message)) => Err(crate::HardwareError::card_read(message)),
            Err(mpsc::error::TryRecvError::Empty) => {
                Err(crate::HardwareError::card_read("No card in field"))
            }
            Err(mpsc::error::TryRecvError::Disconnected) => Err(
                crate::HardwareError::disconnected("RFID event channel closed"),
            ),
        }
    }

    async fn get_reader_info(&self) -> Result<ReaderInfo> {
        Ok(
            ReaderInfo::new(self.name.clone(), vec!["ISO14443A".to_string()])
                .with_max_baud_rate(424000),
        )
    }
}

/// Internal event type for mock RFID reader.
#[derive(Debug, Clone)]
enum CardEvent {
    CardPresented(CardUid),
    ReadFailure(String),
}

/// Handle for controlling a mock RFID reader.
///
/// The handle can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockRfidHandle {
    /// Channel sender for card events
    event_tx: mpsc::Sender<CardEvent>,

    /// Device name
    name: String,
}

impl MockRfidHandle {
    /// Present a card to the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The UID length is outside 4-10 bytes
    /// - The reader has been dropped and the channel is closed
    pub async fn present_card(&self, uid: Vec<u8>) -> Result<()> {
        let uid = CardUid::new(uid)?;

        self.event_tx
            .send(CardEvent::CardPresented(uid))
            .await
            .map_err(|_| crate::HardwareError::disconnected("RFID event channel closed"))
    }

    /// Present a card whose serial read will fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present_unreadable_card(&self, message: impl Into<String>) -> Result<()> {
        self.event_tx
            .send(CardEvent::ReadFailure(message.into()))
            .await
            .map_err(|_| crate::HardwareError::disconnected("RFID event channel closed"))
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
