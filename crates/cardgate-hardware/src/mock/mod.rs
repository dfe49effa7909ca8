//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware. Each mock is created
//! together with a handle used to drive or inspect it from tests.

pub mod display;
pub mod relay;
pub mod rfid;
pub mod serial;

// Re-export commonly used types
pub use display::{MockDisplay, MockDisplayHandle};
pub use relay::{MockBuzzer, MockBuzzerHandle, MockRelay, MockRelayHandle, PlayedTone, RelaySwitch};
pub use rfid::{MockRfid, MockRfidHandle};
pub use serial::{MockSerialHandle, MockSerialLink};
