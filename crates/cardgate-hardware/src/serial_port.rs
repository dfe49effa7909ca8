//! Serial link backed by a real UART through the `serialport` crate.
//!
//! Only compiled with the `hardware-serial` feature.

use std::io::{Read, Write};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info};

use crate::{HardwareError, Result, traits::SerialLink};

/// Read timeout of the underlying port. Reads are only issued after
/// `bytes_available` reported data, so this is a safety net.
const PORT_READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Modem link on a host serial port (e.g. `/dev/ttyUSB0`).
pub struct SerialPortLink {
    port_name: String,
    // `dyn SerialPort` is `Send` but not `Sync`.
    port: Mutex<Box<dyn serialport::SerialPort>>,
}

impl SerialPortLink {
    /// Open `port_name` at `baud_rate`, 8N1.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InitializationFailed`] if the port cannot be
    /// opened.
    pub fn open(port_name: &str, baud_rate: u32) -> Result<Self> {
        info!("Opening modem link on {} at {} baud", port_name, baud_rate);

        let port = serialport::new(port_name, baud_rate)
            .timeout(PORT_READ_TIMEOUT)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .open()
            .map_err(|e| {
                HardwareError::initialization_failed(format!(
                    "Failed to open serial port {port_name}: {e}"
                ))
            })?;

        Ok(Self {
            port_name: port_name.to_string(),
            port: Mutex::new(port),
        })
    }

    fn port(&self) -> MutexGuard<'_, Box<dyn serialport::SerialPort>> {
        self.port
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Name of the underlying port.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl std::fmt::Debug for SerialPortLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPortLink")
            .field("port_name", &self.port_name)
            .finish_non_exhaustive()
    }
}

impl SerialLink for SerialPortLink {
    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        {
            let mut port = self.port();
            port.write_all(bytes)?;
            port.flush()?;
        }
        debug!(port = %self.port_name, len = bytes.len(), "Wrote to modem link");
        Ok(())
    }

    async fn bytes_available(&mut self) -> Result<usize> {
        let available = self
            .port()
            .bytes_to_read()
            .map_err(|e| HardwareError::link(e.to_string()))?;
        Ok(available as usize)
    }

    async fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.port().read_exact(&mut byte)?;
        Ok(byte[0])
    }
}
