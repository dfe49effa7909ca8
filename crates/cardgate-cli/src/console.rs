//! Bench peripherals for running the controller from a terminal.
//!
//! Cards are typed on stdin as hex UIDs, one per line. The display, relay
//! and buzzer report what they would have done through `tracing`.

use std::time::Duration;

use cardgate_core::CardUid;
use cardgate_hardware::mock::MockRfidHandle;
use cardgate_hardware::{DisplayDevice, RelayDevice, Result, ToneDevice};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What a line typed on stdin means to the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLine {
    Blank,
    Uid(Vec<u8>),
    Unreadable(String),
}

impl CardLine {
    pub fn parse(line: &str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            return Self::Blank;
        }
        match CardUid::from_hex(text) {
            Ok(uid) => Self::Uid(uid.as_bytes().to_vec()),
            Err(e) => Self::Unreadable(e.to_string()),
        }
    }
}

/// Forward stdin lines to a reader handle until stdin closes.
pub fn spawn_stdin_feeder(reader: MockRfidHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("stdin closed, no more cards");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };

            let presented = match CardLine::parse(&line) {
                CardLine::Blank => continue,
                CardLine::Uid(bytes) => reader.present_card(bytes).await,
                CardLine::Unreadable(message) => {
                    warn!(line = %line.trim(), error = %message, "Not a card UID");
                    reader.present_unreadable_card(message).await
                }
            };

            if presented.is_err() {
                debug!("Reader dropped, stopping stdin feeder");
                break;
            }
        }
    })
}

/// Display that logs every presented frame.
#[derive(Debug, Default)]
pub struct ConsoleDisplay {
    buffer: Vec<String>,
    row: usize,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn rendered(&self) -> String {
        self.buffer.join(" | ")
    }
}

impl DisplayDevice for ConsoleDisplay {
    async fn init(&mut self) -> Result<()> {
        debug!("Console display ready");
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        self.buffer.clear();
        self.row = 0;
        Ok(())
    }

    async fn set_cursor(&mut self, _x: usize, y: usize) -> Result<()> {
        self.row = y;
        Ok(())
    }

    async fn print_line(&mut self, text: &str) -> Result<()> {
        if self.buffer.len() <= self.row {
            self.buffer.resize(self.row + 1, String::new());
        }
        self.buffer[self.row] = text.to_string();
        self.row += 1;
        Ok(())
    }

    async fn present(&mut self) -> Result<()> {
        info!(screen = %self.rendered(), "Display");
        Ok(())
    }
}

/// Strike relay that logs coil changes.
#[derive(Debug, Default)]
pub struct ConsoleRelay {
    energized: bool,
}

impl ConsoleRelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RelayDevice for ConsoleRelay {
    async fn set_energized(&mut self, energized: bool) -> Result<()> {
        if energized != self.energized {
            info!(energized, "Relay");
        }
        self.energized = energized;
        Ok(())
    }
}

/// Buzzer that logs tones and waits out their duration.
#[derive(Debug, Default)]
pub struct ConsoleBuzzer;

impl ToneDevice for ConsoleBuzzer {
    async fn play_tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<()> {
        debug!(frequency_hz, duration_ms = duration.as_millis() as u64, "Tone");
        tokio::time::sleep(duration).await;
        Ok(())
    }
}
