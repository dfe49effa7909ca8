//! Request/response exchange over the modem's serial link.
//!
//! The link has no readiness signal and the modem firmware has no reliable
//! end-of-response marker, so every exchange is a write followed by a
//! fixed listening window. Whatever arrives inside the window is the
//! response; silence is an empty response, never an error.
//!
//! # Architecture
//!
//! ```text
//! ConnectivityMonitor ─┐
//! NotificationDispatcher ─┼─> SharedTransport ──> ModemTransport ──> SerialLink
//! AccessController (drain) ─┘     (tokio Mutex)
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use cardgate_hardware::SerialLink;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::at::AtCommand;

/// How often the link is polled while a response window is open.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Longest a single drain of unsolicited output may read for.
pub const DRAIN_WINDOW: Duration = Duration::from_millis(100);

/// Longest unfinished line kept between drains.
pub const MAX_PARTIAL_LINE: usize = 256;

/// A transport shared by every component that talks to the modem.
pub type SharedTransport<L> = Arc<Mutex<ModemTransport<L>>>;

/// AT-command transport over a [`SerialLink`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cardgate_hardware::mock::MockSerialLink;
/// use cardgate_modem::{AtCommand, ModemTransport};
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() {
///     let (link, handle) = MockSerialLink::new();
///     handle.reply_to("AT", "AT\r\nOK\r\n", Duration::from_millis(200));
///
///     let mut transport = ModemTransport::new(link);
///     let response = transport.send(&AtCommand::Attention).await;
///     assert!(response.contains("OK"));
/// }
/// ```
#[derive(Debug)]
pub struct ModemTransport<L> {
    link: L,
    /// Partial line left over from the last drain.
    log_buffer: BytesMut,
}

impl<L: SerialLink> ModemTransport<L> {
    pub fn new(link: L) -> Self {
        Self {
            link,
            log_buffer: BytesMut::new(),
        }
    }

    /// Wrap the transport for sharing between components.
    pub fn into_shared(self) -> SharedTransport<L> {
        Arc::new(Mutex::new(self))
    }

    /// Send a command with its default response window.
    pub async fn send(&mut self, command: &AtCommand) -> String {
        self.send_command(command, command.default_timeout()).await
    }

    /// Write `command` once and collect everything received until `timeout`
    /// has elapsed since the call began.
    ///
    /// Always waits the full window, even when the modem answers early.
    /// Write failures are logged and the window is still observed, so the
    /// caller sees an empty response.
    pub async fn send_command(&mut self, command: &AtCommand, timeout: Duration) -> String {
        let deadline = Instant::now() + timeout;

        debug!(
            target: "cardgate::modem",
            command = command.name(),
            timeout_ms = timeout.as_millis() as u64,
            "Sending AT command"
        );

        if let Err(e) = self.link.write(&command.serialize()).await {
            warn!(
                target: "cardgate::modem",
                command = command.name(),
                error = %e,
                "Modem write failed"
            );
        }

        let mut response = BytesMut::new();
        loop {
            self.read_available(&mut response, deadline).await;

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
        }

        let text = String::from_utf8_lossy(&response).into_owned();
        trace!(
            target: "cardgate::modem",
            command = command.name(),
            bytes = response.len(),
            response = %text.escape_debug(),
            "AT response window closed"
        );
        text
    }

    /// Push `request` over a fresh TCP connection.
    ///
    /// Issues exactly four exchanges: open, announce size, payload, close.
    /// Responses are not inspected; a failed step does not stop the next.
    pub async fn connect_and_post(&mut self, host: &str, port: u16, request: &str) {
        let steps = [
            AtCommand::OpenTcp {
                host: host.to_string(),
                port,
            },
            AtCommand::SendSize(request.len()),
            AtCommand::Payload(request.to_string()),
            AtCommand::Close,
        ];

        for step in &steps {
            self.send(step).await;
        }
    }

    /// Forward unsolicited modem output to the log without writing.
    ///
    /// Reads for at most [`DRAIN_WINDOW`]. Complete lines are logged at
    /// `debug`; a trailing partial line is kept for the next drain unless it
    /// reaches [`MAX_PARTIAL_LINE`] bytes, in which case it is logged as is
    /// and dropped. Returns the number of lines logged.
    pub async fn drain_pending(&mut self) -> usize {
        let mut incoming = std::mem::take(&mut self.log_buffer);
        self.read_available(&mut incoming, Instant::now() + DRAIN_WINDOW)
            .await;

        let mut logged = 0;
        while let Some(newline) = incoming.iter().position(|&b| b == b'\n') {
            let line = incoming.split_to(newline + 1);
            let text = String::from_utf8_lossy(&line);
            let text = text.trim_end_matches(['\r', '\n']);
            if !text.is_empty() {
                debug!(target: "cardgate::modem", line = %text, "Modem output");
                logged += 1;
            }
        }

        if incoming.len() >= MAX_PARTIAL_LINE {
            debug!(
                target: "cardgate::modem",
                line = %String::from_utf8_lossy(&incoming).escape_debug(),
                bytes = incoming.len(),
                "Modem output without line end"
            );
            incoming.clear();
            logged += 1;
        }

        self.log_buffer = incoming;
        logged
    }

    /// Read until the link is empty or `deadline` has passed.
    async fn read_available(&mut self, buffer: &mut BytesMut, deadline: Instant) {
        while Instant::now() <= deadline {
            match self.link.bytes_available().await {
                Ok(0) => return,
                Ok(_) => match self.link.read_byte().await {
                    Ok(byte) => buffer.extend_from_slice(&[byte]),
                    Err(e) => {
                        warn!(target: "cardgate::modem", error = %e, "Modem read failed");
                        return;
                    }
                },
                Err(e) => {
                    warn!(target: "cardgate::modem", error = %e, "Modem link query failed");
                    return;
                }
            }
        }
    }

    /// Bytes of an unfinished line held since the last drain.
    pub fn pending_partial_line(&self) -> usize {
        self.log_buffer.len()
    }
}
