//! Mock serial link to an AT-command modem.
//!
//! The mock records every write and plays back scripted replies. A reply
//! becomes readable only once its delay has elapsed on the tokio clock, which
//! lets tests reproduce a modem that answers late within a response window.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::{Result, traits::SerialLink};

#[derive(Debug)]
struct ScriptedReply {
    bytes: Vec<u8>,
    delay: Duration,
}

#[derive(Debug)]
struct CommandRule {
    command: String,
    reply: ScriptedReply,
}

#[derive(Debug)]
struct PendingBytes {
    ready_at: Instant,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct LinkState {
    written: Vec<Vec<u8>>,
    rules: Vec<CommandRule>,
    queued: VecDeque<ScriptedReply>,
    pending: Vec<PendingBytes>,
    rx: VecDeque<u8>,
    fail_writes: bool,
}

impl LinkState {
    fn schedule(&mut self, reply: &ScriptedReply) {
        self.pending.push(PendingBytes {
            ready_at: Instant::now() + reply.delay,
            bytes: reply.bytes.clone(),
        });
    }

    fn release_ready(&mut self) {
        let now = Instant::now();
        let (mut ready, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.ready_at <= now);
        self.pending = waiting;

        ready.sort_by_key(|p| p.ready_at);
        for pending in ready {
            self.rx.extend(pending.bytes);
        }
    }
}

/// Mock serial link for testing and development.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use cardgate_hardware::mock::MockSerialLink;
/// use cardgate_hardware::traits::SerialLink;
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() -> cardgate_hardware::Result<()> {
///     let (mut link, handle) = MockSerialLink::new();
///     handle.reply_to("AT", "OK\r\n", Duration::from_millis(200));
///
///     link.write(b"AT\r\n").await?;
///     assert_eq!(link.bytes_available().await?, 0);
///
///     tokio::time::sleep(Duration::from_millis(200)).await;
///     assert_eq!(link.bytes_available().await?, 4);
///     assert_eq!(link.read_byte().await?, b'O');
///
///     assert_eq!(handle.written(), vec!["AT\r\n".to_string()]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockSerialLink {
    state: Arc<Mutex<LinkState>>,
}

impl MockSerialLink {
    /// Create a silent link: writes are recorded, nothing is ever received
    /// unless scripted through the handle.
    pub fn new() -> (Self, MockSerialHandle) {
        let state = Arc::new(Mutex::new(LinkState::default()));
        let handle = MockSerialHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl SerialLink for MockSerialLink {
    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_writes {
            return Err(crate::HardwareError::link("Mock link write failure"));
        }
        state.written.push(bytes.to_vec());

        let text = String::from_utf8_lossy(bytes);
        let command = text.trim_end_matches(['\r', '\n']);
        let rule = state
            .rules
            .iter()
            .position(|rule| rule.command == command);

        if let Some(index) = rule {
            let reply = ScriptedReply {
                bytes: state.rules[index].reply.bytes.clone(),
                delay: state.rules[index].reply.delay,
            };
            state.schedule(&reply);
        } else if let Some(reply) = state.queued.pop_front() {
            state.schedule(&reply);
        }
        Ok(())
    }

    async fn bytes_available(&mut self) -> Result<usize> {
        let mut state = lock(&self.state);
        state.release_ready();
        Ok(state.rx.len())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        let mut state = lock(&self.state);
        state.release_ready();
        state
            .rx
            .pop_front()
            .ok_or_else(|| crate::HardwareError::link("No byte available"))
    }
}

/// Handle for scripting and inspecting a mock serial link.
#[derive(Debug, Clone)]
pub struct MockSerialHandle {
    state: Arc<Mutex<LinkState>>,
}

impl MockSerialHandle {
    /// Answer every write of `command` (terminator stripped) with `reply`
    /// after `delay`.
    pub fn reply_to(&self, command: impl Into<String>, reply: impl AsRef<[u8]>, delay: Duration) {
        lock(&self.state).rules.push(CommandRule {
            command: command.into(),
            reply: ScriptedReply {
                bytes: reply.as_ref().to_vec(),
                delay,
            },
        });
    }

    /// Answer the next write that matches no rule with `reply` after `delay`.
    pub fn queue_reply(&self, reply: impl AsRef<[u8]>, delay: Duration) {
        lock(&self.state).queued.push_back(ScriptedReply {
            bytes: reply.as_ref().to_vec(),
            delay,
        });
    }

    /// Make `bytes` readable immediately, as unsolicited modem output.
    pub fn inject(&self, bytes: impl AsRef<[u8]>) {
        lock(&self.state).rx.extend(bytes.as_ref().iter().copied());
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        lock(&self.state).fail_writes = fail;
    }

    /// Every write, decoded lossily as text, oldest first.
    pub fn written(&self) -> Vec<String> {
        lock(&self.state)
            .written
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    /// Number of writes issued on the link.
    pub fn write_count(&self) -> usize {
        lock(&self.state).written.len()
    }

    /// Forget recorded writes.
    pub fn clear_written(&self) {
        lock(&self.state).written.clear();
    }

    /// Bytes received but not yet read, including replies still in flight.
    pub fn unread_len(&self) -> usize {
        let state = lock(&self.state);
        state.rx.len() + state.pending.iter().map(|p| p.bytes.len()).sum::<usize>()
    }
}

fn lock(state: &Mutex<LinkState>) -> MutexGuard<'_, LinkState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reply_released_after_delay() {
        let (mut link, handle) = MockSerialLink::new();
        handle.reply_to("AT", "OK\r\n", Duration::from_millis(200));

        link.write(b"AT\r\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(199)).await;
        assert_eq!(link.bytes_available().await.unwrap(), 0);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(link.bytes_available().await.unwrap(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rules_are_reusable() {
        let (mut link, handle) = MockSerialLink::new();
        handle.reply_to("AT", "OK", Duration::ZERO);

        link.write(b"AT\r\n").await.unwrap();
        link.write(b"AT\r\n").await.unwrap();

        assert_eq!(link.bytes_available().await.unwrap(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queued_replies_in_order() {
        let (mut link, handle) = MockSerialLink::new();
        handle.queue_reply("first", Duration::ZERO);
        handle.queue_reply("second", Duration::ZERO);

        link.write(b"AT+CIPSTART\r\n").await.unwrap();
        link.write(b"AT+CIPSEND=4\r\n").await.unwrap();
        link.write(b"AT+CIPCLOSE\r\n").await.unwrap();

        let mut received = Vec::new();
        while link.bytes_available().await.unwrap() > 0 {
            received.push(link.read_byte().await.unwrap());
        }
        assert_eq!(received, b"firstsecond");
        assert_eq!(handle.write_count(), 3);
    }

    #[tokio::test]
    async fn test_inject_and_read() {
        let (mut link, handle) = MockSerialLink::new();
        handle.inject("ready\r\n");

        assert_eq!(handle.unread_len(), 7);
        assert_eq!(link.read_byte().await.unwrap(), b'r');
        assert_eq!(link.bytes_available().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_read_byte_when_empty() {
        let (mut link, _handle) = MockSerialLink::new();
        assert!(link.read_byte().await.is_err());
    }

    #[tokio::test]
    async fn test_failing_writes_not_recorded() {
        let (mut link, handle) = MockSerialLink::new();
        handle.fail_writes(true);

        assert!(link.write(b"AT\r\n").await.is_err());
        assert_eq!(handle.write_count(), 0);

        handle.fail_writes(false);
        link.write(b"AT\r\n").await.unwrap();
        handle.clear_written();
        assert!(handle.written().is_empty());
    }
}
