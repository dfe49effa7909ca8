//! Mock strike relay and buzzer.
//!
//! Both record what they were asked to do against the tokio clock, so tests
//! running with a paused clock can assert exact hold and tone durations.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::{
    Result,
    traits::{RelayDevice, ToneDevice},
};

/// One relay output change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySwitch {
    pub energized: bool,
    pub at: Instant,
}

/// Mock relay that records every output change.
#[derive(Debug)]
pub struct MockRelay {
    switches: Arc<Mutex<Vec<RelaySwitch>>>,
}

impl MockRelay {
    pub fn new() -> (Self, MockRelayHandle) {
        let switches = Arc::new(Mutex::new(Vec::new()));
        let handle = MockRelayHandle {
            switches: Arc::clone(&switches),
        };
        (Self { switches }, handle)
    }
}

impl RelayDevice for MockRelay {
    async fn set_energized(&mut self, energized: bool) -> Result<()> {
        lock(&self.switches).push(RelaySwitch {
            energized,
            at: Instant::now(),
        });
        Ok(())
    }
}

/// Handle for inspecting a mock relay.
#[derive(Debug, Clone)]
pub struct MockRelayHandle {
    switches: Arc<Mutex<Vec<RelaySwitch>>>,
}

impl MockRelayHandle {
    /// Every recorded output change, oldest first.
    pub fn switches(&self) -> Vec<RelaySwitch> {
        lock(&self.switches).clone()
    }

    /// Current output level.
    pub fn is_energized(&self) -> bool {
        lock(&self.switches).last().is_some_and(|s| s.energized)
    }

    /// Whether the relay was ever energized.
    pub fn was_energized(&self) -> bool {
        lock(&self.switches).iter().any(|s| s.energized)
    }

    /// Durations of each completed energize/release pair.
    pub fn hold_durations(&self) -> Vec<Duration> {
        let switches = lock(&self.switches);
        switches
            .windows(2)
            .filter(|pair| pair[0].energized && !pair[1].energized)
            .map(|pair| pair[1].at.duration_since(pair[0].at))
            .collect()
    }
}

/// One tone played on the mock buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedTone {
    pub frequency_hz: u32,
    pub duration: Duration,
    pub started_at: Instant,
}

/// Mock buzzer that sleeps for each tone's duration.
#[derive(Debug)]
pub struct MockBuzzer {
    played: Arc<Mutex<Vec<PlayedTone>>>,
}

impl MockBuzzer {
    pub fn new() -> (Self, MockBuzzerHandle) {
        let played = Arc::new(Mutex::new(Vec::new()));
        let handle = MockBuzzerHandle {
            played: Arc::clone(&played),
        };
        (Self { played }, handle)
    }
}

impl ToneDevice for MockBuzzer {
    async fn play_tone(&mut self, frequency_hz: u32, duration: Duration) -> Result<()> {
        lock(&self.played).push(PlayedTone {
            frequency_hz,
            duration,
            started_at: Instant::now(),
        });
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

/// Handle for inspecting a mock buzzer.
#[derive(Debug, Clone)]
pub struct MockBuzzerHandle {
    played: Arc<Mutex<Vec<PlayedTone>>>,
}

impl MockBuzzerHandle {
    /// Every tone played, oldest first.
    pub fn played(&self) -> Vec<PlayedTone> {
        lock(&self.played).clone()
    }

    /// `(frequency, duration)` pairs, oldest first.
    pub fn notes(&self) -> Vec<(u32, Duration)> {
        lock(&self.played)
            .iter()
            .map(|tone| (tone.frequency_hz, tone.duration))
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
