//! Audible feedback melodies.

use std::time::Duration;

use cardgate_hardware::{Result, ToneDevice};

/// One tone of a melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

impl Note {
    pub const fn new(frequency_hz: u32, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// A fixed sequence of notes played back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Melody(pub &'static [Note]);

/// Rising C major arpeggio.
pub const SUCCESS_MELODY: Melody = Melody(&[
    Note::new(523, 150),
    Note::new(659, 150),
    Note::new(784, 300),
]);

/// Two falling low tones.
pub const FAILURE_MELODY: Melody = Melody(&[Note::new(392, 300), Note::new(262, 500)]);

impl Melody {
    pub fn notes(&self) -> &'static [Note] {
        self.0
    }

    pub fn total_duration(&self) -> Duration {
        self.0.iter().map(Note::duration).sum()
    }

    /// Play every note in order. Each note completes before the next starts.
    ///
    /// # Errors
    ///
    /// Stops at the first tone the device fails to play.
    pub async fn play<T: ToneDevice>(&self, buzzer: &mut T) -> Result<()> {
        for note in self.0 {
            buzzer.play_tone(note.frequency_hz, note.duration()).await?;
        }
        Ok(())
    }
}
