//! Text frames for the status display.
//!
//! Each controller state maps to one frame. The screen fits text to the
//! panel width before handing it to the [`DisplayDevice`].

use cardgate_core::{CardUid, ConnectivityState};
use cardgate_hardware::{DisplayDevice, DisplayGeometry, Result};

/// Boot message shown while the controller starts.
pub const BOOT_MESSAGE: &str = "Initializing...";

/// Headline while a card is being processed.
pub const READING_MESSAGE: &str = "Reading...";

/// Label printed above the captured UID.
pub const UID_LABEL: &str = "UID:";

pub const GRANTED_MESSAGE: &str = "Access Granted";

pub const DENIED_MESSAGE: &str = "Access Denied";

/// Idle prompt above the connectivity indicator.
pub const IDLE_PROMPT: &str = "Present card";

/// One screenful of lines, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Builds and shows frames for a display of a given geometry.
///
/// # Examples
///
/// ```
/// use cardgate_controller::StatusScreen;
/// use cardgate_core::ConnectivityState;
///
/// let screen = StatusScreen::default();
/// let frame = screen.status(ConnectivityState::Offline);
/// assert_eq!(frame.lines(), ["Present card", "Offline"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusScreen {
    geometry: DisplayGeometry,
}

impl StatusScreen {
    pub fn new(geometry: DisplayGeometry) -> Self {
        Self { geometry }
    }

    pub fn booting(&self) -> Frame {
        self.fit([BOOT_MESSAGE.to_string()])
    }

    /// Idle screen with the online/offline indicator.
    pub fn status(&self, connectivity: ConnectivityState) -> Frame {
        self.fit([IDLE_PROMPT.to_string(), connectivity.to_string()])
    }

    /// In-progress indicator with the captured UID.
    pub fn reading(&self, uid: &CardUid) -> Frame {
        self.fit([
            READING_MESSAGE.to_string(),
            UID_LABEL.to_string(),
            uid.to_hex(),
        ])
    }

    pub fn granted(&self, label: &str) -> Frame {
        self.fit([GRANTED_MESSAGE.to_string(), label.to_string()])
    }

    pub fn denied(&self) -> Frame {
        self.fit([DENIED_MESSAGE.to_string()])
    }

    /// Replace the display contents with `frame`.
    ///
    /// # Errors
    ///
    /// Returns the first display error encountered.
    pub async fn show<D: DisplayDevice>(&self, display: &mut D, frame: &Frame) -> Result<()> {
        display.clear().await?;
        display.set_cursor(0, 0).await?;
        for line in frame.lines() {
            display.print_line(line).await?;
        }
        display.present().await
    }

    fn fit<const N: usize>(&self, lines: [String; N]) -> Frame {
        Frame::new(
            lines
                .iter()
                .take(self.geometry.rows)
                .map(|line| truncate_text(&sanitize_text(line), self.geometry.columns)),
        )
    }
}

/// Truncate text to a maximum number of characters.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Drop control characters and surrounding whitespace.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
