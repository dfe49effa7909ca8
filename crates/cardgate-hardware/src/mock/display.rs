//! Mock character display.
//!
//! Keeps an off-screen text buffer and a history of presented frames so
//! tests can assert exactly what an operator would have seen.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Result, traits::DisplayDevice, types::DisplayGeometry};

#[derive(Debug, Default)]
struct DisplayState {
    initialized: bool,
    fail_init: bool,
    buffer: Vec<String>,
    cursor_row: usize,
    frames: Vec<Vec<String>>,
}

/// Mock display for testing and development.
///
/// # Examples
///
/// ```
/// use cardgate_hardware::mock::MockDisplay;
/// use cardgate_hardware::traits::DisplayDevice;
///
/// #[tokio::main]
/// async fn main() -> cardgate_hardware::Result<()> {
///     let (mut display, handle) = MockDisplay::new();
///
///     display.init().await?;
///     display.clear().await?;
///     display.print_line("Online").await?;
///     display.present().await?;
///
///     assert_eq!(handle.visible_lines(), vec!["Online".to_string()]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDisplay {
    state: Arc<Mutex<DisplayState>>,
    geometry: DisplayGeometry,
}

impl MockDisplay {
    /// Create a working mock display with the default OLED geometry.
    pub fn new() -> (Self, MockDisplayHandle) {
        Self::with_geometry(DisplayGeometry::default())
    }

    /// Create a mock display whose `init` always fails.
    pub fn failing() -> (Self, MockDisplayHandle) {
        let (display, handle) = Self::new();
        lock(&display.state).fail_init = true;
        (display, handle)
    }

    /// Create a mock display with a custom geometry.
    pub fn with_geometry(geometry: DisplayGeometry) -> (Self, MockDisplayHandle) {
        let state = Arc::new(Mutex::new(DisplayState::default()));
        let handle = MockDisplayHandle {
            state: Arc::clone(&state),
        };
        (Self { state, geometry }, handle)
    }
}

impl DisplayDevice for MockDisplay {
    async fn init(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if state.fail_init {
            return Err(crate::HardwareError::initialization_failed(
                "Mock display configured to fail",
            ));
        }
        state.initialized = true;
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.buffer.clear();
        state.cursor_row = 0;
        Ok(())
    }

    async fn set_cursor(&mut self, _x: usize, y: usize) -> Result<()> {
        if y >= self.geometry.rows {
            return Err(crate::HardwareError::invalid_data(format!(
                "Row {y} outside display ({} rows)",
                self.geometry.rows
            )));
        }
        lock(&self.state).cursor_row = y;
        Ok(())
    }

    async fn print_line(&mut self, text: &str) -> Result<()> {
        let mut state = lock(&self.state);
        let row = state.cursor_row;
        if row >= self.geometry.rows {
            // Text past the last row falls off the panel.
            return Ok(());
        }
        if state.buffer.len() <= row {
            state.buffer.resize(row + 1, String::new());
        }
        state.buffer[row] = text.chars().take(self.geometry.columns).collect();
        state.cursor_row = row + 1;
        Ok(())
    }

    async fn present(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        if !state.initialized {
            return Err(crate::HardwareError::disconnected("Display not initialized"));
        }
        let frame = state.buffer.clone();
        state.frames.push(frame);
        Ok(())
    }
}

/// Handle for inspecting a mock display.
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplayHandle {
    /// Lines of the most recently presented frame.
    pub fn visible_lines(&self) -> Vec<String> {
        lock(&self.state).frames.last().cloned().unwrap_or_default()
    }

    /// Every presented frame, oldest first.
    pub fn frames(&self) -> Vec<Vec<String>> {
        lock(&self.state).frames.clone()
    }

    /// Whether any presented frame contained `needle` on some line.
    pub fn has_shown(&self, needle: &str) -> bool {
        lock(&self.state)
            .frames
            .iter()
            .any(|frame| frame.iter().any(|line| line.contains(needle)))
    }

    /// Whether `init` succeeded.
    pub fn is_initialized(&self) -> bool {
        lock(&self.state).initialized
    }
}

fn lock(state: &Mutex<DisplayState>) -> MutexGuard<'_, DisplayState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
