//! Common types shared across hardware device implementations.

use serde::{Deserialize, Serialize};

/// RFID reader information.
///
/// Contains reader-specific metadata such as supported protocols
/// and maximum baud rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderInfo {
    /// Reader name (e.g., "MFRC522").
    pub name: String,

    /// List of supported protocols (e.g., ["ISO14443A"]).
    pub protocols: Vec<String>,

    /// Maximum supported baud rate in bits per second.
    pub max_baud_rate: Option<u32>,
}

impl ReaderInfo {
    /// Create a new ReaderInfo.
    pub fn new(name: impl Into<String>, protocols: Vec<String>) -> Self {
        Self {
            name: name.into(),
            protocols,
            max_baud_rate: None,
        }
    }

    /// Set the maximum baud rate.
    pub fn with_max_baud_rate(mut self, max_baud_rate: u32) -> Self {
        self.max_baud_rate = Some(max_baud_rate);
        self
    }
}

/// Text geometry of a character display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGeometry {
    /// Number of text rows.
    pub rows: usize,

    /// Characters per row.
    pub columns: usize,
}

impl DisplayGeometry {
    /// 128x64 OLED at text size 1 (6x8 pixel glyphs).
    pub const OLED_128X64: Self = Self {
        rows: 8,
        columns: 21,
    };
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::OLED_128X64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_info() {
        let info = ReaderInfo::new("MFRC522", vec!["ISO14443A".to_string()])
            .with_max_baud_rate(424000);

        assert_eq!(info.name, "MFRC522");
        assert_eq!(info.protocols, vec!["ISO14443A"]);
        assert_eq!(info.max_baud_rate, Some(424000));
    }

    #[test]
    fn test_reader_info_serialization() {
        let info = ReaderInfo::new("MFRC522", vec!["ISO14443A".to_string()]);
        let json = serde_json::to_string(&info).unwrap();
        let deserialized: ReaderInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, deserialized);
    }

    #[test]
    fn test_default_geometry() {
        let geometry = DisplayGeometry::default();
        assert_eq!(geometry.rows, 8);
        assert_eq!(geometry.columns, 21);
    }
}
