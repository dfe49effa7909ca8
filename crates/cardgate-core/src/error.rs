use thiserror::Error;

/// Errors shared by every cardgate crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid card UID: {0}")]
    InvalidCardUid(String),

    #[error("Invalid hex identifier: {0}")]
    InvalidHex(String),

    /// The display did not come up; the controller cannot give feedback.
    #[error("Display initialization failed: {0}")]
    DisplayInit(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
