//! Core domain types for the cardgate access controller.
//!
//! Everything the decision engine, the modem link and the controller share
//! lives here: card identifiers, identities, decisions, connectivity state,
//! the error type and the protocol constants.

pub mod constants;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
