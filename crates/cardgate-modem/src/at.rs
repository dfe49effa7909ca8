//! AT command set of the Wi-Fi modem.
//!
//! Only the commands the controller issues are modelled. Each command knows
//! its wire form and the response window the modem is given to answer.
//!
//! # Wire Format
//!
//! ```text
//! AT\r\n
//! AT+RST\r\n
//! AT+CWMODE=1\r\n
//! AT+CWJAP="<ssid>","<password>"\r\n
//! AT+CIPSTART="TCP","<host>",<port>\r\n
//! AT+CIPSEND=<n>\r\n
//! <raw payload, no terminator>
//! AT+CIPCLOSE\r\n
//! ```

use std::fmt::{self, Write as _};
use std::time::Duration;

use cardgate_core::constants::{
    AT_TERMINATOR, CLOSE_TIMEOUT_MS, CONNECT_TIMEOUT_MS, JOIN_TIMEOUT_MS, MODE_TIMEOUT_MS,
    PAYLOAD_TIMEOUT_MS, PROBE_TIMEOUT_MS, RESET_TIMEOUT_MS, SEND_SIZE_TIMEOUT_MS,
};

/// Wi-Fi operating mode selected with `AT+CWMODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiMode {
    Station = 1,
    SoftAp = 2,
    StationAndSoftAp = 3,
}

/// A command sent to the modem.
///
/// # Examples
///
/// ```
/// use cardgate_modem::AtCommand;
///
/// assert_eq!(AtCommand::Attention.serialize(), b"AT\r\n");
/// assert_eq!(AtCommand::SendSize(42).serialize(), b"AT+CIPSEND=42\r\n");
/// assert_eq!(AtCommand::Payload("raw".into()).serialize(), b"raw");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtCommand {
    /// Bare liveness probe.
    Attention,
    /// Restart the modem firmware.
    Reset,
    SetMode(WifiMode),
    JoinNetwork { ssid: String, password: String },
    OpenTcp { host: String, port: u16 },
    /// Announce the byte length of the next payload.
    SendSize(usize),
    /// Raw bytes forwarded on the open connection.
    Payload(String),
    Close,
}

impl AtCommand {
    /// Bytes written to the link for this command.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            AtCommand::Payload(body) => body.as_bytes().to_vec(),
            other => format!("{other}{AT_TERMINATOR}").into_bytes(),
        }
    }

    /// Response window the modem gets for this command.
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        let millis = match self {
            AtCommand::Attention => PROBE_TIMEOUT_MS,
            AtCommand::Reset => RESET_TIMEOUT_MS,
            AtCommand::SetMode(_) => MODE_TIMEOUT_MS,
            AtCommand::JoinNetwork { .. } => JOIN_TIMEOUT_MS,
            AtCommand::OpenTcp { .. } => CONNECT_TIMEOUT_MS,
            AtCommand::SendSize(_) => SEND_SIZE_TIMEOUT_MS,
            AtCommand::Payload(_) => PAYLOAD_TIMEOUT_MS,
            AtCommand::Close => CLOSE_TIMEOUT_MS,
        };
        Duration::from_millis(millis)
    }

    /// Short name used in log fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AtCommand::Attention => "AT",
            AtCommand::Reset => "AT+RST",
            AtCommand::SetMode(_) => "AT+CWMODE",
            AtCommand::JoinNetwork { .. } => "AT+CWJAP",
            AtCommand::OpenTcp { .. } => "AT+CIPSTART",
            AtCommand::SendSize(_) => "AT+CIPSEND",
            AtCommand::Payload(_) => "payload",
            AtCommand::Close => "AT+CIPCLOSE",
        }
    }
}

/// Text form without the line terminator. The payload displays verbatim.
impl fmt::Display for AtCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AtCommand::Attention => write!(f, "AT"),
            AtCommand::Reset => write!(f, "AT+RST"),
            AtCommand::SetMode(mode) => write!(f, "AT+CWMODE={}", *mode as u8),
            AtCommand::JoinNetwork { ssid, password } => {
                write!(f, "AT+CWJAP=\"{}\",\"{}\"", Quoted(ssid), Quoted(password))
            }
            AtCommand::OpenTcp { host, port } => {
                write!(f, "AT+CIPSTART=\"TCP\",\"{host}\",{port}")
            }
            AtCommand::SendSize(len) => write!(f, "AT+CIPSEND={len}"),
            AtCommand::Payload(body) => f.write_str(body),
            AtCommand::Close => write!(f, "AT+CIPCLOSE"),
        }
    }
}

/// String argument with `"`, `,` and `\` backslash-escaped for the modem.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for c in self.0.chars() {
            if matches!(c, '"' | ',' | '\\') {
                f.write_char('\\')?;
            }
            f.write_char(c)?;
        }
        Ok(())
    }
}
