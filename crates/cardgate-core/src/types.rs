use crate::{
    Result,
    constants::{MASTER_LABEL, MAX_UID_LENGTH, MIN_UID_LENGTH, NOTIFICATION_PREFIX},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Encode bytes as lowercase hex, two digits per byte, no separators.
///
/// Bytes are emitted in the order given, so a UID keeps the byte order the
/// reader produced.
///
/// # Examples
///
/// ```
/// use cardgate_core::hex_encode;
///
/// assert_eq!(hex_encode(&[0x03, 0x89, 0xAF, 0x0D]), "0389af0d");
/// assert_eq!(hex_encode(&[]), "");
/// ```
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string (either case) back into bytes.
///
/// # Errors
/// Returns `Error::InvalidHex` for odd lengths or non-hex characters.
pub fn hex_decode(text: &str) -> Result<Vec<u8>> {
    hex::decode(text.trim()).map_err(|e| Error::InvalidHex(format!("'{text}': {e}")))
}

/// Card unique identifier as produced by a proximity reader.
///
/// # Security
/// Equality is constant-time so comparing against privileged UIDs does not
/// leak how many leading bytes matched.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct CardUid(Vec<u8>);

impl CardUid {
    /// Create a UID, validating the ISO 14443 length range (4-10 bytes).
    ///
    /// # Errors
    /// Returns `Error::InvalidCardUid` if the length is out of range.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        let len = bytes.len();
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&len) {
            return Err(Error::InvalidCardUid(format!(
                "UID must be {MIN_UID_LENGTH}-{MAX_UID_LENGTH} bytes, got {len}"
            )));
        }
        Ok(CardUid(bytes))
    }

    /// Parse a UID from its hex representation.
    ///
    /// # Errors
    /// Returns an error if the text is not hex or the decoded length is out
    /// of range.
    pub fn from_hex(text: &str) -> Result<Self> {
        CardUid::new(hex_decode(text)?)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex form used for directory lookups.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }
}

impl PartialEq for CardUid {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl std::hash::Hash for CardUid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl AsRef<[u8]> for CardUid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for CardUid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CardUid::from_hex(s)
    }
}

/// Who presented the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// The compiled-in master card.
    Master,
    /// A card resolved through the directory.
    NamedUser { name: String },
    /// Neither master nor known to the directory.
    Unknown,
}

impl Identity {
    /// Label shown on the display and embedded in notifications.
    ///
    /// `None` for unknown cards, which never produce a notification.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Identity::Master => Some(MASTER_LABEL),
            Identity::NamedUser { name } => Some(name.as_str()),
            Identity::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Identity::Unknown)
    }
}

/// Outcome of one decision cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Granted(Identity),
    Denied,
}

impl AccessDecision {
    /// Decide from an identity: any known identity is granted.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgate_core::{AccessDecision, Identity};
    ///
    /// assert!(AccessDecision::from_identity(Identity::Master).is_granted());
    /// assert_eq!(AccessDecision::from_identity(Identity::Unknown), AccessDecision::Denied);
    /// ```
    #[must_use]
    pub fn from_identity(identity: Identity) -> Self {
        if identity.is_known() {
            AccessDecision::Granted(identity)
        } else {
            AccessDecision::Denied
        }
    }

    #[inline]
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted(_))
    }

    /// The granted identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AccessDecision::Granted(identity) => Some(identity),
            AccessDecision::Denied => None,
        }
    }
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccessDecision::Granted(identity) => {
                write!(f, "Granted({})", identity.label().unwrap_or("?"))
            }
            AccessDecision::Denied => write!(f, "Denied"),
        }
    }
}

/// Whether the modem has confirmed network attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityState {
    Online,
    #[default]
    Offline,
}

impl ConnectivityState {
    #[inline]
    #[must_use]
    pub fn is_online(self) -> bool {
        matches!(self, ConnectivityState::Online)
    }

    #[inline]
    #[must_use]
    pub fn from_online(online: bool) -> Self {
        if online {
            ConnectivityState::Online
        } else {
            ConnectivityState::Offline
        }
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConnectivityState::Online => write!(f, "Online"),
            ConnectivityState::Offline => write!(f, "Offline"),
        }
    }
}

/// Text reported to the remote collector for a granted access.
///
/// Uptime is monotonic milliseconds since controller start, not wall-clock
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub text: String,
    pub uptime_millis: u64,
}

impl NotificationMessage {
    /// Build the notification for a decision.
    ///
    /// Only granted decisions are reported; denials yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardgate_core::{AccessDecision, Identity, NotificationMessage};
    ///
    /// let msg = NotificationMessage::for_decision(
    ///     &AccessDecision::Granted(Identity::Master),
    ///     1234,
    /// ).unwrap();
    /// assert_eq!(msg.text, "User Accessed: Master at 1234");
    ///
    /// assert!(NotificationMessage::for_decision(&AccessDecision::Denied, 1234).is_none());
    /// ```
    #[must_use]
    pub fn for_decision(decision: &AccessDecision, uptime_millis: u64) -> Option<Self> {
        let label = decision.identity()?.label()?;
        Some(NotificationMessage {
            text: format!("{NOTIFICATION_PREFIX}{label} at {uptime_millis}"),
            uptime_millis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[0x03, 0x89, 0xAF, 0x0D], "0389af0d")]
    #[case(&[0x12, 0x34, 0x56, 0x78], "12345678")]
    #[case(&[0x00, 0x01, 0x0A, 0xFF], "00010aff")]
    fn test_hex_encode(#[case] bytes: &[u8], #[case] expected: &str) {
        assert_eq!(hex_encode(bytes), expected);
    }

    #[rstest]
    #[case("AABBCCDD")]
    #[case("aabbccdd")]
    fn test_hex_decode_either_case(#[case] input: &str) {
        assert_eq!(hex_decode(input).unwrap(), vec![0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[rstest]
    #[case("abc")] // odd length
    #[case("zz11")] // not hex
    fn test_hex_decode_invalid(#[case] input: &str) {
        assert!(matches!(hex_decode(input), Err(Error::InvalidHex(_))));
    }

    #[test]
    fn test_card_uid_length_bounds() {
        assert!(CardUid::new(vec![0x01; 3]).is_err());
        assert!(CardUid::new(vec![0x01; 4]).is_ok());
        assert!(CardUid::new(vec![0x01; 10]).is_ok());
        assert!(CardUid::new(vec![0x01; 11]).is_err());
    }

    #[test]
    fn test_card_uid_equality_requires_same_length() {
        let short = CardUid::new(vec![0x03, 0x89, 0xAF, 0x0D]).unwrap();
        let long = CardUid::new(vec![0x03, 0x89, 0xAF, 0x0D, 0x00]).unwrap();
        assert_ne!(short, long);
        assert_eq!(short, CardUid::from_hex("0389AF0D").unwrap());
    }

    #[test]
    fn test_card_uid_display_is_lowercase_hex() {
        let uid: CardUid = "AABBCCDD".parse().unwrap();
        assert_eq!(uid.to_string(), "aabbccdd");
    }

    #[test]
    fn test_identity_labels() {
        assert_eq!(Identity::Master.label(), Some("Master"));
        let user = Identity::NamedUser {
            name: "Admin".to_string(),
        };
        assert_eq!(user.label(), Some("Admin"));
        assert_eq!(Identity::Unknown.label(), None);
    }

    #[test]
    fn test_decision_from_identity() {
        let user = Identity::NamedUser {
            name: "John Doe".to_string(),
        };
        assert_eq!(
            AccessDecision::from_identity(user.clone()),
            AccessDecision::Granted(user)
        );
        assert_eq!(
            AccessDecision::from_identity(Identity::Unknown),
            AccessDecision::Denied
        );
    }

    #[test]
    fn test_connectivity_state() {
        assert!(ConnectivityState::Online.is_online());
        assert!(!ConnectivityState::default().is_online());
        assert_eq!(ConnectivityState::from_online(true), ConnectivityState::Online);
    }

    #[test]
    fn test_notification_for_named_user() {
        let decision = AccessDecision::Granted(Identity::NamedUser {
            name: "Admin".to_string(),
        });
        let msg = NotificationMessage::for_decision(&decision, 42).unwrap();
        assert_eq!(msg.text, "User Accessed: Admin at 42");
        assert_eq!(msg.uptime_millis, 42);
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_hex_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
                let encoded = hex_encode(&bytes);
                prop_assert_eq!(encoded.len(), bytes.len() * 2);
                prop_assert!(encoded.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
                prop_assert_eq!(hex_decode(&encoded).unwrap(), bytes);
            }
        }
    }
}
