//! Card classification.
//!
//! The master card is the compiled-in [`MASTER_UID`]. It is checked first
//! with a constant-time comparison and never reaches the directory. Every other card is looked up by its
//! lowercase hex identifier.

use cardgate_core::constants::MASTER_UID;
use cardgate_core::{CardUid, Identity, hex_encode};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::directory::Directory;

/// Maps card identifiers to identities.
///
/// # Examples
///
/// ```
/// use cardgate_controller::{Authenticator, StaticDirectory};
/// use cardgate_core::{CardUid, Identity};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let auth = Authenticator::new(StaticDirectory::reference());
/// let master = CardUid::new(vec![0x03, 0x89, 0xAF, 0x0D]).unwrap();
///
/// assert_eq!(auth.classify(&master).await, Identity::Master);
/// assert_eq!(
///     auth.classify_bytes(&[0x12, 0x34, 0x56, 0x78]).await,
///     Identity::NamedUser { name: "Admin".to_string() }
/// );
/// assert_eq!(auth.classify_bytes(&[]).await, Identity::Unknown);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticator<D> {
    directory: D,
}

impl<D: Directory> Authenticator<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Classify a UID captured by the reader.
    pub async fn classify(&self, uid: &CardUid) -> Identity {
        self.classify_bytes(uid.as_bytes()).await
    }

    /// Classify raw identifier bytes. Never fails: empty or unknown input
    /// is [`Identity::Unknown`].
    pub async fn classify_bytes(&self, uid: &[u8]) -> Identity {
        if uid.is_empty() {
            return Identity::Unknown;
        }

        if self.is_master(uid) {
            return Identity::Master;
        }

        let hex_id = hex_encode(uid);
        match self.directory.lookup(&hex_id).await {
            Some(name) => Identity::NamedUser { name },
            None => {
                debug!(%hex_id, "Card not enrolled");
                Identity::Unknown
            }
        }
    }

    /// Length and every byte must match. The byte comparison runs in
    /// constant time; length is not secret.
    fn is_master(&self, uid: &[u8]) -> bool {
        MASTER_UID.len() == uid.len() && bool::from(MASTER_UID.as_slice().ct_eq(uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaticDirectory;
    use rstest::rstest;

    const MASTER: [u8; 4] = [0x03, 0x89, 0xAF, 0x0D];

    fn authenticator() -> Authenticator<StaticDirectory> {
        Authenticator::new(StaticDirectory::reference())
    }

    #[tokio::test]
    async fn test_master_card() {
        assert_eq!(authenticator().classify_bytes(&MASTER).await, Identity::Master);
    }

    #[rstest]
    #[case(&[0x12, 0x34, 0x56, 0x78], "Admin")]
    #[case(&[0x87, 0x65, 0x43, 0x21], "John Doe")]
    #[tokio::test]
    async fn test_enrolled_cards(#[case] uid: &[u8], #[case] name: &str) {
        assert_eq!(
            authenticator().classify_bytes(uid).await,
            Identity::NamedUser {
                name: name.to_string()
            }
        );
    }

    #[rstest]
    #[case(&[0xAA, 0xBB, 0xCC, 0xDD])]
    #[case(&[0x03, 0x89, 0xAF])]
    #[case(&[0x03, 0x89, 0xAF, 0x0D, 0x00])]
    #[case(&[0x0D, 0xAF, 0x89, 0x03])]
    #[case(&[])]
    #[tokio::test]
    async fn test_unknown_cards(#[case] uid: &[u8]) {
        assert_eq!(authenticator().classify_bytes(uid).await, Identity::Unknown);
    }

    #[tokio::test]
    async fn test_master_wins_over_directory_entry() {
        let auth = Authenticator::new(StaticDirectory::from_entries([("0389af0d", "Impostor")]));
        assert_eq!(auth.classify_bytes(&MASTER).await, Identity::Master);
    }

    #[tokio::test]
    async fn test_master_hex_in_other_case_is_still_exact_match() {
        let uid = CardUid::from_hex("0389AF0D").unwrap();
        assert_eq!(authenticator().classify(&uid).await, Identity::Master);
    }
}
