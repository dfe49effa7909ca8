//! Property-based tests for card classification.

use cardgate_controller::{Authenticator, StaticDirectory};
use cardgate_core::Identity;
use proptest::prelude::*;

const MASTER: [u8; 4] = [0x03, 0x89, 0xAF, 0x0D];

fn classify(uid: &[u8]) -> Identity {
    let authenticator = Authenticator::new(StaticDirectory::reference());
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build test runtime")
        .block_on(authenticator.classify_bytes(uid))
}

/// Strategy for byte strings of reader-plausible and degenerate lengths.
fn any_uid() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=12)
}

proptest! {
    /// Property: Master iff the bytes equal the master UID exactly.
    #[test]
    fn prop_master_iff_exact(uid in any_uid()) {
        let is_master = classify(&uid) == Identity::Master;
        prop_assert_eq!(is_master, uid == MASTER);
    }

    /// Property: any truncation of the master UID is not Master.
    #[test]
    fn prop_truncated_master_rejected(len in 0usize..MASTER.len()) {
        prop_assert_ne!(classify(&MASTER[..len]), Identity::Master);
    }

    /// Property: any extension of the master UID is not Master.
    #[test]
    fn prop_extended_master_rejected(suffix in prop::collection::vec(any::<u8>(), 1..=6)) {
        let mut uid = MASTER.to_vec();
        uid.extend(suffix);
        prop_assert_ne!(classify(&uid), Identity::Master);
    }

    /// Property: any reordering other than the identity is not Master.
    #[test]
    fn prop_permuted_master_rejected(permutation in Just(MASTER.to_vec()).prop_shuffle()) {
        prop_assume!(permutation != MASTER);
        prop_assert_ne!(classify(&permutation), Identity::Master);
    }

    /// Property: cards outside the reference table are Unknown.
    #[test]
    fn prop_unenrolled_cards_unknown(uid in prop::collection::vec(any::<u8>(), 4..=10)) {
        prop_assume!(uid != MASTER);
        prop_assume!(uid != [0x12, 0x34, 0x56, 0x78]);
        prop_assume!(uid != [0x87, 0x65, 0x43, 0x21]);
        prop_assert_eq!(classify(&uid), Identity::Unknown);
    }
}
