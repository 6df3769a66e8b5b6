use vercre_didwallet::keys::{Algorithm, Ed25519Provider, KeyPair, KeyRole};
use vercre_didwallet::DidIdentity;

/// DID used by the fixture identity.
pub const DID: &str = "did:example:fafdecaa29934fde9dcc5adaea8ea82b";

/// Fixture master key of [`DID`].
#[must_use]
pub fn master_key() -> KeyPair {
    KeyPair {
        id: format!("{DID}#keys-1"),
        algorithm: Algorithm::Ed25519,
        private_key_hex: "905f6f3c113b9303bc50c310509bb4272e1e7ab83da8b019f7707ae1a1c189584cd5d192e33f390d7f2a5cc948103a080c52f42fefe2d4d334f86e7ac78e0938".to_string(),
        public_key_hex: "4cd5d192e33f390d7f2a5cc948103a080c52f42fefe2d4d334f86e7ac78e0938".to_string(),
    }
}

/// Fixture standby key of [`DID`].
#[must_use]
pub fn standby_key() -> KeyPair {
    KeyPair {
        id: format!("{DID}#keys-2"),
        algorithm: Algorithm::Ed25519,
        private_key_hex: "5aca741c5d1265e28c35610c68cc1ca2d8b76fd1e3794590968cf6dd13cc8c8de1df3e6e58d51ba0217137224d6daef2a5d1a5790b6537d6f9830d59639e0826".to_string(),
        public_key_hex: "e1df3e6e58d51ba0217137224d6daef2a5d1a5790b6537d6f9830d59639e0826".to_string(),
    }
}

/// DID identity built from the fixture keys.
///
/// # Panics
///
/// Never: the fixture is valid.
#[must_use]
pub fn did_identity() -> DidIdentity {
    DidIdentity::new(DID, master_key(), standby_key()).expect("fixture identity should be valid")
}

/// Freshly generated Ed25519 master and standby keys for `did`.
///
/// # Panics
///
/// If the default provider fails to generate a key.
#[must_use]
pub fn generate_keys(did: &str) -> (KeyPair, KeyPair) {
    let master = KeyPair::generate(&Ed25519Provider, &Algorithm::Ed25519, did, KeyRole::Master)
        .expect("should generate master key");
    let standby = KeyPair::generate(&Ed25519Provider, &Algorithm::Ed25519, did, KeyRole::Standby)
        .expect("should generate standby key");
    (master, standby)
}
