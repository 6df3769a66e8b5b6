use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Err;
use crate::identity::{IdentityRecord, IdentityType, VERSION_1};
use crate::keys::KeyPair;
use crate::{tracerr, Result};

/// An identity holding a named set of key pairs.
///
/// Keys are kept in an ordered map so the stored form is the same every time the identity is
/// written.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct RawKeyIdentity {
    version: u32,
    id: String,
    #[serde(rename = "type")]
    type_: IdentityType,
    keys: BTreeMap<String, KeyPair>,
}

impl RawKeyIdentity {
    /// Create a multi-key identity for storage in a wallet. Each key is filed under its own id.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if `id` is empty or `keys` is empty.
    pub fn new(id: impl Into<String>, keys: Vec<KeyPair>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            tracerr!(Err::InvalidInput, "id must not be empty");
        }
        if keys.is_empty() {
            tracerr!(Err::InvalidInput, "keys must not be empty");
        }
        let keys = keys.into_iter().map(|k| (k.id.clone(), k)).collect();
        Ok(Self {
            version: VERSION_1,
            id,
            type_: IdentityType::RawKey,
            keys,
        })
    }

    /// Put a key into the set, replacing any key already filed under `id`.
    pub fn put_key(&mut self, id: impl Into<String>, key: KeyPair) {
        self.keys.insert(id.into(), key);
    }

    /// Get the key filed under `id`.
    ///
    /// # Errors
    ///
    /// * `KeyNotFound` if there is no such key.
    pub fn get_key(&self, id: &str) -> Result<&KeyPair> {
        match self.keys.get(id) {
            Some(k) => Ok(k),
            None => tracerr!(Err::KeyNotFound, "key {} doesn't exist", id),
        }
    }

    /// Remove the key filed under `id`. Removing an absent key does nothing.
    pub fn remove_key(&mut self, id: &str) {
        self.keys.remove(id);
    }

    /// Ids of all keys in the set. Callers must not rely on the order.
    #[must_use]
    pub fn list_keys(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }
}

impl IdentityRecord for RawKeyIdentity {
    fn did(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn identity_type(&self) -> IdentityType {
        self.type_
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{codec, Identity};
    use crate::keys::Algorithm;

    const ID: &str = "did:example:3dda540891d14a1baec2c7485c273c00";
    const KEY_ID_1: &str = "did:example:3dda540891d14a1baec2c7485c273c00#keys-1";
    const KEY_ID_2: &str = "did:example:3dda540891d14a1baec2c7485c273c00#keys-2";

    fn keys() -> Vec<KeyPair> {
        vec![
            KeyPair {
                id: KEY_ID_1.to_string(),
                algorithm: Algorithm::Ed25519,
                private_key_hex: "a889f4da49ff8dd6b03d4334723fe3e5ff55ae6a2483de1627bec873b0b73e1e86eabd6abce2f96553251de61def0265784688ff712ce583621a5b181ef21639".to_string(),
                public_key_hex: "86eabd6abce2f96553251de61def0265784688ff712ce583621a5b181ef21639".to_string(),
            },
            KeyPair {
                id: KEY_ID_2.to_string(),
                algorithm: Algorithm::Ed25519,
                private_key_hex: "475446b1f11109413e6983ba05121821912200a7b9046bd6764e408a2371362043e10c88d8ec4011bea186912725f066b1222c5797eec64b3378b337f313b425".to_string(),
                public_key_hex: "43e10c88d8ec4011bea186912725f066b1222c5797eec64b3378b337f313b425".to_string(),
            },
        ]
    }

    #[test]
    fn key_store() {
        let mut x = RawKeyIdentity::new(ID, keys()).expect("should create");

        assert_eq!(x.version(), VERSION_1);
        assert_eq!(x.identity_type(), IdentityType::RawKey);
        assert_eq!(x.did(), ID);

        let k = x.get_key(KEY_ID_1).expect("should get key");
        assert_eq!(k, &keys()[0]);

        let mut ids = x.list_keys();
        ids.sort();
        assert_eq!(ids, vec![KEY_ID_1.to_string(), KEY_ID_2.to_string()]);

        // put then get returns exactly what was written
        let replacement = KeyPair {
            id: KEY_ID_1.to_string(),
            algorithm: Algorithm::Secp256k1,
            private_key_hex: "01".to_string(),
            public_key_hex: "02".to_string(),
        };
        x.put_key(KEY_ID_1, replacement.clone());
        assert_eq!(x.get_key(KEY_ID_1).expect("should get key"), &replacement);

        x.remove_key(KEY_ID_1);
        let err = x.get_key(KEY_ID_1).expect_err("should be gone");
        assert!(err.is(Err::KeyNotFound));
        assert_eq!(x.list_keys(), vec![KEY_ID_2.to_string()]);
    }

    #[test]
    fn remove_absent_key() {
        let mut x = RawKeyIdentity::new(ID, keys()).expect("should create");
        let before = x.clone();
        x.remove_key("did:example:nope#keys-9");
        assert_eq!(x, before);
    }

    #[test]
    fn round_trip() {
        let x = RawKeyIdentity::new(ID, keys()).expect("should create");
        let data = x.marshal().expect("should marshal");

        let Identity::RawKey(xx) = codec::unmarshal(&data).expect("should unmarshal") else {
            panic!("expected raw key identity");
        };
        assert_eq!(x, xx);
        assert_eq!(xx.marshal().expect("should marshal"), data);
    }

    #[test]
    fn validation() {
        assert!(RawKeyIdentity::new("", keys()).expect_err("should fail").is(Err::InvalidInput));
        assert!(RawKeyIdentity::new(ID, vec![]).expect_err("should fail").is(Err::InvalidInput));
    }
}
