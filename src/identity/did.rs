use serde::{Deserialize, Serialize};

use crate::error::Err;
use crate::identity::{IdentityRecord, IdentityType, VERSION_1};
use crate::keys::{KeyPair, SecretKey};
use crate::{tracerr, Result};

/// The identity of a DID created by the wallet: a master key that signs the DID document and a
/// standby key that is only used to revoke it.
///
/// Records written before the `type` discriminator was added carry neither `type` nor
/// `version`. They are read as version 1 DID identities.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct DidIdentity {
    #[serde(default = "version_1")]
    version: u32,
    id: String,
    #[serde(rename = "type", default = "did_type")]
    type_: IdentityType,
    master_key: KeyPair,
    #[serde(rename = "slave_key")]
    standby_key: KeyPair,
}

const fn version_1() -> u32 {
    VERSION_1
}

const fn did_type() -> IdentityType {
    IdentityType::Did
}

impl DidIdentity {
    /// Create a DID identity from its master and standby key pairs.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if `id` is empty or either key has no id.
    pub fn new(id: impl Into<String>, master_key: KeyPair, standby_key: KeyPair) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            tracerr!(Err::InvalidInput, "id must not be empty");
        }
        if master_key.id.is_empty() || standby_key.id.is_empty() {
            tracerr!(Err::InvalidInput, "keys must not be empty");
        }
        Ok(Self {
            version: VERSION_1,
            id,
            type_: IdentityType::Did,
            master_key,
            standby_key,
        })
    }

    /// Create a DID identity from an ordered key list: master first, standby second.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if `id` is empty or `keys` does not hold exactly two keys.
    pub fn from_keys(id: impl Into<String>, keys: Vec<KeyPair>) -> Result<Self> {
        let Ok([master, standby]) = <[KeyPair; 2]>::try_from(keys) else {
            tracerr!(Err::InvalidInput, "a DID identity needs exactly two keys");
        };
        Self::new(id, master, standby)
    }

    /// Id of the master key.
    #[must_use]
    pub fn master_key_id(&self) -> &str {
        &self.master_key.id
    }

    /// Id of the standby key.
    #[must_use]
    pub fn standby_key_id(&self) -> &str {
        &self.standby_key.id
    }

    /// The master key pair in its stored form.
    #[must_use]
    pub const fn master_key_pair(&self) -> &KeyPair {
        &self.master_key
    }

    /// The standby key pair in its stored form.
    #[must_use]
    pub const fn standby_key_pair(&self) -> &KeyPair {
        &self.standby_key
    }

    /// Decoded master private key.
    ///
    /// # Errors
    ///
    /// * `InvalidKeyEncoding` if the stored hex is invalid.
    /// * `UnsupportedKeyAlgorithm` if the key's algorithm cannot be decoded.
    pub fn master_key(&self) -> Result<SecretKey> {
        self.master_key.secret_key()
    }

    /// Decoded standby private key.
    ///
    /// # Errors
    ///
    /// * `InvalidKeyEncoding` if the stored hex is invalid.
    /// * `UnsupportedKeyAlgorithm` if the key's algorithm cannot be decoded.
    pub fn standby_key(&self) -> Result<SecretKey> {
        self.standby_key.secret_key()
    }
}

impl IdentityRecord for DidIdentity {
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
