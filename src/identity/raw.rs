use serde::{Deserialize, Serialize};

use crate::error::Err;
use crate::identity::{IdentityRecord, IdentityType, VERSION_1};
use crate::keys::{Algorithm, KeyPair};
use crate::{tracerr, Result};

/// An identity made of a single key pair.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct RawIdentity {
    version: u32,
    id: String,
    #[serde(rename = "type")]
    type_: IdentityType,
    key: KeyPair,
}

impl RawIdentity {
    /// Create a raw identity for storage in a wallet.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if `id` is empty or the key has no id.
    pub fn new(id: impl Into<String>, key: KeyPair) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            tracerr!(Err::InvalidInput, "id must not be empty");
        }
        if key.id.is_empty() {
            tracerr!(Err::InvalidInput, "key must not be empty");
        }
        Ok(Self {
            version: VERSION_1,
            id,
            type_: IdentityType::Raw,
            key,
        })
    }

    /// The key pair.
    #[must_use]
    pub const fn key(&self) -> &KeyPair {
        &self.key
    }

    /// Id of the key pair.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key.id
    }

    /// Algorithm of the key pair.
    #[must_use]
    pub const fn key_type(&self) -> &Algorithm {
        &self.key.algorithm
    }

    /// Hex-encoded private key.
    #[must_use]
    pub fn private_key_hex(&self) -> &str {
        &self.key.private_key_hex
    }

    /// Hex-encoded public key.
    #[must_use]
    pub fn public_key_hex(&self) -> &str {
        &self.key.public_key_hex
    }
}

impl IdentityRecord for RawIdentity {
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
