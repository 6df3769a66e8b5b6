//! Cryptographic key material: key pairs, their roles in a DID identity and the capability used to
//! generate and use them.

use serde::{Deserialize, Serialize};

pub mod ed25519;
pub mod provider;

pub use self::ed25519::Ed25519Provider;
pub use self::provider::{CryptoProvider, GeneratedKey};
use crate::{error::Err, tracerr, Result};

/// Types of key algorithm that may appear in a stored key pair. Only [`Algorithm::Ed25519`] has a
/// backing capability in this crate. Tags that are not recognized are preserved as
/// [`Algorithm::Other`] so that stored records survive a round trip unchanged.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Hash, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Algorithm {
    /// Edwards-curve signatures over Curve25519.
    #[default]
    Ed25519,
    /// RSA.
    Rsa,
    /// ECDSA using the secp256k1 curve.
    Secp256k1,
    /// ECDSA using the NIST P-256 curve.
    Secp256r1,
    /// Curve25519 (key agreement).
    Curve25519,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl Algorithm {
    /// Whether private keys tagged with this algorithm can be decoded and used for signing.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        matches!(self, Self::Ed25519)
    }
}

impl From<String> for Algorithm {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Ed25519" => Self::Ed25519,
            "RSA" => Self::Rsa,
            "Secp256k1" => Self::Secp256k1,
            "Secp256r1" => Self::Secp256r1,
            "Curve25519" => Self::Curve25519,
            _ => Self::Other(s),
        }
    }
}

impl From<Algorithm> for String {
    fn from(alg: Algorithm) -> Self {
        alg.to_string()
    }
}

/// Key algorithm display label. This is also the stored tag.
impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ed25519 => write!(f, "Ed25519"),
            Self::Rsa => write!(f, "RSA"),
            Self::Secp256k1 => write!(f, "Secp256k1"),
            Self::Secp256r1 => write!(f, "Secp256r1"),
            Self::Curve25519 => write!(f, "Curve25519"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// The role a key plays in a DID identity.
///
/// The master key authenticates create and update operations and signs the DID document. The
/// standby key is used only to authorize revocation, so that losing one key does not hand over
/// both powers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Signs the DID document.
    Master,
    /// Signs revocation requests.
    Standby,
}

impl KeyRole {
    /// Index used in the key id (`<did>#keys-<index>`).
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Master => 1,
            Self::Standby => 2,
        }
    }

    /// Key id for this role under the given DID.
    #[must_use]
    pub fn key_id(self, did: &str) -> String {
        derive_id(did, self.index())
    }
}

impl std::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Master => write!(f, "master"),
            Self::Standby => write!(f, "standby"),
        }
    }
}

/// Derive the id of the `index`th key of a DID.
#[must_use]
pub fn derive_id(did: &str, index: u32) -> String {
    format!("{did}#keys-{index}")
}

/// A key pair in its stored form. Key bytes are held hex-encoded, which is also how they are
/// persisted.
#[derive(Clone, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct KeyPair {
    /// Key identifier, usually `<did>#keys-<n>`.
    pub id: String,
    /// Key algorithm.
    #[serde(rename = "type")]
    pub algorithm: Algorithm,
    /// Hex-encoded private key.
    #[serde(rename = "privateKeyHex")]
    pub private_key_hex: String,
    /// Hex-encoded public key.
    #[serde(rename = "publicKeyHex")]
    pub public_key_hex: String,
}

impl KeyPair {
    /// Generate a fresh key pair for `role` under `did`.
    ///
    /// # Errors
    ///
    /// * `UnsupportedAlgorithm` if the provider has no capability for `algorithm`.
    /// * `KeyGenerationFailed` if the provider fails to produce a key.
    pub fn generate(
        provider: &impl CryptoProvider, algorithm: &Algorithm, did: &str, role: KeyRole,
    ) -> Result<Self> {
        let generated = provider.key_gen(algorithm)?;
        Ok(Self {
            id: role.key_id(did),
            algorithm: algorithm.clone(),
            private_key_hex: hex::encode(&generated.private_key),
            public_key_hex: hex::encode(&generated.public_key),
        })
    }

    /// Decoded public key bytes.
    ///
    /// # Errors
    ///
    /// * `InvalidKeyEncoding` if the stored hex cannot be decoded.
    pub fn public_key(&self) -> Result<Vec<u8>> {
        match hex::decode(&self.public_key_hex) {
            Ok(b) => Ok(b),
            Err(e) => tracerr!(
                Err::InvalidKeyEncoding,
                "public key ({}) is invalid: {}",
                self.id,
                e
            ),
        }
    }

    /// Decode the private key into a form that can be handed to a [`CryptoProvider`] for
    /// signing.
    ///
    /// # Errors
    ///
    /// * `InvalidKeyEncoding` if the stored hex cannot be decoded or has the wrong length.
    /// * `UnsupportedKeyAlgorithm` if there is no decoder for the key's algorithm.
    pub fn secret_key(&self) -> Result<SecretKey> {
        let bytes = match hex::decode(&self.private_key_hex) {
            Ok(b) => b,
            Err(e) => tracerr!(
                Err::InvalidKeyEncoding,
                "private key ({}) is invalid: {}",
                self.id,
                e
            ),
        };
        match self.algorithm {
            Algorithm::Ed25519 => {
                if bytes.len() != ed25519::SEED_LENGTH && bytes.len() != ed25519::KEYPAIR_LENGTH {
                    tracerr!(
                        Err::InvalidKeyEncoding,
                        "private key ({}) has invalid length {}",
                        self.id,
                        bytes.len()
                    );
                }
            }
            _ => tracerr!(
                Err::UnsupportedKeyAlgorithm,
                "private key ({}) has unsupported type: {}",
                self.id,
                self.algorithm
            ),
        }
        Ok(SecretKey {
            algorithm: self.algorithm.clone(),
            bytes,
        })
    }
}

/// A decoded private key, opaque to everything except the [`CryptoProvider`].
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    algorithm: Algorithm,
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Algorithm the key is used with.
    #[must_use]
    pub const fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

// Private key bytes stay out of logs.
impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("id", &self.id)
            .field("algorithm", &self.algorithm)
            .field("public_key_hex", &self.public_key_hex)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey").field("algorithm", &self.algorithm).finish_non_exhaustive()
    }
}
