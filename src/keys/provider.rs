//! The cryptographic capability consumed by the wallet. Key generation, hashing, signing and
//! verification are delegated to an implementation of [`CryptoProvider`]; the wallet only moves
//! opaque bytes between it and the rest of the system.

use crate::keys::{Algorithm, SecretKey};
use crate::Result;

/// Raw output of key generation.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratedKey {
    /// Private key bytes in the provider's native encoding.
    pub private_key: Vec<u8>,
    /// Public key bytes.
    pub public_key: Vec<u8>,
}

/// Cryptographic service provider. The `self` reference allows for configuration such as a
/// hardware token or a remote key service.
pub trait CryptoProvider: Send + Sync {
    /// Generate a new key pair for the requested algorithm.
    ///
    /// # Errors
    ///
    /// * `UnsupportedAlgorithm` if the provider cannot generate keys for `algorithm`.
    /// * `KeyGenerationFailed` for any other failure.
    fn key_gen(&self, algorithm: &Algorithm) -> Result<GeneratedKey>;

    /// Hash the provided bytes. The digest is what gets signed.
    ///
    /// # Errors
    ///
    /// * `SigningFailed` if the digest cannot be computed.
    fn hash(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Sign a digest with the provided private key.
    ///
    /// # Errors
    ///
    /// * `InvalidKeyEncoding` if the key bytes are unusable.
    /// * `UnsupportedKeyAlgorithm` if the provider cannot sign with the key's algorithm.
    /// * `SigningFailed` for any other failure.
    fn sign(&self, key: &SecretKey, digest: &[u8]) -> Result<Vec<u8>>;

    /// Verify a signature over a digest.
    ///
    /// # Errors
    ///
    /// * `FailedSignatureVerification` if the signature does not match.
    /// * `InvalidKeyEncoding` if the public key or signature bytes are malformed.
    /// * `UnsupportedKeyAlgorithm` if the provider cannot verify for `algorithm`.
    fn verify(
        &self, algorithm: &Algorithm, public_key: &[u8], digest: &[u8], signature: &[u8],
    ) -> Result<()>;
}

impl std::fmt::Debug for GeneratedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedKey")
            .field("public_key", &hex::encode(&self.public_key))
            .finish_non_exhaustive()
    }
}
