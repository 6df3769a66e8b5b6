//! Default [`CryptoProvider`] backed by `ed25519-dalek` and SHA-256.

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;

use crate::error::Err;
use crate::hash::sha256;
use crate::keys::{Algorithm, CryptoProvider, GeneratedKey, SecretKey};
use crate::{tracerr, Result};

/// Length of an Ed25519 seed.
pub const SEED_LENGTH: usize = 32;

/// Length of an Ed25519 key pair in its stored form (seed followed by public key).
pub const KEYPAIR_LENGTH: usize = 64;

/// Ed25519 key generation and signing, SHA-256 hashing.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Provider;

impl Ed25519Provider {
    fn signing_key(key: &SecretKey) -> Result<SigningKey> {
        if key.algorithm() != &Algorithm::Ed25519 {
            tracerr!(
                Err::UnsupportedKeyAlgorithm,
                "cannot sign with {} key",
                key.algorithm()
            );
        }
        let bytes = key.as_bytes();
        if let Ok(seed) = <[u8; SEED_LENGTH]>::try_from(bytes) {
            return Ok(SigningKey::from_bytes(&seed));
        }
        let Ok(pair) = <[u8; KEYPAIR_LENGTH]>::try_from(bytes) else {
            tracerr!(Err::InvalidKeyEncoding, "invalid Ed25519 key length {}", bytes.len());
        };
        match SigningKey::from_keypair_bytes(&pair) {
            Ok(sk) => Ok(sk),
            Err(e) => tracerr!(Err::InvalidKeyEncoding, "inconsistent Ed25519 key pair: {}", e),
        }
    }
}

impl CryptoProvider for Ed25519Provider {
    fn key_gen(&self, algorithm: &Algorithm) -> Result<GeneratedKey> {
        if algorithm != &Algorithm::Ed25519 {
            tracerr!(
                Err::UnsupportedAlgorithm,
                "no key generation capability for {}",
                algorithm
            );
        }
        let signing_key = SigningKey::generate(&mut OsRng);
        Ok(GeneratedKey {
            private_key: signing_key.to_keypair_bytes().to_vec(),
            public_key: signing_key.verifying_key().to_bytes().to_vec(),
        })
    }

    fn hash(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(sha256(data))
    }

    fn sign(&self, key: &SecretKey, digest: &[u8]) -> Result<Vec<u8>> {
        let signing_key = Self::signing_key(key)?;
        Ok(signing_key.sign(digest).to_bytes().to_vec())
    }

    fn verify(
        &self, algorithm: &Algorithm, public_key: &[u8], digest: &[u8], signature: &[u8],
    ) -> Result<()> {
        if algorithm != &Algorithm::Ed25519 {
            tracerr!(Err::UnsupportedKeyAlgorithm, "cannot verify {} signatures", algorithm);
        }
        let Ok(pk) = <[u8; 32]>::try_from(public_key) else {
            tracerr!(
                Err::InvalidKeyEncoding,
                "invalid Ed25519 public key length {}",
                public_key.len()
            );
        };
        let verifying_key = match VerifyingKey::from_bytes(&pk) {
            Ok(vk) => vk,
            Err(e) => tracerr!(Err::InvalidKeyEncoding, "invalid Ed25519 public key: {}", e),
        };
        let sig = match Signature::from_slice(signature) {
            Ok(s) => s,
            Err(e) => tracerr!(Err::InvalidKeyEncoding, "invalid Ed25519 signature: {}", e),
        };
        match verifying_key.verify(digest, &sig) {
            Ok(()) => Ok(()),
            Err(e) => tracerr!(
                Err::FailedSignatureVerification,
                "error verifying signature: {}",
                e
            ),
        }
    }
}
