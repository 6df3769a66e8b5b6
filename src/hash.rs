//! Helper functions for canonicalizing and hashing data, and generating random strings.

use olpc_cjson::CanonicalFormatter;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{error::Err, tracerr, Result};

/// Serializes the provided data as canonical JSON: object keys sorted, no insignificant
/// whitespace. Two structurally equal values always produce the same bytes.
/// See [JSON Canonicalization Scheme (JCS)](https://identity.foundation/JCS/) for details.
///
/// # Errors
///
/// * `SerializationError` if the data cannot be serialized.
pub fn canonical_json(data: &impl Serialize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, CanonicalFormatter::new());
    if let Err(e) = data.serialize(&mut ser) {
        tracerr!(Err::SerializationError, "failed to canonicalize data: {}", e);
    }
    Ok(buf)
}

/// Hashes the provided data using SHA256.
#[must_use]
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Random hex string generator. Produces `2 * n` lowercase hex characters.
#[must_use]
pub fn rand_hex(n: usize) -> String {
    let mut bytes = vec![0u8; n];
    let mut rng = StdRng::from_entropy();
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
