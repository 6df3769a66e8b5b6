//! # DID Document
//!
//! The document registered for a DID created by the wallet. It lists the DID's master and
//! standby public keys, names the master key as the authentication key and the standby key as
//! the recovery key, and carries a proof signed by the master key.
//!
//! The proof signs the SHA-256 digest of the document's canonical JSON form (sorted keys, no
//! whitespace) with the `proof` member left out.

use base64ct::{Base64, Encoding};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Err;
use crate::hash::canonical_json;
use crate::keys::{Algorithm, CryptoProvider, KeyPair, KeyRole};
use crate::{tracerr, Result};

/// JSON-LD context of every document.
pub const CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// A DID document as sent to the registry.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    /// JSON-LD context.
    #[serde(rename = "@context")]
    pub context: String,

    /// The DID the document describes.
    pub id: String,

    /// Document format version.
    pub version: u32,

    /// Public keys of the DID: master first, then standby.
    pub public_key: Vec<PublicKey>,

    /// The DID authorized to change the document. Always the DID itself.
    pub controller: String,

    /// Ids of keys that authenticate the DID subject.
    pub authentication: Vec<String>,

    /// Ids of keys that may revoke the DID.
    pub recovery: Vec<String>,

    /// Signature over the rest of the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    /// Creation time.
    pub created: DateTime<Utc>,

    /// Last update time.
    pub updated: DateTime<Utc>,
}

/// A public key entry in a DID document.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKey {
    /// Key id, `<did>#keys-<n>`.
    pub id: String,

    /// Key algorithm.
    #[serde(rename = "type")]
    pub algorithm: Algorithm,

    /// Hex-encoded public key.
    pub public_key_hex: String,
}

/// A signature and the key that made it. Used both for document proofs and revocation requests.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Algorithm of the signing key.
    #[serde(rename = "type")]
    pub algorithm: Algorithm,

    /// Id of the signing key.
    pub creator: String,

    /// Base64 (standard alphabet, padded) signature.
    pub signature_value: String,
}

impl Proof {
    /// Decoded signature bytes.
    ///
    /// # Errors
    ///
    /// * `FailedSignatureVerification` if the signature is not valid base64.
    pub fn signature(&self) -> Result<Vec<u8>> {
        match Base64::decode_vec(&self.signature_value) {
            Ok(sig) => Ok(sig),
            Err(e) => tracerr!(
                Err::FailedSignatureVerification,
                "signature from {} is not valid base64: {}",
                self.creator,
                e
            ),
        }
    }
}

impl DidDocument {
    /// Digest signed by the document proof: the hash of the canonical JSON form of the document
    /// without its proof.
    ///
    /// # Errors
    ///
    /// * `SigningFailed` if the document cannot be canonicalized or hashed.
    pub fn digest(&self, provider: &impl CryptoProvider) -> Result<Vec<u8>> {
        let unsigned = Self {
            proof: None,
            ..self.clone()
        };
        let data = match canonical_json(&unsigned) {
            Ok(data) => data,
            Err(e) => tracerr!(Err::SigningFailed, "issue canonicalizing document: {}", e),
        };
        match provider.hash(&data) {
            Ok(digest) => Ok(digest),
            Err(e) => tracerr!(Err::SigningFailed, "issue hashing document: {}", e),
        }
    }

    /// Public key entry with the given id.
    #[must_use]
    pub fn find_key(&self, id: &str) -> Option<&PublicKey> {
        self.public_key.iter().find(|pk| pk.id == id)
    }

    /// Verify the document proof against the public key named as its creator.
    ///
    /// # Errors
    ///
    /// * `FailedSignatureVerification` if there is no proof, the creator is not a listed key, or
    ///   the signature does not match the document.
    /// * `InvalidKeyEncoding` if the creator's public key is malformed.
    pub fn verify_proof(&self, provider: &impl CryptoProvider) -> Result<()> {
        let Some(proof) = &self.proof else {
            tracerr!(Err::FailedSignatureVerification, "document {} has no proof", self.id);
        };
        let Some(pk) = self.find_key(&proof.creator) else {
            tracerr!(
                Err::FailedSignatureVerification,
                "proof creator {} is not a key of {}",
                proof.creator,
                self.id
            );
        };
        let public_key = match hex::decode(&pk.public_key_hex) {
            Ok(b) => b,
            Err(e) => tracerr!(Err::InvalidKeyEncoding, "public key {} is invalid: {}", pk.id, e),
        };
        let digest = self.digest(provider)?;
        provider.verify(&pk.algorithm, &public_key, &digest, &proof.signature()?)
    }
}

/// Assembles and signs the document for a newly created DID.
///
/// # Example
///
/// ```rust,ignore
/// let doc = DocumentBuilder::new(&did, &master, &standby).build(&Ed25519Provider)?;
/// ```
#[derive(Debug)]
pub struct DocumentBuilder<'a> {
    did: String,
    master: &'a KeyPair,
    standby: &'a KeyPair,
    created: Option<DateTime<Utc>>,
}

impl<'a> DocumentBuilder<'a> {
    /// Start a document for `did` listing the given master and standby keys.
    #[must_use]
    pub fn new(did: impl Into<String>, master: &'a KeyPair, standby: &'a KeyPair) -> Self {
        Self {
            did: did.into(),
            master,
            standby,
            created: None,
        }
    }

    /// Set the creation (and update) time. Defaults to now.
    #[must_use]
    pub fn created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Build the document and sign it with the master key.
    ///
    /// # Errors
    ///
    /// * `SigningFailed` if the document cannot be digested or the master key cannot sign it.
    ///   No document is returned in that case.
    pub fn build(self, provider: &impl CryptoProvider) -> Result<DidDocument> {
        let master_id = KeyRole::Master.key_id(&self.did);
        let standby_id = KeyRole::Standby.key_id(&self.did);
        let now = self.created.unwrap_or_else(Utc::now);

        let mut doc = DidDocument {
            context: CONTEXT.to_string(),
            id: self.did.clone(),
            version: DOCUMENT_VERSION,
            public_key: vec![
                PublicKey {
                    id: master_id.clone(),
                    algorithm: self.master.algorithm.clone(),
                    public_key_hex: self.master.public_key_hex.clone(),
                },
                PublicKey {
                    id: standby_id.clone(),
                    algorithm: self.standby.algorithm.clone(),
                    public_key_hex: self.standby.public_key_hex.clone(),
                },
            ],
            controller: self.did.clone(),
            authentication: vec![master_id.clone()],
            recovery: vec![standby_id],
            proof: None,
            created: now,
            updated: now,
        };

        let digest = doc.digest(provider)?;
        let secret = match self.master.secret_key() {
            Ok(sk) => sk,
            Err(e) => tracerr!(Err::SigningFailed, "master key of {} is unusable: {}", self.did, e),
        };
        let signature = match provider.sign(&secret, &digest) {
            Ok(sig) => sig,
            Err(e) => tracerr!(Err::SigningFailed, "issue signing document {}: {}", self.did, e),
        };

        doc.proof = Some(Proof {
            algorithm: self.master.algorithm.clone(),
            creator: master_id,
            signature_value: Base64::encode_string(&signature),
        });
        tracing::debug!(did = %self.did, "signed DID document");
        Ok(doc)
    }
}
