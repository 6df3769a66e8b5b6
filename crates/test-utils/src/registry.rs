use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use base64ct::{Base64, Encoding};
use dashmap::DashMap;
use vercre_didwallet::error::{Context, Err};
use vercre_didwallet::hash::sha256;
use vercre_didwallet::keys::{CryptoProvider, Ed25519Provider};
use vercre_didwallet::{CreateDidRequest, DidDocument, Proof, Registry, Result, RevokeDidRequest};

/// How the mock registry answers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Verify and accept well-formed requests.
    #[default]
    Available,
    /// Fail every call as if the registry could not be reached.
    Unavailable,
    /// Refuse every call.
    Rejecting,
}

/// In-process registry that checks what it is sent the way a real registry would: document
/// proofs must verify against the document's master key and revocations must be signed by the
/// DID's recovery key.
#[derive(Debug, Default)]
pub struct MockRegistry {
    mode: RwLock<Mode>,
    documents: DashMap<String, DidDocument>,
    revoked: DashMap<String, Proof>,
    pings: AtomicUsize,
}

impl MockRegistry {
    /// A registry accepting valid requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that answers every call in `mode`.
    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        let registry = Self::default();
        registry.set_mode(mode);
        registry
    }

    /// Change how the registry answers.
    ///
    /// # Panics
    ///
    /// If the mode lock is poisoned.
    pub fn set_mode(&self, mode: Mode) {
        *self.mode.write().expect("mode lock poisoned") = mode;
    }

    /// Registered document for `did`, if any.
    #[must_use]
    pub fn document(&self, did: &str) -> Option<DidDocument> {
        self.documents.get(did).map(|d| d.value().clone())
    }

    /// Whether `did` is currently registered.
    #[must_use]
    pub fn is_registered(&self, did: &str) -> bool {
        self.documents.contains_key(did)
    }

    /// Proof accepted when `did` was revoked, if it was.
    #[must_use]
    pub fn revocation(&self, did: &str) -> Option<Proof> {
        self.revoked.get(did).map(|p| p.value().clone())
    }

    /// Number of successful pings.
    #[must_use]
    pub fn ping_count(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }

    fn check_mode(&self) -> Result<()> {
        let mode = *self.mode.read().expect("mode lock poisoned");
        match mode {
            Mode::Available => Ok(()),
            Mode::Unavailable => Err(Err::RegistryUnavailable).context("connection refused"),
            Mode::Rejecting => Err(Err::RegistryRejected).context("registry refused request"),
        }
    }

    fn verify_revocation(&self, request: &RevokeDidRequest) -> Result<()> {
        let Some(doc) = self.documents.get(&request.did) else {
            return Err(Err::RegistryRejected)
                .context(format!("{} is not registered", request.did));
        };
        if !doc.recovery.contains(&request.proof.creator) {
            return Err(Err::RegistryRejected)
                .context(format!("{} is not a recovery key", request.proof.creator));
        }
        let Some(pk) = doc.find_key(&request.proof.creator) else {
            return Err(Err::RegistryRejected).context("recovery key is not listed");
        };

        let public_key = hex::decode(&pk.public_key_hex).context("public key is not hex")?;
        let Ok(signature) = Base64::decode_vec(&request.proof.signature_value) else {
            return Err(Err::RegistryRejected).context("signature is not base64");
        };
        let digest = sha256(request.did.as_bytes());
        Ed25519Provider.verify(&pk.algorithm, &public_key, &digest, &signature)
    }
}

impl Registry for MockRegistry {
    async fn ping(&self) -> Result<()> {
        self.check_mode()?;
        self.pings.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_did(&self, request: &CreateDidRequest) -> Result<()> {
        self.check_mode()?;
        if request.did != request.document.id {
            return Err(Err::RegistryRejected).context("DID does not match document");
        }
        if self.documents.contains_key(&request.did) || self.revoked.contains_key(&request.did) {
            return Err(Err::RegistryRejected).context(format!("{} already exists", request.did));
        }
        if let Err(e) = request.document.verify_proof(&Ed25519Provider) {
            return Err(Err::RegistryRejected).context(format!("invalid document proof: {e}"));
        }

        tracing::debug!(did = %request.did, "mock registry: created");
        self.documents.insert(request.did.clone(), request.document.clone());
        Ok(())
    }

    async fn revoke_did(&self, request: &RevokeDidRequest) -> Result<()> {
        self.check_mode()?;
        if let Err(e) = self.verify_revocation(request) {
            return Err(Err::RegistryRejected).context(format!("invalid revocation: {e}"));
        }

        tracing::debug!(did = %request.did, "mock registry: revoked");
        self.documents.remove(&request.did);
        self.revoked.insert(request.did.clone(), request.proof.clone());
        Ok(())
    }
}
