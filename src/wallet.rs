//! # Wallet
//!
//! The wallet ties the other parts together. It creates DID accounts (key generation, document
//! signing, remote registration, local persistence), revokes them, and stores and retrieves
//! identities of any kind.
//!
//! Account creation moves through these stages, each logged at `debug`:
//!
//! ```text
//! Idle -> MaterialsGenerated -> DocumentSigned -> RegisteredRemotely -> PersistedLocally
//! ```
//!
//! A failure at any stage stops the operation. Nothing is rolled back: if the local write fails
//! after registration, the DID exists in the registry but not in the wallet.

use base64ct::{Base64, Encoding};

use crate::config::{is_method_name, Config, DEFAULT_METHOD};
use crate::document::{DocumentBuilder, Proof};
use crate::error::Err;
use crate::hash::rand_hex;
use crate::identity::{codec, DidIdentity, Identity};
use crate::keys::{Algorithm, CryptoProvider, Ed25519Provider, KeyPair, KeyRole};
use crate::registry::{CreateDidRequest, HttpRegistry, Registry, RevokeDidRequest};
use crate::store::{FileSystemStore, Store};
use crate::{tracerr, Result};

// Random bytes in a generated DID's method-specific id (32 hex characters).
const DID_ID_BYTES: usize = 16;

#[derive(Clone, Copy, Debug)]
enum Stage {
    Idle,
    MaterialsGenerated,
    DocumentSigned,
    RegisteredRemotely,
    PersistedLocally,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// A store of identities connected to a DID registry.
#[derive(Debug)]
pub struct Wallet<S, R, P = Ed25519Provider> {
    store: S,
    registry: R,
    provider: P,
    method: String,
}

impl<S: Store, R: Registry> Wallet<S, R> {
    /// Create a wallet over the given store and registry using the default Ed25519 provider and
    /// the `example` DID method.
    pub fn new(store: S, registry: R) -> Self {
        Self {
            store,
            registry,
            provider: Ed25519Provider,
            method: DEFAULT_METHOD.to_string(),
        }
    }
}

impl Wallet<FileSystemStore, HttpRegistry> {
    /// Open a wallet from configuration: a filesystem store at `store_path` and an HTTP registry
    /// at `registry_url`. The registry is pinged before the wallet is returned.
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the configuration is incomplete.
    /// * `StoreUnavailable` if the store directory cannot be created.
    /// * `RegistryUnavailable` or `RegistryRejected` if the registry does not answer the ping.
    pub async fn connect(config: &Config) -> Result<Self> {
        config.validate()?;
        let store = FileSystemStore::new(&config.store_path)?;
        let registry = HttpRegistry::from_config(config)?;
        registry.ping().await?;
        tracing::info!(registry = %config.registry_url, "wallet connected");
        Ok(Self::new(store, registry).with_method(&config.method))
    }
}

impl<S: Store, R: Registry, P: CryptoProvider> Wallet<S, R, P> {
    /// Replace the crypto provider.
    pub fn with_provider<Q: CryptoProvider>(self, provider: Q) -> Wallet<S, R, Q> {
        Wallet {
            store: self.store,
            registry: self.registry,
            provider,
            method: self.method,
        }
    }

    /// Set the DID method used for new accounts.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The registry client.
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Create a new DID account: generate a master and a standby key, sign a DID document with
    /// the master key, register the DID, then store the identity under the DID.
    ///
    /// Returns the new DID.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if the wallet's DID method name is invalid.
    /// * `UnsupportedAlgorithm` or `KeyGenerationFailed` if keys cannot be generated.
    /// * `SigningFailed` if the document cannot be signed.
    /// * `RegistryUnavailable` or `RegistryRejected` if registration fails. Nothing is stored.
    /// * `StoreUnavailable` if the identity cannot be stored. The DID remains registered.
    pub async fn create_account(&self) -> Result<String> {
        if !is_method_name(&self.method) {
            tracerr!(Err::InvalidInput, "invalid DID method name: {:?}", self.method);
        }
        let did = format!("did:{}:{}", self.method, rand_hex(DID_ID_BYTES));
        tracing::debug!(%did, stage = %Stage::Idle, "creating account");

        let master =
            KeyPair::generate(&self.provider, &Algorithm::Ed25519, &did, KeyRole::Master)?;
        let standby =
            KeyPair::generate(&self.provider, &Algorithm::Ed25519, &did, KeyRole::Standby)?;
        tracing::debug!(%did, stage = %Stage::MaterialsGenerated);

        let document = DocumentBuilder::new(&did, &master, &standby).build(&self.provider)?;
        tracing::debug!(%did, stage = %Stage::DocumentSigned);

        let identity = DidIdentity::new(&did, master, standby)?;
        let request = CreateDidRequest {
            did: did.clone(),
            document,
        };
        self.registry.create_did(&request).await?;
        tracing::debug!(%did, stage = %Stage::RegisteredRemotely);

        if let Err(e) = self.put(&did, &Identity::Did(identity)) {
            tracing::error!(%did, "DID registered but not stored locally: {e}");
            return Err(e);
        }
        tracing::debug!(%did, stage = %Stage::PersistedLocally);
        tracing::info!(%did, "account created");

        Ok(did)
    }

    /// Revoke a DID account: sign the DID with its standby key, ask the registry to revoke it,
    /// then delete it from the store. The local entry is only removed once the registry has
    /// accepted the revocation.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the wallet holds no identity for `did`.
    /// * `InvalidInput` if the identity stored under `did` is not a DID identity.
    /// * `InvalidKeyEncoding`, `UnsupportedKeyAlgorithm` or `SigningFailed` if the standby key
    ///   cannot sign.
    /// * `RegistryUnavailable` or `RegistryRejected` if revocation fails. The entry is kept.
    /// * `StoreUnavailable` if the entry cannot be removed.
    pub async fn remove_account(&self, did: &str) -> Result<()> {
        let Identity::Did(identity) = self.get(did)? else {
            tracerr!(Err::InvalidInput, "{} is not a DID identity", did);
        };

        let standby = identity.standby_key()?;
        let digest = self.provider.hash(did.as_bytes())?;
        let signature = self.provider.sign(&standby, &digest)?;

        let request = RevokeDidRequest {
            did: did.to_string(),
            proof: Proof {
                algorithm: identity.standby_key_pair().algorithm.clone(),
                creator: identity.standby_key_id().to_string(),
                signature_value: Base64::encode_string(&signature),
            },
        };
        self.registry.revoke_did(&request).await?;
        self.store.remove(did)?;
        tracing::info!(did, "account removed");

        Ok(())
    }

    /// Store an identity under `label`, replacing any existing entry.
    ///
    /// # Errors
    ///
    /// * `SerializationError` if the identity cannot be serialized.
    /// * `InvalidInput` if the label is unusable.
    /// * `StoreUnavailable` if the store fails.
    pub fn put(&self, label: &str, identity: &Identity) -> Result<()> {
        let content = codec::marshal(identity)?;
        self.store.put(label, &content)?;
        tracing::debug!(label, identity_type = %identity.identity_type(), "identity stored");
        Ok(())
    }

    /// Get the identity stored under `label`, decoded as whichever kind it was stored as.
    ///
    /// # Errors
    ///
    /// * `NotFound` if there is no entry for the label.
    /// * `StoreUnavailable` if the store fails.
    /// * `MalformedIdentity`, `MissingTypeTag` or `UnsupportedIdentityType` if the entry cannot
    ///   be decoded.
    pub fn get(&self, label: &str) -> Result<Identity> {
        let content = self.store.get(label)?;
        codec::unmarshal(&content)
    }

    /// Get the DID identity stored under `did`.
    ///
    /// # Errors
    ///
    /// As for [`Wallet::get`], plus `InvalidInput` if the entry is not a DID identity.
    pub fn get_did(&self, did: &str) -> Result<DidIdentity> {
        match self.get(did)? {
            Identity::Did(identity) => Ok(identity),
            other => tracerr!(
                Err::InvalidInput,
                "{} is a {} identity, not a DID identity",
                other.did(),
                other.identity_type()
            ),
        }
    }

    /// Labels of every identity in the wallet, in no particular order.
    ///
    /// # Errors
    ///
    /// * `StoreUnavailable` if the store fails.
    pub fn list_accounts(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    /// Whether the wallet holds an identity under `label`.
    pub fn exists(&self, label: &str) -> bool {
        self.store.exists(label)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::identity::RawIdentity;
    use crate::store::InMemoryStore;

    // Minimal registry recording what it is sent.
    #[derive(Default)]
    struct RecordingRegistry {
        created: Mutex<Vec<CreateDidRequest>>,
        revoked: Mutex<Vec<RevokeDidRequest>>,
        pings: AtomicUsize,
    }

    impl Registry for RecordingRegistry {
        async fn ping(&self) -> Result<()> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn create_did(&self, request: &CreateDidRequest) -> Result<()> {
            self.created.lock().expect("lock").push(request.clone());
            Ok(())
        }

        async fn revoke_did(&self, request: &RevokeDidRequest) -> Result<()> {
            self.revoked.lock().expect("lock").push(request.clone());
            Ok(())
        }
    }

    fn wallet() -> Wallet<InMemoryStore, RecordingRegistry> {
        Wallet::new(InMemoryStore::new(), RecordingRegistry::default())
    }

    #[tokio::test]
    async fn create_then_remove() {
        let wallet = wallet();
        let did = wallet.create_account().await.expect("should create");

        let id = did.strip_prefix("did:example:").expect("should use example method");
        assert_eq!(id.len(), 32);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));

        let identity = wallet.get_did(&did).expect("should be stored");
        assert_eq!(identity.master_key_id(), format!("{did}#keys-1"));
        assert_eq!(identity.standby_key_id(), format!("{did}#keys-2"));

        {
            let created = wallet.registry().created.lock().expect("lock");
            assert_eq!(created.len(), 1);
            let doc = &created[0].document;
            assert_eq!(doc.public_key[0].public_key_hex, identity.master_key_pair().public_key_hex);
            doc.verify_proof(&Ed25519Provider).expect("should verify");
        }

        wallet.remove_account(&did).await.expect("should remove");
        assert!(!wallet.exists(&did));

        let revoked = wallet.registry().revoked.lock().expect("lock");
        assert_eq!(revoked.len(), 1);
        assert_eq!(revoked[0].proof.creator, format!("{did}#keys-2"));
    }

    #[tokio::test]
    async fn custom_method() {
        let wallet = wallet().with_method("serval");
        let did = wallet.create_account().await.expect("should create");
        assert!(did.starts_with("did:serval:"));

        let wallet = wallet.with_method("Not Valid");
        let err = wallet.create_account().await.expect_err("should fail");
        assert!(err.is(Err::InvalidInput));
    }

    #[tokio::test]
    async fn remove_non_did_identity() {
        let wallet = wallet();
        let key = KeyPair::generate(
            &Ed25519Provider,
            &Algorithm::Ed25519,
            "did:example:1",
            KeyRole::Master,
        )
        .expect("should generate");
        let raw = RawIdentity::new("did:example:1", key).expect("should create");
        wallet.put("did:example:1", &raw.into()).expect("should put");

        let err = wallet.remove_account("did:example:1").await.expect_err("should fail");
        assert!(err.is(Err::InvalidInput));
        assert!(wallet.exists("did:example:1"));
        assert!(wallet.registry().revoked.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn remove_unknown() {
        let err = wallet().remove_account("did:example:nope").await.expect_err("should fail");
        assert!(err.is(Err::NotFound));
    }
}
