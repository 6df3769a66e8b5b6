//! # DID Registry
//!
//! The remote registry that publishes DID documents. The wallet registers a document when it
//! creates an account and revokes the DID when the account is removed.

mod http;

use serde::{Deserialize, Serialize};

pub use self::http::HttpRegistry;
use crate::document::{DidDocument, Proof};
use crate::Result;

/// Request to register a new DID and its document.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct CreateDidRequest {
    /// The DID being registered.
    pub did: String,

    /// Signed DID document.
    pub document: DidDocument,
}

/// Request to revoke a DID. The proof signs the SHA-256 digest of the DID with the standby key.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct RevokeDidRequest {
    /// The DID being revoked.
    pub did: String,

    /// Signature by the DID's standby key.
    pub proof: Proof,
}

/// Error body returned by a registry that rejects a request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// Operations the wallet needs from a DID registry.
///
/// Implementations distinguish a registry that cannot be reached (`RegistryUnavailable`) from
/// one that refuses the request (`RegistryRejected`).
#[allow(async_fn_in_trait)]
pub trait Registry: Send + Sync {
    /// Check the registry is reachable.
    ///
    /// # Errors
    ///
    /// * `RegistryUnavailable` if the registry cannot be reached.
    /// * `RegistryRejected` if the registry answers with an error.
    async fn ping(&self) -> Result<()>;

    /// Register a DID and its signed document.
    ///
    /// # Errors
    ///
    /// * `RegistryUnavailable` if the registry cannot be reached.
    /// * `RegistryRejected` if the registry refuses the DID or document.
    async fn create_did(&self, request: &CreateDidRequest) -> Result<()>;

    /// Revoke a DID.
    ///
    /// # Errors
    ///
    /// * `RegistryUnavailable` if the registry cannot be reached.
    /// * `RegistryRejected` if the registry refuses the revocation.
    async fn revoke_did(&self, request: &RevokeDidRequest) -> Result<()>;
}
