//! # DID Wallet
//!
//! A wallet for decentralized identifiers (DIDs). It generates key material, assembles and
//! signs DID documents, registers and revokes DIDs with a remote registry, and keeps identity
//! records in a versioned, type-tagged stored form.
//!
//! ```rust,ignore
//! use vercre_didwallet::{Config, Wallet};
//!
//! let config = Config::new("http://localhost:8080").with_store_path("./wallet");
//! let wallet = Wallet::connect(&config).await?;
//!
//! let did = wallet.create_account().await?;
//! let identity = wallet.get(&did)?;
//! wallet.remove_account(&did).await?;
//! ```

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod config;
pub mod document;
pub mod error;
pub mod hash;
pub mod identity;
pub mod keys;
pub mod registry;
pub mod store;
mod wallet;

pub use config::Config;
pub use document::{DidDocument, DocumentBuilder, Proof, PublicKey};
pub use error::{Error, ErrorKind};
pub use identity::codec::{marshal, unmarshal};
pub use identity::{
    DidIdentity, Identity, IdentityRecord, IdentityType, RawIdentity, RawKeyIdentity,
    X509Identity,
};
pub use keys::{Algorithm, CryptoProvider, Ed25519Provider, KeyPair, KeyRole};
pub use registry::{CreateDidRequest, HttpRegistry, Registry, RevokeDidRequest};
pub use store::{FileSystemStore, InMemoryStore, Store};
pub use wallet::Wallet;

/// Result type for the wallet.
pub type Result<T, E = error::Error> = core::result::Result<T, E>;
