//! # Identities
//!
//! An identity is what the wallet stores under a label. There are several kinds, each carrying
//! different credentials:
//!
//! * [`RawIdentity`]: a single key pair.
//! * [`RawKeyIdentity`]: a named set of key pairs that can be added to and removed from.
//! * [`X509Identity`]: an X.509 certificate and its PEM private key.
//! * [`DidIdentity`]: the master and standby key pairs of a DID created by the wallet.
//!
//! Every kind is versioned and carries a `type` discriminator in its stored form. Reading stored
//! bytes back goes through [`codec::unmarshal`], which peeks at the discriminator and then
//! decodes the matching kind.

use serde::{Deserialize, Serialize};

pub mod codec;
mod did;
mod raw;
mod raw_key;
mod x509;

pub use self::did::DidIdentity;
pub use self::raw::RawIdentity;
pub use self::raw_key::RawKeyIdentity;
pub use self::x509::{Credentials, X509Identity};
use crate::Result;

/// Current version written for every identity kind.
pub const VERSION_1: u32 = 1;

/// Discriminator naming the kind of a stored identity.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash, Serialize)]
pub enum IdentityType {
    /// Single key pair.
    #[serde(rename = "Raw")]
    Raw,
    /// Named set of key pairs.
    #[serde(rename = "RawKey")]
    RawKey,
    /// X.509 certificate and private key.
    #[serde(rename = "X.509")]
    X509,
    /// Master and standby keys of a DID.
    #[serde(rename = "DID")]
    Did,
}

impl IdentityType {
    /// The stored tag for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Raw => "Raw",
            Self::RawKey => "RawKey",
            Self::X509 => "X.509",
            Self::Did => "DID",
        }
    }

    /// Look up the kind named by a stored tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Raw" => Some(Self::Raw),
            "RawKey" => Some(Self::RawKey),
            "X.509" => Some(Self::X509),
            "DID" => Some(Self::Did),
            _ => None,
        }
    }
}

impl std::fmt::Display for IdentityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Behaviour shared by every identity kind.
pub trait IdentityRecord: Serialize {
    /// The DID this identity represents. Also the label it is stored under.
    fn did(&self) -> &str;

    /// Format version of the record.
    fn version(&self) -> u32;

    /// Kind of the record.
    fn identity_type(&self) -> IdentityType;

    /// Serialize the record to its stored form.
    ///
    /// # Errors
    ///
    /// * `SerializationError` if the record cannot be serialized.
    fn marshal(&self) -> Result<Vec<u8>> {
        codec::to_bytes(self)
    }
}

/// A stored identity of any kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    /// Single key pair.
    Raw(RawIdentity),
    /// Named set of key pairs.
    RawKey(RawKeyIdentity),
    /// X.509 certificate and private key.
    X509(X509Identity),
    /// Master and standby keys of a DID.
    Did(DidIdentity),
}

impl Identity {
    /// The DID this identity represents.
    #[must_use]
    pub fn did(&self) -> &str {
        match self {
            Self::Raw(x) => x.did(),
            Self::RawKey(x) => x.did(),
            Self::X509(x) => x.did(),
            Self::Did(x) => x.did(),
        }
    }

    /// Format version of the record.
    #[must_use]
    pub fn version(&self) -> u32 {
        match self {
            Self::Raw(x) => x.version(),
            Self::RawKey(x) => x.version(),
            Self::X509(x) => x.version(),
            Self::Did(x) => x.version(),
        }
    }

    /// Kind of the record.
    #[must_use]
    pub const fn identity_type(&self) -> IdentityType {
        match self {
            Self::Raw(_) => IdentityType::Raw,
            Self::RawKey(_) => IdentityType::RawKey,
            Self::X509(_) => IdentityType::X509,
            Self::Did(_) => IdentityType::Did,
        }
    }

    /// Serialize the identity to its stored form.
    ///
    /// # Errors
    ///
    /// * `SerializationError` if the record cannot be serialized.
    pub fn marshal(&self) -> Result<Vec<u8>> {
        codec::marshal(self)
    }

    /// Borrow as a DID identity, if that is what this is.
    #[must_use]
    pub const fn as_did(&self) -> Option<&DidIdentity> {
        match self {
            Self::Did(x) => Some(x),
            _ => None,
        }
    }
}

impl From<RawIdentity> for Identity {
    fn from(x: RawIdentity) -> Self {
        Self::Raw(x)
    }
}

impl From<RawKeyIdentity> for Identity {
    fn from(x: RawKeyIdentity) -> Self {
        Self::RawKey(x)
    }
}

impl From<X509Identity> for Identity {
    fn from(x: X509Identity) -> Self {
        Self::X509(x)
    }
}

impl From<DidIdentity> for Identity {
    fn from(x: DidIdentity) -> Self {
        Self::Did(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_serde() {
        for t in [IdentityType::Raw, IdentityType::RawKey, IdentityType::X509, IdentityType::Did] {
            let json = serde_json::to_string(&t).expect("should serialize");
            assert_eq!(json, format!("\"{}\"", t.tag()));
            assert_eq!(IdentityType::from_tag(t.tag()), Some(t));
        }
        assert_eq!(IdentityType::from_tag("x509"), None);
    }
}
