//! # Wallet Errors
//!
//! This module defines the error types used by the wallet, including for traits that may be
//! implemented in other crates (stores, registries and crypto providers).

use std::fmt::Display;

use thiserror::Error;

/// Simplify creation of errors with tracing.
///
/// # Example
/// ```
/// use vercre_didwallet::error::Err;
/// use vercre_didwallet::{tracerr, Result};
///
/// fn with_msg() -> Result<()> {
///     tracerr!(Err::InvalidInput, "message: {}", "some message")
/// }
///
/// fn no_msg() -> Result<()> {
///     tracerr!(Err::InvalidInput)
/// }
/// ```
#[macro_export]
macro_rules! tracerr {
    // with context
    ($code:expr, $($msg:tt)*) => {
        {
        use $crate::error::Context as _;
        tracing::error!($($msg)*);
        return Err($code).context(format!($($msg)*));
        }
    };
    // no context
    ($code:expr) => {
        {
        tracing::error!("{}", $code);
        return Err($code.into());
        }
    }
}

/// Public error type for the wallet.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct Error(#[from] anyhow::Error);

impl Error {
    /// Transfer the error to a JSON object suitable for returning to a caller over an API.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.0.root_cause().to_string(),
            "error_description": self.to_string(),
        })
    }

    /// Returns true if `err` is the code held by this error object.
    #[must_use]
    pub fn is(&self, err: Err) -> bool {
        self.code() == Some(err)
    }

    /// The typed error code, if the error originated in this crate.
    #[must_use]
    pub fn code(&self) -> Option<Err> {
        self.0.downcast_ref::<Err>().copied()
    }

    /// Taxonomy class of the error. Errors raised by foreign crates that were not mapped to a
    /// code are reported as [`ErrorKind::Other`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.code().map_or(ErrorKind::Other, |c| c.kind())
    }
}

/// Typed errors for the wallet.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq)]
pub enum Err {
    /// Caller supplied an empty id, a missing key, the wrong number of keys or an unusable label.
    #[error("invalid_input")]
    InvalidInput,

    /// Serialized identity bytes could not be parsed, either as the generic envelope or as the
    /// variant named by its type tag.
    #[error("malformed_identity")]
    MalformedIdentity,

    /// Serialized identity has no `type` discriminator.
    #[error("missing_type_tag")]
    MissingTypeTag,

    /// Serialized identity carries a `type` discriminator that names no known variant.
    #[error("unsupported_identity_type")]
    UnsupportedIdentityType,

    /// No entry exists in the store for the requested label.
    #[error("not_found")]
    NotFound,

    /// An entry already exists for the label.
    #[error("already_exists")]
    AlreadyExists,

    /// The underlying storage failed. The caller may retry.
    #[error("store_unavailable")]
    StoreUnavailable,

    /// A key id is not present in a multi-key identity.
    #[error("key_not_found")]
    KeyNotFound,

    /// Key generation was requested for an algorithm with no backing capability.
    #[error("unsupported_algorithm")]
    UnsupportedAlgorithm,

    /// A stored key carries an algorithm tag that cannot be decoded into a usable key.
    #[error("unsupported_key_algorithm")]
    UnsupportedKeyAlgorithm,

    /// Stored key material is not valid hex or has the wrong shape for its algorithm.
    #[error("invalid_key_encoding")]
    InvalidKeyEncoding,

    /// The crypto provider failed to produce a key pair.
    #[error("key_generation_failed")]
    KeyGenerationFailed,

    /// Digesting or signing failed.
    #[error("signing_failed")]
    SigningFailed,

    /// Failure to verify a signature.
    #[error("failed_signature_verification")]
    FailedSignatureVerification,

    /// The registry could not be reached (connection refused, timeout, DNS failure).
    #[error("registry_unavailable")]
    RegistryUnavailable,

    /// The registry was reached but rejected the request.
    #[error("registry_rejected")]
    RegistryRejected,

    /// An error occurred trying to serialize data.
    #[error("serialization_error")]
    SerializationError,

    /// An error occurred trying to deserialize data.
    #[error("deserialization_error")]
    DeserializationError,

    /// Configuration is incomplete or invalid.
    #[error("invalid_config")]
    InvalidConfig,
}

/// Broad classes of error, used to decide how a caller should react.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-correctable input problems. Never retried.
    Validation,
    /// Corrupt or unrecognized serialized data. Not retried.
    Codec,
    /// Storage outcomes and failures.
    Store,
    /// Key generation, hashing, signing and verification failures. Fatal to the operation.
    Crypto,
    /// Registry availability or rejection. The caller decides on retry.
    Registry,
    /// Configuration problems.
    Config,
    /// Errors from other crates that were not mapped to a code.
    Other,
}

impl Err {
    /// Taxonomy class for this code.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::InvalidInput => ErrorKind::Validation,
            Self::MalformedIdentity
            | Self::MissingTypeTag
            | Self::UnsupportedIdentityType
            | Self::SerializationError
            | Self::DeserializationError => ErrorKind::Codec,
            Self::NotFound | Self::AlreadyExists | Self::StoreUnavailable => ErrorKind::Store,
            Self::KeyNotFound
            | Self::UnsupportedAlgorithm
            | Self::UnsupportedKeyAlgorithm
            | Self::InvalidKeyEncoding
            | Self::KeyGenerationFailed
            | Self::SigningFailed
            | Self::FailedSignatureVerification => ErrorKind::Crypto,
            Self::RegistryUnavailable | Self::RegistryRejected => ErrorKind::Registry,
            Self::InvalidConfig => ErrorKind::Config,
        }
    }

    /// Whether a caller could reasonably retry the failed operation unchanged.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::StoreUnavailable | Self::RegistryUnavailable)
    }
}

/// Context is used to decorate errors with useful context information.
pub trait Context<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// Adds context to the error.
    ///
    /// # Errors
    ///
    /// * Original error with context appended.
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static;
}

impl<T, E> Context<T, E> for core::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Display + Send + Sync + 'static,
    {
        match self {
            Ok(ok) => Ok(ok),
            Err(e) => Err(Error(anyhow::Error::from(e).context(context))),
        }
    }
}

impl From<Err> for Error {
    fn from(error: Err) -> Self {
        Self(error.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self(err.into())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::Result;

    #[test]
    fn base_err() {
        let err: Error = Err::MalformedIdentity.into();

        assert_eq!(
            err.to_json(),
            json!({"error":"malformed_identity","error_description":"malformed_identity"})
        );
        assert!(err.is(Err::MalformedIdentity));
        assert_eq!(err.kind(), ErrorKind::Codec);
    }

    #[test]
    fn context_err() {
        let res: Result<()> = Err(Err::NotFound).context("no entry for label");
        let err = res.expect_err("expected error");

        assert_eq!(
            err.to_json(),
            json!({"error":"not_found","error_description":"no entry for label"})
        );
        assert!(err.is(Err::NotFound));
        assert!(!err.is(Err::StoreUnavailable));
    }

    #[test]
    fn foreign_err_has_no_code() {
        let parsed = serde_json::from_str::<serde_json::Value>("{");
        let err: Error = parsed.expect_err("should fail").into();
        assert_eq!(err.code(), None);
        assert_eq!(err.kind(), ErrorKind::Other);
    }

    #[test]
    fn retry_classification() {
        assert!(Err::RegistryUnavailable.is_retryable());
        assert!(Err::StoreUnavailable.is_retryable());
        assert!(!Err::RegistryRejected.is_retryable());
        assert!(!Err::InvalidInput.is_retryable());
        assert_eq!(Err::RegistryRejected.kind(), ErrorKind::Registry);
        assert_eq!(Err::SigningFailed.kind(), ErrorKind::Crypto);
    }

    #[test]
    fn test_macro() {
        let Err(e) = run_macro() else {
            panic!("expected error");
        };

        assert_eq!(e.to_string(), "test me");
        assert!(e.is(Err::InvalidInput));
    }

    fn run_macro() -> Result<()> {
        tracerr!(Err::InvalidInput, "test {}", "me")
    }
}
