//! # Wallet Configuration
//!
//! Settings needed to open a wallet backed by the filesystem and an HTTP registry. There is no
//! process-wide default: a [`Config`] is built or deserialized by the caller and passed to
//! [`crate::Wallet::connect`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Err;
use crate::{tracerr, Result};

/// Directory used for the filesystem store when none is configured.
pub const DEFAULT_STORE_PATH: &str = "./wallet";

/// DID method used for new accounts when none is configured.
pub const DEFAULT_METHOD: &str = "example";

/// Registry request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Wallet configuration.
///
/// ```json
/// {
///   "registry_url": "http://localhost:8080",
///   "store_path": "./wallet",
///   "method": "example",
///   "timeout_secs": 30
/// }
/// ```
///
/// Every field except `registry_url` may be omitted.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the DID registry.
    pub registry_url: String,

    /// Directory holding wallet entries.
    pub store_path: PathBuf,

    /// DID method name for new accounts, as in `did:<method>:<id>`.
    pub method: String,

    /// Registry request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_url: String::new(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            method: DEFAULT_METHOD.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Configuration for the registry at `registry_url` with every other setting defaulted.
    #[must_use]
    pub fn new(registry_url: impl Into<String>) -> Self {
        Self {
            registry_url: registry_url.into(),
            ..Self::default()
        }
    }

    /// Set the store directory.
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Set the DID method for new accounts.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the registry request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Parse and validate configuration from JSON.
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the JSON cannot be parsed or the result fails [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => tracerr!(Err::InvalidConfig, "issue parsing configuration: {}", e),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is complete.
    ///
    /// # Errors
    ///
    /// * `InvalidConfig` if the registry URL is missing, the store path is empty, the method
    ///   is not a valid DID method name, or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.registry_url.is_empty() {
            tracerr!(Err::InvalidConfig, "DID registry URL must be set");
        }
        if self.store_path.as_os_str().is_empty() {
            tracerr!(Err::InvalidConfig, "store path must be set");
        }
        if !is_method_name(&self.method) {
            tracerr!(Err::InvalidConfig, "invalid DID method name: {:?}", self.method);
        }
        if self.timeout_secs == 0 {
            tracerr!(Err::InvalidConfig, "registry timeout must be greater than zero");
        }
        Ok(())
    }

    /// Registry request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Whether `name` is a valid DID method name: one or more lowercase ASCII letters or digits.
pub(crate) fn is_method_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_json(r#"{"registry_url": "http://localhost:8080"}"#)
            .expect("should parse");
        assert_eq!(config, Config::new("http://localhost:8080"));
        assert_eq!(config.store_path, PathBuf::from("./wallet"));
        assert_eq!(config.method, "example");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn overrides() {
        let config = Config::from_json(
            r#"{
                "registry_url": "https://registry.example",
                "store_path": "/var/lib/wallet",
                "method": "serval",
                "timeout_secs": 5
            }"#,
        )
        .expect("should parse");
        assert_eq!(
            config,
            Config::new("https://registry.example")
                .with_store_path("/var/lib/wallet")
                .with_method("serval")
                .with_timeout_secs(5)
        );
    }

    #[test]
    fn invalid() {
        for json in [
            "{}",
            r#"{"registry_url": "http://localhost", "method": "Bad-Method"}"#,
            r#"{"registry_url": "http://localhost", "timeout_secs": 0}"#,
            r#"{"registry_url": "http://localhost", "store_path": ""}"#,
            r#"{"registry_url": 42}"#,
            "not json",
        ] {
            let err = Config::from_json(json).expect_err("should fail");
            assert!(err.is(Err::InvalidConfig), "{json}");
        }
    }
}
