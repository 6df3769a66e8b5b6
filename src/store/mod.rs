//! # Wallet Store
//!
//! A flat label to bytes store. The wallet keeps each identity's stored form under the
//! identity's DID; the store itself knows nothing about what the bytes mean.
//!
//! Two implementations are provided: [`FileSystemStore`], which keeps one file per label, and
//! [`InMemoryStore`], a process-local map for tests and short-lived wallets.

mod filesystem;
mod memory;

pub use self::filesystem::{FileSystemStore, EXTENSION};
pub use self::memory::InMemoryStore;
use crate::error::Err;
use crate::{tracerr, Result};

/// Label to bytes persistence used by the wallet.
///
/// Implementations must be safe to share between threads. Writes to one label are
/// last-writer-wins, and a reader never observes a partially written value.
pub trait Store: Send + Sync {
    /// Create or replace the entry for `label`.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if the label is unusable.
    /// * `StoreUnavailable` if the underlying storage fails.
    fn put(&self, label: &str, content: &[u8]) -> Result<()>;

    /// Content stored under `label`.
    ///
    /// # Errors
    ///
    /// * `NotFound` if there is no entry for the label.
    /// * `StoreUnavailable` if the underlying storage fails.
    fn get(&self, label: &str) -> Result<Vec<u8>>;

    /// Whether an entry exists for `label`. Storage failures read as `false`.
    fn exists(&self, label: &str) -> bool;

    /// Remove the entry for `label`. Removing an absent entry succeeds.
    ///
    /// # Errors
    ///
    /// * `StoreUnavailable` if the underlying storage fails.
    fn remove(&self, label: &str) -> Result<()>;

    /// Every label in the store, in no particular order.
    ///
    /// # Errors
    ///
    /// * `StoreUnavailable` if the underlying storage fails.
    fn list(&self) -> Result<Vec<String>>;
}

/// Longest label, in bytes, that still leaves room for the entry file extension within the
/// usual 255-byte file name limit.
pub const MAX_LABEL_LEN: usize = 255 - ".id".len();

/// Check that a label can be used as a store key. Labels must be non-empty, at most
/// [`MAX_LABEL_LEN`] bytes, must not contain path separators or NUL, nor start with `.`.
///
/// # Errors
///
/// * `InvalidInput` if the label is unusable.
pub fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() {
        tracerr!(Err::InvalidInput, "label must not be empty");
    }
    if label.len() > MAX_LABEL_LEN {
        tracerr!(Err::InvalidInput, "label is longer than {} bytes", MAX_LABEL_LEN);
    }
    if label.starts_with('.') {
        tracerr!(Err::InvalidInput, "label must not start with '.': {}", label);
    }
    if label.contains(['/', '\\', '\0']) {
        tracerr!(Err::InvalidInput, "label contains a reserved character: {:?}", label);
    }
    Ok(())
}
