use dashmap::DashMap;

use crate::error::Err;
use crate::store::{validate_label, Store};
use crate::{tracerr, Result};

/// Process-local store. Contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: DashMap<String, Vec<u8>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for InMemoryStore {
    fn put(&self, label: &str, content: &[u8]) -> Result<()> {
        validate_label(label)?;
        self.entries.insert(label.to_string(), content.to_vec());
        Ok(())
    }

    fn get(&self, label: &str) -> Result<Vec<u8>> {
        validate_label(label)?;
        match self.entries.get(label) {
            Some(content) => Ok(content.value().clone()),
            None => tracerr!(Err::NotFound, "no entry for label {}", label),
        }
    }

    fn exists(&self, label: &str) -> bool {
        validate_label(label).is_ok() && self.entries.contains_key(label)
    }

    fn remove(&self, label: &str) -> Result<()> {
        validate_label(label)?;
        self.entries.remove(label);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.entries.iter().map(|e| e.key().clone()).collect())
    }
}
