use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::Err;
use crate::hash::rand_hex;
use crate::store::{validate_label, Store};
use crate::{tracerr, Result};

/// File extension reserved for wallet entries. Only files carrying it are listed.
pub const EXTENSION: &str = "id";

/// Store keeping one file per label, `<root>/<label>.id`.
///
/// Writes go to a hidden temporary file in the same directory which is then renamed over the
/// entry, so a reader sees either the old content or the new, never a mix. Entry files are
/// readable only by their owner on Unix.
#[derive(Clone, Debug)]
pub struct FileSystemStore {
    root: PathBuf,
}

impl FileSystemStore {
    /// Open a store rooted at `path`, creating the directory tree if needed.
    ///
    /// # Errors
    ///
    /// * `StoreUnavailable` if the directory cannot be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let root = path.into();
        if let Err(e) = fs::create_dir_all(&root) {
            tracerr!(Err::StoreUnavailable, "cannot create store at {}: {}", root.display(), e);
        }
        tracing::debug!(root = %root.display(), "opened filesystem store");
        Ok(Self { root })
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether an entry exists for `label`, distinguishing absence from a storage failure.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` if the label is unusable.
    /// * `StoreUnavailable` if the entry's existence cannot be determined.
    pub fn try_exists(&self, label: &str) -> Result<bool> {
        validate_label(label)?;
        let path = self.entry_path(label);
        match path.try_exists() {
            Ok(exists) => Ok(exists),
            Err(e) => tracerr!(Err::StoreUnavailable, "cannot stat {}: {}", path.display(), e),
        }
    }

    fn entry_path(&self, label: &str) -> PathBuf {
        self.root.join(format!("{label}.{EXTENSION}"))
    }

    // Fixed length, so any label that fits as an entry name also fits while being written.
    fn temp_path(&self) -> PathBuf {
        self.root.join(format!(".{}.tmp", rand_hex(8)))
    }
}

impl Store for FileSystemStore {
    fn put(&self, label: &str, content: &[u8]) -> Result<()> {
        validate_label(label)?;
        let path = self.entry_path(label);
        let temp = self.temp_path();

        if let Err(e) = write_then_rename(&temp, &path, content) {
            let _ = fs::remove_file(&temp);
            tracerr!(Err::StoreUnavailable, "cannot write {}: {}", path.display(), e);
        }
        tracing::debug!(label, "stored entry");
        Ok(())
    }

    fn get(&self, label: &str) -> Result<Vec<u8>> {
        validate_label(label)?;
        let path = self.entry_path(label);
        match fs::read(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracerr!(Err::NotFound, "no entry for label {}", label)
            }
            Err(e) => tracerr!(Err::StoreUnavailable, "cannot read {}: {}", path.display(), e),
        }
    }

    fn exists(&self, label: &str) -> bool {
        match self.try_exists(label) {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(label, error = %e, "treating entry as absent");
                false
            }
        }
    }

    fn remove(&self, label: &str) -> Result<()> {
        validate_label(label)?;
        let path = self.entry_path(label);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(label, "removed entry");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => tracerr!(Err::StoreUnavailable, "cannot remove {}: {}", path.display(), e),
        }
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                tracerr!(Err::StoreUnavailable, "cannot list {}: {}", self.root.display(), e)
            }
        };

        let mut labels = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => tracerr!(Err::StoreUnavailable, "cannot read directory entry: {}", e),
            };
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|x| x.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(label) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if label.starts_with('.') {
                continue;
            }
            labels.push(label.to_string());
        }
        Ok(labels)
    }
}

fn write_then_rename(temp: &Path, path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = open_private(temp)?;
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, path)
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new().write(true).create_new(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
