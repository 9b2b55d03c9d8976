//! Flat directory icon storage
//!
//! One file per sanitized domain: `<root>/<domain>.ico`.

use crate::storage::traits::{IconStatus, IconStore};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File extension used for every stored icon, whatever its real format
const ICON_EXTENSION: &str = "ico";

/// Directory-backed icon store
#[derive(Debug, Clone)]
pub struct FsIconStore {
    root: PathBuf,
}

impl FsIconStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the store, making sure the directory exists
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root)?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl IconStore for FsIconStore {
    fn destination(&self, domain: &str) -> PathBuf {
        self.root.join(format!("{domain}.{ICON_EXTENSION}"))
    }

    fn status(&self, path: &Path) -> IconStatus {
        match fs::metadata(path) {
            Ok(_) => IconStatus::Present,
            Err(e) if e.kind() == io::ErrorKind::NotFound => IconStatus::Missing,
            Err(e) => IconStatus::Unknown(e),
        }
    }

    fn save(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_destination_layout() {
        let store = FsIconStore::new("store");
        assert_eq!(
            store.destination("example.com"),
            PathBuf::from("store").join("example.com.ico")
        );
    }

    #[test]
    fn test_status_missing_then_present() {
        let dir = tempdir().unwrap();
        let store = FsIconStore::new(dir.path());
        let path = store.destination("example.com");

        assert!(matches!(store.status(&path), IconStatus::Missing));
        store.save(&path, b"\x00\x00\x01\x00").unwrap();
        assert!(matches!(store.status(&path), IconStatus::Present));
    }

    #[test]
    fn test_save_overwrites_verbatim() {
        let dir = tempdir().unwrap();
        let store = FsIconStore::new(dir.path());
        let path = store.destination("example.com");

        store.save(&path, b"first version").unwrap();
        store.save(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_status_error_other_than_not_found() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();

        // A path below a regular file cannot be stat'ed
        let store = FsIconStore::new(&blocker);
        let path = store.destination("example.com");
        assert!(matches!(store.status(&path), IconStatus::Unknown(_)));
    }

    #[test]
    fn test_create_makes_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("store");
        let store = FsIconStore::create(&root).unwrap();
        assert!(store.root().is_dir());
    }
}
