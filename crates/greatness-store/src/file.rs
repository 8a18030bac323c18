//! On-disk save slot.
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! slot, so a crash mid-write leaves the previous save intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{SaveStore, StoreError};

/// A save slot backed by a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Bind a slot to `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf, StoreError> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(self.path.display().to_string()))?;
        let mut temp = name.to_os_string();
        temp.push(".tmp");
        Ok(self.path.with_file_name(temp))
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, document: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path()?;
        std::fs::write(&temp, document)?;
        std::fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), bytes = document.len(), "Save slot written");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Save slot cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("save.json"));
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn write_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("save.json"));

        store.write("first").unwrap();
        store.write("second").unwrap();

        assert_eq!(store.read().unwrap().as_deref(), Some("second"));
        assert!(!dir.path().join("nested").join("save.json.tmp").exists());
    }

    #[test]
    fn clear_removes_the_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("save.json"));

        store.write("doc").unwrap();
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
        store.clear().unwrap();
    }
}
