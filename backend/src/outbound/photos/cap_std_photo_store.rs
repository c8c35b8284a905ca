//! Filesystem `PhotoStore` scoped to the upload directory.
//!
//! Every path is resolved relative to a `cap_std::fs::Dir` capability, so
//! absolute paths and `..` components cannot reach outside the directory.
//! Filesystem calls block, so each operation runs on Tokio's blocking pool.
//! Writes never replace an existing file: a name collision is a write error.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::{debug, warn};

use crate::domain::PhotoFilename;
use crate::domain::ports::{PhotoStore, PhotoStoreError};

/// Photo store writing into a single upload directory.
#[derive(Debug, Clone)]
pub struct CapStdPhotoStore {
    dir: Arc<Dir>,
    root: PathBuf,
}

impl CapStdPhotoStore {
    /// Open the upload directory, creating it and any parents when missing.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let root = path.into();
        Dir::create_ambient_dir_all(&root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        debug!(upload_dir = %root.display(), "opened photo store");
        Ok(Self {
            dir: Arc::new(dir),
            root,
        })
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn run_blocking<T, F>(&self, op: F) -> io::Result<T>
    where
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(io::Error::other)?
    }
}

fn write_file(dir: &Dir, name: &str, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(name, &options)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.sync_all()
}

fn remove_file(dir: &Dir, name: &str) -> io::Result<()> {
    match dir.remove_file(name) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[async_trait]
impl PhotoStore for CapStdPhotoStore {
    async fn write(&self, filename: &PhotoFilename, bytes: &[u8]) -> Result<(), PhotoStoreError> {
        let name = filename.as_str().to_owned();
        let contents = bytes.to_vec();
        self.run_blocking(move |dir| write_file(dir, &name, &contents))
            .await
            .map_err(|err| {
                warn!(photo = %filename, error = %err, "photo write failed");
                PhotoStoreError::write(filename.as_str(), err.to_string())
            })
    }

    async fn delete(&self, filename: &PhotoFilename) -> Result<(), PhotoStoreError> {
        let name = filename.as_str().to_owned();
        self.run_blocking(move |dir| remove_file(dir, &name))
            .await
            .map_err(|err| {
                warn!(photo = %filename, error = %err, "photo delete failed");
                PhotoStoreError::delete(filename.as_str(), err.to_string())
            })
    }

    async fn exists(&self, filename: &PhotoFilename) -> bool {
        let name = filename.as_str().to_owned();
        self.run_blocking(move |dir| Ok(dir.exists(&name)))
            .await
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Harness {
        _tmp: TempDir,
        store: CapStdPhotoStore,
    }

    #[fixture]
    fn harness() -> Harness {
        let tmp = tempfile::tempdir().expect("temp dir");
        let store = CapStdPhotoStore::open(tmp.path().join("static").join("uploads"))
            .expect("open store");
        Harness { _tmp: tmp, store }
    }

    fn filename() -> PhotoFilename {
        let at = Utc
            .with_ymd_and_hms(2026, 10, 16, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        PhotoFilename::generate("S001", at)
    }

    #[rstest]
    #[tokio::test]
    async fn open_creates_missing_directories(harness: Harness) {
        assert!(harness.store.root().is_dir());
    }

    #[rstest]
    #[tokio::test]
    async fn write_stores_full_content(harness: Harness) {
        let name = filename();
        harness
            .store
            .write(&name, &[0xFF, 0xD8, 0xFF])
            .await
            .expect("write");

        assert!(harness.store.exists(&name).await);
        let stored = harness.store.dir.read(name.as_str()).expect("read back");
        assert_eq!(stored, vec![0xFF, 0xD8, 0xFF]);
    }

    #[rstest]
    #[tokio::test]
    async fn write_refuses_to_replace_existing_file(harness: Harness) {
        let name = filename();
        harness.store.write(&name, b"first photo").await.expect("write");

        let error = harness
            .store
            .write(&name, b"2nd")
            .await
            .expect_err("existing photo kept");

        assert!(matches!(
            error,
            PhotoStoreError::Write { ref filename, .. } if filename == name.as_str()
        ));
        let stored = harness.store.dir.read(name.as_str()).expect("read back");
        assert_eq!(stored, b"first photo".to_vec());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_file_and_tolerates_missing(harness: Harness) {
        let name = filename();
        harness.store.write(&name, b"jpeg").await.expect("write");

        harness.store.delete(&name).await.expect("delete");
        assert!(!harness.store.exists(&name).await);

        harness.store.delete(&name).await.expect("second delete is a no-op");
    }

    #[rstest]
    #[tokio::test]
    async fn stored_names_cannot_escape_the_directory(harness: Harness) {
        let escaping = PhotoFilename::from_stored(Some("../outside.jpeg".to_owned()));

        let error = harness
            .store
            .write(&escaping, b"jpeg")
            .await
            .expect_err("escape rejected");

        assert!(matches!(error, PhotoStoreError::Write { .. }));
        assert!(!harness.store.exists(&escaping).await);
    }
}
