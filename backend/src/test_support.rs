//! Test utilities for the registry crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature).

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use tempfile::TempDir;

use crate::domain::StudentRegistryService;
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{Database, DbConfig, DieselStudentRepository};
use crate::outbound::photos::CapStdPhotoStore;

/// Minimal JPEG byte sequence: SOI, a JFIF APP0 stub, EOI.
pub const SAMPLE_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xFF, 0xD9,
];

/// [`SAMPLE_JPEG`] as a webcam data URI.
#[must_use]
pub fn sample_jpeg_data_uri() -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(SAMPLE_JPEG))
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Freeze the clock at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Concrete service type wired over real adapters.
pub type RegistryService = StudentRegistryService<DieselStudentRepository, CapStdPhotoStore>;

/// Throw-away SQLite file and upload directory, removed on drop.
pub struct TemporaryRegistry {
    _dir: TempDir,
    database: Database,
    photos: CapStdPhotoStore,
    upload_dir: PathBuf,
}

impl TemporaryRegistry {
    /// Create a migrated database and an empty upload directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the temporary files cannot be prepared.
    pub async fn new() -> io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let database = Database::new(DbConfig::new(dir.path().join("school.db")));
        database.run_migrations().await.map_err(io::Error::other)?;
        let upload_dir = dir.path().join("static").join("uploads");
        let photos = CapStdPhotoStore::open(&upload_dir)?;
        Ok(Self {
            _dir: dir,
            database,
            photos,
            upload_dir,
        })
    }

    /// Repository over the temporary database.
    #[must_use]
    pub fn repository(&self) -> DieselStudentRepository {
        DieselStudentRepository::new(self.database.clone())
    }

    /// Registry service over both temporary stores.
    #[must_use]
    pub fn service(&self, clock: Arc<dyn Clock>) -> RegistryService {
        StudentRegistryService::new(
            Arc::new(self.repository()),
            Arc::new(self.photos.clone()),
            clock,
        )
    }

    /// Handler state backed by [`TemporaryRegistry::service`].
    #[must_use]
    pub fn http_state(&self, clock: Arc<dyn Clock>) -> HttpState {
        HttpState::from_service(Arc::new(self.service(clock)))
    }

    /// Write a file straight into the upload directory.
    pub fn put_upload(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        self.upload_dir_handle()?.write(name, bytes)
    }

    /// Read a file from the upload directory.
    pub fn read_upload(&self, name: &str) -> io::Result<Vec<u8>> {
        self.upload_dir_handle()?.read(name)
    }

    /// Whether the upload directory holds `name`.
    #[must_use]
    pub fn has_upload(&self, name: &str) -> bool {
        self.upload_dir_handle()
            .map(|dir| dir.exists(name))
            .unwrap_or(false)
    }

    /// Number of entries in the upload directory.
    pub fn upload_count(&self) -> io::Result<usize> {
        let mut count = 0;
        for entry in self.upload_dir_handle()?.entries()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    fn upload_dir_handle(&self) -> io::Result<Dir> {
        Dir::open_ambient_dir(&self.upload_dir, ambient_authority())
    }
}
