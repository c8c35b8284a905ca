//! Port abstraction for storing student photo files.

use async_trait::async_trait;

use crate::domain::PhotoFilename;

use super::define_port_error;

define_port_error! {
    /// Errors raised by photo store adapters.
    pub enum PhotoStoreError {
        /// Creating or writing the file failed.
        Write {
            /// Photo filename the write targeted.
            filename: String,
            /// Underlying I/O error text.
            message: String,
        } => "failed to write photo {filename}: {message}",
        /// Removing an existing file failed.
        Delete {
            /// Photo filename the delete targeted.
            filename: String,
            /// Underlying I/O error text.
            message: String,
        } => "failed to delete photo {filename}: {message}",
    }
}

/// Binary photo storage keyed by filename.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Write the full content of a new photo.
    ///
    /// Fails with [`PhotoStoreError::Write`] when a file of that name already
    /// exists; stored photos are never overwritten. The file handle is
    /// released on every exit path.
    async fn write(&self, filename: &PhotoFilename, bytes: &[u8]) -> Result<(), PhotoStoreError>;

    /// Remove a photo. A missing file is not an error.
    async fn delete(&self, filename: &PhotoFilename) -> Result<(), PhotoStoreError>;

    /// Whether a photo of that name is present.
    async fn exists(&self, filename: &PhotoFilename) -> bool;
}
