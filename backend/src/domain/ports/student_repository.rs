//! Port abstraction for the student record store and its errors.

use async_trait::async_trait;

use crate::domain::{PhotoFilename, StudentDetails, StudentId, StudentRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by student repository adapters.
    pub enum StudentRepositoryError {
        /// The store could not be opened or the connection dropped.
        Connection {
            /// Driver error text.
            message: String,
        } => "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Driver error text.
            message: String,
        } => "student repository query failed: {message}",
        /// The store-level uniqueness guard rejected the ID number.
        DuplicateIdNumber {
            /// The rejected ID number.
            id_number: String,
        } => "student with ID number {id_number} already exists",
    }
}

/// Record store for students.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Every student, newest (highest id) first. Empty when none exist.
    async fn list_all(&self) -> Result<Vec<StudentRecord>, StudentRepositoryError>;

    /// Whether a student with this ID number exists.
    async fn exists_by_id_number(&self, id_number: &str) -> Result<bool, StudentRepositoryError>;

    /// Insert a student that owns `photo_filename` and return its new id.
    ///
    /// Fails with [`StudentRepositoryError::DuplicateIdNumber`] when the ID
    /// number is already taken, even if a caller's pre-check passed.
    async fn insert(
        &self,
        details: &StudentDetails,
        photo_filename: &PhotoFilename,
    ) -> Result<StudentId, StudentRepositoryError>;

    /// Fetch a student by id.
    async fn find_by_id(
        &self,
        id: StudentId,
    ) -> Result<Option<StudentRecord>, StudentRepositoryError>;

    /// Delete a student by id, returning whether a row was removed.
    async fn delete_by_id(&self, id: StudentId) -> Result<bool, StudentRepositoryError>;
}
