//! Driving port for deleting a student together with their photo.

use async_trait::async_trait;

use crate::domain::{Error, StudentId};

/// How a deletion request ended when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStudentOutcome {
    /// The record (and its photo, unless the placeholder) was removed.
    Deleted {
        /// Identifier of the deleted student.
        id: StudentId,
        /// Display name of the deleted student.
        display_name: String,
    },
    /// No student has this id; nothing changed.
    NotFound {
        /// Identifier that matched no student.
        id: StudentId,
    },
}

/// Use-case port for student deletion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentDeletionCommand: Send + Sync {
    /// Delete the student and the photo file they own.
    ///
    /// Partial completion (photo removed, record kept) is not rolled back.
    async fn delete_student(&self, id: StudentId) -> Result<DeleteStudentOutcome, Error>;
}
