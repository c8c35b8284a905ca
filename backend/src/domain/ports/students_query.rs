//! Driving port for listing registered students.

use async_trait::async_trait;

use crate::domain::{Error, StudentRecord};

/// Use-case port for the student listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentsQuery: Send + Sync {
    /// All students, most recently registered first.
    async fn list_students(&self) -> Result<Vec<StudentRecord>, Error>;
}
