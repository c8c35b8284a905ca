//! Student registry domain service.
//!
//! Implements the registration, listing, and deletion use-cases against the
//! record store and photo store ports. Each workflow is a best-effort
//! sequence without transactions:
//!
//! - registration writes the photo before inserting the record, so a record
//!   never points at a missing file; a failed insert leaves the photo orphaned;
//! - the existence check and insert are not atomic, the store's unique
//!   constraint is the last line of defence;
//! - deletion removes the photo before the record and does not roll back if
//!   the second step fails.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    DeleteStudentOutcome, PhotoStore, PhotoStoreError, RegisterStudentRequest,
    RegisterStudentResponse, StudentDeletionCommand, StudentRegistrationCommand,
    StudentRepository, StudentRepositoryError, StudentsQuery,
};
use crate::domain::{
    Error, PhotoFilename, PhotoPayload, PhotoPayloadError, StudentDetails, StudentId,
    StudentRecord, StudentValidationError,
};

const DUPLICATE_ID_NUMBER_MESSAGE: &str = "ID Number already exists. Use a unique ID.";

/// Registry service implementing the student driving ports.
#[derive(Clone)]
pub struct StudentRegistryService<R, P> {
    students: Arc<R>,
    photos: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<R, P> StudentRegistryService<R, P> {
    /// Create a service over a record store, a photo store, and a clock used
    /// to timestamp photo filenames.
    #[must_use]
    pub fn new(students: Arc<R>, photos: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            students,
            photos,
            clock,
        }
    }
}

impl<R, P> StudentRegistryService<R, P>
where
    R: StudentRepository,
    P: PhotoStore,
{
    fn map_repository_error(error: StudentRepositoryError) -> Error {
        match error {
            StudentRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("student repository unavailable: {message}"))
            }
            StudentRepositoryError::Query { message } => {
                Error::internal(format!("student repository error: {message}"))
            }
            StudentRepositoryError::DuplicateIdNumber { id_number } => {
                duplicate_id_number_error(&id_number)
            }
        }
    }

    fn map_photo_error(error: PhotoStoreError) -> Error {
        Error::internal(error.to_string())
    }

    async fn ensure_id_number_available(&self, id_number: &str) -> Result<(), Error> {
        let taken = self
            .students
            .exists_by_id_number(id_number)
            .await
            .map_err(Self::map_repository_error)?;
        if taken {
            return Err(duplicate_id_number_error(id_number));
        }
        Ok(())
    }
}

fn duplicate_id_number_error(id_number: &str) -> Error {
    Error::conflict(DUPLICATE_ID_NUMBER_MESSAGE).with_details(json!({
        "field": "idno",
        "code": "duplicate_id_number",
        "idNumber": id_number,
    }))
}

fn map_validation_error(error: &StudentValidationError) -> Error {
    let (message, code) = match error {
        StudentValidationError::Missing { .. } => {
            ("All student fields are required.".to_owned(), "missing_field")
        }
        StudentValidationError::TooLong { .. } => (error.to_string(), "too_long"),
    };
    Error::invalid_request(message).with_details(json!({
        "field": error.field().as_str(),
        "code": code,
    }))
}

fn map_payload_error(error: &PhotoPayloadError) -> Error {
    let (message, code) = match error {
        PhotoPayloadError::Missing => (
            "No image data received. Please take a picture using the TAKE PHOTO button first."
                .to_owned(),
            "missing_photo",
        ),
        PhotoPayloadError::MissingMarker => (
            "Invalid image format. Please take a new picture using the TAKE PHOTO button."
                .to_owned(),
            "invalid_photo_format",
        ),
        PhotoPayloadError::InvalidBase64 { .. } | PhotoPayloadError::Empty => {
            (format!("Invalid image data: {error}"), "invalid_photo_data")
        }
    };
    Error::invalid_request(message).with_details(json!({ "field": "photo", "code": code }))
}

#[async_trait]
impl<R, P> StudentRegistrationCommand for StudentRegistryService<R, P>
where
    R: StudentRepository,
    P: PhotoStore,
{
    async fn register(
        &self,
        request: RegisterStudentRequest,
    ) -> Result<RegisterStudentResponse, Error> {
        let details = StudentDetails::try_from_parts(
            request.id_number.as_deref(),
            request.last_name.as_deref(),
            request.first_name.as_deref(),
            request.course.as_deref(),
            request.level.as_deref(),
        )
        .map_err(|err| map_validation_error(&err))?;

        self.ensure_id_number_available(&details.id_number).await?;

        let photo = PhotoPayload::decode(request.photo_payload.as_deref().unwrap_or_default())
            .map_err(|err| map_payload_error(&err))?;
        let photo_filename = PhotoFilename::generate(&details.id_number, self.clock.utc());
        debug!(
            photo = %photo_filename,
            bytes = photo.len(),
            "writing student photo"
        );
        self.photos
            .write(&photo_filename, photo.as_bytes())
            .await
            .map_err(Self::map_photo_error)?;

        let student_id = self
            .students
            .insert(&details, &photo_filename)
            .await
            .map_err(|err| {
                warn!(
                    photo = %photo_filename,
                    error = %err,
                    "student insert failed after photo write; photo left in store"
                );
                Self::map_repository_error(err)
            })?;

        info!(
            student_id = %student_id,
            id_number = %details.id_number,
            photo = %photo_filename,
            "student registered"
        );
        Ok(RegisterStudentResponse {
            student_id,
            photo_filename,
        })
    }
}

#[async_trait]
impl<R, P> StudentsQuery for StudentRegistryService<R, P>
where
    R: StudentRepository,
    P: PhotoStore,
{
    async fn list_students(&self) -> Result<Vec<StudentRecord>, Error> {
        self.students
            .list_all()
            .await
            .map_err(Self::map_repository_error)
    }
}

#[async_trait]
impl<R, P> StudentDeletionCommand for StudentRegistryService<R, P>
where
    R: StudentRepository,
    P: PhotoStore,
{
    async fn delete_student(&self, id: StudentId) -> Result<DeleteStudentOutcome, Error> {
        let Some(record) = self
            .students
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
        else {
            debug!(student_id = %id, "student not found for deletion");
            return Ok(DeleteStudentOutcome::NotFound { id });
        };

        if !record.photo_filename.is_placeholder() {
            self.photos
                .delete(&record.photo_filename)
                .await
                .map_err(Self::map_photo_error)?;
        }

        let removed = self
            .students
            .delete_by_id(id)
            .await
            .map_err(Self::map_repository_error)?;
        if !removed {
            warn!(student_id = %id, "student row disappeared before delete");
        }

        info!(student_id = %id, photo = %record.photo_filename, "student deleted");
        Ok(DeleteStudentOutcome::Deleted {
            id,
            display_name: record.details.display_name(),
        })
    }
}

#[cfg(test)]
#[path = "student_registry_service_tests.rs"]
mod tests;
