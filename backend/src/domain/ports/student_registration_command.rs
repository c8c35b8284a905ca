//! Driving port for registering students with a webcam photo.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, PhotoFilename, StudentId};

/// Raw registration input as received from an inbound adapter.
///
/// Every field is optional here; validation happens in the domain so all
/// adapters share the same rules and messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterStudentRequest {
    /// Raw `idno` value.
    pub id_number: Option<String>,
    /// Raw `lastname` value.
    pub last_name: Option<String>,
    /// Raw `firstname` value.
    pub first_name: Option<String>,
    /// Raw `course` value.
    pub course: Option<String>,
    /// Raw `level` value.
    pub level: Option<String>,
    /// Data-URI text carrying the base64 photo, if any channel supplied one.
    pub photo_payload: Option<String>,
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentResponse {
    /// Identifier assigned by the record store.
    #[schema(value_type = i32)]
    pub student_id: StudentId,
    /// Name under which the photo was stored.
    #[schema(value_type = String)]
    pub photo_filename: PhotoFilename,
}

/// Use-case port for student registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRegistrationCommand: Send + Sync {
    /// Validate the request, store the photo, then insert the record.
    async fn register(
        &self,
        request: RegisterStudentRequest,
    ) -> Result<RegisterStudentResponse, Error>;
}
