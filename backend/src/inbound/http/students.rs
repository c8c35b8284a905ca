//! Student registry HTTP handlers.
//!
//! ```text
//! GET  /                                   List students and pending flashes
//! POST /savestudent?idno=&lastname=&...    Register a student from a webcam photo
//! POST /delete/{id}                        Delete a student, then redirect to /
//! ```

use actix_web::http::header::{ContentType, LOCATION};
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{DeleteStudentOutcome, RegisterStudentRequest};
use crate::domain::{Error, StudentId, StudentRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::PlainTextError;
use crate::inbound::http::flash::{FlashCategory, FlashMessage, Flashes};
use crate::inbound::http::photo_payload::extract_photo_payload;
use crate::inbound::http::state::HttpState;

/// Body returned by `POST /savestudent` on success.
pub const SAVE_SUCCESS_MESSAGE: &str = "Student Saved Successfully";

/// Student fields carried in the upload query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SaveStudentQuery {
    /// ID number (max 10 characters).
    pub idno: Option<String>,
    /// Last name (max 25 characters).
    pub lastname: Option<String>,
    /// First name (max 25 characters).
    pub firstname: Option<String>,
    /// Course code (max 10 characters).
    pub course: Option<String>,
    /// Year level (max 5 characters).
    pub level: Option<String>,
}

/// Index payload: every student, newest first, plus drained flashes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentListing {
    /// Every registered student, highest row identifier first.
    pub students: Vec<StudentRecord>,
    /// Flash messages queued since the last listing.
    pub flashes: Vec<FlashMessage>,
}

/// List registered students.
///
/// Pending flash messages are removed from the session once returned.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Students, newest first", body = StudentListing),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Student store unavailable", body = Error)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/")]
pub async fn list_students(
    state: web::Data<HttpState>,
    queue: Flashes,
) -> ApiResult<web::Json<StudentListing>> {
    let students = state.students.list_students().await?;
    let flashes = queue.drain()?;
    Ok(web::Json(StudentListing { students, flashes }))
}

/// Register a student with a webcam photo.
///
/// Text fields travel in the query string; the photo data URI travels in
/// the body (JSON, form field, or raw text). Responses are plain text.
#[utoipa::path(
    post,
    path = "/savestudent",
    params(SaveStudentQuery),
    request_body(
        content = String,
        content_type = "text/plain",
        description = "Data URI such as `data:image/jpeg;base64,...`, or a JSON/form body carrying it"
    ),
    responses(
        (status = 200, description = "Student saved", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing field or unusable photo", body = String, content_type = "text/plain"),
        (status = 409, description = "ID number already registered", body = String, content_type = "text/plain"),
        (status = 413, description = "Body exceeds the configured limit"),
        (status = 500, description = "Photo or store failure", body = String, content_type = "text/plain")
    ),
    tags = ["students"],
    operation_id = "saveStudent"
)]
#[post("/savestudent")]
pub async fn save_student(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<SaveStudentQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, PlainTextError> {
    let SaveStudentQuery {
        idno,
        lastname,
        firstname,
        course,
        level,
    } = query.into_inner();
    let request = RegisterStudentRequest {
        id_number: idno,
        last_name: lastname,
        first_name: firstname,
        course,
        level,
        photo_payload: extract_photo_payload(&req, &body),
    };
    state.registration.register(request).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(SAVE_SUCCESS_MESSAGE))
}

fn deletion_flash(id: StudentId, result: Result<DeleteStudentOutcome, Error>) -> FlashMessage {
    match result {
        Ok(DeleteStudentOutcome::Deleted { display_name, .. }) => FlashMessage::new(
            FlashCategory::Warning,
            format!("Student {display_name} Deleted Successfully"),
        ),
        Ok(DeleteStudentOutcome::NotFound { id }) => {
            FlashMessage::new(FlashCategory::Danger, format!("Student with ID {id} not found"))
        }
        Err(err) => {
            error!(student_id = %id, error = %err, "student deletion failed");
            FlashMessage::new(
                FlashCategory::Danger,
                format!("Error deleting student: {}", err.message()),
            )
        }
    }
}

/// Delete a student and their photo, then redirect to the listing.
///
/// The outcome is reported as a flash message on the next `GET /`.
#[utoipa::path(
    post,
    path = "/delete/{id}",
    params(
        ("id" = i32, Path, description = "Student identifier")
    ),
    responses(
        (status = 302, description = "Redirect to the listing", headers(("Location" = String, description = "Always `/`"))),
        (status = 404, description = "Identifier is not an integer")
    ),
    tags = ["students"],
    operation_id = "deleteStudent"
)]
#[post("/delete/{id}")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    flashes: Flashes,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = StudentId::new(path.into_inner());
    let result = state.deletion.delete_student(id).await;
    if let Err(err) = flashes.push(deletion_flash(id, result)) {
        warn!(student_id = %id, error = %err, "failed to queue deletion flash");
    }
    HttpResponse::Found().insert_header((LOCATION, "/")).finish()
}

/// Register the student routes on an Actix service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_students)
        .service(save_student)
        .service(delete_student);
}

#[cfg(test)]
#[path = "students_tests.rs"]
mod tests;
