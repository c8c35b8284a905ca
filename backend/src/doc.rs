//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the student registry endpoints and the domain types
//! they exchange. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, StudentDetails, StudentRecord};
use crate::inbound::http::flash::{FlashCategory, FlashMessage};
use crate::inbound::http::students::StudentListing;

/// OpenAPI document for the HTTP interface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Student registry API",
        description = "Register students with a webcam photo, list them, and delete them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::students::list_students,
        crate::inbound::http::students::save_student,
        crate::inbound::http::students::delete_student,
    ),
    components(schemas(
        Error,
        ErrorCode,
        StudentDetails,
        StudentRecord,
        StudentListing,
        FlashMessage,
        FlashCategory
    )),
    tags(
        (name = "students", description = "Student registration, listing, and deletion")
    )
)]
pub struct ApiDoc;
