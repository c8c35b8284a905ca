//! Tests for student registry HTTP handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::ports::{
    MockStudentDeletionCommand, MockStudentRegistrationCommand, MockStudentsQuery,
    RegisterStudentResponse,
};
use crate::domain::{ErrorCode, PhotoFilename, StudentDetails};
use crate::inbound::http::test_utils::test_session_middleware;

const PAYLOAD: &str = "data:image/jpeg;base64,/9j/4A==";

#[derive(Default)]
struct Ports {
    registration: MockStudentRegistrationCommand,
    students: MockStudentsQuery,
    deletion: MockStudentDeletionCommand,
}

impl Ports {
    fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.registration),
            Arc::new(self.students),
            Arc::new(self.deletion),
        )
    }
}

fn test_app(
    ports: Ports,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(test_session_middleware())
        .configure(configure)
}

fn record(id: i32) -> StudentRecord {
    let details = StudentDetails::try_from_parts(
        Some("S001"),
        Some("Cruz"),
        Some("Ana"),
        Some("BSIT"),
        Some("3"),
    )
    .expect("valid details");
    StudentRecord::new(StudentId::new(id), details, PhotoFilename::placeholder())
}

fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

async fn body_text(res: ServiceResponse) -> String {
    let bytes = actix_test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

fn save_request() -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/savestudent?idno=S001&lastname=Cruz&firstname=Ana&course=BSIT&level=3")
}

#[actix_web::test]
async fn list_returns_students_and_no_flashes() {
    let mut ports = Ports::default();
    ports
        .students
        .expect_list_students()
        .times(1)
        .return_once(|| Ok(vec![record(2), record(1)]));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request())
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let students = body["students"].as_array().expect("students array");
    assert_eq!(students.len(), 2);
    assert_eq!(students[0]["id"], 2);
    assert_eq!(students[0]["idNumber"], "S001");
    assert_eq!(students[0]["photoFilename"], "default_user.png");
    assert_eq!(body["flashes"], Value::Array(Vec::new()));
}

#[actix_web::test]
async fn list_failure_is_a_json_error() {
    let mut ports = Ports::default();
    ports
        .students
        .expect_list_students()
        .return_once(|| Err(Error::service_unavailable("student repository unavailable")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request())
        .await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case::raw("text/plain", PAYLOAD.to_owned())]
#[case::json("application/json", format!(r#"{{"image":"{PAYLOAD}"}}"#))]
#[case::form("application/x-www-form-urlencoded", "webcam=data%3Aimage%2Fjpeg%3Bbase64%2C%2F9j%2F4A%3D%3D".to_owned())]
#[actix_web::test]
async fn save_forwards_fields_and_payload(#[case] content_type: &str, #[case] body: String) {
    let mut ports = Ports::default();
    ports
        .registration
        .expect_register()
        .withf(|request| {
            request.id_number.as_deref() == Some("S001")
                && request.last_name.as_deref() == Some("Cruz")
                && request.first_name.as_deref() == Some("Ana")
                && request.course.as_deref() == Some("BSIT")
                && request.level.as_deref() == Some("3")
                && request.photo_payload.as_deref() == Some(PAYLOAD)
        })
        .times(1)
        .return_once(|_| {
            Ok(RegisterStudentResponse {
                student_id: StudentId::new(1),
                photo_filename: PhotoFilename::placeholder(),
            })
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        save_request()
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_text(res).await, SAVE_SUCCESS_MESSAGE);
}

#[actix_web::test]
async fn save_without_body_passes_no_payload() {
    let mut ports = Ports::default();
    ports
        .registration
        .expect_register()
        .withf(|request| request.photo_payload.is_none())
        .return_once(|_| {
            Err(Error::invalid_request(
                "No image data received. Please take a picture using the TAKE PHOTO button first.",
            ))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(&app, save_request().to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_text(res).await,
        "Error: No image data received. Please take a picture using the TAKE PHOTO button first."
    );
}

#[rstest]
#[case(
    Error::invalid_request("All student fields are required."),
    StatusCode::BAD_REQUEST,
    "Error: All student fields are required."
)]
#[case(
    Error::conflict("ID Number already exists. Use a unique ID."),
    StatusCode::CONFLICT,
    "Error: ID Number already exists. Use a unique ID."
)]
#[case(
    Error::internal("failed to write photo S001.jpeg: permission denied"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "Internal Server Error: Failed to process request due to: failed to write photo S001.jpeg: permission denied"
)]
#[actix_web::test]
async fn save_errors_are_plain_text(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] expected: &str,
) {
    let mut ports = Ports::default();
    ports
        .registration
        .expect_register()
        .return_once(move |_| Err(error));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        save_request().set_payload(PAYLOAD).to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
    assert_eq!(body_text(res).await, expected);
}

async fn delete_then_list(outcome: Result<DeleteStudentOutcome, Error>) -> Vec<FlashMessage> {
    let mut ports = Ports::default();
    ports
        .deletion
        .expect_delete_student()
        .withf(|id| *id == StudentId::new(7))
        .times(1)
        .return_once(move |_| outcome);
    ports
        .students
        .expect_list_students()
        .return_once(|| Ok(Vec::new()));
    let app = actix_test::init_service(test_app(ports)).await;

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::post().uri("/delete/7").to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::FOUND);
    assert_eq!(
        deleted
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/")
    );

    let listed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/")
            .cookie(session_cookie(&deleted))
            .to_request(),
    )
    .await;
    let listing: StudentListing = actix_test::read_body_json(listed).await;
    listing.flashes
}

#[rstest]
#[case::deleted(
    Ok(DeleteStudentOutcome::Deleted { id: StudentId::new(7), display_name: "Ana Cruz".to_owned() }),
    FlashCategory::Warning,
    "Student Ana Cruz Deleted Successfully"
)]
#[case::not_found(
    Ok(DeleteStudentOutcome::NotFound { id: StudentId::new(7) }),
    FlashCategory::Danger,
    "Student with ID 7 not found"
)]
#[case::failed(
    Err(Error::internal("failed to delete photo S001.jpeg: permission denied")),
    FlashCategory::Danger,
    "Error deleting student: failed to delete photo S001.jpeg: permission denied"
)]
#[actix_web::test]
async fn delete_redirects_with_flash(
    #[case] outcome: Result<DeleteStudentOutcome, Error>,
    #[case] category: FlashCategory,
    #[case] message: &str,
) {
    let flashes = delete_then_list(outcome).await;

    assert_eq!(flashes, vec![FlashMessage::new(category, message)]);
}

#[actix_web::test]
async fn delete_with_non_integer_id_is_not_found() {
    let mut ports = Ports::default();
    ports.deletion.expect_delete_student().never();
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post().uri("/delete/abc").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
