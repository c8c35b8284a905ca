//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("disk full")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"path": "static/uploads"}))
}

async fn body_text(response: HttpResponse) -> String {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[actix_web::test]
async fn json_responses_redact_internal_messages(internal_error: Error) {
    let response = ResponseError::error_response(&internal_error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(header.as_deref(), Some(TRACE_ID));

    let body: Error = serde_json::from_str(&body_text(response).await).expect("error json");
    assert_eq!(body.message(), "Internal server error");
    assert_eq!(body.trace_id(), Some(TRACE_ID));
    assert!(body.details().is_none());
}

#[actix_web::test]
async fn json_responses_keep_client_error_details() {
    let error = Error::invalid_request("All student fields are required.")
        .with_details(json!({"field": "idno", "code": "missing_field"}));

    let response = ResponseError::error_response(&error);

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    let body: Error = serde_json::from_str(&body_text(response).await).expect("error json");
    assert_eq!(body, error);
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
    Error::internal("failed to write photo x.jpeg: disk full"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "Internal Server Error: Failed to process request due to: failed to write photo x.jpeg: disk full"
)]
#[case(
    Error::service_unavailable("unable to open database file"),
    StatusCode::INTERNAL_SERVER_ERROR,
    "Internal Server Error: Failed to process request due to: unable to open database file"
)]
#[actix_web::test]
async fn plain_text_errors_follow_upload_contract(
    #[case] error: Error,
    #[case] status: StatusCode,
    #[case] expected: &str,
) {
    let response = ResponseError::error_response(&PlainTextError::from(error));

    assert_eq!(response.status(), status);
    let content_type = response
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(body_text(response).await, expected);
}

#[rstest]
fn plain_text_errors_echo_trace_id(internal_error: Error) {
    let response = ResponseError::error_response(&PlainTextError(internal_error));

    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
}
