//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let expected = trace_id.to_string();
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(expected.as_str()));
}

#[test]
fn new_returns_none_when_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[test]
fn serialises_with_camel_case_and_snake_case_code() {
    let error = Error::conflict("taken")
        .with_trace_id("abc")
        .with_details(json!({ "field": "idno" }));
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "conflict",
            "message": "taken",
            "traceId": "abc",
            "details": { "field": "idno" },
        })
    );
}

#[test]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert!(value.get("traceId").is_none());
    assert!(value.get("details").is_none());
}

#[test]
fn display_uses_message() {
    assert_eq!(Error::invalid_request("bad input").to_string(), "bad input");
}
