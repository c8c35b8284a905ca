//! Locate the webcam photo payload in an upload request.
//!
//! Browsers post the captured frame in different shapes depending on the
//! client script. The channel is chosen from the request content type:
//!
//! - `application/json`: the first non-empty string among `image`, `file`,
//!   `data`;
//! - `application/x-www-form-urlencoded`: the first non-empty field among
//!   `file`, `image`, `webcam`, `data`;
//! - anything else: the raw body when it is non-empty UTF-8 text.
//!
//! The domain only learns whether a payload was found.

use actix_web::{HttpMessage, HttpRequest};
use serde_json::Value;
use tracing::debug;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_KEYS: [&str; 3] = ["image", "file", "data"];
const FORM_KEYS: [&str; 4] = ["file", "image", "webcam", "data"];

/// Extract the data-URI text carrying the photo, if any.
///
/// # Examples
/// ```
/// use actix_web::test::TestRequest;
/// use student_registry::inbound::http::photo_payload::extract_photo_payload;
///
/// let req = TestRequest::post()
///     .insert_header(("content-type", "application/json"))
///     .to_http_request();
/// let payload = extract_photo_payload(&req, br#"{"image":"data:image/jpeg;base64,AA=="}"#);
/// assert_eq!(payload.as_deref(), Some("data:image/jpeg;base64,AA=="));
/// ```
#[must_use]
pub fn extract_photo_payload(req: &HttpRequest, body: &[u8]) -> Option<String> {
    let content_type = req.content_type();
    let payload = if content_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
        from_json(body)
    } else if content_type.eq_ignore_ascii_case(FORM_CONTENT_TYPE) {
        from_form(body)
    } else {
        from_raw(body)
    };
    debug!(
        content_type,
        body_bytes = body.len(),
        found = payload.is_some(),
        "photo payload channel selected"
    );
    payload
}

fn from_json(body: &[u8]) -> Option<String> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(error) => {
            debug!(%error, "photo upload body is not valid JSON");
            return None;
        }
    };
    JSON_KEYS.iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_owned)
    })
}

fn from_form(body: &[u8]) -> Option<String> {
    let fields: Vec<(String, String)> = url::form_urlencoded::parse(body)
        .into_owned()
        .collect();
    FORM_KEYS.iter().find_map(|key| {
        fields
            .iter()
            .find(|(name, value)| name == key && !value.is_empty())
            .map(|(_, value)| value.clone())
    })
}

fn from_raw(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    match std::str::from_utf8(body) {
        Ok(text) => Some(text.to_owned()),
        Err(error) => {
            debug!(%error, "raw photo upload body is not UTF-8");
            None
        }
    }
}
