//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers turn domain failures into consistent responses. JSON endpoints
//! render [`Error`] directly; the webcam upload endpoint wraps it in
//! [`PlainTextError`] to keep its plain-text contract.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = %self.message(), trace_id = ?self.trace_id(), "request failed");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Plain-text rendering of a domain [`Error`].
///
/// Client errors read `Error: {message}` with their mapped status. Every
/// server-side failure, including an unavailable store, is a `500` that
/// echoes the cause.
#[derive(Debug, Clone)]
pub struct PlainTextError(pub Error);

impl From<Error> for PlainTextError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl PlainTextError {
    fn is_server_failure(&self) -> bool {
        matches!(
            self.0.code(),
            ErrorCode::InternalError | ErrorCode::ServiceUnavailable
        )
    }

    /// Body text sent to the client.
    #[must_use]
    pub fn body(&self) -> String {
        if self.is_server_failure() {
            format!(
                "Internal Server Error: Failed to process request due to: {}",
                self.0.message()
            )
        } else {
            format!("Error: {}", self.0.message())
        }
    }
}

impl std::fmt::Display for PlainTextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.body())
    }
}

impl ResponseError for PlainTextError {
    fn status_code(&self) -> StatusCode {
        if self.is_server_failure() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            status_for(self.0.code())
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_server_failure() {
            error!(message = %self.0.message(), trace_id = ?self.0.trace_id(), "request failed");
        }
        let mut builder = HttpResponse::build(self.status_code());
        builder.content_type(ContentType::plaintext());
        if let Some(id) = self.0.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.body(self.body())
    }
}

#[cfg(test)]
mod tests;
