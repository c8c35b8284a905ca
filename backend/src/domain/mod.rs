//! Domain primitives, ports, and the registry service.
//!
//! Purpose: define the strongly typed student registry model used by the
//! HTTP and persistence adapters. Types document their invariants and serde
//! contracts in their own Rustdoc.
//!
//! Public surface:
//! - DomainError (alias Error) / ErrorCode: API error payload and its stable identifier.
//! - StudentDetails / StudentRecord / StudentId: validated student data.
//! - PhotoFilename / PhotoPayload: stored photo names and decoded uploads.
//! - StudentRegistryService: the use-case implementation over the ports.

pub mod error;
pub mod photo;
pub mod ports;
pub mod student;
mod student_registry_service;
pub mod trace_id;

pub use self::error::{DomainError, Error, ErrorCode};
pub use self::photo::{
    DEFAULT_PHOTO_FILENAME, PhotoFilename, PhotoPayload, PhotoPayloadError,
    sanitize_filename_stem,
};
pub use self::student::{
    StudentDetails, StudentField, StudentId, StudentRecord, StudentValidationError,
};
pub use self::student_registry_service::StudentRegistryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use student_registry::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such student"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
