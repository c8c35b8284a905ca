//! Student record model and registration field validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PhotoFilename;

/// Registration fields, named as they appear in the `/savestudent` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    /// `idno`: the student's business identifier.
    IdNumber,
    /// `lastname`.
    LastName,
    /// `firstname`.
    FirstName,
    /// `course`: programme code such as `BSIT`.
    Course,
    /// `level`: year level.
    Level,
}

impl StudentField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IdNumber => "idno",
            Self::LastName => "lastname",
            Self::FirstName => "firstname",
            Self::Course => "course",
            Self::Level => "level",
        }
    }

    /// Maximum length in characters, matching the column widths.
    #[must_use]
    pub const fn max_chars(self) -> usize {
        match self {
            Self::IdNumber | Self::Course => 10,
            Self::LastName | Self::FirstName => 25,
            Self::Level => 5,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::IdNumber => "ID number",
            Self::LastName => "last name",
            Self::FirstName => "first name",
            Self::Course => "course",
            Self::Level => "level",
        }
    }
}

impl fmt::Display for StudentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by [`StudentDetails::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    /// The field was absent, empty, or only whitespace.
    Missing {
        /// Offending field.
        field: StudentField,
    },
    /// The trimmed value exceeds the column width.
    TooLong {
        /// Offending field.
        field: StudentField,
        /// Maximum length in characters.
        max: usize,
    },
}

impl StudentValidationError {
    /// The field that failed validation.
    #[must_use]
    pub const fn field(&self) -> StudentField {
        match self {
            Self::Missing { field } | Self::TooLong { field, .. } => *field,
        }
    }
}

impl fmt::Display for StudentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field.label()),
            Self::TooLong { field, max } => {
                write!(f, "{} must be at most {max} characters", field.label())
            }
        }
    }
}

impl std::error::Error for StudentValidationError {}

/// Database-assigned student identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct StudentId(i32);

impl StudentId {
    /// Wrap a raw row identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw row identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and enrolment details of a student.
///
/// ## Invariants
/// Values built through [`StudentDetails::try_from_parts`] are trimmed,
/// non-empty, and within [`StudentField::max_chars`]. Rows read back from the
/// store are trusted as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    /// Business identity, unique across all students.
    #[schema(example = "S001")]
    pub id_number: String,
    /// Family name.
    #[schema(example = "Cruz")]
    pub last_name: String,
    /// Given name.
    #[schema(example = "Ana")]
    pub first_name: String,
    /// Programme code.
    #[schema(example = "BSIT")]
    pub course: String,
    /// Year level.
    #[schema(example = "3")]
    pub level: String,
}

impl StudentDetails {
    /// Validate raw registration input.
    ///
    /// Fields are checked in wire order; the first failure is reported.
    ///
    /// # Examples
    /// ```
    /// use student_registry::domain::{StudentDetails, StudentField, StudentValidationError};
    ///
    /// let details = StudentDetails::try_from_parts(
    ///     Some("S001"), Some(" Cruz "), Some("Ana"), Some("BSIT"), Some("3"),
    /// )
    /// .expect("valid details");
    /// assert_eq!(details.last_name, "Cruz");
    ///
    /// let err = StudentDetails::try_from_parts(Some("S001"), None, Some("Ana"), Some("BSIT"), Some("3"))
    ///     .expect_err("missing last name");
    /// assert_eq!(err, StudentValidationError::Missing { field: StudentField::LastName });
    /// ```
    pub fn try_from_parts(
        id_number: Option<&str>,
        last_name: Option<&str>,
        first_name: Option<&str>,
        course: Option<&str>,
        level: Option<&str>,
    ) -> Result<Self, StudentValidationError> {
        Ok(Self {
            id_number: required(StudentField::IdNumber, id_number)?,
            last_name: required(StudentField::LastName, last_name)?,
            first_name: required(StudentField::FirstName, first_name)?,
            course: required(StudentField::Course, course)?,
            level: required(StudentField::Level, level)?,
        })
    }

    /// Name shown in user-facing messages: first name, then last name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn required(field: StudentField, value: Option<&str>) -> Result<String, StudentValidationError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(StudentValidationError::Missing { field });
    }
    let max = field.max_chars();
    if trimmed.chars().count() > max {
        return Err(StudentValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// A persisted student together with the photo it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Row identifier, used by the delete endpoint.
    #[schema(value_type = i32, example = 1)]
    pub id: StudentId,
    /// Validated registration fields.
    #[serde(flatten)]
    pub details: StudentDetails,
    /// Stored photo, or the shared placeholder when none was uploaded.
    #[schema(value_type = String, example = "S001_20261016093000.jpeg")]
    pub photo_filename: PhotoFilename,
}

impl StudentRecord {
    /// Assemble a record from its parts.
    #[must_use]
    pub const fn new(id: StudentId, details: StudentDetails, photo_filename: PhotoFilename) -> Self {
        Self {
            id,
            details,
            photo_filename,
        }
    }
}
