//! Student photos: stored filenames and webcam payload decoding.
//!
//! Webcam captures arrive as data-URI text (`data:image/jpeg;base64,...`).
//! Everything after the first `base64,` marker is standard base64; the bytes
//! are stored under a filename derived from the student's ID number and the
//! capture time.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Placeholder shared by every student without an uploaded photo.
pub const DEFAULT_PHOTO_FILENAME: &str = "default_user.png";

const BASE64_MARKER: &str = "base64,";
const PHOTO_EXTENSION: &str = ".jpeg";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const FALLBACK_STEM: &str = "student";

/// Name of a file in the photo store.
///
/// ## Invariants
/// Generated names contain only `[A-Za-z0-9_.-]`, never start with `.` and
/// end in `.jpeg`. The placeholder is [`DEFAULT_PHOTO_FILENAME`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoFilename(String);

impl PhotoFilename {
    /// The shared "no photo" placeholder.
    #[must_use]
    pub fn placeholder() -> Self {
        Self(DEFAULT_PHOTO_FILENAME.to_owned())
    }

    /// Build the filename for a photo captured at `captured_at`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use student_registry::domain::PhotoFilename;
    ///
    /// let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).single().expect("valid time");
    /// let name = PhotoFilename::generate("../S 001", at);
    /// assert_eq!(name.as_str(), "S_001_20261016093000.jpeg");
    /// ```
    #[must_use]
    pub fn generate(id_number: &str, captured_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}_{}{PHOTO_EXTENSION}",
            sanitize_filename_stem(id_number),
            captured_at.format(TIMESTAMP_FORMAT)
        ))
    }

    /// Interpret a stored column value; absent or blank means placeholder.
    #[must_use]
    pub fn from_stored(value: Option<String>) -> Self {
        match value {
            Some(name) if !name.trim().is_empty() => Self(name),
            _ => Self::placeholder(),
        }
    }

    /// Whether this is the shared placeholder, which is never deleted.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0 == DEFAULT_PHOTO_FILENAME
    }

    /// Borrow the filename.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for PhotoFilename {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl AsRef<str> for PhotoFilename {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PhotoFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduce arbitrary user input to a filename stem that is safe on disk.
///
/// Input is NFKD-decomposed and folded to ASCII, so accented letters keep
/// their base letter and characters with no ASCII decomposition vanish.
/// Path separators become spaces, whitespace runs collapse into `_`, and
/// anything outside `[A-Za-z0-9_.-]` is dropped. Leading and trailing
/// `.`/`_` are stripped so the result can never name a hidden file or a
/// parent directory.
#[must_use]
pub fn sanitize_filename_stem(raw: &str) -> String {
    let folded: String = raw.nfkd().filter(char::is_ascii).collect();
    let separated = folded.replace(['/', '\\'], " ");
    let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let stem = filtered.trim_matches(|c| c == '.' || c == '_');
    if stem.is_empty() {
        FALLBACK_STEM.to_owned()
    } else {
        stem.to_owned()
    }
}

/// Failures while turning a webcam payload into image bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoPayloadError {
    /// No payload reached the server.
    #[error("no image data received")]
    Missing,
    /// The payload is not a base64 data URI.
    #[error("photo payload does not contain a base64 marker")]
    MissingMarker,
    /// The base64 segment is malformed.
    #[error("photo payload is not valid base64: {message}")]
    InvalidBase64 {
        /// Decoder error text.
        message: String,
    },
    /// The base64 segment decodes to nothing.
    #[error("photo payload contains no image data")]
    Empty,
}

/// Decoded photo bytes ready for the photo store.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoPayload(Vec<u8>);

impl PhotoPayload {
    /// Decode data-URI text into image bytes.
    ///
    /// ASCII whitespace inside the base64 segment is ignored.
    ///
    /// # Examples
    /// ```
    /// use student_registry::domain::{PhotoPayload, PhotoPayloadError};
    ///
    /// let photo = PhotoPayload::decode("data:image/jpeg;base64,/9j/4A==").expect("decodes");
    /// assert_eq!(photo.as_bytes(), &[0xFF, 0xD8, 0xFF, 0xE0]);
    ///
    /// assert_eq!(
    ///     PhotoPayload::decode("not a data uri"),
    ///     Err(PhotoPayloadError::MissingMarker)
    /// );
    /// ```
    pub fn decode(raw: &str) -> Result<Self, PhotoPayloadError> {
        if raw.trim().is_empty() {
            return Err(PhotoPayloadError::Missing);
        }
        let (_, encoded) = raw
            .split_once(BASE64_MARKER)
            .ok_or(PhotoPayloadError::MissingMarker)?;
        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|err| PhotoPayloadError::InvalidBase64 {
                message: err.to_string(),
            })?;
        if bytes.is_empty() {
            return Err(PhotoPayloadError::Empty);
        }
        Ok(Self(bytes))
    }

    /// Borrow the decoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of decoded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no bytes were decoded; never true for a successfully decoded payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PhotoPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoPayload")
            .field("len", &self.0.len())
            .finish()
    }
}
