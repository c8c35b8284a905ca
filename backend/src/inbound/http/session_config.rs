//! Session cookie configuration.
//!
//! The flash-message cookie is signed and encrypted with a key derived from a
//! key file. Debug builds, or deployments that opt in explicitly, may fall
//! back to a per-process key; sessions then do not survive restarts.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

/// Minimum key material accepted by [`Key::derive_from`].
const SESSION_KEY_MIN_LEN: usize = 32;
/// Release builds require a longer key file.
const RELEASE_SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing key file.
    Debug,
    /// Release builds require a key file unless ephemeral keys are allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }

    fn min_key_len(self) -> usize {
        match self {
            Self::Debug => SESSION_KEY_MIN_LEN,
            Self::Release => RELEASE_SESSION_KEY_MIN_LEN,
        }
    }
}

/// Inputs for building session settings, usually taken from configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// File holding the session key material.
    pub key_file: Option<PathBuf>,
    /// Permit a generated key when the file is unavailable.
    pub allow_ephemeral: bool,
    /// Mark the cookie `Secure`.
    pub cookie_secure: bool,
}

/// Session settings ready for `SessionMiddleware`.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy; `Lax` so the cookie survives the delete redirect.
    pub same_site: SameSite,
}

/// Errors raised while preparing session settings.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// No key file is configured and ephemeral keys are not allowed.
    #[error("no session key file configured and ephemeral keys are not allowed")]
    MissingKeyFile,
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file that was read.
        path: PathBuf,
        /// Bytes found in the file.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
}

/// Build session settings from options and build mode.
///
/// # Examples
///
/// ```rust
/// use student_registry::inbound::http::session_config::{
///     BuildMode, SessionOptions, session_settings,
/// };
///
/// let settings = session_settings(
///     &SessionOptions { allow_ephemeral: true, ..SessionOptions::default() },
///     BuildMode::Release,
/// )
/// .expect("ephemeral key allowed");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings(
    options: &SessionOptions,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let key = session_key(options, mode)?;
    Ok(SessionSettings {
        key,
        cookie_secure: options.cookie_secure,
        same_site: SameSite::Lax,
    })
}

fn session_key(options: &SessionOptions, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let ephemeral_ok = mode.is_debug() || options.allow_ephemeral;
    let Some(path) = options.key_file.as_deref() else {
        if ephemeral_ok {
            warn!("no session key file configured; using temporary session key");
            return Ok(Key::generate());
        }
        return Err(SessionConfigError::MissingKeyFile);
    };

    match std::fs::read(path) {
        Ok(bytes) => key_from_bytes(path, bytes, mode.min_key_len()),
        Err(error) if ephemeral_ok => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}

fn key_from_bytes(
    path: &Path,
    mut bytes: Vec<u8>,
    min_len: usize,
) -> Result<Key, SessionConfigError> {
    let length = bytes.len();
    if length < min_len {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path: path.to_path_buf(),
            length,
            min_len,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}
