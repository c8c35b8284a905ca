//! Registry configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags (`--database-path`), environment variables
//! (`REGISTRY_DATABASE_PATH`), or configuration files, with defaults
//! applied by the accessors.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use super::config::DEFAULT_MAX_BODY_BYTES;
use crate::inbound::http::session_config::SessionOptions;

const DEFAULT_DATABASE_PATH: &str = "school.db";
const DEFAULT_UPLOAD_DIR: &str = "static/uploads";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {message}")]
    InvalidBindAddr {
        /// The configured text.
        value: String,
        /// Parser error text.
        message: String,
    },
}

/// Start-up configuration for the registry service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRY")]
pub struct RegistrySettings {
    /// SQLite database file.
    pub database_path: Option<PathBuf>,
    /// Directory holding student photos.
    pub upload_dir: Option<PathBuf>,
    /// Socket address to listen on, such as `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// Largest accepted request body in bytes.
    pub max_body_bytes: Option<usize>,
    /// Milliseconds a connection waits on a locked database.
    pub busy_timeout_ms: Option<u64>,
    /// File holding session key material.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key when the key file is unavailable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
}

impl RegistrySettings {
    /// Database file, defaulting to `school.db`.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH))
    }

    /// Upload directory, defaulting to `static/uploads`.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Parsed listen address, defaulting to `127.0.0.1:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            })
    }

    /// Request body limit, defaulting to 16 MiB.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(DEFAULT_MAX_BODY_BYTES)
    }

    /// Database lock wait, defaulting to five seconds.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS))
    }

    /// Session key inputs; cookies are `Secure` unless disabled.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            key_file: self.session_key_file.clone(),
            allow_ephemeral: self.session_allow_ephemeral,
            cookie_secure: self.cookie_secure,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for registry configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "REGISTRY_DATABASE_PATH",
        "REGISTRY_UPLOAD_DIR",
        "REGISTRY_BIND_ADDR",
        "REGISTRY_MAX_BODY_BYTES",
        "REGISTRY_BUSY_TIMEOUT_MS",
        "REGISTRY_SESSION_KEY_FILE",
        "REGISTRY_SESSION_ALLOW_EPHEMERAL",
        "REGISTRY_COOKIE_SECURE",
    ];

    fn load_from_args(args: &[&str]) -> RegistrySettings {
        let argv = std::iter::once(OsString::from("student-registry"))
            .chain(args.iter().map(OsString::from));
        RegistrySettings::load_from_iter(argv).expect("config should load")
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_args(&[]);

        assert_eq!(settings.database_path(), PathBuf::from("school.db"));
        assert_eq!(settings.upload_dir(), PathBuf::from("static/uploads"));
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 8080)))
        );
        assert_eq!(settings.max_body_bytes(), 16 * 1024 * 1024);
        assert_eq!(settings.busy_timeout(), Duration::from_secs(5));
        let session = settings.session_options();
        assert!(session.key_file.is_none());
        assert!(!session.allow_ephemeral);
        assert!(session.cookie_secure);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("REGISTRY_DATABASE_PATH", Some("/var/lib/registry/school.db".to_owned())),
            ("REGISTRY_UPLOAD_DIR", Some("/srv/uploads".to_owned())),
            ("REGISTRY_BIND_ADDR", Some("0.0.0.0:9000".to_owned())),
            ("REGISTRY_MAX_BODY_BYTES", Some("1024".to_owned())),
            ("REGISTRY_BUSY_TIMEOUT_MS", Some("250".to_owned())),
            ("REGISTRY_SESSION_KEY_FILE", Some("/run/secrets/key".to_owned())),
            ("REGISTRY_SESSION_ALLOW_EPHEMERAL", Some("true".to_owned())),
            ("REGISTRY_COOKIE_SECURE", Some("false".to_owned())),
        ]);

        let settings = load_from_args(&[]);

        assert_eq!(
            settings.database_path(),
            PathBuf::from("/var/lib/registry/school.db")
        );
        assert_eq!(settings.upload_dir(), PathBuf::from("/srv/uploads"));
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], 9000)))
        );
        assert_eq!(settings.max_body_bytes(), 1024);
        assert_eq!(settings.busy_timeout(), Duration::from_millis(250));
        let session = settings.session_options();
        assert_eq!(session.key_file, Some(PathBuf::from("/run/secrets/key")));
        assert!(session.allow_ephemeral);
        assert!(!session.cookie_secure);
    }

    #[rstest]
    fn cli_flags_override_defaults() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_args(&["--upload-dir", "/tmp/photos"]);

        assert_eq!(settings.upload_dir(), PathBuf::from("/tmp/photos"));
    }

    #[rstest]
    fn environment_can_switch_off_secure_cookies_alone() {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "REGISTRY_COOKIE_SECURE").then(|| "false".to_owned());
            (name, value)
        }));

        let session = load_from_args(&[]).session_options();

        assert!(!session.cookie_secure);
        assert!(!session.allow_ephemeral);
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_args(&["--bind-addr", "localhost"]);

        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { value, .. }) if value == "localhost"
        ));
    }
}
