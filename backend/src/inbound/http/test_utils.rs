//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per invocation, names the cookie `session`, and leaves
/// the `Secure` flag off for plain-HTTP test requests.
#[must_use]
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}
