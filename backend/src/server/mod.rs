//! Server construction and middleware wiring.

mod config;
mod settings;

pub use config::{DEFAULT_MAX_BODY_BYTES, ServerConfig};
pub use settings::{RegistrySettings, SettingsError};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::students;

/// Everything one App instance needs; cloned into every worker.
#[derive(Clone)]
pub struct AppDependencies {
    /// Handler state shared by every route.
    pub http_state: web::Data<HttpState>,
    /// Signing and encryption key for the session cookie.
    pub key: Key,
    /// Send the session cookie only over HTTPS.
    pub cookie_secure: bool,
    /// `SameSite` attribute of the session cookie.
    pub same_site: SameSite,
    /// Request body limit in bytes.
    pub max_body_bytes: usize,
}

/// Assemble the application: session cookies, tracing, body limit, routes.
#[must_use]
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
        max_body_bytes,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let app = App::new()
        .app_data(http_state)
        .app_data(web::PayloadConfig::new(max_body_bytes))
        .wrap(session)
        .wrap(Trace)
        .configure(students::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over the given handler state.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(state: HttpState, config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(state);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        max_body_bytes,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            max_body_bytes,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
