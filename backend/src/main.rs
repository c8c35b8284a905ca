//! Student registry entry-point: loads configuration, prepares storage, and
//! serves the HTTP interface.

use std::io;
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use student_registry::domain::StudentRegistryService;
use student_registry::inbound::http::session_config::{BuildMode, session_settings};
use student_registry::inbound::http::state::HttpState;
use student_registry::outbound::persistence::{Database, DbConfig, DieselStudentRepository};
use student_registry::outbound::photos::CapStdPhotoStore;
use student_registry::server::{RegistrySettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RegistrySettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let session = session_settings(
        &settings.session_options(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(io::Error::other)?;

    let database_path = settings.database_path();
    if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Dir::create_ambient_dir_all(parent, ambient_authority())?;
    }
    let db = Database::new(
        DbConfig::new(database_path).with_busy_timeout(settings.busy_timeout()),
    );
    db.run_migrations().await.map_err(io::Error::other)?;

    let photos = CapStdPhotoStore::open(settings.upload_dir())?;
    let service = StudentRegistryService::new(
        Arc::new(DieselStudentRepository::new(db)),
        Arc::new(photos),
        Arc::new(DefaultClock),
    );
    let state = HttpState::from_service(Arc::new(service));

    let config = ServerConfig::new(session, bind_addr).with_max_body_bytes(settings.max_body_bytes());
    info!(
        %bind_addr,
        upload_dir = %settings.upload_dir().display(),
        max_body_bytes = settings.max_body_bytes(),
        "starting student registry"
    );
    create_server(state, config)?.await
}
