//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain use-case ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{StudentDeletionCommand, StudentRegistrationCommand, StudentsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Serves `POST /savestudent`.
    pub registration: Arc<dyn StudentRegistrationCommand>,
    /// Serves `GET /`.
    pub students: Arc<dyn StudentsQuery>,
    /// Serves `POST /delete/{id}`.
    pub deletion: Arc<dyn StudentDeletionCommand>,
}

impl HttpState {
    /// Bundle individual port implementations.
    #[must_use]
    pub fn new(
        registration: Arc<dyn StudentRegistrationCommand>,
        students: Arc<dyn StudentsQuery>,
        deletion: Arc<dyn StudentDeletionCommand>,
    ) -> Self {
        Self {
            registration,
            students,
            deletion,
        }
    }

    /// Serve every use-case from one service instance.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    /// use mockable::DefaultClock;
    /// use student_registry::domain::StudentRegistryService;
    /// use student_registry::inbound::http::state::HttpState;
    /// use student_registry::outbound::persistence::{Database, DbConfig, DieselStudentRepository};
    /// use student_registry::outbound::photos::CapStdPhotoStore;
    ///
    /// let repo = DieselStudentRepository::new(Database::new(DbConfig::new("school.db")));
    /// let photos = CapStdPhotoStore::open("static/uploads").expect("upload dir");
    /// let service = StudentRegistryService::new(Arc::new(repo), Arc::new(photos), Arc::new(DefaultClock));
    /// let _state = HttpState::from_service(Arc::new(service));
    /// ```
    #[must_use]
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: StudentRegistrationCommand + StudentsQuery + StudentDeletionCommand + 'static,
    {
        Self {
            registration: service.clone(),
            students: service.clone(),
            deletion: service,
        }
    }
}
