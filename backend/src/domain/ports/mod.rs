//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`StudentRepository`, `PhotoStore`) describe what the domain
//! needs from storage adapters; driving ports describe the use-cases inbound
//! adapters may invoke.

mod macros;
pub(crate) use macros::define_port_error;

mod photo_store;
mod student_deletion_command;
mod student_registration_command;
mod student_repository;
mod students_query;

#[cfg(test)]
pub use photo_store::MockPhotoStore;
pub use photo_store::{PhotoStore, PhotoStoreError};
#[cfg(test)]
pub use student_deletion_command::MockStudentDeletionCommand;
pub use student_deletion_command::{DeleteStudentOutcome, StudentDeletionCommand};
#[cfg(test)]
pub use student_registration_command::MockStudentRegistrationCommand;
pub use student_registration_command::{
    RegisterStudentRequest, RegisterStudentResponse, StudentRegistrationCommand,
};
#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_repository::{StudentRepository, StudentRepositoryError};
#[cfg(test)]
pub use students_query::MockStudentsQuery;
pub use students_query::StudentsQuery;
