//! SQLite persistence adapters using Diesel ORM.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel models and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Per-operation connections**: each call opens its own SQLite handle via
//!   [`Database`]; migrations are embedded and applied at start-up.
//!
//! # Example
//!
//! ```no_run
//! use student_registry::outbound::persistence::{Database, DbConfig, DieselStudentRepository};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DbConfig::new("school.db"));
//! db.run_migrations().await?;
//! let repo = DieselStudentRepository::new(db);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod connection;
mod diesel_student_repository;
mod models;
mod schema;

pub use connection::{Database, DbConfig, DbError, MIGRATIONS, SqliteConn};
pub use diesel_student_repository::DieselStudentRepository;
