//! SQLite-backed `StudentRepository` implementation using Diesel ORM.
//!
//! The adapter translates between row structs and domain records. The store's
//! unique constraint on `id_number` surfaces as
//! [`StudentRepositoryError::DuplicateIdNumber`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{StudentRepository, StudentRepositoryError};
use crate::domain::{PhotoFilename, StudentDetails, StudentId, StudentRecord};

use super::connection::{Database, DbError, SqliteConn};
use super::models::{NewStudentRow, StudentRow};
use super::schema::students;

/// Diesel-backed implementation of the `StudentRepository` port.
#[derive(Debug, Clone)]
pub struct DieselStudentRepository {
    db: Database,
}

impl DieselStudentRepository {
    /// Create a repository that opens connections from `db`.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    async fn connect(&self) -> Result<SqliteConn, StudentRepositoryError> {
        self.db.connect().await.map_err(map_db_error)
    }
}

fn map_db_error(error: DbError) -> StudentRepositoryError {
    let message = match error {
        DbError::Connect { message } | DbError::Migrate { message } => message,
    };
    StudentRepositoryError::connection(message)
}

/// Map Diesel errors to repository errors.
///
/// `id_number` is the value being inserted, if any, so a unique violation can
/// name it.
fn map_diesel_error(error: DieselError, id_number: Option<&str>) -> StudentRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StudentRepositoryError::duplicate_id_number(id_number.unwrap_or_default())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StudentRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) => StudentRepositoryError::query(info.message()),
        other => StudentRepositoryError::query(other.to_string()),
    }
}

fn row_to_record(row: StudentRow) -> StudentRecord {
    StudentRecord::new(
        StudentId::new(row.id),
        StudentDetails {
            id_number: row.id_number,
            last_name: row.last_name,
            first_name: row.first_name,
            course: row.course,
            level: row.level,
        },
        PhotoFilename::from_stored(row.photo_filename),
    )
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn list_all(&self) -> Result<Vec<StudentRecord>, StudentRepositoryError> {
        let mut conn = self.connect().await?;
        let rows: Vec<StudentRow> = students::table
            .order(students::id.desc())
            .select(StudentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn exists_by_id_number(&self, id_number: &str) -> Result<bool, StudentRepositoryError> {
        let mut conn = self.connect().await?;
        diesel::select(diesel::dsl::exists(
            students::table.filter(students::id_number.eq(id_number)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, None))
    }

    async fn insert(
        &self,
        details: &StudentDetails,
        photo_filename: &PhotoFilename,
    ) -> Result<StudentId, StudentRepositoryError> {
        let mut conn = self.connect().await?;
        let new_row = NewStudentRow {
            id_number: &details.id_number,
            last_name: &details.last_name,
            first_name: &details.first_name,
            course: &details.course,
            level: &details.level,
            photo_filename: Some(photo_filename.as_str()),
        };
        let id: i32 = diesel::insert_into(students::table)
            .values(&new_row)
            .returning(students::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(&details.id_number)))?;
        Ok(StudentId::new(id))
    }

    async fn find_by_id(
        &self,
        id: StudentId,
    ) -> Result<Option<StudentRecord>, StudentRepositoryError> {
        let mut conn = self.connect().await?;
        let row: Option<StudentRow> = students::table
            .find(id.get())
            .select(StudentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        Ok(row.map(row_to_record))
    }

    async fn delete_by_id(&self, id: StudentId) -> Result<bool, StudentRepositoryError> {
        let mut conn = self.connect().await?;
        let deleted = diesel::delete(students::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;
        Ok(deleted > 0)
    }
}
