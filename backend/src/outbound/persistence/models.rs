//! Internal Diesel row structs for the students table.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use super::schema::students;

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct StudentRow {
    pub id: i32,
    pub id_number: String,
    pub last_name: String,
    pub first_name: String,
    pub course: String,
    pub level: String,
    pub photo_filename: Option<String>,
}

/// Insertable struct for new student records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow<'a> {
    pub id_number: &'a str,
    pub last_name: &'a str,
    pub first_name: &'a str,
    pub course: &'a str,
    pub level: &'a str,
    pub photo_filename: Option<&'a str>,
}
