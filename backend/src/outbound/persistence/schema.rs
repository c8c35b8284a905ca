//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match `migrations/` exactly.

diesel::table! {
    /// Registered students.
    ///
    /// `id_number` carries a unique constraint; `photo_filename` defaults to
    /// the shared placeholder for rows inserted without a photo.
    students (id) {
        /// Auto-incremented primary key.
        id -> Integer,
        /// Business identity (max 10 characters).
        id_number -> Text,
        last_name -> Text,
        first_name -> Text,
        course -> Text,
        level -> Text,
        /// Bare filename inside the upload directory.
        photo_filename -> Nullable<Text>,
    }
}
