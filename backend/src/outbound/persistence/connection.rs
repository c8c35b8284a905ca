//! Per-operation SQLite connections for the Diesel adapters.
//!
//! SQLite handles are cheap to open, so each repository call establishes its
//! own connection instead of checking one out of a pool. The connection is
//! wrapped in `SyncConnectionWrapper`, which runs the blocking driver on
//! Tokio's blocking pool. A busy timeout makes concurrent writers wait for the
//! database lock rather than failing straight away.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Async SQLite connection used by the repositories.
pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

/// Errors raised while opening or preparing the database.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DbError {
    /// The database file could not be opened or configured.
    #[error("failed to open database: {message}")]
    Connect {
        /// Driver error text.
        message: String,
    },

    /// Applying embedded migrations failed.
    #[error("failed to run migrations: {message}")]
    Migrate {
        /// Migration harness error text.
        message: String,
    },
}

impl DbError {
    /// Create a connection error with the given message.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Create a migration error with the given message.
    #[must_use]
    pub fn migrate(message: impl Into<String>) -> Self {
        Self::Migrate {
            message: message.into(),
        }
    }
}

/// Location and tuning of the SQLite database.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use student_registry::outbound::persistence::DbConfig;
///
/// let config = DbConfig::new("school.db").with_busy_timeout(Duration::from_secs(2));
/// assert_eq!(config.database_url(), "school.db");
/// assert_eq!(config.busy_timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    database_path: PathBuf,
    busy_timeout: Duration,
}

impl DbConfig {
    /// Configure a database file; the busy timeout defaults to five seconds.
    #[must_use]
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Set how long a connection waits for a locked database.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Connection string handed to the SQLite driver.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.database_path.to_string_lossy().into_owned()
    }

    /// Lock wait applied to every connection.
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }
}

/// Cheap-to-clone handle that opens configured SQLite connections.
#[derive(Debug, Clone)]
pub struct Database {
    config: Arc<DbConfig>,
}

impl Database {
    /// Wrap a database configuration.
    #[must_use]
    pub fn new(config: DbConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Open a fresh connection with the busy timeout applied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connect`] when the file cannot be opened or the
    /// pragma cannot be set.
    pub async fn connect(&self) -> Result<SqliteConn, DbError> {
        let url = self.config.database_url();
        let mut conn = SqliteConn::establish(&url)
            .await
            .map_err(|err| DbError::connect(err.to_string()))?;
        let timeout_ms = self.config.busy_timeout.as_millis();
        conn.batch_execute(&format!("PRAGMA busy_timeout = {timeout_ms};"))
            .await
            .map_err(|err| DbError::connect(err.to_string()))?;
        debug!(database = %url, "opened sqlite connection");
        Ok(conn)
    }

    /// Apply pending embedded migrations and return how many ran.
    ///
    /// Migrations use a synchronous connection on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connect`] when the file cannot be opened and
    /// [`DbError::Migrate`] when a migration fails.
    pub async fn run_migrations(&self) -> Result<usize, DbError> {
        let url = self.config.database_url();
        let applied = tokio::task::spawn_blocking(move || {
            let mut conn = <SqliteConnection as diesel::Connection>::establish(&url)
                .map_err(|err| DbError::connect(err.to_string()))?;
            conn.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|err| DbError::migrate(err.to_string()))
        })
        .await
        .map_err(|err| DbError::migrate(err.to_string()))??;
        info!(
            database = %self.config.database_url(),
            applied,
            "database migrations complete"
        );
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::sql_types::BigInt;
    use diesel::{QueryableByName, sql_query};
    use diesel_async::RunQueryDsl;
    use tempfile::TempDir;

    #[derive(QueryableByName)]
    struct Count {
        #[diesel(sql_type = BigInt)]
        count: i64,
    }

    #[derive(QueryableByName)]
    struct Timeout {
        #[diesel(sql_type = BigInt)]
        timeout: i64,
    }

    fn temp_database() -> (TempDir, Database) {
        let dir = tempfile::tempdir().expect("temp dir");
        let db = Database::new(DbConfig::new(dir.path().join("school.db")));
        (dir, db)
    }

    #[tokio::test]
    async fn migrations_create_students_table_once() {
        let (_dir, db) = temp_database();

        assert_eq!(db.run_migrations().await.expect("first run"), 1);
        assert_eq!(db.run_migrations().await.expect("second run"), 0);

        let mut conn = db.connect().await.expect("connection");
        let tables: Vec<Count> = sql_query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = 'students'",
        )
        .load(&mut conn)
        .await
        .expect("query sqlite_master");
        assert_eq!(tables.iter().next().map(|row| row.count), Some(1));
    }

    #[tokio::test]
    async fn connections_apply_the_configured_busy_timeout() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db = Database::new(
            DbConfig::new(dir.path().join("school.db")).with_busy_timeout(Duration::from_millis(250)),
        );

        let mut conn = db.connect().await.expect("connection");
        let rows: Vec<Timeout> = sql_query("PRAGMA busy_timeout")
            .load(&mut conn)
            .await
            .expect("read pragma");

        assert_eq!(rows.iter().next().map(|row| row.timeout), Some(250));
    }

    #[tokio::test]
    async fn connect_fails_when_parent_directory_is_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db = Database::new(DbConfig::new(dir.path().join("missing").join("school.db")));

        let Err(error) = db.connect().await else {
            panic!("connecting under a missing directory should fail");
        };

        assert!(matches!(error, DbError::Connect { .. }));
    }
}
