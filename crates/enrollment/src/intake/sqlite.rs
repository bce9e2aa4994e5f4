use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::domain::{EnrollmentId, EnrollmentRecord, NewEnrollment};
use super::repository::{EnrollmentRepository, StorageError};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// SQLite ignores declared column widths, so limits live in CHECK constraints.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS enrollments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    parent_name  TEXT    NOT NULL CHECK (length(parent_name) BETWEEN 1 AND 100),
    child_name   TEXT    NOT NULL CHECK (length(child_name) BETWEEN 1 AND 100),
    dob          TEXT    NOT NULL,
    age          INTEGER NOT NULL CHECK (age >= 0),
    gender       TEXT    NOT NULL CHECK (length(gender) BETWEEN 1 AND 10),
    email        TEXT    NOT NULL CHECK (length(email) BETWEEN 1 AND 100),
    phone_number TEXT    NOT NULL CHECK (length(phone_number) BETWEEN 1 AND 20),
    message      TEXT,
    created_at   TEXT    NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

const INSERT: &str = "
INSERT INTO enrollments (parent_name, child_name, dob, age, gender, email, phone_number, message)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
RETURNING id, created_at
";

const SELECT_COLUMNS: &str = "SELECT id, parent_name, child_name, dob, age, gender, email, \
     phone_number, message, created_at FROM enrollments";

/// SQLite-backed repository. Every call opens its own connection and drops
/// it before returning, so no transactional state outlives a call.
#[derive(Debug, Clone)]
pub struct SqliteEnrollmentRepository {
    path: PathBuf,
}

impl SqliteEnrollmentRepository {
    /// Open (creating if needed) the store at `path` and ensure the schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let repository = Self { path: path.into() };
        let conn = repository.connect()?;
        conn.execute_batch(SCHEMA)
            .map_err(|source| StorageError::Query {
                operation: "schema setup",
                source,
            })?;
        debug!(path = %repository.path.display(), "enrollment store ready");
        Ok(repository)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        let conn = Connection::open(&self.path).map_err(|source| StorageError::Connection {
            path: self.path.clone(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|source| StorageError::Connection {
                path: self.path.clone(),
                source,
            })?;
        Ok(conn)
    }
}

fn query_error(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StorageError {
    move |source| StorageError::Query { operation, source }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<EnrollmentRecord> {
    Ok(EnrollmentRecord {
        id: EnrollmentId(row.get(0)?),
        parent_name: row.get(1)?,
        child_name: row.get(2)?,
        dob: row.get(3)?,
        age: row.get(4)?,
        gender: row.get(5)?,
        email: row.get(6)?,
        phone_number: row.get(7)?,
        message: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl EnrollmentRepository for SqliteEnrollmentRepository {
    fn create(&self, enrollment: NewEnrollment) -> Result<EnrollmentRecord, StorageError> {
        let mut conn = self.connect()?;
        // Dropping an uncommitted transaction rolls it back.
        let tx = conn.transaction().map_err(query_error("begin"))?;

        let submission = &enrollment.submission;
        let (id, created_at) = tx
            .query_row(
                INSERT,
                params![
                    submission.parent_name,
                    submission.child_name,
                    submission.dob,
                    enrollment.age,
                    submission.gender,
                    submission.email,
                    submission.phone_number,
                    submission.message,
                ],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, NaiveDateTime>(1)?)),
            )
            .map_err(query_error("insert"))?;

        tx.commit().map_err(query_error("commit"))?;

        Ok(EnrollmentRecord::from_new(
            EnrollmentId(id),
            enrollment,
            created_at,
        ))
    }

    fn fetch(&self, id: EnrollmentId) -> Result<Option<EnrollmentRecord>, StorageError> {
        let conn = self.connect()?;
        let mut statement = conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .map_err(query_error("fetch"))?;
        let mut rows = statement
            .query_map(params![id.0], record_from_row)
            .map_err(query_error("fetch"))?;
        let record = rows.next().transpose().map_err(query_error("fetch"))?;
        Ok(record)
    }

    fn list(&self, limit: usize) -> Result<Vec<EnrollmentRecord>, StorageError> {
        let conn = self.connect()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut statement = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT ?1"))
            .map_err(query_error("list"))?;
        let records = statement
            .query_map(params![limit], record_from_row)
            .map_err(query_error("list"))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error("list"))?;
        Ok(records)
    }

    fn count(&self) -> Result<u64, StorageError> {
        let conn = self.connect()?;
        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM enrollments", [], |row| row.get(0))
            .map_err(query_error("count"))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}
