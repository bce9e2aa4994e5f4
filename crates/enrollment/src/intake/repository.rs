use std::path::PathBuf;

use super::domain::{EnrollmentId, EnrollmentRecord, NewEnrollment};

/// Storage abstraction so the service can be exercised in isolation.
///
/// `create` is all-or-nothing: on error no part of the record is visible to
/// later reads, and on success the write has been committed.
pub trait EnrollmentRepository: Send + Sync {
    fn create(&self, enrollment: NewEnrollment) -> Result<EnrollmentRecord, StorageError>;
    fn fetch(&self, id: EnrollmentId) -> Result<Option<EnrollmentRecord>, StorageError>;
    /// Most recent enrollments first.
    fn list(&self, limit: usize) -> Result<Vec<EnrollmentRecord>, StorageError>;
    fn count(&self) -> Result<u64, StorageError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to open enrollment store at {}: {source}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("enrollment store {operation} failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("enrollment store unavailable: {0}")]
    Unavailable(String),
}
