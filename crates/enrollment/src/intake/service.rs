use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{error, info};

use super::domain::{EnrollmentRecord, NewEnrollment, SubmissionRequest};
use super::notifier::Notifier;
use super::repository::{EnrollmentRepository, StorageError};
use super::validation::{validate, ValidationError};

/// Service composing validation, storage, and administrator notification.
pub struct EnrollmentService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> EnrollmentService<R, N>
where
    R: EnrollmentRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Submit an enrollment, deriving the child's age from today's local date.
    pub fn submit(
        &self,
        request: Option<SubmissionRequest>,
    ) -> Result<EnrollmentRecord, SubmissionError> {
        self.submit_on(request.as_ref(), Local::now().date_naive())
    }

    /// Submit an enrollment as of `today`.
    ///
    /// Validation failures return before storage is touched. Once the record
    /// is committed the notifier runs, and nothing it does changes the result.
    pub fn submit_on(
        &self,
        request: Option<&SubmissionRequest>,
        today: NaiveDate,
    ) -> Result<EnrollmentRecord, SubmissionError> {
        let submission = validate(request, today)?;
        let enrollment = NewEnrollment::derive(submission, today);

        let record = self.repository.create(enrollment).map_err(|err| {
            error!(error = %err, "enrollment could not be stored");
            err
        })?;
        info!(enrollment_id = %record.id, age = record.age, "enrollment stored");

        self.notifier.notify(&record);
        Ok(record)
    }

    /// Most recent enrollments, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<EnrollmentRecord>, StorageError> {
        self.repository.list(limit)
    }
}

/// Error raised by the enrollment service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
