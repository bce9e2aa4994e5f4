//! Enrollment intake pipeline: validation, age derivation, transactional
//! storage, and best-effort administrator notification.

pub mod age;
pub mod domain;
pub mod export;
pub mod mailer;
pub mod notifier;
pub mod repository;
pub mod router;
pub mod service;
pub mod sqlite;
pub mod validation;

#[cfg(test)]
mod tests;

pub use age::age_on;
pub use domain::{
    EnrollmentId, EnrollmentRecord, EnrollmentSubmission, NewEnrollment, RequiredField,
    SubmissionRequest,
};
pub use export::write_csv;
pub use mailer::SmtpMailer;
pub use notifier::{
    escape_html, render_notification, AdminNotifier, DisabledNotifier, MailTransport,
    NotificationError, Notifier,
};
pub use repository::{EnrollmentRepository, StorageError};
pub use router::enrollment_router;
pub use service::{EnrollmentService, SubmissionError};
pub use sqlite::SqliteEnrollmentRepository;
pub use validation::{validate, ValidationError};
