use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::intake::domain::{
    EnrollmentId, EnrollmentRecord, NewEnrollment, SubmissionRequest,
};
use crate::intake::notifier::{MailTransport, NotificationError, Notifier};
use crate::intake::repository::{EnrollmentRepository, StorageError};
use crate::intake::service::EnrollmentService;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2024, 2, 29)
}

pub(super) fn created_at() -> NaiveDateTime {
    date(2024, 2, 29).and_hms_opt(9, 30, 0).expect("valid time")
}

pub(super) fn request() -> SubmissionRequest {
    SubmissionRequest {
        parent_name: Some("  Jamie Doe ".to_string()),
        child_name: Some("Robin Doe".to_string()),
        dob: Some("2020-03-01".to_string()),
        gender: Some("female".to_string()),
        email: Some("jamie@example.org".to_string()),
        phone_number: Some("555-0100".to_string()),
        message: Some("Allergic to peanuts.".to_string()),
    }
}

pub(super) fn record(id: i64) -> EnrollmentRecord {
    EnrollmentRecord {
        id: EnrollmentId(id),
        parent_name: "Jamie Doe".to_string(),
        child_name: "Robin Doe".to_string(),
        dob: date(2020, 3, 1),
        age: 3,
        gender: "female".to_string(),
        email: "jamie@example.org".to_string(),
        phone_number: "555-0100".to_string(),
        message: Some("<script>alert('hi')</script>".to_string()),
        created_at: created_at(),
    }
}

pub(super) type MemoryService = EnrollmentService<MemoryRepository, RecordingNotifier>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryRepository>,
    Arc<RecordingNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = EnrollmentService::new(repository.clone(), notifier.clone());
    (service, repository, notifier)
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    next_id: AtomicI64,
    records: Mutex<Vec<EnrollmentRecord>>,
}

impl MemoryRepository {
    pub(super) fn records(&self) -> Vec<EnrollmentRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl EnrollmentRepository for MemoryRepository {
    fn create(&self, enrollment: NewEnrollment) -> Result<EnrollmentRecord, StorageError> {
        let id = EnrollmentId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let record = EnrollmentRecord::from_new(id, enrollment, created_at());
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: EnrollmentId) -> Result<Option<EnrollmentRecord>, StorageError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| record.id == id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<EnrollmentRecord>, StorageError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }

    fn count(&self) -> Result<u64, StorageError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.len() as u64)
    }
}

pub(super) struct UnavailableRepository;

impl EnrollmentRepository for UnavailableRepository {
    fn create(&self, _enrollment: NewEnrollment) -> Result<EnrollmentRecord, StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: EnrollmentId) -> Result<Option<EnrollmentRecord>, StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<EnrollmentRecord>, StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }

    fn count(&self) -> Result<u64, StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    notified: Mutex<Vec<EnrollmentId>>,
}

impl RecordingNotifier {
    pub(super) fn notified(&self) -> Vec<EnrollmentId> {
        self.notified.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, record: &EnrollmentRecord) {
        self.notified
            .lock()
            .expect("notifier mutex poisoned")
            .push(record.id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SentMail {
    pub(super) to: String,
    pub(super) subject: String,
    pub(super) html_body: String,
}

#[derive(Default)]
pub(super) struct MemoryTransport {
    sent: Mutex<Vec<SentMail>>,
}

impl MemoryTransport {
    pub(super) fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().expect("transport mutex poisoned").clone()
    }
}

impl MailTransport for MemoryTransport {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("transport mutex poisoned")
            .push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
            });
        Ok(())
    }
}

pub(super) struct FailingTransport;

impl MailTransport for FailingTransport {
    fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), NotificationError> {
        Err(NotificationError::Unavailable("relay unreachable".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
