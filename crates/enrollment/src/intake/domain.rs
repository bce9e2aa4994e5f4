use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::age::age_on;

/// Storage-assigned identifier for a persisted enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnrollmentId(pub i64);

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw form fields exactly as the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub parent_name: Option<String>,
    pub child_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub message: Option<String>,
}

/// Fields every submission must carry, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    ParentName,
    ChildName,
    Dob,
    Gender,
    Email,
    PhoneNumber,
}

impl RequiredField {
    pub const ALL: [RequiredField; 6] = [
        RequiredField::ParentName,
        RequiredField::ChildName,
        RequiredField::Dob,
        RequiredField::Gender,
        RequiredField::Email,
        RequiredField::PhoneNumber,
    ];

    /// Wire name of the field in the JSON payload.
    pub fn name(self) -> &'static str {
        match self {
            RequiredField::ParentName => "parent_name",
            RequiredField::ChildName => "child_name",
            RequiredField::Dob => "dob",
            RequiredField::Gender => "gender",
            RequiredField::Email => "email",
            RequiredField::PhoneNumber => "phone_number",
        }
    }

    /// Column width enforced for free-text fields; `None` for the date.
    pub fn max_len(self) -> Option<usize> {
        match self {
            RequiredField::ParentName | RequiredField::ChildName | RequiredField::Email => {
                Some(100)
            }
            RequiredField::Gender => Some(10),
            RequiredField::PhoneNumber => Some(20),
            RequiredField::Dob => None,
        }
    }

    pub(crate) fn raw(self, request: &SubmissionRequest) -> Option<&str> {
        let value = match self {
            RequiredField::ParentName => &request.parent_name,
            RequiredField::ChildName => &request.child_name,
            RequiredField::Dob => &request.dob,
            RequiredField::Gender => &request.gender,
            RequiredField::Email => &request.email,
            RequiredField::PhoneNumber => &request.phone_number,
        };
        value.as_deref()
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trimmed, validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentSubmission {
    pub parent_name: String,
    pub child_name: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
}

/// A validated submission together with the age derived for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub submission: EnrollmentSubmission,
    pub age: u32,
}

impl NewEnrollment {
    /// Derive the child's age as of `today`. The value is frozen from here on.
    pub fn derive(submission: EnrollmentSubmission, today: NaiveDate) -> Self {
        let age = age_on(submission.dob, today);
        Self { submission, age }
    }
}

/// Persisted enrollment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub id: EnrollmentId,
    pub parent_name: String,
    pub child_name: String,
    pub dob: NaiveDate,
    pub age: u32,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
    pub created_at: NaiveDateTime,
}

impl EnrollmentRecord {
    pub(crate) fn from_new(
        id: EnrollmentId,
        enrollment: NewEnrollment,
        created_at: NaiveDateTime,
    ) -> Self {
        let NewEnrollment { submission, age } = enrollment;
        Self {
            id,
            parent_name: submission.parent_name,
            child_name: submission.child_name,
            dob: submission.dob,
            age,
            gender: submission.gender,
            email: submission.email,
            phone_number: submission.phone_number,
            message: submission.message,
            created_at,
        }
    }
}
