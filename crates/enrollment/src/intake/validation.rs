use chrono::NaiveDate;

use super::domain::{EnrollmentSubmission, RequiredField, SubmissionRequest};

/// Accepted layout for `dob`.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// Client-caused defects, reported in a fixed check order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body must be a JSON object.")]
    MissingBody,
    #[error("Missing required field: {0}.")]
    MissingField(RequiredField),
    #[error("Invalid date of birth. Expected format YYYY-MM-DD.")]
    InvalidDateFormat,
    #[error("Date of birth cannot be in the future.")]
    FutureDateOfBirth,
    #[error("Field {field} must be at most {max} characters.")]
    FieldTooLong { field: RequiredField, max: usize },
    #[error("Invalid email address.")]
    InvalidEmail,
}

/// Check a raw submission and return its normalized form.
///
/// Order: body, then each required field's presence, then the date of birth
/// (shape, then not after `today`), then length limits, then e-mail shape.
/// Required values are trimmed; the optional message is kept verbatim.
pub fn validate(
    request: Option<&SubmissionRequest>,
    today: NaiveDate,
) -> Result<EnrollmentSubmission, ValidationError> {
    let request = request.ok_or(ValidationError::MissingBody)?;

    let mut values = [""; RequiredField::ALL.len()];
    for (slot, field) in values.iter_mut().zip(RequiredField::ALL) {
        *slot = field
            .raw(request)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError::MissingField(field))?;
    }
    let [parent_name, child_name, dob, gender, email, phone_number] = values;

    let dob = parse_dob(dob)?;
    if dob > today {
        return Err(ValidationError::FutureDateOfBirth);
    }

    for (value, field) in values.iter().zip(RequiredField::ALL) {
        if let Some(max) = field.max_len() {
            if value.chars().count() > max {
                return Err(ValidationError::FieldTooLong { field, max });
            }
        }
    }

    if !is_plausible_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    let message = request
        .message
        .as_ref()
        .filter(|message| !message.trim().is_empty())
        .cloned();

    Ok(EnrollmentSubmission {
        parent_name: parent_name.to_string(),
        child_name: child_name.to_string(),
        dob,
        gender: gender.to_string(),
        email: email.to_string(),
        phone_number: phone_number.to_string(),
        message,
    })
}

/// Strict `YYYY-MM-DD`; chrono alone would also take unpadded components.
fn parse_dob(raw: &str) -> Result<NaiveDate, ValidationError> {
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(index, byte)| match index {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ValidationError::InvalidDateFormat);
    }

    NaiveDate::parse_from_str(raw, DOB_FORMAT).map_err(|_| ValidationError::InvalidDateFormat)
}

fn is_plausible_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
