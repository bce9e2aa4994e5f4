use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::domain::SubmissionRequest;
use super::notifier::Notifier;
use super::repository::EnrollmentRepository;
use super::service::{EnrollmentService, SubmissionError};

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Enrollment submitted successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Enrollment failed. Please try again.";

/// Router builder exposing the enrollment intake endpoint.
///
/// The free-text message has no length cap, so the request body is not
/// capped either.
pub fn enrollment_router<R, N>(service: Arc<EnrollmentService<R, N>>) -> Router
where
    R: EnrollmentRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/enroll", post(submit_handler::<R, N>))
        .layer(DefaultBodyLimit::disable())
        .with_state(service)
}

/// Anything other than a JSON object with string (or absent) fields counts
/// as a missing body.
pub(crate) fn parse_submission(body: &[u8]) -> Option<SubmissionRequest> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<EnrollmentService<R, N>>>,
    body: Bytes,
) -> Response
where
    R: EnrollmentRepository + 'static,
    N: Notifier + 'static,
{
    let request = parse_submission(&body);

    // Storage and SMTP are blocking; keep them off the async workers.
    let outcome = tokio::task::spawn_blocking(move || service.submit(request)).await;

    match outcome {
        Ok(Ok(_record)) => message_response(StatusCode::OK, SUBMIT_SUCCESS_MESSAGE),
        Ok(Err(SubmissionError::Validation(error))) => {
            debug!(error = %error, "enrollment rejected");
            message_response(StatusCode::BAD_REQUEST, &error.to_string())
        }
        Ok(Err(SubmissionError::Storage(_))) => {
            message_response(StatusCode::INTERNAL_SERVER_ERROR, SUBMIT_FAILURE_MESSAGE)
        }
        Err(join_error) => {
            error!(error = %join_error, "enrollment submission task aborted");
            message_response(StatusCode::INTERNAL_SERVER_ERROR, SUBMIT_FAILURE_MESSAGE)
        }
    }
}

fn message_response(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "message": message }))).into_response()
}
