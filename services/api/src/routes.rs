use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Extension;
use axum::Json;
use enrollment::intake::{enrollment_router, EnrollmentRepository, EnrollmentService, Notifier};
use serde_json::json;
use std::sync::Arc;

const INDEX_HTML: &str = "<p>Hello, World!</p>";

pub(crate) fn with_enrollment_routes<R, N>(service: Arc<EnrollmentService<R, N>>) -> axum::Router
where
    R: EnrollmentRepository + 'static,
    N: Notifier + 'static,
{
    enrollment_router(service)
        .route("/", axum::routing::get(index))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use enrollment::intake::{DisabledNotifier, SqliteEnrollmentRepository};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn router(dir: &tempfile::TempDir) -> axum::Router {
        let repository = SqliteEnrollmentRepository::open(dir.path().join("enrollments.db"))
            .expect("store opens");
        let service = EnrollmentService::new(Arc::new(repository), Arc::new(DisabledNotifier));
        with_enrollment_routes(Arc::new(service))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn index_serves_landing_page() {
        let dir = tempfile::tempdir().expect("temp dir");
        let response = router(&dir)
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        assert_eq!(&body[..], INDEX_HTML.as_bytes());
    }

    #[tokio::test]
    async fn enroll_route_is_mounted_alongside_operational_routes() {
        let dir = tempfile::tempdir().expect("temp dir");
        let response = router(&dir)
            .oneshot(
                Request::post("/api/enroll")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "parent_name": "Jamie Doe",
                            "child_name": "Robin Doe",
                            "dob": "2020-03-01",
                            "gender": "female",
                            "email": "jamie@example.org",
                            "phone_number": "555-0100"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    async fn get(router: axum::Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds")
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json body")
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_flag_is_set() {
        let dir = tempfile::tempdir().expect("temp dir");
        let response = get(router(&dir).layer(Extension(state(false))), "/ready").await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(read_json(response).await, json!({ "status": "initializing" }));
    }

    #[tokio::test]
    async fn readiness_reports_ready_once_flag_is_set() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = state(false);
        state.readiness.store(true, Ordering::Relaxed);

        let response = get(router(&dir).layer(Extension(state)), "/ready").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, json!({ "status": "ready" }));
    }

    #[tokio::test]
    async fn metrics_are_served_in_prometheus_text_format() {
        let dir = tempfile::tempdir().expect("temp dir");
        let response = get(router(&dir).layer(Extension(state(true))), "/metrics").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
