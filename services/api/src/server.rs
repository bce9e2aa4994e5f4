use crate::cli::ServeArgs;
use crate::infra::{open_repository, AppState};
use crate::routes::with_enrollment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use enrollment::config::AppConfig;
use enrollment::error::AppError;
use enrollment::intake::{AdminNotifier, DisabledNotifier, EnrollmentService, SmtpMailer};
use enrollment::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(open_repository(&mut config, args.database.take())?);
    info!(path = %config.database.path.display(), "enrollment store opened");

    // Decided once: incomplete mail settings disable notifications for the
    // whole process rather than failing on every submission.
    let app = match &config.mail {
        Some(mail) => {
            let mailer = SmtpMailer::from_config(mail)?;
            let notifier = Arc::new(AdminNotifier::new(mailer, mail.admin_email.clone()));
            info!(relay = %mail.host, port = mail.port, "administrator notifications enabled");
            with_enrollment_routes(Arc::new(EnrollmentService::new(repository, notifier)))
        }
        None => {
            warn!("mail settings incomplete; administrator notifications disabled");
            let notifier = Arc::new(DisabledNotifier);
            with_enrollment_routes(Arc::new(EnrollmentService::new(repository, notifier)))
        }
    };

    let app = app
        .layer(Extension(app_state))
        .layer(CorsLayer::permissive())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "enrollment intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
