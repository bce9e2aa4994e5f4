use enrollment::config::AppConfig;
use enrollment::intake::{SqliteEnrollmentRepository, StorageError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Apply a CLI database override and open the store it points at.
pub(crate) fn open_repository(
    config: &mut AppConfig,
    database: Option<PathBuf>,
) -> Result<SqliteEnrollmentRepository, StorageError> {
    if let Some(path) = database {
        config.database.path = path;
    }
    SqliteEnrollmentRepository::open(config.database.path.clone())
}
