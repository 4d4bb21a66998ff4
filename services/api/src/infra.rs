use metrics_exporter_prometheus::PrometheusHandle;
use rent_estimator::error::AppError;
use rent_estimator::location::{GeoIndex, LocationCatalog, LocationDefaults};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<LocationCatalog>,
}

/// Loads the geo data for one-shot commands, where a missing file is fatal.
pub(crate) fn load_catalog_strict(
    path: &Path,
    defaults: LocationDefaults,
) -> Result<LocationCatalog, AppError> {
    let index = GeoIndex::from_path(path)?;
    Ok(LocationCatalog::new(index, defaults))
}
